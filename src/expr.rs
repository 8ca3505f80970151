//! Annotation expression DSL — a small typed AST plus the parser recovering
//! member + annotation intent from it.
//!
//! Exactly four top-level shapes are supported:
//!
//! - method call: `Expr::call("Method", vec![not_null(ty), …])`
//! - equality with a marker on one side:
//!   `Expr::eq(Expr::call("Get", vec![]), not_null(ty))`
//! - member access: `Expr::member("Field")`
//! - constructor call: `Expr::construct(vec![not_null(ty)])`
//!
//! Marker leaves carry an [`Annotation`] variant plus the parameter type
//! they stand in for — the type is what drives overload selection.

use crate::meta::{Metadata, TypeRef, TypeUse};
use crate::model::{MemberAnnotationInfo, ParameterAnnotationInfo};
use crate::resolve::{self, MemberSelector, OpenMember, OpenMemberKind};
use anyhow::{bail, Result};

/// Annotation intent attached to a parameter or a member result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    /// Placeholder with no annotation — holds a parameter position open.
    Some,
    NotNull,
    CanBeNull,
    /// NotNull format-string parameter; also marks the owning method with
    /// the StringFormatMethod attribute.
    FormatString,
    /// CanBeNull variant of [`Annotation::FormatString`].
    NullableFormatString,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Call {
        method: String,
        /// Closed type arguments when calling a generic method.
        type_args: Vec<TypeUse>,
        args: Vec<Expr>,
    },
    New {
        args: Vec<Expr>,
    },
    Member {
        name: String,
    },
    Eq {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Marker {
        annotation: Annotation,
        ty: TypeUse,
    },
}

impl Expr {
    pub fn call(method: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            method: method.to_string(),
            type_args: Vec::new(),
            args,
        }
    }

    pub fn generic_call(method: &str, type_args: Vec<TypeUse>, args: Vec<Expr>) -> Self {
        Expr::Call {
            method: method.to_string(),
            type_args,
            args,
        }
    }

    pub fn construct(args: Vec<Expr>) -> Self {
        Expr::New { args }
    }

    pub fn member(name: &str) -> Self {
        Expr::Member {
            name: name.to_string(),
        }
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Expr::Eq {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

// -- Marker constructors ------------------------------------------------------

pub fn some(ty: TypeUse) -> Expr {
    Expr::Marker {
        annotation: Annotation::Some,
        ty,
    }
}

pub fn not_null(ty: TypeUse) -> Expr {
    Expr::Marker {
        annotation: Annotation::NotNull,
        ty,
    }
}

pub fn can_be_null(ty: TypeUse) -> Expr {
    Expr::Marker {
        annotation: Annotation::CanBeNull,
        ty,
    }
}

/// Format-string markers always stand for a `System.String` parameter.
pub fn format_string() -> Expr {
    Expr::Marker {
        annotation: Annotation::FormatString,
        ty: TypeUse::named("System.String"),
    }
}

pub fn nullable_format_string() -> Expr {
    Expr::Marker {
        annotation: Annotation::NullableFormatString,
        ty: TypeUse::named("System.String"),
    }
}

// -- Parsing ------------------------------------------------------------------

/// The structured outcome of one annotate call: which open member is being
/// annotated and the facts that apply to it.
#[derive(Debug)]
pub struct Parsed {
    pub member: OpenMember,
    pub annotations: Vec<MemberAnnotationInfo>,
    pub parameter_annotations: Vec<ParameterAnnotationInfo>,
}

/// The target side of the expression, after the equality form (if any) has
/// been peeled off.
enum Target<'a> {
    Call {
        method: &'a str,
        type_args: &'a [TypeUse],
        args: &'a [Expr],
    },
    New {
        args: &'a [Expr],
    },
    Member {
        name: &'a str,
    },
}

/// Parse one annotation expression against a target type.
///
/// `require_static` restricts method targets to static methods (set by the
/// `annotate_static` entry point). All failures are immediate and abort the
/// whole call; there is no partial parse.
pub fn parse(
    metadata: &Metadata,
    target_type: &TypeRef,
    expr: &Expr,
    require_static: bool,
) -> Result<Parsed> {
    let (target, member_marker) = classify(expr)?;

    let selector = match &target {
        Target::Call {
            method,
            type_args,
            args,
        } => MemberSelector::Method {
            name: method.to_string(),
            type_args: type_args.to_vec(),
            signature: marker_signature(method, args)?,
            require_static,
        },
        Target::New { args } => MemberSelector::Constructor {
            signature: marker_signature("#ctor", args)?,
        },
        Target::Member { name } => MemberSelector::PropertyOrField {
            name: name.to_string(),
        },
    };

    let member = resolve::resolve_member(metadata, target_type, &selector)?;

    let mut annotations = Vec::new();
    if let Some(annotation) = member_marker {
        annotations.push(member_fact(annotation)?);
    }

    let parameter_annotations = match (&target, &member.kind) {
        (Target::Call { args, .. }, OpenMemberKind::Method(m))
        | (Target::New { args }, OpenMemberKind::Constructor(m)) => {
            parameter_facts(args, m)
        }
        _ => Vec::new(),
    };

    Ok(Parsed {
        member,
        annotations,
        parameter_annotations,
    })
}

/// Classify the top-level node and, for the equality form, split it into a
/// target side and a marker side. Exactly one side of `==` must be a marker.
fn classify(expr: &Expr) -> Result<(Target<'_>, Option<Annotation>)> {
    match expr {
        Expr::Call {
            method,
            type_args,
            args,
        } => Ok((
            Target::Call {
                method,
                type_args,
                args,
            },
            None,
        )),
        Expr::New { args } => Ok((Target::New { args }, None)),
        Expr::Member { name } => Ok((Target::Member { name }, None)),
        Expr::Eq { left, right } => {
            let (target, marker) = match (left.as_ref(), right.as_ref()) {
                (Expr::Marker { .. }, Expr::Marker { .. }) => {
                    bail!("both sides of '==' are annotations")
                }
                (Expr::Marker { annotation, .. }, other) => (other, *annotation),
                (other, Expr::Marker { annotation, .. }) => (other, *annotation),
                _ => bail!("no annotation found on any side of '=='"),
            };
            match target {
                Expr::Call {
                    method,
                    type_args,
                    args,
                } => Ok((
                    Target::Call {
                        method,
                        type_args,
                        args,
                    },
                    Some(marker),
                )),
                Expr::Member { name } => Ok((Target::Member { name }, Some(marker))),
                _ => bail!("expected a method call or member access on one side of '=='"),
            }
        }
        Expr::Marker { annotation, .. } => {
            bail!("expression shape isn't supported: a bare {annotation:?} marker")
        }
    }
}

/// Collect the closed parameter types from the call arguments. Every
/// argument must be a marker leaf.
fn marker_signature(method: &str, args: &[Expr]) -> Result<Vec<TypeUse>> {
    args.iter()
        .enumerate()
        .map(|(i, arg)| match arg {
            Expr::Marker { ty, .. } => Ok(ty.clone()),
            _ => bail!("argument {} of '{}' isn't an annotation marker", i + 1, method),
        })
        .collect()
}

fn parameter_facts(
    args: &[Expr],
    method: &crate::meta::MethodDef,
) -> Vec<ParameterAnnotationInfo> {
    // Argument count equals parameter count by construction: the resolver
    // matched the signature derived from these same arguments.
    args.iter()
        .zip(&method.parameters)
        .map(|(arg, param)| {
            let annotation = match arg {
                Expr::Marker { annotation, .. } => *annotation,
                _ => unreachable!("signature extraction validated the arguments"),
            };
            parameter_fact(annotation, &param.name)
        })
        .collect()
}

fn parameter_fact(annotation: Annotation, parameter_name: &str) -> ParameterAnnotationInfo {
    let mut fact = ParameterAnnotationInfo {
        parameter_name: parameter_name.to_string(),
        is_format_string: false,
        is_not_null: false,
        can_be_null: false,
    };
    match annotation {
        Annotation::Some => {}
        Annotation::NotNull => fact.is_not_null = true,
        Annotation::CanBeNull => fact.can_be_null = true,
        Annotation::FormatString => {
            fact.is_format_string = true;
            fact.is_not_null = true;
        }
        Annotation::NullableFormatString => {
            fact.is_format_string = true;
            fact.can_be_null = true;
        }
    }
    fact
}

fn member_fact(annotation: Annotation) -> Result<MemberAnnotationInfo> {
    match annotation {
        Annotation::Some => Ok(MemberAnnotationInfo::default()),
        Annotation::NotNull => Ok(MemberAnnotationInfo {
            is_not_null: true,
            can_be_null: false,
        }),
        Annotation::CanBeNull => Ok(MemberAnnotationInfo {
            is_not_null: false,
            can_be_null: true,
        }),
        Annotation::FormatString | Annotation::NullableFormatString => {
            bail!("format-string markers annotate parameters, not member results")
        }
    }
}
