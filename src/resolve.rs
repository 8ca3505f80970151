//! Generic-definition resolver — maps a closed (instantiated) member
//! reference back to its open generic definition.
//!
//! A member can be generic at three levels at once: its own type parameters,
//! its declaring type's, and any enclosing type's. Walking the `TypeRef`
//! path builds a substitution map from each declared type-parameter name to
//! its closed bound; the open member is then the unique candidate whose
//! substituted signature matches the closed one. Ties are never guessed:
//! zero or several matches abort resolution.

use crate::meta::{Metadata, MethodDef, TypeRef, TypeUse};
use anyhow::{anyhow, bail, Result};

/// What the caller is pointing at on the target type.
#[derive(Debug)]
pub enum MemberSelector {
    Method {
        name: String,
        /// Closed type arguments for the method's own generic parameters.
        type_args: Vec<TypeUse>,
        /// Closed parameter types, in declaration order.
        signature: Vec<TypeUse>,
        /// Restrict the search to static methods (the `annotate_static`
        /// entry point is the only caller that knows static-ness).
        require_static: bool,
    },
    Constructor {
        signature: Vec<TypeUse>,
    },
    PropertyOrField {
        name: String,
    },
}

/// A fully open member: the normalized annotation target identity.
#[derive(Debug, Clone)]
pub struct OpenMember {
    pub assembly: String,
    pub namespace: String,
    /// Nesting chain, outermost first.
    pub types: Vec<OpenType>,
    pub kind: OpenMemberKind,
}

#[derive(Debug, Clone)]
pub struct OpenType {
    pub name: String,
    pub generic_params: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum OpenMemberKind {
    Method(MethodDef),
    Constructor(MethodDef),
    Property(String),
    Field(String),
}

/// Resolve a (possibly closed-generic) member reference to its open
/// definition in the metadata.
pub fn resolve_member(
    metadata: &Metadata,
    target: &TypeRef,
    selector: &MemberSelector,
) -> Result<OpenMember> {
    let first = target
        .path
        .first()
        .ok_or_else(|| anyhow!("type reference has an empty path"))?;

    let (assembly, outer) = metadata
        .find_type(&first.name, first.args.len())
        .ok_or_else(|| {
            anyhow!(
                "type '{}' with {} type parameter(s) isn't declared in the metadata",
                first.name,
                first.args.len()
            )
        })?;

    // Walk the nesting chain, accumulating closed-name -> bound-type pairs.
    let mut chain = vec![outer];
    let mut type_subst: Vec<(String, TypeUse)> = bindings(outer, &first.args);
    for segment in &target.path[1..] {
        let inner = chain
            .last()
            .unwrap()
            .find_nested(&segment.name, segment.args.len())
            .ok_or_else(|| {
                anyhow!(
                    "type '{}' has no nested type '{}' with {} type parameter(s)",
                    first.name,
                    segment.name,
                    segment.args.len()
                )
            })?;
        type_subst.extend(bindings(inner, &segment.args));
        chain.push(inner);
    }
    let declaring = *chain.last().unwrap();

    let kind = match selector {
        MemberSelector::Method {
            name,
            type_args,
            signature,
            require_static,
        } => {
            let candidates: Vec<&MethodDef> = declaring
                .methods
                .iter()
                .filter(|m| {
                    m.name == *name
                        && m.generic_params.len() == type_args.len()
                        && m.parameters.len() == signature.len()
                        && (!require_static || m.is_static)
                        && signature_matches(m, type_args, signature, &type_subst)
                })
                .collect();
            let display = format!("{}.{}", declaring.name, name);
            OpenMemberKind::Method(single(candidates, &display)?.clone())
        }
        MemberSelector::Constructor { signature } => {
            let candidates: Vec<&MethodDef> = declaring
                .constructors
                .iter()
                .filter(|c| {
                    c.parameters.len() == signature.len()
                        && signature_matches(c, &[], signature, &type_subst)
                })
                .collect();
            let display = format!("{}.#ctor", declaring.name);
            OpenMemberKind::Constructor(single(candidates, &display)?.clone())
        }
        MemberSelector::PropertyOrField { name } => {
            if let Some(p) = declaring.properties.iter().find(|p| p.name == *name) {
                OpenMemberKind::Property(p.name.clone())
            } else if let Some(f) = declaring.fields.iter().find(|f| f.name == *name) {
                OpenMemberKind::Field(f.name.clone())
            } else {
                bail!(
                    "type '{}' has no property or field named '{}'",
                    declaring.name,
                    name
                );
            }
        }
    };

    Ok(OpenMember {
        assembly: assembly.name.clone(),
        namespace: outer.namespace.clone(),
        types: chain
            .iter()
            .map(|t| OpenType {
                name: t.name.clone(),
                generic_params: t.generic_params.clone(),
            })
            .collect(),
        kind,
    })
}

fn bindings(ty: &crate::meta::TypeDef, args: &[TypeUse]) -> Vec<(String, TypeUse)> {
    ty.generic_params.iter().cloned().zip(args.to_vec()).collect()
}

fn single<'a>(candidates: Vec<&'a MethodDef>, display: &str) -> Result<&'a MethodDef> {
    match candidates.len() {
        1 => Ok(candidates[0]),
        0 => bail!("unable to find a matching generic definition for '{display}'"),
        n => bail!("unable to find a matching generic definition for '{display}': {n} candidates match"),
    }
}

/// True when the candidate's open parameter types, once substituted with the
/// type-level and method-level bindings, equal the given closed signature.
fn signature_matches(
    candidate: &MethodDef,
    type_args: &[TypeUse],
    signature: &[TypeUse],
    type_subst: &[(String, TypeUse)],
) -> bool {
    let method_subst: Vec<(String, TypeUse)> = candidate
        .generic_params
        .iter()
        .cloned()
        .zip(type_args.to_vec())
        .collect();

    candidate
        .parameters
        .iter()
        .zip(signature)
        .all(|(param, given)| substitute(&param.ty, &method_subst, type_subst) == *given)
}

/// Substitute generic parameter names recursively, through generic container
/// types such as `List<T>`. Method-level parameters shadow type-level ones.
fn substitute(
    ty: &TypeUse,
    method_subst: &[(String, TypeUse)],
    type_subst: &[(String, TypeUse)],
) -> TypeUse {
    match ty {
        TypeUse::Param(name) => lookup(method_subst, name)
            .or_else(|| lookup(type_subst, name))
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        TypeUse::Named { name, args } => TypeUse::Named {
            name: name.clone(),
            args: args
                .iter()
                .map(|a| substitute(a, method_subst, type_subst))
                .collect(),
        },
    }
}

fn lookup<'a>(subst: &'a [(String, TypeUse)], name: &str) -> Option<&'a TypeUse> {
    subst.iter().find(|(n, _)| n == name).map(|(_, t)| t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{AssemblyDef, TypeDef};

    fn boolean() -> TypeUse {
        TypeUse::named("System.Boolean")
    }

    fn int32() -> TypeUse {
        TypeUse::named("System.Int32")
    }

    fn string() -> TypeUse {
        TypeUse::named("System.String")
    }

    fn list_of(arg: TypeUse) -> TypeUse {
        TypeUse::generic("System.Collections.Generic.List", vec![arg])
    }

    /// Mirrors the nesting/overload zoo the generator has to cope with:
    /// generic methods inside plain, generic, and doubly-generic nested
    /// types, plus overloads that differ only in type-parameter order.
    fn fixture() -> Metadata {
        let nested = TypeDef::new("Tests", "Nested")
            .with_method(MethodDef::new("NormalMethod"))
            .with_method(
                MethodDef::generic("GenericMethod", &["T1"])
                    .with_param("t1", TypeUse::param("T1"))
                    .with_param("otherArg", string()),
            )
            .with_nested(
                TypeDef::nested("DoubleNestedTyped", &["T1"])
                    .with_method(MethodDef::new("NormalMethod").with_param("t1", TypeUse::param("T1")))
                    .with_method(
                        MethodDef::generic("GenericMethod", &["T2"])
                            .with_param("t1", TypeUse::param("T1"))
                            .with_param("t2", TypeUse::param("T2"))
                            .with_param("otherArg", string()),
                    ),
            );

        let nested_typed = TypeDef::generic("Tests", "NestedTyped", &["T1"])
            .with_method(MethodDef::new("NormalMethod").with_param("t1", TypeUse::param("T1")))
            .with_method(
                MethodDef::generic("GenericMethod", &["T2"])
                    .with_param("t1", TypeUse::param("T1"))
                    .with_param("t2", TypeUse::param("T2"))
                    .with_param("otherArg", string()),
            )
            .with_nested(
                TypeDef::nested("DoubleNested", &[])
                    .with_method(MethodDef::new("NormalMethod"))
                    .with_method(
                        MethodDef::generic("GenericMethod", &["T2"])
                            .with_param("t1", TypeUse::param("T1"))
                            .with_param("t2", TypeUse::param("T2"))
                            .with_param("otherArg", string()),
                    ),
            )
            .with_nested(
                TypeDef::nested("DoubleNestedTyped", &["T2"])
                    .with_method(
                        MethodDef::new("NormalMethod")
                            .with_param("t1", TypeUse::param("T1"))
                            .with_param("t2", TypeUse::param("T2")),
                    )
                    .with_method(
                        MethodDef::generic("GenericMethod", &["T3"])
                            .with_param("t1", TypeUse::param("T1"))
                            .with_param("t2", TypeUse::param("T2"))
                            .with_param("t3", TypeUse::param("T3"))
                            .with_param("otherArg", string()),
                    ),
            );

        let complex_case = TypeDef::generic("Tests", "ComplexCase", &["T1"]).with_nested(
            TypeDef::nested("Inner", &["T2"])
                .with_method(
                    MethodDef::new("Complex")
                        .with_param("a", TypeUse::param("T1"))
                        .with_param("b", TypeUse::param("T2")),
                )
                .with_method(
                    MethodDef::new("Complex")
                        .with_param("a", TypeUse::param("T2"))
                        .with_param("b", TypeUse::param("T1")),
                )
                .with_method(
                    MethodDef::new("ComplexList")
                        .with_param("a", list_of(TypeUse::param("T1")))
                        .with_param("b", list_of(TypeUse::param("T2"))),
                )
                .with_method(
                    MethodDef::new("ComplexList")
                        .with_param("a", list_of(TypeUse::param("T2")))
                        .with_param("b", list_of(TypeUse::param("T1"))),
                ),
        );

        Metadata::new(vec![AssemblyDef::new("Tests")
            .with_type(nested)
            .with_type(nested_typed)
            .with_type(complex_case)])
    }

    fn method(name: &str, type_args: Vec<TypeUse>, signature: Vec<TypeUse>) -> MemberSelector {
        MemberSelector::Method {
            name: name.to_string(),
            type_args,
            signature,
            require_static: false,
        }
    }

    fn resolved_method(member: &OpenMember) -> &MethodDef {
        match &member.kind {
            OpenMemberKind::Method(m) => m,
            other => panic!("expected a method, got {other:?}"),
        }
    }

    #[test]
    fn normal_method_in_plain_type_resolves_as_is() {
        let metadata = fixture();
        let member = resolve_member(
            &metadata,
            &TypeRef::new("Tests.Nested"),
            &method("NormalMethod", vec![], vec![]),
        )
        .unwrap();

        assert_eq!(member.assembly, "Tests");
        assert_eq!(member.types.len(), 1);
        assert_eq!(resolved_method(&member).name, "NormalMethod");
    }

    #[test]
    fn generic_method_in_plain_type_reopens() {
        let metadata = fixture();
        let member = resolve_member(
            &metadata,
            &TypeRef::new("Tests.Nested"),
            &method("GenericMethod", vec![int32()], vec![int32(), string()]),
        )
        .unwrap();

        let m = resolved_method(&member);
        assert_eq!(m.generic_params, vec!["T1".to_string()]);
        assert_eq!(m.parameters[0].ty, TypeUse::param("T1"));
    }

    #[test]
    fn normal_method_in_generic_type_reopens() {
        let metadata = fixture();
        let member = resolve_member(
            &metadata,
            &TypeRef::generic("Tests.NestedTyped", vec![boolean()]),
            &method("NormalMethod", vec![], vec![boolean()]),
        )
        .unwrap();

        let m = resolved_method(&member);
        assert_eq!(m.parameters[0].ty, TypeUse::param("T1"));
        assert_eq!(member.types[0].generic_params, vec!["T1".to_string()]);
    }

    #[test]
    fn generic_method_in_generic_type_reopens_both_levels() {
        let metadata = fixture();
        let member = resolve_member(
            &metadata,
            &TypeRef::generic("Tests.NestedTyped", vec![boolean()]),
            &method(
                "GenericMethod",
                vec![int32()],
                vec![boolean(), int32(), string()],
            ),
        )
        .unwrap();

        let m = resolved_method(&member);
        assert_eq!(m.generic_params, vec!["T2".to_string()]);
        assert_eq!(m.parameters[0].ty, TypeUse::param("T1"));
        assert_eq!(m.parameters[1].ty, TypeUse::param("T2"));
    }

    #[test]
    fn generic_method_in_doubly_nested_generic_type_reopens() {
        let metadata = fixture();
        let member = resolve_member(
            &metadata,
            &TypeRef::generic("Tests.NestedTyped", vec![boolean()])
                .nested_generic("DoubleNestedTyped", vec![int32()]),
            &method(
                "GenericMethod",
                vec![int32()],
                vec![boolean(), int32(), int32(), string()],
            ),
        )
        .unwrap();

        let m = resolved_method(&member);
        assert_eq!(m.generic_params, vec!["T3".to_string()]);
        assert_eq!(member.types.len(), 2);
        assert_eq!(member.types[1].name, "DoubleNestedTyped");
    }

    #[test]
    fn plain_nested_type_inside_generic_type_still_sees_outer_params() {
        let metadata = fixture();
        let member = resolve_member(
            &metadata,
            &TypeRef::generic("Tests.NestedTyped", vec![boolean()]).nested("DoubleNested"),
            &method(
                "GenericMethod",
                vec![int32()],
                vec![boolean(), int32(), string()],
            ),
        )
        .unwrap();

        let m = resolved_method(&member);
        assert_eq!(m.parameters[0].ty, TypeUse::param("T1"));
    }

    #[test]
    fn overloads_differing_only_in_type_parameter_order_resolve_distinctly() {
        let metadata = fixture();
        let target = TypeRef::generic("Tests.ComplexCase", vec![boolean()])
            .nested_generic("Inner", vec![int32()]);

        let first = resolve_member(
            &metadata,
            &target,
            &method("Complex", vec![], vec![boolean(), int32()]),
        )
        .unwrap();
        let second = resolve_member(
            &metadata,
            &target,
            &method("Complex", vec![], vec![int32(), boolean()]),
        )
        .unwrap();

        assert_eq!(resolved_method(&first).parameters[0].ty, TypeUse::param("T1"));
        assert_eq!(resolved_method(&second).parameters[0].ty, TypeUse::param("T2"));
    }

    #[test]
    fn overloads_differing_inside_generic_containers_resolve_distinctly() {
        let metadata = fixture();
        let target = TypeRef::generic("Tests.ComplexCase", vec![boolean()])
            .nested_generic("Inner", vec![int32()]);

        let first = resolve_member(
            &metadata,
            &target,
            &method(
                "ComplexList",
                vec![],
                vec![list_of(boolean()), list_of(int32())],
            ),
        )
        .unwrap();
        let second = resolve_member(
            &metadata,
            &target,
            &method(
                "ComplexList",
                vec![],
                vec![list_of(int32()), list_of(boolean())],
            ),
        )
        .unwrap();

        assert_eq!(
            resolved_method(&first).parameters[0].ty,
            list_of(TypeUse::param("T1"))
        );
        assert_eq!(
            resolved_method(&second).parameters[0].ty,
            list_of(TypeUse::param("T2"))
        );
    }

    #[test]
    fn indistinguishable_overloads_fail_loudly() {
        let metadata = fixture();
        // T1 == T2 == Boolean makes both Complex overloads substitute to the
        // same closed signature.
        let target = TypeRef::generic("Tests.ComplexCase", vec![boolean()])
            .nested_generic("Inner", vec![boolean()]);

        let err = resolve_member(
            &metadata,
            &target,
            &method("Complex", vec![], vec![boolean(), boolean()]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("matching generic definition"));
    }

    #[test]
    fn missing_method_fails_with_descriptive_error() {
        let metadata = fixture();
        let err = resolve_member(
            &metadata,
            &TypeRef::new("Tests.Nested"),
            &method("Missing", vec![], vec![]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("matching generic definition"));
    }

    #[test]
    fn unknown_type_fails() {
        let metadata = fixture();
        let err = resolve_member(
            &metadata,
            &TypeRef::new("Tests.Unknown"),
            &method("NormalMethod", vec![], vec![]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("isn't declared in the metadata"));
    }

    #[test]
    fn empty_type_path_is_rejected() {
        let metadata = fixture();
        let err = resolve_member(
            &metadata,
            &TypeRef { path: vec![] },
            &method("NormalMethod", vec![], vec![]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty path"));
    }

    #[test]
    fn static_requirement_filters_instance_methods() {
        let metadata = Metadata::new(vec![AssemblyDef::new("Lib").with_type(
            TypeDef::new("Lib", "Holder")
                .with_method(MethodDef::new("Get"))
                .with_method(MethodDef::new("GetStatic").static_method()),
        )]);

        let selector = MemberSelector::Method {
            name: "Get".to_string(),
            type_args: vec![],
            signature: vec![],
            require_static: true,
        };
        assert!(resolve_member(&metadata, &TypeRef::new("Lib.Holder"), &selector).is_err());

        let selector = MemberSelector::Method {
            name: "GetStatic".to_string(),
            type_args: vec![],
            signature: vec![],
            require_static: true,
        };
        assert!(resolve_member(&metadata, &TypeRef::new("Lib.Holder"), &selector).is_ok());
    }

    #[test]
    fn property_preferred_over_field_and_missing_member_fails() {
        let metadata = Metadata::new(vec![AssemblyDef::new("Lib").with_type(
            TypeDef::new("Lib", "Holder")
                .with_property("Value")
                .with_field("count"),
        )]);

        let member = resolve_member(
            &metadata,
            &TypeRef::new("Lib.Holder"),
            &MemberSelector::PropertyOrField {
                name: "Value".to_string(),
            },
        )
        .unwrap();
        assert!(matches!(member.kind, OpenMemberKind::Property(_)));

        let member = resolve_member(
            &metadata,
            &TypeRef::new("Lib.Holder"),
            &MemberSelector::PropertyOrField {
                name: "count".to_string(),
            },
        )
        .unwrap();
        assert!(matches!(member.kind, OpenMemberKind::Field(_)));

        let err = resolve_member(
            &metadata,
            &TypeRef::new("Lib.Holder"),
            &MemberSelector::PropertyOrField {
                name: "missing".to_string(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("no property or field"));
    }
}
