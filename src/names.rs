//! Member identity strings — the `member name="…"` values of the ReSharper
//! external-annotation schema.
//!
//! Pure recursive rendering over a resolved [`OpenMember`]: `M:`/`P:`/`F:`
//! prefix, `+`-joined nesting with `` Name`N `` arity markers, `#ctor`,
//! ``` ``N ``` method arity suffix, `{…}` generic expansion, and the
//! placeholder forms `` `N `` (type-level) / ``` ``N ``` (method-level).

use crate::resolve::{OpenMember, OpenMemberKind};
use anyhow::{bail, Result};

/// Render the canonical identity string for a resolved member.
pub fn member_name(member: &OpenMember) -> Result<String> {
    let mut out = String::new();

    match &member.kind {
        OpenMemberKind::Method(m) => {
            out.push_str("M:");
            append_type_path(member, &mut out);
            out.push('.');
            out.push_str(&m.name);
            if !m.generic_params.is_empty() {
                out.push_str(&format!("``{}", m.generic_params.len()));
            }
            append_parameters(member, m, &mut out)?;
        }
        OpenMemberKind::Constructor(m) => {
            out.push_str("M:");
            append_type_path(member, &mut out);
            out.push_str(".#ctor");
            append_parameters(member, m, &mut out)?;
        }
        OpenMemberKind::Property(name) => {
            out.push_str("P:");
            append_type_path(member, &mut out);
            out.push('.');
            out.push_str(&encode_member_name(name));
        }
        OpenMemberKind::Field(name) => {
            out.push_str("F:");
            append_type_path(member, &mut out);
            out.push('.');
            out.push_str(&encode_member_name(name));
        }
    }

    Ok(out)
}

fn append_type_path(member: &OpenMember, out: &mut String) {
    if !member.namespace.is_empty() {
        out.push_str(&member.namespace);
        out.push('.');
    }
    for (i, ty) in member.types.iter().enumerate() {
        if i > 0 {
            out.push('+');
        }
        out.push_str(&ty.name);
        if !ty.generic_params.is_empty() {
            out.push_str(&format!("`{}", ty.generic_params.len()));
        }
    }
}

/// Member names containing dots (explicit interface implementations) collide
/// with the schema's separator, so dots are re-encoded as `#`.
fn encode_member_name(name: &str) -> String {
    name.replace('.', "#")
}

fn append_parameters(
    member: &OpenMember,
    method: &crate::meta::MethodDef,
    out: &mut String,
) -> Result<()> {
    if method.parameters.is_empty() {
        return Ok(());
    }

    // Type-level parameters number across the whole nesting chain,
    // outermost first.
    let type_params: Vec<&str> = member
        .types
        .iter()
        .flat_map(|t| t.generic_params.iter().map(String::as_str))
        .collect();

    out.push('(');
    for (i, param) in method.parameters.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        append_type_use(&param.ty, &type_params, &method.generic_params, out)?;
    }
    out.push(')');
    Ok(())
}

fn append_type_use(
    ty: &crate::meta::TypeUse,
    type_params: &[&str],
    method_params: &[String],
    out: &mut String,
) -> Result<()> {
    use crate::meta::TypeUse;

    match ty {
        TypeUse::Param(name) => {
            // Method-level parameters shadow type-level ones.
            if let Some(i) = method_params.iter().position(|p| p == name) {
                out.push_str(&format!("``{i}"));
            } else if let Some(i) = type_params.iter().position(|p| p == name) {
                out.push_str(&format!("`{i}"));
            } else {
                bail!("generic parameter '{name}' isn't declared on the member or its declaring types");
            }
        }
        TypeUse::Named { name, args } if args.is_empty() => out.push_str(name),
        TypeUse::Named { name, args } => {
            out.push_str(name);
            out.push('{');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                append_type_use(arg, type_params, method_params, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}
