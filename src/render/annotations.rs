//! The ReSharper external-annotation document:
//! `<assembly>` / `<member>` / `<parameter>` / `<attribute>` elements.

use crate::model::{AssemblyAnnotations, MemberAnnotationInfo, ParameterAnnotationInfo};
use crate::render::xml_escape;

pub const STRING_FORMAT_METHOD_CTOR: &str =
    "M:JetBrains.Annotations.StringFormatMethodAttribute.#ctor(System.String)";
pub const NOT_NULL_CTOR: &str = "M:JetBrains.Annotations.NotNullAttribute.#ctor";
pub const CAN_BE_NULL_CTOR: &str = "M:JetBrains.Annotations.CanBeNullAttribute.#ctor";

/// Render the full annotation document for one assembly.
pub fn render(assembly: &AssemblyAnnotations) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str(&format!(
        "<assembly name=\"{}\">\n",
        xml_escape(&assembly.assembly)
    ));

    for member in &assembly.members {
        out.push_str(&format!(
            "  <member name=\"{}\">\n",
            xml_escape(&member.name)
        ));
        for annotation in &member.annotations {
            render_member_annotation(annotation, &mut out);
        }
        for parameter in &member.parameter_annotations {
            render_parameter_annotation(parameter, &mut out);
        }
        out.push_str("  </member>\n");
    }

    out.push_str("</assembly>\n");
    out
}

fn render_member_annotation(annotation: &MemberAnnotationInfo, out: &mut String) {
    if annotation.is_not_null {
        out.push_str(&attribute_line(NOT_NULL_CTOR, 4));
    }
    if annotation.can_be_null {
        out.push_str(&attribute_line(CAN_BE_NULL_CTOR, 4));
    }
}

/// A format-string fact contributes a member-level StringFormatMethod
/// attribute naming the parameter; null-ness facts contribute a
/// `<parameter>` element wrapping the attribute.
fn render_parameter_annotation(parameter: &ParameterAnnotationInfo, out: &mut String) {
    let name = xml_escape(&parameter.parameter_name);

    if parameter.is_format_string {
        out.push_str(&format!(
            "    <attribute ctor=\"{STRING_FORMAT_METHOD_CTOR}\">\n      <argument>{name}</argument>\n    </attribute>\n"
        ));
    }

    if parameter.is_not_null || parameter.can_be_null {
        out.push_str(&format!("    <parameter name=\"{name}\">\n"));
        if parameter.is_not_null {
            out.push_str(&attribute_line(NOT_NULL_CTOR, 6));
        }
        if parameter.can_be_null {
            out.push_str(&attribute_line(CAN_BE_NULL_CTOR, 6));
        }
        out.push_str("    </parameter>\n");
    }
}

fn attribute_line(ctor: &str, indent: usize) -> String {
    format!("{:indent$}<attribute ctor=\"{ctor}\" />\n", "")
}
