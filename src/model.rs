//! Annotation store — per-assembly, per-member bundles of annotation facts.

use crate::resolve::OpenMember;

/// Annotation flags for a method result, property, or field. The flags are
/// mutually exclusive by construction (the DSL markers set at most one).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberAnnotationInfo {
    pub is_not_null: bool,
    pub can_be_null: bool,
}

/// Annotation flags for one parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterAnnotationInfo {
    /// Must match a declared parameter name on the owning member; the
    /// expression parser guarantees this by matching positionally against
    /// the resolved open definition.
    pub parameter_name: String,
    pub is_format_string: bool,
    pub is_not_null: bool,
    pub can_be_null: bool,
}

/// All facts accumulated for one member. Repeated annotation of the same
/// member appends into the same bundle rather than creating duplicates.
#[derive(Debug)]
pub struct MemberAnnotations {
    pub member: OpenMember,
    /// Canonical identity string (`M:`/`P:`/`F:` form) — the dedup key and
    /// the XML `member name` attribute.
    pub name: String,
    pub annotations: Vec<MemberAnnotationInfo>,
    pub parameter_annotations: Vec<ParameterAnnotationInfo>,
}

impl MemberAnnotations {
    pub fn new(member: OpenMember, name: String) -> Self {
        MemberAnnotations {
            member,
            name,
            annotations: Vec::new(),
            parameter_annotations: Vec::new(),
        }
    }
}

/// All annotated members of one assembly, in first-annotation order.
#[derive(Debug)]
pub struct AssemblyAnnotations {
    pub assembly: String,
    pub members: Vec<MemberAnnotations>,
}

impl AssemblyAnnotations {
    pub fn new(assembly: String) -> Self {
        AssemblyAnnotations {
            assembly,
            members: Vec::new(),
        }
    }
}
