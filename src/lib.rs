//! extannot — generate ReSharper-compatible external-annotation XML packages.
//!
//! Callers describe an assembly's surface with a plain metadata model
//! ([`meta`]), state nullability/format-string intent through a small
//! expression DSL ([`expr`] + [`annotator`]), and get back the
//! `{Assembly}.ExternalAnnotations.xml` documents plus a NuGet-style package
//! layout ([`package`]).
//!
//! The two non-trivial pieces are the expression parser ([`expr`]), which
//! recovers member + annotation intent from the constrained set of DSL
//! shapes, and the generic-definition resolver ([`resolve`]), which maps a
//! closed generic member reference back to its open definition so that
//! [`names`] can render the schema's `` `N ``/``` ``N ``` placeholders.

pub mod annotator;
pub mod expr;
pub mod meta;
pub mod model;
pub mod names;
pub mod package;
pub mod program;
pub mod render;
pub mod resolve;

pub use annotator::{Annotator, TypeAnnotator};
pub use expr::{
    can_be_null, format_string, not_null, nullable_format_string, some, Annotation, Expr,
};
pub use meta::{
    AssemblyDef, FieldDef, Metadata, MethodDef, ParameterDef, PropertyDef, TypeDef, TypeRef,
    TypeUse,
};
pub use package::{AnnotationFile, NugetSpec};
