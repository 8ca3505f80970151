//! Fluent annotation surface — collects parsed annotation facts into
//! per-assembly, per-member bundles.

use crate::expr::{self, Expr};
use crate::meta::{Metadata, TypeRef};
use crate::model::{AssemblyAnnotations, MemberAnnotations};
use crate::names;
use anyhow::Result;

/// Entry point of the DSL. Holds the caller-supplied metadata and the
/// accumulated annotation store for one generation run.
pub struct Annotator {
    metadata: Metadata,
    assemblies: Vec<AssemblyAnnotations>,
}

impl Annotator {
    pub fn new(metadata: Metadata) -> Self {
        Annotator {
            metadata,
            assemblies: Vec::new(),
        }
    }

    /// Annotate members of one type through a scoped [`TypeAnnotator`].
    pub fn annotate_type<F>(&mut self, ty: TypeRef, annotate: F) -> Result<()>
    where
        F: FnOnce(&mut TypeAnnotator) -> Result<()>,
    {
        let mut scoped = TypeAnnotator {
            annotator: self,
            ty,
        };
        annotate(&mut scoped)
    }

    /// Annotate a static method (or a constructor) addressed explicitly.
    pub fn annotate_static(&mut self, ty: &TypeRef, expr: Expr) -> Result<()> {
        self.record(ty, &expr, true)
    }

    /// The accumulated per-assembly bundles, in first-annotation order.
    pub fn annotations(&self) -> &[AssemblyAnnotations] {
        &self.assemblies
    }

    pub fn into_annotations(self) -> Vec<AssemblyAnnotations> {
        self.assemblies
    }

    fn record(&mut self, ty: &TypeRef, expr: &Expr, require_static: bool) -> Result<()> {
        let parsed = expr::parse(&self.metadata, ty, expr, require_static)?;
        let name = names::member_name(&parsed.member)?;

        // Repeating the same annotation is a no-op; only new facts land in
        // the bundle.
        let bundle = self.member_bundle(parsed.member, name);
        for fact in parsed.annotations {
            if !bundle.annotations.contains(&fact) {
                bundle.annotations.push(fact);
            }
        }
        for fact in parsed.parameter_annotations {
            if !bundle.parameter_annotations.contains(&fact) {
                bundle.parameter_annotations.push(fact);
            }
        }
        Ok(())
    }

    /// Find or create the bundle for a member, keyed by its canonical
    /// identity string so repeated annotation merges instead of duplicating.
    fn member_bundle(
        &mut self,
        member: crate::resolve::OpenMember,
        name: String,
    ) -> &mut MemberAnnotations {
        let assembly = member.assembly.clone();
        let a = match self.assemblies.iter().position(|a| a.assembly == assembly) {
            Some(i) => i,
            None => {
                self.assemblies.push(AssemblyAnnotations::new(assembly));
                self.assemblies.len() - 1
            }
        };

        let members = &mut self.assemblies[a].members;
        let m = match members.iter().position(|m| m.name == name) {
            Some(i) => i,
            None => {
                members.push(MemberAnnotations::new(member, name));
                members.len() - 1
            }
        };
        &mut members[m]
    }
}

/// Annotation surface scoped to one target type.
pub struct TypeAnnotator<'a> {
    annotator: &'a mut Annotator,
    ty: TypeRef,
}

impl TypeAnnotator<'_> {
    pub fn annotate(&mut self, expr: Expr) -> Result<()> {
        let ty = self.ty.clone();
        self.annotator.record(&ty, &expr, false)
    }
}
