//! File generation and package layout — the "save these generated documents
//! to this location" collaborator around the core.

use crate::model::AssemblyAnnotations;
use crate::render;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// One generated annotation document and its two deployment file names.
#[derive(Debug)]
pub struct AnnotationFile {
    /// `{Assembly}.ExternalAnnotations.xml` — for deployment next to the DLL.
    pub file_name_along_dll: String,
    /// `{Assembly}.xml` — for the package's annotations directory.
    pub file_name_in_nuget: String,
    pub content: String,
}

pub fn generate_file(annotations: &AssemblyAnnotations) -> AnnotationFile {
    AnnotationFile {
        file_name_along_dll: format!("{}.ExternalAnnotations.xml", annotations.assembly),
        file_name_in_nuget: format!("{}.xml", annotations.assembly),
        content: render::annotations::render(annotations),
    }
}

pub fn generate_files(assemblies: &[AssemblyAnnotations]) -> Vec<AnnotationFile> {
    assemblies.iter().map(generate_file).collect()
}

/// Write the documents into a flat directory, using the alongside-DLL names
/// (or the in-package names when `nuget` is set).
pub fn save_to_directory(files: &[AnnotationFile], directory: &Path, nuget: bool) -> Result<()> {
    fs::create_dir_all(directory)
        .with_context(|| format!("failed to create directory: {}", directory.display()))?;

    for file in files {
        let name = if nuget {
            &file.file_name_in_nuget
        } else {
            &file.file_name_along_dll
        };
        let path = directory.join(name);
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Descriptor metadata for the generated package.
#[derive(Debug, Clone)]
pub struct NugetSpec {
    pub id: String,
    pub version: String,
    pub title: String,
    pub authors: String,
    pub owners: String,
    pub project_url: String,
    pub icon_url: String,
    pub description: String,
    pub tags: String,
}

impl NugetSpec {
    pub fn new(id: &str) -> Self {
        NugetSpec {
            id: id.to_string(),
            version: "1.0.0.0".to_string(),
            title: "Annotations".to_string(),
            authors: "Anonymous".to_string(),
            owners: "Anonymous".to_string(),
            project_url: String::new(),
            icon_url: String::new(),
            description: String::new(),
            tags: String::new(),
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_authors(mut self, authors: &str) -> Self {
        self.authors = authors.to_string();
        self.owners = authors.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Write the package: the `{id}.{version}.nuspec` descriptor at the root
/// and every annotation document under the conventional
/// `DotFiles/Extensions/{id}/annotations/` layout.
pub fn create_nuget_package(
    spec: &NugetSpec,
    files: &[AnnotationFile],
    directory: &Path,
) -> Result<()> {
    let annotations_dir = directory
        .join("DotFiles")
        .join("Extensions")
        .join(&spec.id)
        .join("annotations");
    fs::create_dir_all(&annotations_dir)
        .with_context(|| format!("failed to create directory: {}", annotations_dir.display()))?;

    let spec_path = directory.join(format!("{}.{}.nuspec", spec.id, spec.version));
    fs::write(&spec_path, render::nuspec::render(spec))
        .with_context(|| format!("failed to write {}", spec_path.display()))?;

    save_to_directory(files, &annotations_dir, true)
}
