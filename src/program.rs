//! Command-line entry point shared by annotation generator binaries.

use crate::annotator::Annotator;
use crate::meta::Metadata;
use crate::package::{self, NugetSpec};
use anyhow::{bail, Result};
use clap::Parser;
use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;

static RE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+){0,3}$").unwrap());

#[derive(Parser)]
#[command(about = "Generate a ReSharper external-annotations package")]
pub struct Cli {
    /// Package version, up to four dot-separated numbers
    #[arg(short, long, default_value = "1.0.0.0")]
    version: String,
    /// Output directory (defaults to the current directory)
    #[arg(short, long)]
    directory: Option<PathBuf>,
}

/// Parse the command line, run the caller's annotation routine against the
/// given metadata and write the package to the requested directory.
pub fn run<F>(spec: NugetSpec, metadata: Metadata, annotate: F) -> Result<()>
where
    F: FnOnce(&mut Annotator) -> Result<()>,
{
    let cli = Cli::parse();
    if !RE_VERSION.is_match(&cli.version) {
        bail!("invalid version: {}", cli.version);
    }
    let directory = match cli.directory {
        Some(dir) => dir,
        None => env::current_dir()?,
    };

    let mut annotator = Annotator::new(metadata);
    annotate(&mut annotator)?;

    let files = package::generate_files(annotator.annotations());
    let spec = spec.with_version(&cli.version);
    package::create_nuget_package(&spec, &files, &directory)?;

    println!("Generated version {} in {}", spec.version, directory.display());
    Ok(())
}
