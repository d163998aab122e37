//! Code generation pipeline for authored test projects.
//!
//! Stages, in run order:
//!
//! 1. [`source_meta`] builds the cross-referenced project graph,
//! 2. [`validation`] checks every reference and step against it,
//! 3. [`naming`] assigns output paths, namespaces and identifiers,
//! 4. a [`generator::TargetGenerator`] renders the sources,
//! 5. [`manifest`] describes the generated project.
//!
//! [`orchestration`] drives the stages and reports progress.

pub mod environment_script;
pub mod error;
pub mod fs_utils;
pub mod generator;
pub mod manifest;
pub mod naming;
pub mod options;
pub mod orchestration;
pub mod playwright_csharp;
pub mod playwright_typescript;
pub mod progress;
pub mod project_loader;
pub mod selectors;
pub mod source_meta;
pub mod target;
pub mod utils;
pub mod validation;

pub use error::CodegenError;
pub use generator::{create_generator, GeneratedFile, TargetGenerator};
pub use manifest::{build_manifest, read_manifest, record_failure, write_manifest, OutputProjectMetadata};
pub use naming::{NamedProject, OutputFileInfo};
pub use options::{GeneratorOptions, ScriptFlavor};
pub use orchestration::{CodegenOrchestrator, CodegenOutcome, CodegenState, CustomCodeCopier, DirectoryCopier};
pub use progress::{LogProgressSink, ProgressEvent, ProgressPhase, ProgressSink, RecordingProgressSink};
pub use project_loader::{load_project, LoadError};
pub use source_meta::SourceProjectMetadata;
pub use target::Target;
pub use validation::{validate_project, ValidatedProject, ValidationReport, Violation, ViolationKind};

use std::path::Path;

/// Load, validate and generate the project in `project_dir` with default options
pub async fn generate_project(project_dir: &Path, sink: &dyn ProgressSink) -> Result<CodegenOutcome, LoadError> {
    let files = load_project(project_dir)?;
    let mut orchestrator = CodegenOrchestrator::new(GeneratorOptions::for_project(project_dir));
    Ok(orchestrator.run(&files, sink).await)
}
