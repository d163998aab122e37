//! Generation run orchestration.
//!
//! A run is a linear state machine:
//!
//! ```text
//! Idle -> BuildingMetadata -> Validating -> ValidationFailed
//!                                        -> CleaningOutput -> CopyingCustomCode
//!                                           -> Generating -> WritingManifest -> Done
//! ```
//!
//! Output names are resolved before `CleaningOutput`, so a naming failure
//! ends in `Failed` with the previous output untouched. Any later unexpected
//! error also ends in `Failed`; the output directory is left as it is. A
//! failed validation never touches the output directory. Every transition is
//! reported to the [`ProgressSink`]. Each run starts over from `Idle`.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_json::json;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::codegen::error::CodegenError;
use crate::codegen::fs_utils;
use crate::codegen::generator::{create_generator, GeneratedFile};
use crate::codegen::manifest::{build_manifest, write_manifest, OutputProjectMetadata};
use crate::codegen::naming::NamedProject;
use crate::codegen::options::GeneratorOptions;
use crate::codegen::progress::{ProgressEvent, ProgressPhase, ProgressSink};
use crate::codegen::source_meta::SourceProjectMetadata;
use crate::codegen::validation::{validate_project, ValidatedProject, ValidationReport};
use crate::file_defs::{SourceFiles, StandardFolder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CodegenState {
    Idle,
    BuildingMetadata,
    Validating,
    ValidationFailed,
    CleaningOutput,
    CopyingCustomCode,
    Generating,
    WritingManifest,
    Done,
    Failed,
}

impl CodegenState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CodegenState::ValidationFailed | CodegenState::Done | CodegenState::Failed)
    }

    /// Progress tag reported when the state is entered
    pub fn phase(&self) -> ProgressPhase {
        match self {
            CodegenState::Idle | CodegenState::BuildingMetadata => ProgressPhase::ParseData,
            CodegenState::Validating => ProgressPhase::ValidateInput,
            CodegenState::ValidationFailed => ProgressPhase::ValidationErrors,
            CodegenState::CleaningOutput => ProgressPhase::CleanFolder,
            CodegenState::CopyingCustomCode => ProgressPhase::CopyCustomCode,
            CodegenState::Generating
            | CodegenState::WritingManifest
            | CodegenState::Done
            | CodegenState::Failed => ProgressPhase::GenerateCode,
        }
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of one run, returned instead of an error
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenOutcome {
    pub success: bool,
    pub state: CodegenState,
    /// Every state entered, starting with `Idle`
    pub history: Vec<CodegenState>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip)]
    pub report: Option<ValidationReport>,
    #[serde(skip)]
    pub manifest: Option<OutputProjectMetadata>,
}

/// Carries hand-written code into the output before generation
pub trait CustomCodeCopier: Send + Sync {
    /// Copy `from` into `to`, preserving relative paths; returns the file count
    fn copy(&self, from: &Path, to: &Path) -> io::Result<usize>;
}

/// Recursive directory copy
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryCopier;

impl CustomCodeCopier for DirectoryCopier {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<usize> {
        fs_utils::copy_dir_recursive(from, to)
    }
}

pub struct CodegenOrchestrator {
    options: GeneratorOptions,
    copier: Box<dyn CustomCodeCopier>,
    state: CodegenState,
    history: Vec<CodegenState>,
}

/// Failure after validation, with the state it happened in
struct StageFailure {
    message: String,
    data: serde_json::Value,
}

impl From<CodegenError> for StageFailure {
    fn from(e: CodegenError) -> Self {
        StageFailure {
            message: e.to_string(),
            data: json!({ "error": format!("{:?}", e) }),
        }
    }
}

impl CodegenOrchestrator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            copier: Box::new(DirectoryCopier),
            state: CodegenState::Idle,
            history: vec![CodegenState::Idle],
        }
    }

    pub fn with_copier(mut self, copier: Box<dyn CustomCodeCopier>) -> Self {
        self.copier = copier;
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn state(&self) -> CodegenState {
        self.state
    }

    pub fn history(&self) -> &[CodegenState] {
        &self.history
    }

    fn enter(&mut self, state: CodegenState, sink: &dyn ProgressSink, event: ProgressEvent) {
        debug!(from = %self.state, to = %state, "State transition");
        self.state = state;
        self.history.push(state);
        sink.notify(&event);
    }

    fn outcome(&self, message: String, data: Option<serde_json::Value>) -> CodegenOutcome {
        CodegenOutcome {
            success: self.state == CodegenState::Done,
            state: self.state,
            history: self.history.clone(),
            message,
            data,
            report: None,
            manifest: None,
        }
    }

    fn fail(&mut self, sink: &dyn ProgressSink, failure: StageFailure) -> CodegenOutcome {
        let failed_in = self.state;
        error!(state = %failed_in, "{}", failure.message);
        let mut data = failure.data;
        data["state"] = json!(failed_in);
        let event = ProgressEvent::new(failed_in.phase(), format!("Failed while {}: {}", failed_in, failure.message))
            .with_data(data.clone());
        self.enter(CodegenState::Failed, sink, event);
        self.outcome(failure.message, Some(data))
    }

    /// Run the whole pipeline over a loaded project
    pub async fn run(&mut self, files: &SourceFiles, sink: &dyn ProgressSink) -> CodegenOutcome {
        info!(
            project = %files.project.content.name,
            output_dir = %self.options.output_dir.display(),
            "Generating code"
        );
        self.state = CodegenState::Idle;
        self.history = vec![CodegenState::Idle];

        self.enter(
            CodegenState::BuildingMetadata,
            sink,
            ProgressEvent::new(ProgressPhase::ParseData, "Building source project metadata"),
        );
        let meta = SourceProjectMetadata::build(files);

        self.enter(
            CodegenState::Validating,
            sink,
            ProgressEvent::new(ProgressPhase::ValidateInput, "Validating source files"),
        );
        let validated = match validate_project(meta) {
            Ok(validated) => validated,
            Err(report) => {
                let message = format!("Validation of source files returned {} error(s)", report.len());
                let data = serde_json::to_value(&report).ok();
                let mut event = ProgressEvent::new(ProgressPhase::ValidationErrors, message.clone());
                if let Some(data) = &data {
                    event = event.with_data(data.clone());
                }
                self.enter(CodegenState::ValidationFailed, sink, event);
                let mut outcome = self.outcome(message, data);
                outcome.report = Some(report);
                return outcome;
            }
        };

        match self.generate(validated, sink).await {
            Ok(manifest) => {
                let message = format!("Finished generating code to '{}'", self.options.output_dir.display());
                self.enter(
                    CodegenState::Done,
                    sink,
                    ProgressEvent::new(ProgressPhase::GenerateCode, message.clone()),
                );
                let data = json!({ "outputDir": self.options.output_dir.display().to_string() });
                let mut outcome = self.outcome(message, Some(data));
                outcome.manifest = Some(manifest);
                outcome
            }
            Err(failure) => self.fail(sink, failure),
        }
    }

    async fn generate(
        &mut self,
        validated: ValidatedProject,
        sink: &dyn ProgressSink,
    ) -> Result<OutputProjectMetadata, StageFailure> {
        let output_dir = self.options.output_dir.clone();
        let project_dir = validated.meta().project_dir.clone();
        let project = NamedProject::resolve(validated, self.options.script_flavor)?;

        self.enter(
            CodegenState::CleaningOutput,
            sink,
            ProgressEvent::new(
                ProgressPhase::CleanFolder,
                format!("Cleaning folder: {}", output_dir.display()),
            ),
        );
        if contains_project(&output_dir, &project_dir) {
            return Err(StageFailure {
                message: format!("Refusing to clean '{}': it contains the project", output_dir.display()),
                data: json!({
                    "outputDir": output_dir.display().to_string(),
                    "projectDir": project_dir.display().to_string(),
                }),
            });
        }
        fs_utils::empty_dir(&output_dir).map_err(|e| CodegenError::io(&output_dir, e))?;

        self.enter(
            CodegenState::CopyingCustomCode,
            sink,
            ProgressEvent::new(
                ProgressPhase::CopyCustomCode,
                format!("Copying custom code from: {}", self.options.custom_code_dir.display()),
            ),
        );
        let custom_target = output_dir.join(StandardFolder::CUSTOM_CODE);
        let copied = self
            .copier
            .copy(&self.options.custom_code_dir, &custom_target)
            .map_err(|e| CodegenError::io(&self.options.custom_code_dir, e))?;
        debug!(files = copied, "Copied custom code");

        self.enter(
            CodegenState::Generating,
            sink,
            ProgressEvent::new(ProgressPhase::GenerateCode, "Generating code"),
        );
        let generator = create_generator(project.target());
        let files = generator.generate_all(&project)?;
        check_unique_paths(&files)?;
        let written = write_all(&output_dir, files).await?;
        sink.notify(
            &ProgressEvent::new(ProgressPhase::GenerateCode, format!("Wrote {} file(s)", written))
                .with_data(json!({ "files": written })),
        );

        self.enter(
            CodegenState::WritingManifest,
            sink,
            ProgressEvent::new(ProgressPhase::GenerateCode, "Writing output project metadata"),
        );
        let manifest = build_manifest(generator.as_ref(), &project);
        write_manifest(&output_dir, &manifest)?;
        Ok(manifest)
    }
}

/// Absolute form of `path` with symlinks and `..` resolved as far as it exists
fn normalized(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
    };
    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other.as_os_str()),
        }
    }
    match (lexical.parent(), lexical.file_name()) {
        (Some(parent), Some(name)) => normalized(parent).join(name),
        _ => lexical,
    }
}

/// Whether emptying `output_dir` would delete (part of) the project
pub fn contains_project(output_dir: &Path, project_dir: &Path) -> bool {
    normalized(project_dir).starts_with(normalized(output_dir))
}

/// Output paths must be distinct, compared case-insensitively
pub fn check_unique_paths(files: &[GeneratedFile]) -> Result<(), CodegenError> {
    let mut seen = HashSet::new();
    for file in files {
        if !seen.insert(file.rel_path.to_lowercase()) {
            return Err(CodegenError::DuplicateOutputPath(file.rel_path.clone()));
        }
    }
    Ok(())
}

/// Write every file concurrently; completes when all writes have finished
async fn write_all(output_dir: &Path, files: Vec<GeneratedFile>) -> Result<usize, StageFailure> {
    let count = files.len();
    let mut tasks = JoinSet::new();
    for file in files {
        let path = output_dir.join(&file.rel_path);
        tasks.spawn(async move {
            fs_utils::write_file_async(path.clone(), file.content)
                .await
                .map_err(|e| CodegenError::io(path, e))
        });
    }

    let mut first_error: Option<StageFailure> = None;
    while let Some(joined) = tasks.join_next().await {
        let result = match joined {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => StageFailure::from(e),
            Err(join_error) => StageFailure {
                message: format!("Write task failed: {}", join_error),
                data: json!({ "error": join_error.to_string() }),
            },
        };
        if first_error.is_none() {
            first_error = Some(result);
        }
    }
    match first_error {
        Some(failure) => Err(failure),
        None => Ok(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(CodegenState::ValidationFailed.is_terminal());
        assert!(CodegenState::Done.is_terminal());
        assert!(CodegenState::Failed.is_terminal());
        assert!(!CodegenState::Generating.is_terminal());
        assert_eq!(CodegenState::CleaningOutput.phase(), ProgressPhase::CleanFolder);
    }

    #[test]
    fn test_duplicate_paths_ignore_case() {
        let files = vec![
            GeneratedFile::new("Pages/Login.cs", ""),
            GeneratedFile::new("pages/login.cs", ""),
        ];
        assert!(matches!(
            check_unique_paths(&files),
            Err(CodegenError::DuplicateOutputPath(path)) if path == "pages/login.cs"
        ));
        assert!(check_unique_paths(&files[..1]).is_ok());
    }
}
