//! Output manifest (`.code-metadata`) describing the generated project.
//!
//! The manifest is self-describing: test-selection tooling reads it without
//! going back to the source project.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codegen::error::CodegenError;
use crate::codegen::fs_utils;
use crate::codegen::generator::TargetGenerator;
use crate::codegen::naming::{NamedProject, OutputFileInfo};
use crate::file_defs::StandardOutputFile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Entity id; the file stem for environments
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub output: OutputFileInfo,
}

/// One test of a suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteTestEntry {
    pub case_id: String,
    pub case_name: String,
    #[serde(default)]
    pub description: String,
    /// Method name (C#) or title (TypeScript)
    pub test_name: String,
    /// Name the test runner filters on
    pub qualified_test_name: String,
    pub case_output_file_rel_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteManifestEntry {
    #[serde(flatten)]
    pub entry: ManifestEntry,
    pub tests: Vec<SuiteTestEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputProjectMetadata {
    /// `Framework/Language/TestFramework`
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub suites: Vec<SuiteManifestEntry>,
    #[serde(default)]
    pub cases: Vec<ManifestEntry>,
    #[serde(default)]
    pub pages: Vec<ManifestEntry>,
    #[serde(default)]
    pub environments: Vec<ManifestEntry>,
    #[serde(default)]
    pub routines: Vec<ManifestEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ManifestError>,
}

fn entry(id: &str, name: &str, description: &str, output: &OutputFileInfo) -> ManifestEntry {
    ManifestEntry {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        output: output.clone(),
    }
}

/// Walk the named project and describe every generated entity
pub fn build_manifest<G: TargetGenerator + ?Sized>(generator: &G, project: &NamedProject) -> OutputProjectMetadata {
    let meta = project.meta();

    let pages = meta
        .page_ids()
        .map(|id| {
            let page = meta.page(id);
            entry(&page.id, &page.name, &page.description, project.page(id))
        })
        .collect();
    let cases = meta
        .case_ids()
        .map(|id| {
            let case = meta.test_case(id);
            entry(&case.id, &case.name, &case.description, project.test_case(id))
        })
        .collect();
    let routines = meta
        .routine_ids()
        .map(|id| {
            let routine = meta.routine(id);
            entry(&routine.id, &routine.name, &routine.description, project.routine(id))
        })
        .collect();
    let environments = meta
        .environment_ids()
        .map(|id| {
            let env = meta.environment(id);
            entry(env.file.stem(), &env.name, "", project.environment(id))
        })
        .collect();
    let suites = meta
        .suite_ids()
        .map(|id| {
            let suite = meta.suite(id);
            let cases = suite.cases.iter().filter_map(|reference| reference.resolved());
            let tests = cases
                .zip(project.suite_tests(id))
                .enumerate()
                .map(|(index, (case_id, test_name))| {
                    let case = meta.test_case(case_id);
                    SuiteTestEntry {
                        case_id: case.id.clone(),
                        case_name: case.name.clone(),
                        description: case.description.clone(),
                        test_name: test_name.clone(),
                        qualified_test_name: generator.qualified_test_name(project, id, index),
                        case_output_file_rel_path: project.test_case(case_id).output_file_rel_path.clone(),
                    }
                })
                .collect();
            SuiteManifestEntry {
                entry: entry(&suite.id, &suite.name, &suite.description, project.suite(id)),
                tests,
            }
        })
        .collect();

    OutputProjectMetadata {
        target: project.target().to_string(),
        suites,
        cases,
        pages,
        environments,
        routines,
        error: None,
    }
}

pub fn write_manifest(output_dir: &Path, manifest: &OutputProjectMetadata) -> Result<(), CodegenError> {
    let path = output_dir.join(StandardOutputFile::META_DATA);
    let json = serde_json::to_string_pretty(manifest)?;
    fs_utils::write_file(&path, json).map_err(|e| CodegenError::io(&path, e))
}

pub fn read_manifest(output_dir: &Path) -> Result<OutputProjectMetadata, CodegenError> {
    let path = output_dir.join(StandardOutputFile::META_DATA);
    let text = fs::read_to_string(&path).map_err(|e| CodegenError::io(&path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Persist a failure into the manifest, creating an empty one when none is readable
pub fn record_failure(
    output_dir: &Path,
    message: &str,
    data: Option<serde_json::Value>,
) -> Result<(), CodegenError> {
    let mut manifest = match read_manifest(output_dir) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::debug!(error = %e, "No readable manifest, writing a new one");
            OutputProjectMetadata::default()
        }
    };
    manifest.error = Some(ManifestError {
        message: message.to_string(),
        data,
    });
    write_manifest(output_dir, &manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_failure_without_manifest() {
        let dir = TempDir::new().unwrap();
        record_failure(dir.path(), "boom", Some(serde_json::json!({"phase": "generate-code"}))).unwrap();

        let manifest = read_manifest(dir.path()).unwrap();
        assert!(manifest.suites.is_empty());
        let error = manifest.error.unwrap();
        assert_eq!(error.message, "boom");
        assert_eq!(error.data.unwrap()["phase"], "generate-code");
    }

    #[test]
    fn test_record_failure_keeps_entries() {
        let dir = TempDir::new().unwrap();
        let manifest = OutputProjectMetadata {
            target: "Playwright/Typescript/Playwright".to_string(),
            pages: vec![ManifestEntry {
                id: "p1".to_string(),
                name: "Login".to_string(),
                description: String::new(),
                output: OutputFileInfo {
                    input_file_name: "Login.page".to_string(),
                    input_file_rel_path: "Login.page".to_string(),
                    output_file_name: "login.ts".to_string(),
                    output_file_rel_path: "pages/login.ts".to_string(),
                    class_name: "Login".to_string(),
                    sub_namespace: "pages".to_string(),
                    full_namespace: "pages/login".to_string(),
                },
            }],
            ..Default::default()
        };
        write_manifest(dir.path(), &manifest).unwrap();
        record_failure(dir.path(), "later failure", None).unwrap();

        let text = fs::read_to_string(dir.path().join(".code-metadata")).unwrap();
        assert!(text.contains("\"outputFileRelPath\": \"pages/login.ts\""));
        let reread = read_manifest(dir.path()).unwrap();
        assert_eq!(reread.pages, manifest.pages);
        assert_eq!(reread.error.unwrap().message, "later failure");
    }
}
