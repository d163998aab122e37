//! Typed file definitions and the full input set of one generation run.

use std::path::PathBuf;

use super::environment::EnvironmentDef;
use super::page::PageDef;
use super::project::ProjectDef;
use super::routine::TestRoutineDef;
use super::suite::TestSuiteDef;
use super::test_case::TestCaseDef;

/// A project file together with its location
///
/// `folder_path` is relative to the standard folder of the file kind
/// (`page-definitions/`, `test-cases/`, ...), `/`-separated, empty for files at
/// the top of that folder.
#[derive(Debug, Clone)]
pub struct FileDef<T> {
    pub folder_path: String,
    pub file_name: String,
    pub content: T,
}

impl<T> FileDef<T> {
    pub fn new(folder_path: impl Into<String>, file_name: impl Into<String>, content: T) -> Self {
        Self {
            folder_path: folder_path.into().trim_matches('/').to_string(),
            file_name: file_name.into(),
            content,
        }
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(0) | None => &self.file_name,
            Some(idx) => &self.file_name[..idx],
        }
    }

    /// `folder/file.ext`
    pub fn rel_path(&self) -> String {
        if self.folder_path.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}/{}", self.folder_path, self.file_name)
        }
    }

    /// `folder/file`, the path form accepted by references
    pub fn rel_path_without_extension(&self) -> String {
        if self.folder_path.is_empty() {
            self.stem().to_string()
        } else {
            format!("{}/{}", self.folder_path, self.stem())
        }
    }
}

/// Everything the external file-loading collaborator hands to the pipeline
#[derive(Debug, Clone)]
pub struct SourceFiles {
    pub project_dir: PathBuf,
    pub project: FileDef<ProjectDef>,
    pub pages: Vec<FileDef<PageDef>>,
    pub test_cases: Vec<FileDef<TestCaseDef>>,
    pub routines: Vec<FileDef<TestRoutineDef>>,
    pub suites: Vec<FileDef<TestSuiteDef>>,
    pub environments: Vec<FileDef<EnvironmentDef>>,
}

impl SourceFiles {
    /// Empty input set for the given project descriptor
    pub fn new(project_dir: impl Into<PathBuf>, project: FileDef<ProjectDef>) -> Self {
        Self {
            project_dir: project_dir.into(),
            project,
            pages: Vec::new(),
            test_cases: Vec::new(),
            routines: Vec::new(),
            suites: Vec::new(),
            environments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let file = FileDef::new("account/", "Login.page", ());
        assert_eq!(file.stem(), "Login");
        assert_eq!(file.rel_path(), "account/Login.page");
        assert_eq!(file.rel_path_without_extension(), "account/Login");

        let root = FileDef::new("", "local.env", ());
        assert_eq!(root.rel_path(), "local.env");
        assert_eq!(root.stem(), "local");
    }
}
