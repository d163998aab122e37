//! Project loader: reads an authored project from disk into [`SourceFiles`].
//!
//! Definitions are JSON; anything JSON cannot parse is retried as YAML.
//! Environment files use dotenv `KEY=value` syntax. Every kind is loaded in
//! sorted path order so downstream phases see a deterministic input.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::codegen::fs_utils::{relative_slash_path, walk_files};
use crate::file_defs::{
    EnvironmentDef, FileDef, ProjectDef, SourceFiles, StandardFileExtension, StandardFolder,
};

#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, message: String },
    /// The project directory holds no `.rmproj` descriptor
    MissingProjectFile(PathBuf),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "Failed to read {}: {}", path.display(), source),
            LoadError::Parse { path, message } => write!(f, "Failed to parse {}: {}", path.display(), message),
            LoadError::MissingProjectFile(dir) => {
                write!(f, "No .{} project file in {}", StandardFileExtension::PROJECT, dir.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> LoadError + '_ {
    move |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Parse a definition, falling back to YAML when the text is not JSON
pub fn parse_definition<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T, LoadError> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_error) => serde_yaml::from_str(text).map_err(|yaml_error| LoadError::Parse {
            path: path.to_path_buf(),
            message: format!("{} (as YAML: {})", json_error, yaml_error),
        }),
    }
}

pub fn parse_environment(path: &Path) -> Result<EnvironmentDef, LoadError> {
    let iter = dotenv::from_path_iter(path).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut pairs = Vec::new();
    for item in iter {
        let (key, value) = item.map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        pairs.push((key, value));
    }
    Ok(EnvironmentDef::from_pairs(pairs))
}

/// The first `.rmproj` file directly inside `project_dir`
pub fn find_project_file(project_dir: &Path) -> Result<PathBuf, LoadError> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(project_dir).map_err(io_error(project_dir))? {
        let path = entry.map_err(io_error(project_dir))?.path();
        if path.is_file() && has_extension(&path, StandardFileExtension::PROJECT) {
            candidates.push(path);
        }
    }
    candidates.sort();
    if candidates.len() > 1 {
        tracing::warn!(count = candidates.len(), "Several project files found, using the first");
    }
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| LoadError::MissingProjectFile(project_dir.to_path_buf()))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn file_def<T>(folder: &Path, path: &Path, content: T) -> FileDef<T> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let folder_path = path
        .parent()
        .and_then(|parent| relative_slash_path(folder, parent))
        .unwrap_or_default();
    FileDef::new(folder_path, file_name, content)
}

fn load_kind<T, F>(project_dir: &Path, folder: &str, extension: &str, parse: F) -> Result<Vec<FileDef<T>>, LoadError>
where
    F: Fn(&Path) -> Result<T, LoadError>,
{
    let folder = project_dir.join(folder);
    let files = walk_files(&folder).map_err(io_error(&folder))?;
    let mut defs = Vec::new();
    for path in files.iter().filter(|path| has_extension(path, extension)) {
        defs.push(file_def(&folder, path, parse(path)?));
    }
    Ok(defs)
}

fn read_definition<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    parse_definition(path, &text)
}

/// Load every definition of the project rooted at `project_dir`
pub fn load_project(project_dir: &Path) -> Result<SourceFiles, LoadError> {
    let project_path = find_project_file(project_dir)?;
    let project: ProjectDef = read_definition(&project_path)?;
    let project_file = file_def(project_dir, &project_path, project);

    let mut files = SourceFiles::new(project_dir, project_file);
    files.pages = load_kind(
        project_dir,
        StandardFolder::PAGE_DEFINITIONS,
        StandardFileExtension::PAGE,
        read_definition,
    )?;
    files.test_cases = load_kind(
        project_dir,
        StandardFolder::TEST_CASES,
        StandardFileExtension::TEST_CASE,
        read_definition,
    )?;
    files.routines = load_kind(
        project_dir,
        StandardFolder::TEST_ROUTINES,
        StandardFileExtension::TEST_ROUTINE,
        read_definition,
    )?;
    files.suites = load_kind(
        project_dir,
        StandardFolder::TEST_SUITES,
        StandardFileExtension::TEST_SUITE,
        read_definition,
    )?;
    files.environments = load_kind(
        project_dir,
        StandardFolder::CONFIG,
        StandardFileExtension::ENVIRONMENT,
        parse_environment,
    )?;

    tracing::info!(
        project = %files.project.file_name,
        pages = files.pages.len(),
        test_cases = files.test_cases.len(),
        routines = files.routines.len(),
        suites = files.suites.len(),
        environments = files.environments.len(),
        "Loaded project files"
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::fs_utils::write_file;
    use crate::file_defs::{Language, PageDef};
    use tempfile::TempDir;

    #[test]
    fn test_yaml_fallback() {
        let page: PageDef = parse_definition(
            Path::new("Login.page"),
            "id: p1\nname: Login\nelements:\n  - type: pageElement\n    id: e1\n    name: user\n    findBy: Css\n    locator: '#user'\n",
        )
        .unwrap();
        assert_eq!(page.name, "Login");
        assert_eq!(page.elements.len(), 1);

        let err = parse_definition::<PageDef>(Path::new("Bad.page"), "[1, 2").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_missing_project_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(load_project(dir.path()), Err(LoadError::MissingProjectFile(_))));
    }

    #[test]
    fn test_load_sorted_with_folders() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_file(root.join("shop.rmproj"), r#"{"name": "Shop", "language": "typescript"}"#).unwrap();
        write_file(root.join("page-definitions/b/Login.page"), r#"{"id": "p2", "name": "Login"}"#).unwrap();
        write_file(root.join("page-definitions/a/Login.page"), r#"{"id": "p1", "name": "Login"}"#).unwrap();
        write_file(root.join("page-definitions/notes.txt"), "ignored").unwrap();
        write_file(root.join("config/local.env"), "BASE_URL=https://example.test\nUSER=qa\n").unwrap();

        let files = load_project(root).unwrap();
        assert_eq!(files.project.content.language, Language::Typescript);
        let paths: Vec<String> = files.pages.iter().map(|p| p.rel_path()).collect();
        assert_eq!(paths, vec!["a/Login.page", "b/Login.page"]);
        assert_eq!(files.environments.len(), 1);
        assert_eq!(
            files.environments[0].content.variables.get("BASE_URL").map(String::as_str),
            Some("https://example.test")
        );
    }
}
