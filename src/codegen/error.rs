//! Error types for generation.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::file_defs::{ActionType, LocatorType};

/// Error raised while resolving names or rendering a target
#[derive(Debug)]
pub enum CodegenError {
    /// The target has no rendering rule for an action kind
    UnsupportedAction {
        action: ActionType,
        target: String,
        location: String,
    },
    /// The target has no rendering rule for a locator kind
    UnsupportedLocator {
        locator: LocatorType,
        target: String,
        location: String,
    },
    /// No generator exists for the framework/language/test-runner triple
    UnsupportedTarget(String),
    /// A step names an action outside the vocabulary
    UnknownAction { name: String, location: String },
    /// Suffixing could not produce a free name within the retry budget
    NamingCollision { name: String, scope: String },
    /// An action was rendered without an input it needs
    MissingActionInput {
        action: ActionType,
        input: &'static str,
    },
    /// A routine call selects a dataset a per-dataset step has no value for
    MissingDataSetValue {
        routine: String,
        data_set: String,
        location: String,
    },
    /// A relative locator has no preceding element to chain on
    MissingAnchor { page: String, element: String },
    /// Two generated files share an output path
    DuplicateOutputPath(String),
    Io { path: PathBuf, source: io::Error },
    Format(fmt::Error),
    Serialization(String),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::UnsupportedAction { action, target, location } => write!(
                f,
                "Action '{}' is not supported by target {} ({})",
                action, target, location
            ),
            CodegenError::UnsupportedLocator { locator, target, location } => write!(
                f,
                "Locator '{}' is not supported by target {} ({})",
                locator, target, location
            ),
            CodegenError::UnknownAction { name, location } => {
                write!(f, "Unknown action '{}' ({})", name, location)
            }
            CodegenError::UnsupportedTarget(target) => {
                write!(f, "No code generator available for target {}", target)
            }
            CodegenError::NamingCollision { name, scope } => write!(
                f,
                "Could not find a free name for '{}' in {}",
                name, scope
            ),
            CodegenError::MissingActionInput { action, input } => {
                write!(f, "Action '{}' was rendered without its {}", action, input)
            }
            CodegenError::MissingDataSetValue { routine, data_set, location } => write!(
                f,
                "Routine '{}' has no value for dataset '{}' ({})",
                routine, data_set, location
            ),
            CodegenError::MissingAnchor { page, element } => write!(
                f,
                "Relative element '{}' on page '{}' has no preceding element",
                element, page
            ),
            CodegenError::DuplicateOutputPath(path) => {
                write!(f, "More than one file would be written to '{}'", path)
            }
            CodegenError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            CodegenError::Format(e) => write!(f, "Formatting error: {}", e),
            CodegenError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for CodegenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodegenError::Io { source, .. } => Some(source),
            CodegenError::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl From<fmt::Error> for CodegenError {
    fn from(e: fmt::Error) -> Self {
        CodegenError::Format(e)
    }
}

impl From<serde_json::Error> for CodegenError {
    fn from(e: serde_json::Error) -> Self {
        CodegenError::Serialization(e.to_string())
    }
}

impl CodegenError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CodegenError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the offending entity and step to an unsupported-kind error
    pub fn at(self, at: &str) -> Self {
        match self {
            CodegenError::UnsupportedAction { action, target, .. } => CodegenError::UnsupportedAction {
                action,
                target,
                location: at.to_string(),
            },
            CodegenError::UnsupportedLocator { locator, target, .. } => CodegenError::UnsupportedLocator {
                locator,
                target,
                location: at.to_string(),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_sets_location() {
        let err = CodegenError::UnsupportedAction {
            action: ActionType::RunCode,
            target: "Playwright/Typescript/Playwright".to_string(),
            location: String::new(),
        }
        .at("test case 'fills' step 2");
        assert_eq!(
            err.to_string(),
            "Action 'RunCode' is not supported by target Playwright/Typescript/Playwright (test case 'fills' step 2)"
        );

        let err = CodegenError::DuplicateOutputPath("a.cs".to_string()).at("ignored");
        assert!(matches!(err, CodegenError::DuplicateOutputPath(_)));
    }
}
