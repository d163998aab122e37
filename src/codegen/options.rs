//! Generation options and their resolution from CLI flags and environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::file_defs::StandardFolder;

pub const OUTPUT_DIR_ENV: &str = "QAGEN_OUTPUT_DIR";
pub const SCRIPT_FLAVOR_ENV: &str = "QAGEN_SCRIPT_FLAVOR";

/// Shell dialect of the generated environment run scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFlavor {
    Sh,
    Bat,
}

impl ScriptFlavor {
    /// `bat` on Windows, `sh` elsewhere
    pub fn native() -> Self {
        if cfg!(windows) {
            ScriptFlavor::Bat
        } else {
            ScriptFlavor::Sh
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ScriptFlavor::Sh => "sh",
            ScriptFlavor::Bat => "bat",
        }
    }
}

impl fmt::Display for ScriptFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ScriptFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sh" | "bash" | "unix" => Ok(ScriptFlavor::Sh),
            "bat" | "cmd" | "windows" => Ok(ScriptFlavor::Bat),
            other => Err(format!("Unsupported script flavor: '{}'. Supported flavors: sh, bat", other)),
        }
    }
}

/// Where and how one run writes its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub output_dir: PathBuf,
    /// Hand-written code copied into the output before generation
    pub custom_code_dir: PathBuf,
    pub script_flavor: ScriptFlavor,
}

impl GeneratorOptions {
    /// Defaults for a project directory
    pub fn for_project(project_dir: &Path) -> Self {
        Self {
            output_dir: project_dir.join(StandardFolder::OUTPUT_CODE),
            custom_code_dir: project_dir.join(StandardFolder::CUSTOM_CODE),
            script_flavor: ScriptFlavor::native(),
        }
    }

    /// Resolve options with precedence CLI flag > process environment > default
    pub fn resolve(
        project_dir: &Path,
        cli_output_dir: Option<PathBuf>,
        cli_script_flavor: Option<String>,
    ) -> Result<Self, String> {
        Self::resolve_with(project_dir, cli_output_dir, cli_script_flavor, |key| std::env::var(key).ok())
    }

    /// [`GeneratorOptions::resolve`] with an explicit environment lookup
    pub fn resolve_with(
        project_dir: &Path,
        cli_output_dir: Option<PathBuf>,
        cli_script_flavor: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let mut options = Self::for_project(project_dir);

        // 1. CLI flag (highest priority)
        // 2. Environment variable
        if let Some(dir) = cli_output_dir {
            options.output_dir = dir;
        } else if let Some(dir) = env(OUTPUT_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            tracing::debug!("Using output directory from {}: {}", OUTPUT_DIR_ENV, dir);
            options.output_dir = PathBuf::from(dir);
        }
        if options.output_dir.is_relative() {
            options.output_dir = project_dir.join(&options.output_dir);
        }

        if let Some(flavor) = cli_script_flavor {
            options.script_flavor = flavor.parse()?;
        } else if let Some(flavor) = env(SCRIPT_FLAVOR_ENV) {
            match flavor.parse() {
                Ok(flavor) => options.script_flavor = flavor,
                Err(e) => tracing::warn!("Ignoring {}: {}", SCRIPT_FLAVOR_ENV, e),
            }
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::resolve_with(Path::new("/p"), None, None, |_| None).unwrap();
        assert_eq!(options.output_dir, PathBuf::from("/p/output-code"));
        assert_eq!(options.custom_code_dir, PathBuf::from("/p/custom-code"));
        assert_eq!(options.script_flavor, ScriptFlavor::native());
    }

    #[test]
    fn test_cli_beats_environment() {
        let env = |key: &str| match key {
            OUTPUT_DIR_ENV => Some("from-env".to_string()),
            SCRIPT_FLAVOR_ENV => Some("bat".to_string()),
            _ => None,
        };
        let options =
            GeneratorOptions::resolve_with(Path::new("/p"), Some(PathBuf::from("/out")), Some("sh".to_string()), env)
                .unwrap();
        assert_eq!(options.output_dir, PathBuf::from("/out"));
        assert_eq!(options.script_flavor, ScriptFlavor::Sh);

        let options = GeneratorOptions::resolve_with(Path::new("/p"), None, None, env).unwrap();
        assert_eq!(options.output_dir, PathBuf::from("/p/from-env"));
        assert_eq!(options.script_flavor, ScriptFlavor::Bat);
    }

    #[test]
    fn test_invalid_cli_flavor() {
        let err = GeneratorOptions::resolve_with(Path::new("/p"), None, Some("zsh".to_string()), |_| None)
            .unwrap_err();
        assert!(err.contains("zsh"));
    }
}
