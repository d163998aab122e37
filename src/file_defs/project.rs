//! Project descriptor (`.rmproj`) and the standard folder/extension layout.

use serde::{Deserialize, Serialize};
use std::fmt;

fn default_file_version() -> u32 {
    1
}

fn default_indent_size() -> usize {
    4
}

/// Browser automation library the generated project is written against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AutomationFramework {
    #[default]
    #[serde(alias = "playwright")]
    Playwright,
}

/// Target programming language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(alias = "csharp", alias = "C#", alias = "Csharp")]
    CSharp,
    #[serde(alias = "typescript", alias = "TypeScript")]
    Typescript,
}

/// Test runner the generated project uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestFramework {
    #[serde(alias = "mstest")]
    MSTest,
    #[serde(alias = "nunit")]
    NUnit,
    /// The `@playwright/test` runner
    #[serde(rename = "Playwright", alias = "playwright", alias = "PlaywrightTest")]
    PlaywrightTest,
}

/// Indentation style of generated sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Indent {
    #[default]
    #[serde(alias = "spaces")]
    Spaces,
    #[serde(alias = "tabs")]
    Tabs,
}

impl fmt::Display for AutomationFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomationFramework::Playwright => write!(f, "Playwright"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::CSharp => write!(f, "CSharp"),
            Language::Typescript => write!(f, "Typescript"),
        }
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestFramework::MSTest => write!(f, "MSTest"),
            TestFramework::NUnit => write!(f, "NUnit"),
            TestFramework::PlaywrightTest => write!(f, "Playwright"),
        }
    }
}

/// Content of the project descriptor file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDef {
    #[serde(default = "default_file_version")]
    pub file_version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub automation_framework: AutomationFramework,
    /// Defaults to the natural runner of `language` when omitted
    #[serde(default)]
    pub test_framework: Option<TestFramework>,
    pub language: Language,
    #[serde(default)]
    pub root_namespace: String,
    #[serde(default)]
    pub indent: Indent,
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,
    #[serde(default)]
    pub test_id_attribute_name: String,
}

impl ProjectDef {
    /// Create a descriptor with defaults for everything but name and language
    pub fn new(name: impl Into<String>, language: Language) -> Self {
        Self {
            file_version: default_file_version(),
            name: name.into(),
            description: String::new(),
            automation_framework: AutomationFramework::Playwright,
            test_framework: None,
            language,
            root_namespace: String::new(),
            indent: Indent::Spaces,
            indent_size: default_indent_size(),
            test_id_attribute_name: String::new(),
        }
    }

    /// Test framework, falling back to the language default
    pub fn effective_test_framework(&self) -> TestFramework {
        self.test_framework.unwrap_or(match self.language {
            Language::CSharp => TestFramework::MSTest,
            Language::Typescript => TestFramework::PlaywrightTest,
        })
    }
}

/// Input folders, relative to the project root
pub struct StandardFolder;

impl StandardFolder {
    pub const PAGE_DEFINITIONS: &'static str = "page-definitions";
    pub const TEST_CASES: &'static str = "test-cases";
    pub const TEST_ROUTINES: &'static str = "test-routines";
    pub const TEST_SUITES: &'static str = "test-suites";
    pub const CONFIG: &'static str = "config";
    pub const CUSTOM_CODE: &'static str = "custom-code";
    pub const OUTPUT_CODE: &'static str = "output-code";
    pub const LOGS: &'static str = ".logs";
}

/// File extensions of project files
pub struct StandardFileExtension;

impl StandardFileExtension {
    pub const PROJECT: &'static str = "rmproj";
    pub const PAGE: &'static str = "page";
    pub const TEST_CASE: &'static str = "tcase";
    pub const TEST_ROUTINE: &'static str = "troutine";
    pub const TEST_SUITE: &'static str = "tsuite";
    pub const ENVIRONMENT: &'static str = "env";
}

/// Well-known files inside the output folder
pub struct StandardOutputFile;

impl StandardOutputFile {
    pub const META_DATA: &'static str = ".code-metadata";
}
