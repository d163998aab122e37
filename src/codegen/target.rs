//! Generation targets: the supported (framework, language, test runner) triples.

use std::fmt;

use crate::codegen::error::CodegenError;
use crate::file_defs::{AutomationFramework, Language, ProjectDef, TestFramework};

/// One supported combination of automation framework, language and test runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    PlaywrightCSharpMsTest,
    PlaywrightCSharpNUnit,
    PlaywrightTypescript,
}

impl Target {
    pub const ALL: [Target; 3] = [
        Target::PlaywrightCSharpMsTest,
        Target::PlaywrightCSharpNUnit,
        Target::PlaywrightTypescript,
    ];

    /// Select the target declared by a project descriptor
    pub fn from_project(project: &ProjectDef) -> Result<Target, CodegenError> {
        let test_framework = project.effective_test_framework();
        match (project.automation_framework, project.language, test_framework) {
            (AutomationFramework::Playwright, Language::CSharp, TestFramework::MSTest) => {
                Ok(Target::PlaywrightCSharpMsTest)
            }
            (AutomationFramework::Playwright, Language::CSharp, TestFramework::NUnit) => {
                Ok(Target::PlaywrightCSharpNUnit)
            }
            (AutomationFramework::Playwright, Language::Typescript, TestFramework::PlaywrightTest) => {
                Ok(Target::PlaywrightTypescript)
            }
            (framework, language, test_framework) => Err(CodegenError::UnsupportedTarget(format!(
                "{}/{}/{}",
                framework, language, test_framework
            ))),
        }
    }

    pub fn language(&self) -> Language {
        match self {
            Target::PlaywrightCSharpMsTest | Target::PlaywrightCSharpNUnit => Language::CSharp,
            Target::PlaywrightTypescript => Language::Typescript,
        }
    }

    pub fn test_framework(&self) -> TestFramework {
        match self {
            Target::PlaywrightCSharpMsTest => TestFramework::MSTest,
            Target::PlaywrightCSharpNUnit => TestFramework::NUnit,
            Target::PlaywrightTypescript => TestFramework::PlaywrightTest,
        }
    }

    /// Targets emitting a .NET project
    pub fn is_dotnet(&self) -> bool {
        self.language() == Language::CSharp
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            AutomationFramework::Playwright,
            self.language(),
            self.test_framework()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_project() {
        let project = ProjectDef::new("demo", Language::CSharp);
        assert_eq!(Target::from_project(&project).unwrap(), Target::PlaywrightCSharpMsTest);

        let mut project = ProjectDef::new("demo", Language::Typescript);
        assert_eq!(Target::from_project(&project).unwrap(), Target::PlaywrightTypescript);

        project.test_framework = Some(TestFramework::NUnit);
        let err = Target::from_project(&project).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No code generator available for target Playwright/Typescript/NUnit"
        );
    }
}
