//! Playwright test runner generator (TypeScript).
//!
//! Pages expose locators as getters; test cases and routines are classes
//! with an async `run`; suites are `test.describe` blocks under `tests/`.

mod actions;
mod locators;
mod scaffold;
mod templates;

use crate::codegen::error::CodegenError;
use crate::codegen::generator::{
    dispatch_action, dispatch_locator, ActionParams, DataExpr, GeneratedFile, LocatorParams, TargetGenerator,
};
use crate::codegen::naming::NamedProject;
use crate::codegen::source_meta::{CaseId, ElementId, PageId, RoutineId, SuiteId};
use crate::codegen::target::Target;
use crate::codegen::utils::typescript_string_literal;
use crate::file_defs::{ActionType, LocatorType};

#[derive(Debug, Default)]
pub struct PlaywrightTypescriptGenerator;

impl PlaywrightTypescriptGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TargetGenerator for PlaywrightTypescriptGenerator {
    fn target(&self) -> Target {
        Target::PlaywrightTypescript
    }

    fn supported_actions(&self) -> Vec<ActionType> {
        actions::ACTIONS.iter().map(|(action, _)| *action).collect()
    }

    fn supported_locators(&self) -> Vec<LocatorType> {
        locators::LOCATORS.iter().map(|(locator, _)| *locator).collect()
    }

    fn render_action(&self, params: &ActionParams<'_>) -> Result<String, CodegenError> {
        dispatch_action(actions::ACTIONS, self.target(), params)
    }

    fn render_locator(&self, params: &LocatorParams<'_>) -> Result<String, CodegenError> {
        dispatch_locator(locators::LOCATORS, self.target(), params)
    }

    fn element_reference(&self, project: &NamedProject, element: ElementId) -> String {
        format!(
            "this.defs.{}.{}",
            project.page_property(element.page),
            project.element_member(element)
        )
    }

    fn string_literal(&self, text: &str) -> String {
        typescript_string_literal(text)
    }

    fn environment_lookup(&self, name: &str) -> String {
        format!("getEnvironmentVariable({})", typescript_string_literal(name))
    }

    fn comment(&self, text: &str) -> String {
        format!("// {}", text)
    }

    fn routine_invocation(&self, project: &NamedProject, routine: RoutineId, args: &[DataExpr]) -> String {
        let args: Vec<&str> = args.iter().map(|arg| arg.code.as_str()).collect();
        format!(
            "await new {}(this.page).run({});",
            project.routine(routine).class_name,
            args.join(", ")
        )
    }

    fn test_command(&self) -> &'static str {
        "npx playwright test"
    }

    fn render_page(&self, project: &NamedProject, id: PageId) -> Result<GeneratedFile, CodegenError> {
        templates::render_page(self, project, id)
    }

    fn render_test_case(&self, project: &NamedProject, id: CaseId) -> Result<GeneratedFile, CodegenError> {
        templates::render_test_case(self, project, id)
    }

    fn render_test_routine(&self, project: &NamedProject, id: RoutineId) -> Result<GeneratedFile, CodegenError> {
        templates::render_test_routine(self, project, id)
    }

    fn render_test_suite(&self, project: &NamedProject, id: SuiteId) -> Result<GeneratedFile, CodegenError> {
        templates::render_test_suite(self, project, id)
    }

    fn render_environment_settings(&self, project: &NamedProject) -> Result<GeneratedFile, CodegenError> {
        templates::render_environment_settings(project)
    }

    fn render_project_scaffold(&self, project: &NamedProject) -> Result<Vec<GeneratedFile>, CodegenError> {
        scaffold::render_scaffold(project)
    }

    /// Title path as the runner reports it
    fn qualified_test_name(&self, project: &NamedProject, suite: SuiteId, index: usize) -> String {
        let title = project.suite_tests(suite).get(index).map(String::as_str).unwrap_or_default();
        format!("{} \u{203a} {}", project.meta().suite(suite).name, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str) -> DataExpr {
        DataExpr {
            code: typescript_string_literal(text),
            literal: Some(text.to_string()),
        }
    }

    #[test]
    fn test_run_code_is_unsupported() {
        let generator = PlaywrightTypescriptGenerator::new();
        let code = literal("Console.WriteLine();");
        let params = ActionParams {
            action: ActionType::RunCode,
            element: None,
            data: Some(&code),
        };
        assert!(matches!(
            generator.render_action(&params),
            Err(CodegenError::UnsupportedAction {
                action: ActionType::RunCode,
                ..
            })
        ));
        assert_eq!(generator.supported_actions().len(), ActionType::ALL.len() - 1);
    }

    #[test]
    fn test_every_locator_renders() {
        let generator = PlaywrightTypescriptGenerator::new();
        for locator_type in LocatorType::ALL {
            let params = LocatorParams {
                locator_type,
                value: "field",
                anchor: Some("this.form"),
            };
            assert!(!generator.render_locator(&params).unwrap().is_empty());
        }
    }

    #[test]
    fn test_action_fragments() {
        let generator = PlaywrightTypescriptGenerator::new();
        let john = literal("John");
        let input = ActionParams {
            action: ActionType::Input,
            element: Some("this.defs.fillsScreen.name"),
            data: Some(&john),
        };
        assert_eq!(
            generator.render_action(&input).unwrap(),
            "await this.defs.fillsScreen.name.fill(\"John\");"
        );

        let half_second = literal("499.6");
        let delay = ActionParams {
            action: ActionType::Delay,
            element: None,
            data: Some(&half_second),
        };
        assert_eq!(
            generator.render_action(&delay).unwrap(),
            "await this.page.waitForTimeout(500);"
        );

        let title = literal("Shop (beta)");
        let contains = ActionParams {
            action: ActionType::VerifyTitleContains,
            element: None,
            data: Some(&title),
        };
        assert_eq!(
            generator.render_action(&contains).unwrap(),
            "await expect(this.page).toHaveTitle(new RegExp(\"Shop \\\\(beta\\\\)\"));"
        );
    }

    #[test]
    fn test_locator_fragments() {
        let generator = PlaywrightTypescriptGenerator::new();
        let render = |locator_type, value| {
            generator
                .render_locator(&LocatorParams {
                    locator_type,
                    value,
                    anchor: Some("this.form"),
                })
                .unwrap()
        };
        assert_eq!(render(LocatorType::Label, "Name"), "this.page.getByLabel(\"Name\")");
        assert_eq!(render(LocatorType::Xpath, "//input"), "this.page.locator(\"xpath=//input\")");
        assert_eq!(render(LocatorType::RelativeCss, "input"), "this.form.locator(\"input\")");
        assert_eq!(render(LocatorType::IFrame, "#frame"), "this.page.frameLocator(\"#frame\")");
    }
}
