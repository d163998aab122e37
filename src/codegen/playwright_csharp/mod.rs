//! Playwright .NET generator (MSTest or NUnit).
//!
//! Pages, test cases, routines and suites become `partial` classes so
//! hand-written code in `custom-code/` can extend them.

mod actions;
mod locators;
mod scaffold;
mod templates;

pub use scaffold::stable_guid;

use crate::codegen::error::CodegenError;
use crate::codegen::generator::{
    dispatch_action, dispatch_locator, ActionParams, DataExpr, GeneratedFile, LocatorParams, TargetGenerator,
};
use crate::codegen::naming::NamedProject;
use crate::codegen::source_meta::{CaseId, ElementId, PageId, RoutineId, SuiteId};
use crate::codegen::target::Target;
use crate::codegen::utils::csharp_string_literal;
use crate::file_defs::{ActionType, LocatorType};

pub struct PlaywrightCSharpGenerator {
    target: Target,
}

impl PlaywrightCSharpGenerator {
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

impl TargetGenerator for PlaywrightCSharpGenerator {
    fn target(&self) -> Target {
        self.target
    }

    fn supported_actions(&self) -> Vec<ActionType> {
        actions::ACTIONS.iter().map(|(action, _)| *action).collect()
    }

    fn supported_locators(&self) -> Vec<LocatorType> {
        locators::LOCATORS.iter().map(|(locator, _)| *locator).collect()
    }

    fn render_action(&self, params: &ActionParams<'_>) -> Result<String, CodegenError> {
        dispatch_action(actions::ACTIONS, self.target, params)
    }

    fn render_locator(&self, params: &LocatorParams<'_>) -> Result<String, CodegenError> {
        dispatch_locator(locators::LOCATORS, self.target, params)
    }

    fn element_reference(&self, project: &NamedProject, element: ElementId) -> String {
        format!(
            "Defs.{}.{}",
            project.page_property(element.page),
            project.element_member(element)
        )
    }

    fn string_literal(&self, text: &str) -> String {
        csharp_string_literal(text)
    }

    fn environment_lookup(&self, name: &str) -> String {
        format!("EnvironmentSettings.Get({})", csharp_string_literal(name))
    }

    fn comment(&self, text: &str) -> String {
        format!("// {}", text)
    }

    fn routine_invocation(&self, project: &NamedProject, routine: RoutineId, args: &[DataExpr]) -> String {
        let info = project.routine(routine);
        let args: Vec<&str> = args.iter().map(|arg| arg.code.as_str()).collect();
        format!(
            "await new global::{}.{}(Page).RunAsync({});",
            info.full_namespace,
            info.class_name,
            args.join(", ")
        )
    }

    fn test_command(&self) -> &'static str {
        "dotnet test --settings .runsettings"
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
        scaffold::render_scaffold(self.target, project)
    }

    fn qualified_test_name(&self, project: &NamedProject, suite: SuiteId, index: usize) -> String {
        let info = project.suite(suite);
        let method = project.suite_tests(suite).get(index).map(String::as_str).unwrap_or_default();
        format!("{}.{}.{}", info.full_namespace, info.class_name, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> PlaywrightCSharpGenerator {
        PlaywrightCSharpGenerator::new(Target::PlaywrightCSharpMsTest)
    }

    fn literal(text: &str) -> DataExpr {
        DataExpr {
            code: csharp_string_literal(text),
            literal: Some(text.to_string()),
        }
    }

    #[test]
    fn test_every_action_renders() {
        let generator = generator();
        let data = literal("500");
        for action in generator.supported_actions() {
            let params = ActionParams {
                action,
                element: Some("Defs.Login.Name"),
                data: Some(&data),
            };
            let code = generator.render_action(&params).unwrap();
            assert!(!code.is_empty(), "{} rendered nothing", action);
        }
        assert_eq!(generator.supported_actions().len(), ActionType::ALL.len());
    }

    #[test]
    fn test_every_locator_renders() {
        let generator = generator();
        for locator_type in generator.supported_locators() {
            let params = LocatorParams {
                locator_type,
                value: "field",
                anchor: Some("Form"),
            };
            assert!(!generator.render_locator(&params).unwrap().is_empty());
        }
        assert_eq!(generator.supported_locators().len(), LocatorType::ALL.len());
    }

    #[test]
    fn test_action_fragments() {
        let generator = generator();
        let john = literal("John");
        let input = ActionParams {
            action: ActionType::Input,
            element: Some("Defs.FillsScreen.Name"),
            data: Some(&john),
        };
        assert_eq!(
            generator.render_action(&input).unwrap(),
            "await Defs.FillsScreen.Name.FillAsync(\"John\");"
        );

        let env = DataExpr {
            code: generator.environment_lookup("DELAY"),
            literal: None,
        };
        let delay = ActionParams {
            action: ActionType::Delay,
            element: None,
            data: Some(&env),
        };
        assert_eq!(
            generator.render_action(&delay).unwrap(),
            "await Task.Delay(int.Parse(EnvironmentSettings.Get(\"DELAY\")));"
        );

        let missing = ActionParams {
            action: ActionType::Click,
            element: None,
            data: None,
        };
        assert!(matches!(
            generator.render_action(&missing),
            Err(CodegenError::MissingActionInput { .. })
        ));
    }

    #[test]
    fn test_locator_fragments() {
        let generator = generator();
        let render = |locator_type, value| {
            generator
                .render_locator(&LocatorParams {
                    locator_type,
                    value,
                    anchor: Some("Form"),
                })
                .unwrap()
        };
        assert_eq!(render(LocatorType::Css, "[name='name']"), "Page.Locator(\"[name='name']\")");
        assert_eq!(render(LocatorType::Xpath, "//input"), "Page.Locator(\"xpath=//input\")");
        assert_eq!(render(LocatorType::IFrameId, "content"), "Page.FrameLocator(\"iframe[id=\\\"content\\\"]\")");
        assert_eq!(render(LocatorType::RelativeCss, "input"), "Form.Locator(\"input\")");
        assert_eq!(render(LocatorType::TestId, "submit"), "Page.GetByTestId(\"submit\")");
    }
}
