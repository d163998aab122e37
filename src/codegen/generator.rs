//! The contract every target code generator implements.
//!
//! Render operations are pure: they take the named project (or one entity of
//! it) and return source text. File I/O belongs to the orchestrator. Actions
//! and locators dispatch through per-target tables; a kind missing from a
//! table fails with `UnsupportedAction`/`UnsupportedLocator`.

use std::collections::BTreeSet;

use crate::codegen::environment_script::render_environment_script;
use crate::codegen::error::CodegenError;
use crate::codegen::naming::NamedProject;
use crate::codegen::playwright_csharp::PlaywrightCSharpGenerator;
use crate::codegen::playwright_typescript::PlaywrightTypescriptGenerator;
use crate::codegen::source_meta::{
    CaseId, DataValue, ElementId, EnvId, PageId, RoutineId, StepData, StepNode, SuiteId,
};
use crate::codegen::target::Target;
use crate::codegen::validation::StepOwner;
use crate::file_defs::{ActionType, LocatorType};

/// One rendered output file, relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub rel_path: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(rel_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            rel_path: rel_path.into(),
            content: content.into(),
        }
    }
}

/// A string-typed expression supplying an action's data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataExpr {
    /// Target-language expression evaluating to the value
    pub code: String,
    /// The raw value when it is known at generation time
    pub literal: Option<String>,
}

/// Inputs of one locator rendering
#[derive(Debug, Clone, Copy)]
pub struct LocatorParams<'a> {
    pub locator_type: LocatorType,
    pub value: &'a str,
    /// Expression of the element a relative locator chains on
    pub anchor: Option<&'a str>,
}

/// Inputs of one action rendering
#[derive(Debug, Clone, Copy)]
pub struct ActionParams<'a> {
    pub action: ActionType,
    /// Expression of the target element's locator
    pub element: Option<&'a str>,
    pub data: Option<&'a DataExpr>,
}

impl ActionParams<'_> {
    pub fn require_element(&self) -> Result<&str, CodegenError> {
        self.element.ok_or(CodegenError::MissingActionInput {
            action: self.action,
            input: "element",
        })
    }

    pub fn require_data(&self) -> Result<&DataExpr, CodegenError> {
        self.data.ok_or(CodegenError::MissingActionInput {
            action: self.action,
            input: "data",
        })
    }
}

pub type ActionRenderer = fn(&ActionParams<'_>) -> Result<String, CodegenError>;
pub type LocatorRenderer = fn(&LocatorParams<'_>) -> Result<String, CodegenError>;

/// Look an action up in a target's dispatch table
pub fn dispatch_action(
    table: &[(ActionType, ActionRenderer)],
    target: Target,
    params: &ActionParams<'_>,
) -> Result<String, CodegenError> {
    match table.iter().find(|(action, _)| *action == params.action) {
        Some((_, render)) => render(params),
        None => Err(CodegenError::UnsupportedAction {
            action: params.action,
            target: target.to_string(),
            location: String::new(),
        }),
    }
}

/// Look a locator up in a target's dispatch table
pub fn dispatch_locator(
    table: &[(LocatorType, LocatorRenderer)],
    target: Target,
    params: &LocatorParams<'_>,
) -> Result<String, CodegenError> {
    match table.iter().find(|(locator, _)| *locator == params.locator_type) {
        Some((_, render)) => render(params),
        None => Err(CodegenError::UnsupportedLocator {
            locator: params.locator_type,
            target: target.to_string(),
            location: String::new(),
        }),
    }
}

/// Steps of a test case or routine rendered to statements
#[derive(Debug, Clone, Default)]
pub struct RenderedSteps {
    /// One entry per step; multi-line entries are possible
    pub lines: Vec<String>,
    /// Some statement reads an environment variable
    pub uses_environment: bool,
    /// Routines invoked, for imports
    pub routines: BTreeSet<RoutineId>,
}

pub trait TargetGenerator: Send + Sync {
    fn target(&self) -> Target;

    fn supported_actions(&self) -> Vec<ActionType>;

    fn supported_locators(&self) -> Vec<LocatorType>;

    fn render_action(&self, params: &ActionParams<'_>) -> Result<String, CodegenError>;

    fn render_locator(&self, params: &LocatorParams<'_>) -> Result<String, CodegenError>;

    /// Locator expression of an element as seen from a test case or routine
    fn element_reference(&self, project: &NamedProject, element: ElementId) -> String;

    fn string_literal(&self, text: &str) -> String;

    /// Expression reading an environment variable at run time
    fn environment_lookup(&self, name: &str) -> String;

    /// Line comment
    fn comment(&self, text: &str) -> String;

    /// Statement running a routine with positional arguments
    fn routine_invocation(&self, project: &NamedProject, routine: RoutineId, args: &[DataExpr]) -> String;

    /// Command the environment run scripts start the tests with
    fn test_command(&self) -> &'static str;

    fn render_page(&self, project: &NamedProject, id: PageId) -> Result<GeneratedFile, CodegenError>;

    fn render_test_case(&self, project: &NamedProject, id: CaseId) -> Result<GeneratedFile, CodegenError>;

    fn render_test_routine(&self, project: &NamedProject, id: RoutineId) -> Result<GeneratedFile, CodegenError>;

    fn render_test_suite(&self, project: &NamedProject, id: SuiteId) -> Result<GeneratedFile, CodegenError>;

    /// The generated environment-access surface
    fn render_environment_settings(&self, project: &NamedProject) -> Result<GeneratedFile, CodegenError>;

    /// Build files, run settings, shared imports and support classes
    fn render_project_scaffold(&self, project: &NamedProject) -> Result<Vec<GeneratedFile>, CodegenError>;

    /// Name the test runner filters on for one suite entry
    fn qualified_test_name(&self, project: &NamedProject, suite: SuiteId, index: usize) -> String;

    fn render_environment_file(&self, project: &NamedProject, id: EnvId) -> Result<GeneratedFile, CodegenError> {
        render_environment_script(project, id, self.test_command())
    }

    /// Render every file of the project
    fn generate_all(&self, project: &NamedProject) -> Result<Vec<GeneratedFile>, CodegenError> {
        let meta = project.meta();
        let mut files = self.render_project_scaffold(project)?;
        files.push(self.render_environment_settings(project)?);
        for id in meta.page_ids() {
            files.push(self.render_page(project, id)?);
        }
        for id in meta.case_ids() {
            files.push(self.render_test_case(project, id)?);
        }
        for id in meta.routine_ids() {
            files.push(self.render_test_routine(project, id)?);
        }
        for id in meta.suite_ids() {
            files.push(self.render_test_suite(project, id)?);
        }
        for id in meta.environment_ids() {
            files.push(self.render_environment_file(project, id)?);
        }
        Ok(files)
    }
}

/// Generator for a target
pub fn create_generator(target: Target) -> Box<dyn TargetGenerator> {
    match target {
        Target::PlaywrightCSharpMsTest | Target::PlaywrightCSharpNUnit => {
            Box::new(PlaywrightCSharpGenerator::new(target))
        }
        Target::PlaywrightTypescript => Box::new(PlaywrightTypescriptGenerator::new()),
    }
}

pub fn data_expr<G: TargetGenerator + ?Sized>(generator: &G, value: &DataValue) -> DataExpr {
    match value {
        DataValue::Literal(text) => DataExpr {
            code: generator.string_literal(text),
            literal: Some(text.clone()),
        },
        DataValue::Environment(name) => DataExpr {
            code: generator.environment_lookup(name),
            literal: None,
        },
    }
}

/// Render the steps of a test case or routine
pub fn render_steps<G: TargetGenerator + ?Sized>(
    generator: &G,
    project: &NamedProject,
    steps: &[StepNode],
    owner: StepOwner,
    location: &str,
) -> Result<RenderedSteps, CodegenError> {
    let meta = project.meta();
    let mut rendered = RenderedSteps::default();

    for (index, step) in steps.iter().enumerate() {
        let at = format!("{} step {}", location, index + 1);
        match step {
            StepNode::Comment(text) => {
                let lines: Vec<String> = text.lines().map(|line| generator.comment(line.trim())).collect();
                rendered.lines.push(lines.join("\n"));
            }
            StepNode::Action(step) => {
                let action = step.action.ok_or_else(|| CodegenError::UnknownAction {
                    name: step.action_name.clone(),
                    location: at.clone(),
                })?;
                let element = step.element.resolved().map(|id| generator.element_reference(project, id));
                let data = match (&step.data, owner) {
                    (StepData::None, _) => None,
                    (StepData::Single(value), _) => Some(data_expr(generator, value)),
                    (StepData::PerDataSet(_), StepOwner::TestRoutine(routine)) => {
                        project.routine_param(routine, index).map(|param| DataExpr {
                            code: param.name.clone(),
                            literal: None,
                        })
                    }
                    (StepData::PerDataSet(_), StepOwner::TestCase) => None,
                };
                if matches!(&step.data, StepData::Single(DataValue::Environment(_))) {
                    rendered.uses_environment = true;
                }
                let params = ActionParams {
                    action,
                    element: element.as_deref(),
                    data: data.as_ref(),
                };
                let line = generator.render_action(&params).map_err(|e| e.at(&at))?;
                rendered.lines.push(line);
            }
            StepNode::RoutineCall(call) => {
                let Some(routine_id) = call.routine.resolved() else {
                    continue;
                };
                let routine = meta.routine(routine_id);
                let data_set = call.dataset.resolved().map(|id| meta.data_set(id).name.as_str());

                let mut args = Vec::new();
                for param in project.routine_params(routine_id) {
                    let value = match (&routine.steps[param.step_index], data_set) {
                        (StepNode::Action(step), Some(data_set)) => match &step.data {
                            StepData::PerDataSet(values) => values.get(data_set),
                            _ => None,
                        },
                        _ => None,
                    };
                    let value = value.ok_or_else(|| CodegenError::MissingDataSetValue {
                        routine: routine.name.clone(),
                        data_set: data_set.unwrap_or_default().to_string(),
                        location: at.clone(),
                    })?;
                    if matches!(value, DataValue::Environment(_)) {
                        rendered.uses_environment = true;
                    }
                    args.push(data_expr(generator, value));
                }
                rendered.routines.insert(routine_id);
                rendered.lines.push(generator.routine_invocation(project, routine_id, &args));
            }
        }
    }
    Ok(rendered)
}
