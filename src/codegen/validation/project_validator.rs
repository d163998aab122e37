//! Whole-project validation.
//!
//! Walks pages, test cases, routines, suites and environments in graph order
//! and collects every violation. Nothing here stops at the first problem.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use super::action_validators::{ActionValidatorRegistry, StepContext, StepOwner};
use super::report::{EntityKind, ValidationReport, Violation, ViolationKind};
use crate::codegen::source_meta::{
    PageNode, Reference, RoutineCallStep, SourceFileInfo, SourceProjectMetadata, StepNode,
};
use crate::codegen::target::Target;

/// A project graph that passed validation with an empty report
///
/// Only [`validate_project`] constructs one, so generators can rely on every
/// reference being resolved.
#[derive(Debug, Clone)]
pub struct ValidatedProject {
    meta: SourceProjectMetadata,
    target: Target,
}

impl ValidatedProject {
    pub fn meta(&self) -> &SourceProjectMetadata {
        &self.meta
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn into_meta(self) -> SourceProjectMetadata {
        self.meta
    }
}

fn environment_variable_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
}

/// Validate with the registry of the project's target
pub fn validate_project(meta: SourceProjectMetadata) -> Result<ValidatedProject, ValidationReport> {
    let registry = match meta.target() {
        Ok(target) => ActionValidatorRegistry::for_target(target),
        Err(_) => ActionValidatorRegistry::common(),
    };
    let report = validate_project_with(&meta, &registry);

    match meta.target() {
        Ok(target) if report.is_empty() => Ok(ValidatedProject { meta, target }),
        _ => Err(report),
    }
}

/// Validate against an explicit registry and return the full report
pub fn validate_project_with(meta: &SourceProjectMetadata, registry: &ActionValidatorRegistry) -> ValidationReport {
    let mut report = ValidationReport::new();

    if let Err(e) = meta.target() {
        report.push(Violation {
            kind: ViolationKind::ValidationError,
            entity_kind: EntityKind::Project,
            entity_name: meta.project_name(),
            file_path: meta.project_file.rel_path(),
            step_index: None,
            message: e.to_string(),
        });
    }

    for page in &meta.pages {
        validate_page(page, &mut report);
    }

    for case in &meta.test_cases {
        validate_steps(
            meta,
            registry,
            StepOwner::TestCase,
            &case.name,
            &case.file,
            &case.steps,
            &mut report,
        );
    }

    for (routine_id, routine) in meta.routine_ids().zip(&meta.routines) {
        let mut seen = HashSet::new();
        for data_set in &routine.data_sets {
            if !seen.insert(data_set.name.as_str()) {
                report.push(entity_violation(
                    EntityKind::TestRoutine,
                    &routine.name,
                    &routine.file,
                    None,
                    format!("Dataset name '{}' is used more than once", data_set.name),
                ));
            }
        }
        validate_steps(
            meta,
            registry,
            StepOwner::TestRoutine(routine_id),
            &routine.name,
            &routine.file,
            &routine.steps,
            &mut report,
        );
    }

    for suite in &meta.suites {
        let mut seen = HashSet::new();
        for (index, reference) in suite.cases.iter().enumerate() {
            let message = match reference {
                Reference::Resolved(case_id) => {
                    if seen.insert(*case_id) {
                        continue;
                    }
                    (
                        ViolationKind::ValidationError,
                        format!("Test case '{}' is listed more than once", meta.test_case(*case_id).name),
                    )
                }
                Reference::Absent => (ViolationKind::ValidationError, "Empty test case reference".to_string()),
                Reference::Unresolved(name) | Reference::Dependent(name) => {
                    (ViolationKind::ReferenceError, format!("Test case '{}' not found", name))
                }
                Reference::Ambiguous(name) => (
                    ViolationKind::ReferenceError,
                    format!("Test case name '{}' matches more than one test case; use its id or path", name),
                ),
            };
            report.push(Violation {
                kind: message.0,
                entity_kind: EntityKind::TestSuite,
                entity_name: suite.name.clone(),
                file_path: suite.file.rel_path(),
                step_index: Some(index),
                message: message.1,
            });
        }
    }

    for env in &meta.environments {
        for name in env.variables.keys() {
            if !environment_variable_name().is_match(name) {
                report.push(entity_violation(
                    EntityKind::Environment,
                    &env.name,
                    &env.file,
                    None,
                    format!("'{}' is not a valid environment variable name", name),
                ));
            }
        }
    }

    if report.is_empty() {
        tracing::debug!("Project validation passed");
    } else {
        tracing::debug!(
            violations = report.len(),
            reference_errors = report.count(ViolationKind::ReferenceError),
            "Project validation failed"
        );
    }
    report
}

fn entity_violation(
    entity_kind: EntityKind,
    name: &str,
    file: &SourceFileInfo,
    index: Option<usize>,
    message: String,
) -> Violation {
    Violation {
        kind: ViolationKind::ValidationError,
        entity_kind,
        entity_name: name.to_string(),
        file_path: file.rel_path(),
        step_index: index,
        message,
    }
}

fn validate_page(page: &PageNode, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for (index, element) in page.elements.iter().enumerate() {
        let mut problem = |message: String| {
            report.push(entity_violation(EntityKind::Page, &page.name, &page.file, Some(index), message))
        };
        if element.name.is_empty() {
            problem("Element has no name".to_string());
        } else if !seen.insert(element.name.as_str()) {
            problem(format!("Element name '{}' is used more than once", element.name));
        }
        if element.locator.trim().is_empty() {
            problem(format!("Element '{}' has an empty locator", element.name));
        }
        if element.locator_type.is_relative() && element.anchor.is_none() {
            problem(format!(
                "Element '{}' uses a relative locator but no element precedes it",
                element.name
            ));
        }
    }
}

fn validate_steps(
    meta: &SourceProjectMetadata,
    registry: &ActionValidatorRegistry,
    owner: StepOwner,
    entity_name: &str,
    file: &SourceFileInfo,
    steps: &[StepNode],
    report: &mut ValidationReport,
) {
    for (step_index, step) in steps.iter().enumerate() {
        let ctx = StepContext {
            meta,
            owner,
            entity_name,
            file_path: file.rel_path(),
            step_index,
        };
        match step {
            StepNode::Action(action_step) => match action_step.action {
                None => report.push(ctx.validation_error(format!("Unknown action '{}'", action_step.action_name))),
                Some(action) => match registry.validate(action, action_step, &ctx) {
                    Some(violations) => report.extend(violations),
                    None => {
                        let target = meta
                            .target()
                            .map(|t| t.to_string())
                            .unwrap_or_else(|_| "of this project".to_string());
                        report.push(ctx.validation_error(format!(
                            "Action '{}' is not supported by target {}",
                            action, target
                        )))
                    }
                },
            },
            StepNode::RoutineCall(call) => match owner {
                StepOwner::TestCase => validate_routine_call(call, &ctx, report),
                StepOwner::TestRoutine(_) => {
                    report.push(ctx.validation_error("Test routines cannot call other routines"))
                }
            },
            StepNode::Comment(_) => {}
        }
    }
}

fn validate_routine_call(call: &RoutineCallStep, ctx: &StepContext<'_>, report: &mut ValidationReport) {
    let routine_id = match &call.routine {
        Reference::Resolved(id) => *id,
        Reference::Absent => return report.push(ctx.validation_error("Routine step requires a routine")),
        Reference::Unresolved(name) | Reference::Dependent(name) => {
            return report.push(ctx.reference_error(format!("Test routine '{}' not found", name)))
        }
        Reference::Ambiguous(name) => {
            return report.push(ctx.reference_error(format!(
                "Test routine name '{}' matches more than one routine; use its id or path",
                name
            )))
        }
    };
    let routine = ctx.meta.routine(routine_id);

    match &call.dataset {
        Reference::Resolved(_) | Reference::Dependent(_) => {}
        Reference::Absent if routine.data_sets.is_empty() => {}
        Reference::Absent => report.push(ctx.validation_error(format!(
            "Routine '{}' has datasets; the step must select one",
            routine.name
        ))),
        Reference::Unresolved(name) => report.push(ctx.reference_error(format!(
            "Dataset '{}' not found in routine '{}'",
            name, routine.name
        ))),
        Reference::Ambiguous(name) => report.push(ctx.reference_error(format!(
            "Dataset name '{}' matches more than one dataset of routine '{}'",
            name, routine.name
        ))),
    }
}
