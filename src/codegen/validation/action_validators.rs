//! Per-action validators and the registry that selects them per target.
//!
//! Each action kind maps to the list of checks its step must pass. The
//! registry a project is validated with depends on its target: the .NET
//! registry extends the common one with `RunCode`.

use std::collections::HashMap;

use super::report::{EntityKind, Violation, ViolationKind};
use crate::codegen::source_meta::{
    ActionStep, DataValue, Reference, RoutineId, SourceProjectMetadata, StepData,
};
use crate::codegen::target::Target;
use crate::file_defs::ActionType;

/// Where a step lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOwner {
    TestCase,
    TestRoutine(RoutineId),
}

/// Everything a validator may look at besides the step itself
pub struct StepContext<'a> {
    pub meta: &'a SourceProjectMetadata,
    pub owner: StepOwner,
    pub entity_name: &'a str,
    pub file_path: String,
    pub step_index: usize,
}

impl StepContext<'_> {
    fn entity_kind(&self) -> EntityKind {
        match self.owner {
            StepOwner::TestCase => EntityKind::TestCase,
            StepOwner::TestRoutine(_) => EntityKind::TestRoutine,
        }
    }

    fn violation(&self, kind: ViolationKind, message: String) -> Violation {
        Violation {
            kind,
            entity_kind: self.entity_kind(),
            entity_name: self.entity_name.to_string(),
            file_path: self.file_path.clone(),
            step_index: Some(self.step_index),
            message,
        }
    }

    pub fn reference_error(&self, message: impl Into<String>) -> Violation {
        self.violation(ViolationKind::ReferenceError, message.into())
    }

    pub fn validation_error(&self, message: impl Into<String>) -> Violation {
        self.violation(ViolationKind::ValidationError, message.into())
    }
}

/// A check applied to every step of one action kind
pub trait ActionValidator: Send + Sync {
    fn validate(&self, step: &ActionStep, ctx: &StepContext<'_>) -> Vec<Violation>;
}

impl<F> ActionValidator for F
where
    F: Fn(&ActionStep, &StepContext<'_>) -> Vec<Violation> + Send + Sync,
{
    fn validate(&self, step: &ActionStep, ctx: &StepContext<'_>) -> Vec<Violation> {
        self(step, ctx)
    }
}

/// Action kind -> validators
pub struct ActionValidatorRegistry {
    validators: HashMap<ActionType, Vec<Box<dyn ActionValidator>>>,
}

const ELEMENT_ACTIONS: [ActionType; 9] = [
    ActionType::Check,
    ActionType::Clear,
    ActionType::Click,
    ActionType::Hover,
    ActionType::Uncheck,
    ActionType::VerifyIsEditable,
    ActionType::VerifyIsHidden,
    ActionType::VerifyIsReadOnly,
    ActionType::VerifyIsVisible,
];

const ELEMENT_DATA_ACTIONS: [ActionType; 5] = [
    ActionType::Input,
    ActionType::PressKey,
    ActionType::SelectOption,
    ActionType::VerifyHasText,
    ActionType::VerifyHasValue,
];

const DATA_ACTIONS: [ActionType; 4] = [
    ActionType::GoToUrl,
    ActionType::VerifyTitle,
    ActionType::VerifyTitleContains,
    ActionType::VerifyUrl,
];

impl ActionValidatorRegistry {
    /// Registry with no actions
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Actions every target supports
    pub fn common() -> Self {
        let mut registry = Self::empty();
        for action in ELEMENT_ACTIONS {
            registry.register(action, Box::new(require_page_and_element));
        }
        for action in ELEMENT_DATA_ACTIONS {
            registry.register(action, Box::new(require_page_and_element));
            registry.register(action, Box::new(require_data));
        }
        for action in DATA_ACTIONS {
            registry.register(action, Box::new(require_data));
        }
        registry.register(ActionType::Delay, Box::new(require_data));
        registry.register(ActionType::Delay, Box::new(require_numeric_data));
        registry
    }

    /// Common actions plus the .NET only ones
    pub fn dotnet() -> Self {
        let mut registry = Self::common();
        registry.register(ActionType::RunCode, Box::new(require_data));
        registry.register(ActionType::RunCode, Box::new(require_literal_data));
        registry
    }

    pub fn for_target(target: Target) -> Self {
        if target.is_dotnet() {
            Self::dotnet()
        } else {
            Self::common()
        }
    }

    /// Append a validator for an action kind, registering the kind if new
    pub fn register(&mut self, action: ActionType, validator: Box<dyn ActionValidator>) {
        self.validators.entry(action).or_default().push(validator);
    }

    pub fn supports(&self, action: ActionType) -> bool {
        self.validators.contains_key(&action)
    }

    /// Supported actions in declaration order
    pub fn actions(&self) -> Vec<ActionType> {
        ActionType::ALL
            .iter()
            .copied()
            .filter(|action| self.supports(*action))
            .collect()
    }

    /// Run every validator of the step's action; `None` when unsupported
    pub fn validate(&self, action: ActionType, step: &ActionStep, ctx: &StepContext<'_>) -> Option<Vec<Violation>> {
        let validators = self.validators.get(&action)?;
        Some(
            validators
                .iter()
                .flat_map(|validator| validator.validate(step, ctx))
                .collect(),
        )
    }
}

impl Default for ActionValidatorRegistry {
    fn default() -> Self {
        Self::common()
    }
}

/// The step needs a resolved page and a resolved, non-frame element
pub fn require_page_and_element(step: &ActionStep, ctx: &StepContext<'_>) -> Vec<Violation> {
    let action = &step.action_name;
    let page_id = match &step.page {
        Reference::Resolved(id) => *id,
        Reference::Absent => {
            return vec![ctx.validation_error(format!("Action '{}' requires a page", action))]
        }
        Reference::Unresolved(name) => {
            return vec![ctx.reference_error(format!("Page '{}' not found", name))]
        }
        Reference::Ambiguous(name) => {
            return vec![ctx.reference_error(format!(
                "Page name '{}' matches more than one page; use its id or path",
                name
            ))]
        }
        Reference::Dependent(_) => return Vec::new(),
    };
    let page = ctx.meta.page(page_id);

    match &step.element {
        Reference::Resolved(id) => {
            let element = ctx.meta.element(*id);
            if element.locator_type.is_frame() {
                vec![ctx.validation_error(format!(
                    "Element '{}' locates a frame and cannot be the target of action '{}'",
                    element.name, action
                ))]
            } else {
                Vec::new()
            }
        }
        Reference::Absent => vec![ctx.validation_error(format!("Action '{}' requires an element", action))],
        Reference::Unresolved(name) => vec![ctx.reference_error(format!(
            "Element '{}' not found on page '{}'",
            name, page.name
        ))],
        Reference::Ambiguous(name) => vec![ctx.reference_error(format!(
            "Element name '{}' matches more than one element on page '{}'",
            name, page.name
        ))],
        Reference::Dependent(_) => Vec::new(),
    }
}

fn check_environment_value(value: &DataValue, ctx: &StepContext<'_>) -> Option<Violation> {
    match value {
        DataValue::Environment(name) if !ctx.meta.environment_variables.contains(name) => Some(
            ctx.reference_error(format!("Environment variable '{}' is not defined in any environment file", name)),
        ),
        _ => None,
    }
}

/// The step needs data; per-dataset data must cover exactly the routine's datasets
pub fn require_data(step: &ActionStep, ctx: &StepContext<'_>) -> Vec<Violation> {
    let action = &step.action_name;
    match &step.data {
        StepData::None => vec![ctx.validation_error(format!("Action '{}' requires data", action))],
        StepData::Single(value) => check_environment_value(value, ctx).into_iter().collect(),
        StepData::PerDataSet(values) => {
            let routine_id = match ctx.owner {
                StepOwner::TestCase => {
                    return vec![ctx.validation_error(
                        "Data per dataset is only allowed in test routines".to_string(),
                    )]
                }
                StepOwner::TestRoutine(id) => id,
            };
            let routine = ctx.meta.routine(routine_id);
            if values.is_empty() {
                return vec![ctx.validation_error(format!("Action '{}' requires data", action))];
            }

            let mut violations = Vec::new();
            for data_set in &routine.data_sets {
                if !values.contains_key(&data_set.name) {
                    violations.push(ctx.validation_error(format!(
                        "Missing data for dataset '{}'",
                        data_set.name
                    )));
                }
            }
            for (name, value) in values {
                if !routine.data_sets.iter().any(|ds| &ds.name == name) {
                    violations.push(ctx.reference_error(format!(
                        "Dataset '{}' not found in routine '{}'",
                        name, routine.name
                    )));
                }
                violations.extend(check_environment_value(value, ctx));
            }
            violations
        }
    }
}

fn literal_values(data: &StepData) -> Vec<&str> {
    match data {
        StepData::None => Vec::new(),
        StepData::Single(DataValue::Literal(text)) => vec![text.as_str()],
        StepData::Single(DataValue::Environment(_)) => Vec::new(),
        StepData::PerDataSet(values) => values
            .values()
            .filter_map(|value| match value {
                DataValue::Literal(text) => Some(text.as_str()),
                DataValue::Environment(_) => None,
            })
            .collect(),
    }
}

/// Largest delay the generated code can pass on (a 32-bit signed int)
pub const MAX_DELAY_MS: f64 = i32::MAX as f64;

fn is_delay(text: &str) -> bool {
    text.trim()
        .parse::<f64>()
        .map(|ms| ms.is_finite() && ms >= 0.0 && ms.round() <= MAX_DELAY_MS)
        .unwrap_or(false)
}

/// Literal delays must be a number of milliseconds that fits an `int`
pub fn require_numeric_data(step: &ActionStep, ctx: &StepContext<'_>) -> Vec<Violation> {
    literal_values(&step.data)
        .into_iter()
        .filter(|text| !is_delay(text))
        .map(|text| {
            ctx.validation_error(format!(
                "Action '{}' expects a number of milliseconds between 0 and {}, got '{}'",
                step.action_name,
                i32::MAX,
                text
            ))
        })
        .collect()
}

/// Code to run is written in the step itself, as one literal
pub fn require_literal_data(step: &ActionStep, ctx: &StepContext<'_>) -> Vec<Violation> {
    match &step.data {
        StepData::Single(DataValue::Environment(_)) => vec![ctx.validation_error(format!(
            "Action '{}' cannot take its data from an environment variable",
            step.action_name
        ))],
        StepData::PerDataSet(_) => vec![ctx.validation_error(format!(
            "Action '{}' takes a single literal, not data per dataset",
            step.action_name
        ))],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runcode_is_dotnet_only() {
        assert!(!ActionValidatorRegistry::common().supports(ActionType::RunCode));
        assert!(ActionValidatorRegistry::dotnet().supports(ActionType::RunCode));
        assert!(ActionValidatorRegistry::for_target(Target::PlaywrightCSharpNUnit).supports(ActionType::RunCode));
        assert!(!ActionValidatorRegistry::for_target(Target::PlaywrightTypescript).supports(ActionType::RunCode));
    }

    #[test]
    fn test_common_registry_covers_everything_else() {
        let actions = ActionValidatorRegistry::common().actions();
        assert_eq!(actions.len(), ActionType::ALL.len() - 1);
    }

    fn reject_all(_step: &ActionStep, ctx: &StepContext<'_>) -> Vec<Violation> {
        vec![ctx.validation_error("nope")]
    }

    #[test]
    fn test_register_custom_validator() {
        let mut registry = ActionValidatorRegistry::empty();
        registry.register(ActionType::Click, Box::new(reject_all));
        assert!(registry.supports(ActionType::Click));
        assert_eq!(registry.actions(), vec![ActionType::Click]);
    }
}
