//! Project validation: per-action validators and the whole-project pass.

pub mod action_validators;
pub mod project_validator;
pub mod report;

pub use action_validators::{ActionValidator, ActionValidatorRegistry, StepContext, StepOwner};
pub use project_validator::{validate_project, validate_project_with, ValidatedProject};
pub use report::{EntityKind, ValidationReport, Violation, ViolationKind};
