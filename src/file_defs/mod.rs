//! File definitions for an authored test project.
//!
//! These types mirror the on-disk shape of every project file (`.rmproj`,
//! `.page`, `.tcase`, `.troutine`, `.tsuite`, `.env`). They are plain data:
//! cross references are still strings here and get resolved by
//! [`crate::codegen::source_meta`].

pub mod action;
pub mod environment;
pub mod file_def;
pub mod locator;
pub mod page;
pub mod project;
pub mod routine;
pub mod suite;
pub mod test_case;

pub use action::ActionType;
pub use environment::EnvironmentDef;
pub use file_def::{FileDef, SourceFiles};
pub use locator::LocatorType;
pub use page::{CommentDef, PageDef, PageElementDef, PageEntryDef};
pub use project::{
    AutomationFramework, Indent, Language, ProjectDef, StandardFileExtension, StandardFolder,
    StandardOutputFile, TestFramework,
};
pub use routine::{DataSetDef, TestRoutineDef};
pub use suite::TestSuiteDef;
pub use test_case::{ActionStepDef, RawStepData, RoutineStepDef, ScalarValue, StepDef, TestCaseDef};
