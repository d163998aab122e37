//! # qagen: test project code generator
//!
//! qagen turns a declarative test-automation project (pages with locatable
//! elements, test cases, parametrized test routines, suites and environment
//! files) into a runnable Playwright project in C# (MSTest or NUnit) or
//! TypeScript.
//!
//! ## Example project layout
//!
//! ```text
//! shop/
//!   shop.rmproj
//!   page-definitions/account/Login.page
//!   test-cases/Login.tcase
//!   test-routines/FillName.troutine
//!   test-suites/Smoke.tsuite
//!   config/local.env
//!   custom-code/
//! ```
//!
//! ## Example: generating from code
//!
//! ```ignore
//! use qagen::codegen::{generate_project, LogProgressSink};
//!
//! let outcome = generate_project(Path::new("shop"), &LogProgressSink).await?;
//! assert!(outcome.success, "{}", outcome.message);
//! ```

// Project file definitions
pub mod file_defs;

// Metadata, validation, naming and target generators
pub mod codegen;

pub use codegen::{
    CodegenError, CodegenOrchestrator, CodegenOutcome, CodegenState, GeneratorOptions, LoadError,
    OutputProjectMetadata, ProgressEvent, ProgressPhase, ProgressSink, Target, ValidationReport,
};
pub use file_defs::{FileDef, ProjectDef, SourceFiles};
