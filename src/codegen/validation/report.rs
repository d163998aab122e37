//! Violations and the aggregated validation report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad class of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A reference to a page, element, routine, dataset, test case or
    /// environment variable does not resolve
    ReferenceError,
    /// A structural precondition is not met
    ValidationError,
}

/// Kind of entity a violation is reported on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Project,
    Page,
    TestCase,
    TestRoutine,
    TestSuite,
    Environment,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::ReferenceError => write!(f, "ReferenceError"),
            ViolationKind::ValidationError => write!(f, "ValidationError"),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Project => "Project",
            EntityKind::Page => "Page",
            EntityKind::TestCase => "Test case",
            EntityKind::TestRoutine => "Test routine",
            EntityKind::TestSuite => "Test suite",
            EntityKind::Environment => "Environment",
        };
        write!(f, "{}", s)
    }
}

/// One problem found in the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub kind: ViolationKind,
    pub entity_kind: EntityKind,
    pub entity_name: String,
    /// Path of the entity's file relative to its standard folder
    pub file_path: String,
    /// Zero-based position of the offending step (or element, or suite entry)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_index: Option<usize>,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} '{}' ({})",
            self.kind, self.entity_kind, self.entity_name, self.file_path
        )?;
        if let Some(index) = self.step_index {
            write!(f, " step {}", index + 1)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Every violation found in one validation pass, in traversal order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// An empty report means the project is safe to generate
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} problem(s):", self.violations.len())?;
        for violation in &self.violations {
            writeln!(f, "  {}", violation)?;
        }
        Ok(())
    }
}

impl Extend<Violation> for ValidationReport {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.violations.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display_is_one_based() {
        let violation = Violation {
            kind: ViolationKind::ReferenceError,
            entity_kind: EntityKind::TestCase,
            entity_name: "fills".to_string(),
            file_path: "fills.tcase".to_string(),
            step_index: Some(0),
            message: "Page 'Missing' not found".to_string(),
        };
        assert_eq!(
            violation.to_string(),
            "[ReferenceError] Test case 'fills' (fills.tcase) step 1: Page 'Missing' not found"
        );
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let mut report = ValidationReport::new();
        report.push(Violation {
            kind: ViolationKind::ValidationError,
            entity_kind: EntityKind::Page,
            entity_name: "Login".to_string(),
            file_path: "Login.page".to_string(),
            step_index: None,
            message: "Element name 'x' is used more than once".to_string(),
        });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["violations"][0]["entityKind"], "Page");
        assert!(json["violations"][0].get("stepIndex").is_none());
        assert_eq!(report.count(ViolationKind::ValidationError), 1);
    }
}
