//! Test suite definition (`.tsuite`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestSuiteDef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Test case references: id, name or folder-relative path without extension
    #[serde(default)]
    pub testcases: Vec<String>,
}
