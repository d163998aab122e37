//! Test routine definition (`.troutine`)

use serde::{Deserialize, Serialize};

use super::test_case::StepDef;

/// Named set of values a routine can be invoked with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSetDef {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRoutineDef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<StepDef>,
    #[serde(default)]
    pub data_sets: Vec<DataSetDef>,
}

impl DataSetDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            description: String::new(),
        }
    }
}
