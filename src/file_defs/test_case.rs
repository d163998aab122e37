//! Test case definition (`.tcase`) and the step shapes shared with routines.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::page::CommentDef;

/// Scalar as authored in a data field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl ScalarValue {
    pub fn to_text(&self) -> String {
        match self {
            ScalarValue::Text(s) => s.clone(),
            ScalarValue::Integer(i) => i.to_string(),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::Bool(b) => b.to_string(),
        }
    }
}

/// Raw `data` payload of a regular step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStepData {
    /// One value used wherever the step runs
    Single(ScalarValue),
    /// Dataset name -> value, only meaningful inside a routine
    PerDataSet(IndexMap<String, ScalarValue>),
}

/// Regular step: one action against an optional page element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionStepDef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub element: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub data: Option<RawStepData>,
}

/// Step invoking a routine with one of its datasets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutineStepDef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub routine: String,
    #[serde(default)]
    pub dataset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StepDef {
    #[serde(rename = "testStep")]
    Action(ActionStepDef),
    #[serde(rename = "routine")]
    Routine(RoutineStepDef),
    #[serde(rename = "comment")]
    Comment(CommentDef),
}

/// Test case content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCaseDef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<StepDef>,
}

impl StepDef {
    /// Regular step with a single literal value (empty strings mean "no data")
    pub fn action(page: &str, element: &str, action: &str, data: &str) -> Self {
        StepDef::Action(ActionStepDef {
            id: String::new(),
            page: page.to_string(),
            element: element.to_string(),
            action: action.to_string(),
            data: Some(RawStepData::Single(ScalarValue::Text(data.to_string()))),
        })
    }

    /// Regular step carrying one value per dataset
    pub fn action_per_dataset(page: &str, element: &str, action: &str, data: &[(&str, &str)]) -> Self {
        let values = data
            .iter()
            .map(|(dataset, value)| (dataset.to_string(), ScalarValue::Text(value.to_string())))
            .collect();
        StepDef::Action(ActionStepDef {
            id: String::new(),
            page: page.to_string(),
            element: element.to_string(),
            action: action.to_string(),
            data: Some(RawStepData::PerDataSet(values)),
        })
    }

    pub fn routine(routine: &str, dataset: &str) -> Self {
        StepDef::Routine(RoutineStepDef {
            id: String::new(),
            routine: routine.to_string(),
            dataset: dataset.to_string(),
        })
    }

    pub fn comment(text: &str) -> Self {
        StepDef::Comment(CommentDef {
            id: String::new(),
            comment: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_step_kinds() {
        let json = r#"[
            { "id": "", "type": "testStep", "page": "", "element": "", "action": "Delay", "data": 2000 },
            { "id": "", "type": "routine", "routine": "FillName", "dataset": "DataSet Number Two" },
            { "id": "", "type": "testStep", "page": "FillsScreen", "element": "name", "action": "Input",
              "data": { "DataSet Number One": "John", "DataSet Number Two": "Jane" } },
            { "id": "", "type": "comment", "comment": "done" }
        ]"#;
        let steps: Vec<StepDef> = serde_json::from_str(json).unwrap();

        match &steps[0] {
            StepDef::Action(step) => {
                assert_eq!(step.data, Some(RawStepData::Single(ScalarValue::Integer(2000))));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&steps[1], StepDef::Routine(r) if r.dataset == "DataSet Number Two"));
        match &steps[2] {
            StepDef::Action(step) => match &step.data {
                Some(RawStepData::PerDataSet(map)) => {
                    let keys: Vec<&String> = map.keys().collect();
                    assert_eq!(keys, vec!["DataSet Number One", "DataSet Number Two"]);
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&steps[3], StepDef::Comment(c) if c.comment == "done"));
    }
}
