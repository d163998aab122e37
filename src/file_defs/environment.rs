//! Environment definition (`.env` under `config/`)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered variable set of one environment file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentDef {
    pub variables: IndexMap<String, String>,
}

impl EnvironmentDef {
    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            variables: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
