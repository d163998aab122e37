//! Action vocabulary available to regular test steps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of action a regular test step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionType {
    Check,
    Clear,
    Click,
    Delay,
    GoToUrl,
    Hover,
    Input,
    PressKey,
    RunCode,
    SelectOption,
    Uncheck,
    VerifyHasText,
    VerifyHasValue,
    VerifyIsEditable,
    VerifyIsHidden,
    VerifyIsReadOnly,
    VerifyIsVisible,
    VerifyTitle,
    VerifyTitleContains,
    VerifyUrl,
}

impl ActionType {
    pub const ALL: [ActionType; 20] = [
        ActionType::Check,
        ActionType::Clear,
        ActionType::Click,
        ActionType::Delay,
        ActionType::GoToUrl,
        ActionType::Hover,
        ActionType::Input,
        ActionType::PressKey,
        ActionType::RunCode,
        ActionType::SelectOption,
        ActionType::Uncheck,
        ActionType::VerifyHasText,
        ActionType::VerifyHasValue,
        ActionType::VerifyIsEditable,
        ActionType::VerifyIsHidden,
        ActionType::VerifyIsReadOnly,
        ActionType::VerifyIsVisible,
        ActionType::VerifyTitle,
        ActionType::VerifyTitleContains,
        ActionType::VerifyUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Check => "Check",
            ActionType::Clear => "Clear",
            ActionType::Click => "Click",
            ActionType::Delay => "Delay",
            ActionType::GoToUrl => "GoToUrl",
            ActionType::Hover => "Hover",
            ActionType::Input => "Input",
            ActionType::PressKey => "PressKey",
            ActionType::RunCode => "RunCode",
            ActionType::SelectOption => "SelectOption",
            ActionType::Uncheck => "Uncheck",
            ActionType::VerifyHasText => "VerifyHasText",
            ActionType::VerifyHasValue => "VerifyHasValue",
            ActionType::VerifyIsEditable => "VerifyIsEditable",
            ActionType::VerifyIsHidden => "VerifyIsHidden",
            ActionType::VerifyIsReadOnly => "VerifyIsReadOnly",
            ActionType::VerifyIsVisible => "VerifyIsVisible",
            ActionType::VerifyTitle => "VerifyTitle",
            ActionType::VerifyTitleContains => "VerifyTitleContains",
            ActionType::VerifyUrl => "VerifyUrl",
        }
    }

    /// Parse an action name as authored, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<ActionType> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_ignores_case() {
        assert_eq!(ActionType::from_name("GoToUrl"), Some(ActionType::GoToUrl));
        assert_eq!(ActionType::from_name("gotourl"), Some(ActionType::GoToUrl));
        assert_eq!(ActionType::from_name(" Input "), Some(ActionType::Input));
        assert_eq!(ActionType::from_name("Teleport"), None);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = ActionType::ALL.iter().map(|a| a.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ActionType::ALL.len());
    }
}
