//! Locator kinds, matching the Playwright ways of finding an element.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a page element is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocatorType {
    Attribute,
    Code,
    Css,
    IFrame,
    IFrameId,
    IFrameName,
    Id,
    Label,
    Name,
    Placeholder,
    RelativeCss,
    RelativeXpath,
    TestId,
    Text,
    Title,
    Xpath,
}

impl LocatorType {
    pub const ALL: [LocatorType; 16] = [
        LocatorType::Attribute,
        LocatorType::Code,
        LocatorType::Css,
        LocatorType::IFrame,
        LocatorType::IFrameId,
        LocatorType::IFrameName,
        LocatorType::Id,
        LocatorType::Label,
        LocatorType::Name,
        LocatorType::Placeholder,
        LocatorType::RelativeCss,
        LocatorType::RelativeXpath,
        LocatorType::TestId,
        LocatorType::Text,
        LocatorType::Title,
        LocatorType::Xpath,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorType::Attribute => "Attribute",
            LocatorType::Code => "Code",
            LocatorType::Css => "Css",
            LocatorType::IFrame => "IFrame",
            LocatorType::IFrameId => "IFrameId",
            LocatorType::IFrameName => "IFrameName",
            LocatorType::Id => "Id",
            LocatorType::Label => "Label",
            LocatorType::Name => "Name",
            LocatorType::Placeholder => "Placeholder",
            LocatorType::RelativeCss => "RelativeCss",
            LocatorType::RelativeXpath => "RelativeXpath",
            LocatorType::TestId => "TestId",
            LocatorType::Text => "Text",
            LocatorType::Title => "Title",
            LocatorType::Xpath => "Xpath",
        }
    }

    /// Locates a frame rather than an element
    pub fn is_frame(&self) -> bool {
        matches!(
            self,
            LocatorType::IFrame | LocatorType::IFrameId | LocatorType::IFrameName
        )
    }

    /// Locates inside the closest preceding element of the same page
    pub fn is_relative(&self) -> bool {
        matches!(self, LocatorType::RelativeCss | LocatorType::RelativeXpath)
    }
}

impl fmt::Display for LocatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
