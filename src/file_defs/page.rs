//! Page definition (`.page`)

use serde::{Deserialize, Serialize};

use super::locator::LocatorType;

/// Free-text comment entry, allowed in pages and step lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentDef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub comment: String,
}

/// One locatable element of a page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElementDef {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub find_by: LocatorType,
    #[serde(default)]
    pub locator: String,
    #[serde(default)]
    pub description: String,
}

/// Entry in a page's element list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageEntryDef {
    #[serde(rename = "pageElement")]
    Element(PageElementDef),
    #[serde(rename = "comment")]
    Comment(CommentDef),
}

/// Page content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageDef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub elements: Vec<PageEntryDef>,
}

impl PageElementDef {
    pub fn new(name: impl Into<String>, find_by: LocatorType, locator: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            find_by,
            locator: locator.into(),
            description: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_with_comment() {
        let json = r#"{
            "id": "",
            "name": "FillsScreen",
            "description": "Fills page",
            "elements": [
                { "id": "", "type": "pageElement", "name": "name", "findBy": "Css", "locator": "[name='name']", "description": "Name" },
                { "id": "", "type": "comment", "comment": "address block" }
            ]
        }"#;
        let page: PageDef = serde_json::from_str(json).unwrap();

        assert_eq!(page.elements.len(), 2);
        match &page.elements[0] {
            PageEntryDef::Element(element) => {
                assert_eq!(element.find_by, LocatorType::Css);
                assert_eq!(element.locator, "[name='name']");
            }
            other => panic!("expected element, got {:?}", other),
        }
        assert!(matches!(page.elements[1], PageEntryDef::Comment(_)));
    }
}
