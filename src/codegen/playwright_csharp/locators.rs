//! Locator dispatch table for Playwright .NET.

use crate::codegen::error::CodegenError;
use crate::codegen::generator::{LocatorParams, LocatorRenderer};
use crate::codegen::selectors::{
    attribute_selector, frame_id_selector, frame_name_selector, id_selector, name_selector, xpath_selector,
};
use crate::codegen::utils::csharp_string_literal;
use crate::file_defs::LocatorType;

pub const LOCATORS: &[(LocatorType, LocatorRenderer)] = &[
    (LocatorType::Attribute, attribute),
    (LocatorType::Code, code),
    (LocatorType::Css, css),
    (LocatorType::IFrame, iframe),
    (LocatorType::IFrameId, iframe_id),
    (LocatorType::IFrameName, iframe_name),
    (LocatorType::Id, id),
    (LocatorType::Label, label),
    (LocatorType::Name, name),
    (LocatorType::Placeholder, placeholder),
    (LocatorType::RelativeCss, relative_css),
    (LocatorType::RelativeXpath, relative_xpath),
    (LocatorType::TestId, test_id),
    (LocatorType::Text, text),
    (LocatorType::Title, title),
    (LocatorType::Xpath, xpath),
];

fn page_call(method: &str, argument: &str) -> Result<String, CodegenError> {
    Ok(format!("Page.{}({})", method, csharp_string_literal(argument)))
}

fn anchor<'a>(p: &LocatorParams<'a>) -> Result<&'a str, CodegenError> {
    p.anchor.ok_or_else(|| CodegenError::MissingAnchor {
        page: String::new(),
        element: p.value.to_string(),
    })
}

fn attribute(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("Locator", &attribute_selector(p.value))
}

/// The value is a C# expression evaluating to a locator
fn code(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    Ok(p.value.trim().trim_end_matches(';').to_string())
}

fn css(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("Locator", p.value.trim())
}

fn iframe(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("FrameLocator", p.value.trim())
}

fn iframe_id(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("FrameLocator", &frame_id_selector(p.value))
}

fn iframe_name(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("FrameLocator", &frame_name_selector(p.value))
}

fn id(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("Locator", &id_selector(p.value))
}

fn label(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("GetByLabel", p.value)
}

fn name(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("Locator", &name_selector(p.value))
}

fn placeholder(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("GetByPlaceholder", p.value)
}

fn relative_css(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("{}.Locator({})", anchor(p)?, csharp_string_literal(p.value.trim())))
}

fn relative_xpath(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("{}.Locator({})", anchor(p)?, csharp_string_literal(&xpath_selector(p.value))))
}

fn test_id(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("GetByTestId", p.value)
}

fn text(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("GetByText", p.value)
}

fn title(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("GetByTitle", p.value)
}

fn xpath(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("Locator", &xpath_selector(p.value))
}
