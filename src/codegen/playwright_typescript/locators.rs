//! Locator dispatch table for the Playwright test runner (TypeScript).

use crate::codegen::error::CodegenError;
use crate::codegen::generator::{LocatorParams, LocatorRenderer};
use crate::codegen::selectors::{
    attribute_selector, frame_id_selector, frame_name_selector, id_selector, name_selector, xpath_selector,
};
use crate::codegen::utils::typescript_string_literal;
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
    Ok(format!("this.page.{}({})", method, typescript_string_literal(argument)))
}

fn anchor<'a>(p: &LocatorParams<'a>) -> Result<&'a str, CodegenError> {
    p.anchor.ok_or_else(|| CodegenError::MissingAnchor {
        page: String::new(),
        element: p.value.to_string(),
    })
}

fn attribute(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("locator", &attribute_selector(p.value))
}

/// The value is a TypeScript expression evaluating to a locator
fn code(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    Ok(p.value.trim().trim_end_matches(';').to_string())
}

fn css(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("locator", p.value.trim())
}

fn iframe(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("frameLocator", p.value.trim())
}

fn iframe_id(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("frameLocator", &frame_id_selector(p.value))
}

fn iframe_name(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("frameLocator", &frame_name_selector(p.value))
}

fn id(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("locator", &id_selector(p.value))
}

fn label(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("getByLabel", p.value)
}

fn name(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("locator", &name_selector(p.value))
}

fn placeholder(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("getByPlaceholder", p.value)
}

fn relative_css(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("{}.locator({})", anchor(p)?, typescript_string_literal(p.value.trim())))
}

fn relative_xpath(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("{}.locator({})", anchor(p)?, typescript_string_literal(&xpath_selector(p.value))))
}

fn test_id(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("getByTestId", p.value)
}

fn text(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("getByText", p.value)
}

fn title(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("getByTitle", p.value)
}

fn xpath(p: &LocatorParams<'_>) -> Result<String, CodegenError> {
    page_call("locator", &xpath_selector(p.value))
}
