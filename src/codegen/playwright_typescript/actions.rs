//! Action dispatch table for the Playwright test runner (TypeScript).

use crate::codegen::error::CodegenError;
use crate::codegen::generator::{ActionParams, ActionRenderer};
use crate::codegen::utils::typescript_string_literal;
use crate::file_defs::ActionType;

/// `RunCode` carries C# source and has no entry here
pub const ACTIONS: &[(ActionType, ActionRenderer)] = &[
    (ActionType::Check, check),
    (ActionType::Clear, clear),
    (ActionType::Click, click),
    (ActionType::Delay, delay),
    (ActionType::GoToUrl, go_to_url),
    (ActionType::Hover, hover),
    (ActionType::Input, input),
    (ActionType::PressKey, press_key),
    (ActionType::SelectOption, select_option),
    (ActionType::Uncheck, uncheck),
    (ActionType::VerifyHasText, verify_has_text),
    (ActionType::VerifyHasValue, verify_has_value),
    (ActionType::VerifyIsEditable, verify_is_editable),
    (ActionType::VerifyIsHidden, verify_is_hidden),
    (ActionType::VerifyIsReadOnly, verify_is_read_only),
    (ActionType::VerifyIsVisible, verify_is_visible),
    (ActionType::VerifyTitle, verify_title),
    (ActionType::VerifyTitleContains, verify_title_contains),
    (ActionType::VerifyUrl, verify_url),
];

fn element_call(p: &ActionParams<'_>, method: &str) -> Result<String, CodegenError> {
    Ok(format!("await {}.{}();", p.require_element()?, method))
}

fn element_call_with_data(p: &ActionParams<'_>, method: &str) -> Result<String, CodegenError> {
    Ok(format!("await {}.{}({});", p.require_element()?, method, p.require_data()?.code))
}

fn expect_element(p: &ActionParams<'_>, assertion: &str) -> Result<String, CodegenError> {
    Ok(format!("await expect({}).{}();", p.require_element()?, assertion))
}

fn check(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call(p, "check")
}

fn clear(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call(p, "clear")
}

fn click(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call(p, "click")
}

fn hover(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call(p, "hover")
}

fn uncheck(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call(p, "uncheck")
}

fn input(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call_with_data(p, "fill")
}

fn press_key(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call_with_data(p, "press")
}

fn select_option(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call_with_data(p, "selectOption")
}

fn delay(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    let data = p.require_data()?;
    let ms = match data.literal.as_deref().and_then(|text| text.trim().parse::<f64>().ok()) {
        Some(ms) => format!("{}", ms.round() as i64),
        None => format!("Number({})", data.code),
    };
    Ok(format!("await this.page.waitForTimeout({});", ms))
}

fn go_to_url(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("await this.page.goto({});", p.require_data()?.code))
}

fn verify_has_text(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!(
        "await expect({}).toHaveText({});",
        p.require_element()?,
        p.require_data()?.code
    ))
}

fn verify_has_value(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!(
        "await expect({}).toHaveValue({});",
        p.require_element()?,
        p.require_data()?.code
    ))
}

fn verify_is_editable(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    expect_element(p, "toBeEditable")
}

fn verify_is_hidden(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    expect_element(p, "toBeHidden")
}

fn verify_is_read_only(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    expect_element(p, "not.toBeEditable")
}

fn verify_is_visible(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    expect_element(p, "toBeVisible")
}

fn verify_title(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("await expect(this.page).toHaveTitle({});", p.require_data()?.code))
}

fn verify_title_contains(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    let data = p.require_data()?;
    let pattern = match data.literal.as_deref() {
        Some(text) => typescript_string_literal(&regex::escape(text)),
        None => format!("{}.replace(/[.*+?^${{}}()|[\\]\\\\]/g, '\\\\$&')", data.code),
    };
    Ok(format!("await expect(this.page).toHaveTitle(new RegExp({}));", pattern))
}

fn verify_url(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("await expect(this.page).toHaveURL({});", p.require_data()?.code))
}
