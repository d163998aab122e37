//! Action dispatch table for Playwright .NET.

use crate::codegen::error::CodegenError;
use crate::codegen::generator::{ActionParams, ActionRenderer, DataExpr};
use crate::file_defs::ActionType;

pub const ACTIONS: &[(ActionType, ActionRenderer)] = &[
    (ActionType::Check, check),
    (ActionType::Clear, clear),
    (ActionType::Click, click),
    (ActionType::Delay, delay),
    (ActionType::GoToUrl, go_to_url),
    (ActionType::Hover, hover),
    (ActionType::Input, input),
    (ActionType::PressKey, press_key),
    (ActionType::RunCode, run_code),
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
    Ok(format!("await Expect({}).{}();", p.require_element()?, assertion))
}

fn check(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call(p, "CheckAsync")
}

fn clear(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call(p, "ClearAsync")
}

fn click(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call(p, "ClickAsync")
}

fn hover(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call(p, "HoverAsync")
}

fn uncheck(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call(p, "UncheckAsync")
}

fn input(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call_with_data(p, "FillAsync")
}

fn press_key(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call_with_data(p, "PressAsync")
}

fn select_option(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    element_call_with_data(p, "SelectOptionAsync")
}

/// Milliseconds as an `int` expression
pub fn milliseconds(data: &DataExpr, parse: &str) -> String {
    match data.literal.as_deref().and_then(|text| text.trim().parse::<f64>().ok()) {
        Some(ms) => format!("{}", ms.round() as i64),
        None => format!("{}({})", parse, data.code),
    }
}

fn delay(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("await Task.Delay({});", milliseconds(p.require_data()?, "int.Parse")))
}

fn go_to_url(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("await Page.GotoAsync({});", p.require_data()?.code))
}

fn run_code(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    match p.require_data()?.literal.as_deref() {
        Some(code) => Ok(code.trim().to_string()),
        None => Err(CodegenError::MissingActionInput {
            action: p.action,
            input: "literal code",
        }),
    }
}

fn verify_has_text(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!(
        "await Expect({}).ToHaveTextAsync({});",
        p.require_element()?,
        p.require_data()?.code
    ))
}

fn verify_has_value(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!(
        "await Expect({}).ToHaveValueAsync({});",
        p.require_element()?,
        p.require_data()?.code
    ))
}

fn verify_is_editable(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    expect_element(p, "ToBeEditableAsync")
}

fn verify_is_hidden(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    expect_element(p, "ToBeHiddenAsync")
}

fn verify_is_read_only(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    expect_element(p, "Not.ToBeEditableAsync")
}

fn verify_is_visible(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    expect_element(p, "ToBeVisibleAsync")
}

fn verify_title(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("await Expect(Page).ToHaveTitleAsync({});", p.require_data()?.code))
}

fn verify_title_contains(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!(
        "await Expect(Page).ToHaveTitleAsync(new Regex(Regex.Escape({})));",
        p.require_data()?.code
    ))
}

fn verify_url(p: &ActionParams<'_>) -> Result<String, CodegenError> {
    Ok(format!("await Expect(Page).ToHaveURLAsync({});", p.require_data()?.code))
}
