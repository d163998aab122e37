//! Selector strings shared by every Playwright target.

use crate::codegen::utils::escape_css_attribute_value;

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// `name=value` -> `[name="value"]`, `name` -> `[name]`
pub fn attribute_selector(value: &str) -> String {
    match value.split_once('=') {
        Some((name, val)) => format!(
            "[{}=\"{}\"]",
            name.trim(),
            escape_css_attribute_value(unquote(val))
        ),
        None => format!("[{}]", value.trim()),
    }
}

pub fn name_selector(value: &str) -> String {
    format!("[name=\"{}\"]", escape_css_attribute_value(value.trim()))
}

pub fn id_selector(value: &str) -> String {
    format!("id={}", value.trim().trim_start_matches('#'))
}

pub fn xpath_selector(value: &str) -> String {
    let value = value.trim();
    if value.starts_with("xpath=") {
        value.to_string()
    } else {
        format!("xpath={}", value)
    }
}

pub fn frame_id_selector(value: &str) -> String {
    format!("iframe[id=\"{}\"]", escape_css_attribute_value(value.trim()))
}

pub fn frame_name_selector(value: &str) -> String {
    format!("iframe[name=\"{}\"]", escape_css_attribute_value(value.trim()))
}
