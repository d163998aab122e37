//! Helper functions used during code generation: case conversion,
//! identifier sanitization, string-literal escaping and indentation.

use convert_case::{Case, Casing};
use regex::Regex;
use std::sync::OnceLock;

use crate::file_defs::{Indent, ProjectDef};

/// Convert a string to PascalCase
pub fn to_pascal_case(s: &str) -> String {
    s.to_case(Case::Pascal)
}

/// Convert a string to camelCase
pub fn to_camel_case(s: &str) -> String {
    s.to_case(Case::Camel)
}

/// Convert a string to kebab-case
pub fn to_kebab_case(s: &str) -> String {
    s.to_case(Case::Kebab)
}

fn non_word_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid regex"))
}

fn non_path_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\-]+").expect("valid regex"))
}

/// Casing applied to a sanitized identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierCase {
    Pascal,
    Camel,
}

/// Turn free text into a valid identifier
///
/// Characters outside `[A-Za-z0-9]` separate words, the words are re-cased,
/// a leading digit gets a `_` prefix and keywords get a `_` suffix. Never
/// returns an empty string.
pub fn sanitize_identifier(raw: &str, case: IdentifierCase, keywords: &[&str]) -> String {
    let words = non_word_chars().replace_all(raw, " ");
    let words = words.trim();
    let mut ident = match case {
        IdentifierCase::Pascal => to_pascal_case(words),
        IdentifierCase::Camel => to_camel_case(words),
    };

    if ident.is_empty() {
        ident = match case {
            IdentifierCase::Pascal => "Unnamed".to_string(),
            IdentifierCase::Camel => "unnamed".to_string(),
        };
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if keywords.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Make a single path segment safe for every common filesystem
pub fn sanitize_path_segment(raw: &str) -> String {
    let segment = non_path_chars().replace_all(raw.trim(), "_");
    let segment = segment.trim_matches('.');
    if segment.is_empty() {
        "_".to_string()
    } else {
        segment.to_string()
    }
}

/// Escape a string for use inside a C# regular string literal
pub fn escape_csharp_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Quoted C# string literal
pub fn csharp_string_literal(s: &str) -> String {
    format!("\"{}\"", escape_csharp_string(s))
}

/// Quoted TypeScript string literal
pub fn typescript_string_literal(s: &str) -> String {
    // JSON string syntax is valid JavaScript
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Escape a value for a double-quoted CSS attribute selector
pub fn escape_css_attribute_value(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape text placed inside an XML doc comment
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Non-empty trimmed lines of a description
pub fn description_lines(description: &str) -> Vec<&str> {
    description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Import path from one output file to another, both relative to the output root
///
/// Extensions are dropped (`pages/Login.ts` -> `../pages/Login`).
pub fn relative_module_path(from_file: &str, to_file: &str) -> String {
    let from_dir: Vec<&str> = {
        let mut parts: Vec<&str> = from_file.split('/').collect();
        parts.pop();
        parts
    };
    let to_parts: Vec<&str> = to_file.split('/').collect();

    let common = from_dir
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut segments: Vec<String> = Vec::new();
    for _ in common..from_dir.len() {
        segments.push("..".to_string());
    }
    for part in &to_parts[common..] {
        segments.push(part.to_string());
    }

    let mut path = segments.join("/");
    for ext in [".spec.ts", ".ts"] {
        if let Some(stripped) = path.strip_suffix(ext) {
            path = stripped.to_string();
            break;
        }
    }
    if path.starts_with("..") {
        path
    } else {
        format!("./{}", path)
    }
}

/// Indentation unit configured on the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indentation {
    unit: String,
}

impl Indentation {
    pub fn new(indent: Indent, size: usize) -> Self {
        let unit = match indent {
            Indent::Tabs => "\t".to_string(),
            Indent::Spaces => " ".repeat(size.max(1)),
        };
        Self { unit }
    }

    pub fn from_project(project: &ProjectDef) -> Self {
        Self::new(project.indent, project.indent_size)
    }

    /// Whitespace for the given nesting level
    pub fn at(&self, level: usize) -> String {
        self.unit.repeat(level)
    }

    /// Indent every non-empty line of `text` by `level`
    pub fn block(&self, text: &str, level: usize) -> String {
        let prefix = self.at(level);
        text.lines()
            .map(|line| {
                if line.trim().is_empty() {
                    String::new()
                } else {
                    format!("{}{}", prefix, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Indentation {
    fn default() -> Self {
        Self::new(Indent::Spaces, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversions() {
        assert_eq!(to_pascal_case("fills screen"), "FillsScreen");
        assert_eq!(to_camel_case("DataSet Number Two"), "dataSetNumberTwo");
        assert_eq!(to_kebab_case("My Project"), "my-project");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("fills", IdentifierCase::Pascal, &[]), "Fills");
        assert_eq!(sanitize_identifier("Log-in page!", IdentifierCase::Pascal, &[]), "LogInPage");
        assert_eq!(sanitize_identifier("2 factor", IdentifierCase::Camel, &[]), "_2Factor");
        assert_eq!(sanitize_identifier("class", IdentifierCase::Camel, &["class"]), "class_");
        assert_eq!(sanitize_identifier("***", IdentifierCase::Pascal, &[]), "Unnamed");
    }

    #[test]
    fn test_sanitize_path_segment() {
        assert_eq!(sanitize_path_segment("my folder"), "my_folder");
        assert_eq!(sanitize_path_segment(".."), "_");
        assert_eq!(sanitize_path_segment("qa-env.local"), "qa-env.local");
    }

    #[test]
    fn test_escape_csharp_string() {
        assert_eq!(escape_csharp_string("say \"hi\"\n"), "say \\\"hi\\\"\\n");
        assert_eq!(escape_csharp_string("C:\\temp"), "C:\\\\temp");
        assert_eq!(escape_csharp_string("\u{1}"), "\\u0001");
        assert_eq!(csharp_string_literal("John"), "\"John\"");
    }

    #[test]
    fn test_typescript_string_literal() {
        assert_eq!(typescript_string_literal("it's \"x\""), "\"it's \\\"x\\\"\"");
        assert_eq!(typescript_string_literal("a\nb"), "\"a\\nb\"");
    }

    #[test]
    fn test_relative_module_path() {
        assert_eq!(relative_module_path("tests/Fills.spec.ts", "test-cases/Fills.ts"), "../test-cases/Fills");
        assert_eq!(
            relative_module_path("test-cases/account/Login.ts", "support/page-definitions.ts"),
            "../../support/page-definitions"
        );
        assert_eq!(relative_module_path("pages/A.ts", "pages/B.ts"), "./B");
    }

    #[test]
    fn test_indentation() {
        let spaces = Indentation::new(Indent::Spaces, 2);
        assert_eq!(spaces.at(2), "    ");
        assert_eq!(spaces.block("a\n\nb", 1), "  a\n\n  b");

        let tabs = Indentation::new(Indent::Tabs, 4);
        assert_eq!(tabs.at(1), "\t");
    }
}
