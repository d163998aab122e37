//! Project scaffold for the Playwright test runner: package manifest,
//! compiler and runner configuration plus the page definitions hub.

use std::fmt::Write;

use serde_json::json;

use super::templates::PAGE_DEFINITIONS_PATH;
use crate::codegen::error::CodegenError;
use crate::codegen::generator::GeneratedFile;
use crate::codegen::naming::NamedProject;
use crate::codegen::utils::{relative_module_path, to_kebab_case, typescript_string_literal, Indentation};

const PLAYWRIGHT_VERSION: &str = "^1.44.0";
const TYPESCRIPT_VERSION: &str = "^5.4.5";
const NODE_TYPES_VERSION: &str = "^20.12.12";

pub fn render_scaffold(project: &NamedProject) -> Result<Vec<GeneratedFile>, CodegenError> {
    Ok(vec![
        GeneratedFile::new("package.json", render_package_json(project)?),
        GeneratedFile::new("tsconfig.json", render_tsconfig()?),
        GeneratedFile::new("playwright.config.ts", render_playwright_config(project)?),
        GeneratedFile::new(PAGE_DEFINITIONS_PATH, render_page_definitions(project)?),
    ])
}

fn pretty(value: &serde_json::Value) -> Result<String, CodegenError> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

fn render_package_json(project: &NamedProject) -> Result<String, CodegenError> {
    let name = to_kebab_case(project.root_namespace()).to_lowercase();
    pretty(&json!({
        "name": name,
        "version": "1.0.0",
        "private": true,
        "scripts": {
            "test": "playwright test"
        },
        "devDependencies": {
            "@playwright/test": PLAYWRIGHT_VERSION,
            "@types/node": NODE_TYPES_VERSION,
            "typescript": TYPESCRIPT_VERSION
        }
    }))
}

fn render_tsconfig() -> Result<String, CodegenError> {
    pretty(&json!({
        "compilerOptions": {
            "target": "ES2022",
            "module": "commonjs",
            "strict": true,
            "esModuleInterop": true,
            "skipLibCheck": true,
            "forceConsistentCasingInFileNames": true
        }
    }))
}

fn render_playwright_config(project: &NamedProject) -> Result<String, CodegenError> {
    let ind = Indentation::from_project(project.project());
    let test_id_attribute = project.project().test_id_attribute_name.trim();
    let mut output = String::new();
    writeln!(output, "import {{ defineConfig, devices }} from '@playwright/test';")?;
    writeln!(output)?;
    writeln!(output, "export default defineConfig({{")?;
    writeln!(output, "{}testDir: './tests',", ind.at(1))?;
    writeln!(output, "{}fullyParallel: true,", ind.at(1))?;
    writeln!(output, "{}reporter: 'html',", ind.at(1))?;
    writeln!(output, "{}use: {{", ind.at(1))?;
    writeln!(output, "{}trace: 'on-first-retry',", ind.at(2))?;
    if !test_id_attribute.is_empty() {
        writeln!(output, "{}testIdAttribute: {},", ind.at(2), typescript_string_literal(test_id_attribute))?;
    }
    writeln!(output, "{}}},", ind.at(1))?;
    writeln!(output, "{}projects: [", ind.at(1))?;
    writeln!(output, "{}{{ name: 'chromium', use: {{ ...devices['Desktop Chrome'] }} }},", ind.at(2))?;
    writeln!(output, "{}],", ind.at(1))?;
    writeln!(output, "}});")?;
    Ok(output)
}

fn render_page_definitions(project: &NamedProject) -> Result<String, CodegenError> {
    let ind = Indentation::from_project(project.project());
    let meta = project.meta();
    let mut output = String::new();
    writeln!(output, "import {{ Page }} from '@playwright/test';")?;
    for id in meta.page_ids() {
        let info = project.page(id);
        writeln!(
            output,
            "import {{ {} }} from '{}';",
            info.class_name,
            relative_module_path(PAGE_DEFINITIONS_PATH, &info.output_file_rel_path)
        )?;
    }
    writeln!(output)?;
    writeln!(output, "export class PageDefinitions {{")?;
    writeln!(output, "{}constructor(readonly page: Page) {{}}", ind.at(1))?;
    for id in meta.page_ids() {
        writeln!(output)?;
        writeln!(output, "{}get {}() {{", ind.at(1), project.page_property(id))?;
        writeln!(output, "{}return new {}(this.page);", ind.at(2), project.page(id).class_name)?;
        writeln!(output, "{}}}", ind.at(1))?;
    }
    writeln!(output, "}}")?;
    Ok(output)
}
