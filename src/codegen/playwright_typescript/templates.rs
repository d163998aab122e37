//! Source templates for pages, test cases, routines and suites (TypeScript).

use std::collections::BTreeMap;
use std::fmt::Write;

use super::PlaywrightTypescriptGenerator;
use crate::codegen::error::CodegenError;
use crate::codegen::generator::{render_steps, GeneratedFile, LocatorParams, RenderedSteps, TargetGenerator};
use crate::codegen::naming::NamedProject;
use crate::codegen::source_meta::{CaseId, ElementId, PageEntry, PageId, RoutineId, SuiteId};
use crate::codegen::utils::{description_lines, relative_module_path, typescript_string_literal, Indentation};
use crate::codegen::validation::StepOwner;

pub const PAGE_DEFINITIONS_PATH: &str = "support/page-definitions.ts";
pub const ENVIRONMENT_SETTINGS_PATH: &str = "support/environment-settings.ts";

/// `/** ... */` block, nothing for an empty description
pub fn write_jsdoc(out: &mut String, ind: &Indentation, level: usize, description: &str) -> std::fmt::Result {
    let lines = description_lines(description);
    if lines.is_empty() {
        return Ok(());
    }
    let prefix = ind.at(level);
    writeln!(out, "{}/**", prefix)?;
    for line in lines {
        writeln!(out, "{} * {}", prefix, line.replace("*/", "*\\/"))?;
    }
    writeln!(out, "{} */", prefix)
}

fn write_body(out: &mut String, ind: &Indentation, lines: &[String]) -> std::fmt::Result {
    for (i, line) in lines.iter().enumerate() {
        if i > 0 && line.starts_with("//") && !lines[i - 1].starts_with("//") {
            writeln!(out)?;
        }
        writeln!(out, "{}", ind.block(line, 2))?;
    }
    Ok(())
}

/// Imports shared by test cases and routines
fn write_step_imports(
    out: &mut String,
    project: &NamedProject,
    from: &str,
    steps: &RenderedSteps,
) -> std::fmt::Result {
    writeln!(out, "import {{ Page, expect }} from '@playwright/test';")?;
    writeln!(
        out,
        "import {{ PageDefinitions }} from '{}';",
        relative_module_path(from, PAGE_DEFINITIONS_PATH)
    )?;
    if steps.uses_environment {
        writeln!(
            out,
            "import {{ getEnvironmentVariable }} from '{}';",
            relative_module_path(from, ENVIRONMENT_SETTINGS_PATH)
        )?;
    }
    let routines: BTreeMap<&str, &str> = steps
        .routines
        .iter()
        .map(|id| {
            let info = project.routine(*id);
            (info.class_name.as_str(), info.output_file_rel_path.as_str())
        })
        .collect();
    for (class_name, path) in routines {
        writeln!(out, "import {{ {} }} from '{}';", class_name, relative_module_path(from, path))?;
    }
    Ok(())
}

fn write_step_constructor(out: &mut String, ind: &Indentation) -> std::fmt::Result {
    writeln!(out, "{}readonly defs: PageDefinitions;", ind.at(1))?;
    writeln!(out)?;
    writeln!(out, "{}constructor(readonly page: Page) {{", ind.at(1))?;
    writeln!(out, "{}this.defs = new PageDefinitions(page);", ind.at(2))?;
    writeln!(out, "{}}}", ind.at(1))
}

pub fn render_page(
    generator: &PlaywrightTypescriptGenerator,
    project: &NamedProject,
    id: PageId,
) -> Result<GeneratedFile, CodegenError> {
    let page = project.meta().page(id);
    let info = project.page(id);
    let ind = Indentation::from_project(project.project());
    let mut out = String::new();

    writeln!(out, "import {{ Page }} from '@playwright/test';")?;
    writeln!(out)?;
    write_jsdoc(&mut out, &ind, 0, &page.description)?;
    writeln!(out, "export class {} {{", info.class_name)?;
    writeln!(out, "{}constructor(readonly page: Page) {{}}", ind.at(1))?;

    for entry in &page.entries {
        match entry {
            PageEntry::Comment(text) => {
                writeln!(out)?;
                for line in text.lines() {
                    writeln!(out, "{}// {}", ind.at(1), line.trim())?;
                }
            }
            PageEntry::Element(index) => {
                let element = &page.elements[*index];
                let member = project.element_member(ElementId { page: id, index: *index });
                let anchor = element
                    .anchor
                    .map(|anchor| format!("this.{}", project.element_member(ElementId { page: id, index: anchor })));
                if element.locator_type.is_relative() && anchor.is_none() {
                    return Err(CodegenError::MissingAnchor {
                        page: page.name.clone(),
                        element: element.name.clone(),
                    });
                }
                let locator = generator
                    .render_locator(&LocatorParams {
                        locator_type: element.locator_type,
                        value: &element.locator,
                        anchor: anchor.as_deref(),
                    })
                    .map_err(|e| e.at(&format!("page '{}' element '{}'", page.name, element.name)))?;

                writeln!(out)?;
                write_jsdoc(&mut out, &ind, 1, &element.description)?;
                writeln!(out, "{}get {}() {{", ind.at(1), member)?;
                writeln!(out, "{}return {};", ind.at(2), locator)?;
                writeln!(out, "{}}}", ind.at(1))?;
            }
        }
    }
    writeln!(out, "}}")?;

    Ok(GeneratedFile::new(&info.output_file_rel_path, out))
}

pub fn render_test_case(
    generator: &PlaywrightTypescriptGenerator,
    project: &NamedProject,
    id: CaseId,
) -> Result<GeneratedFile, CodegenError> {
    let case = project.meta().test_case(id);
    let info = project.test_case(id);
    let ind = Indentation::from_project(project.project());
    let steps = render_steps(
        generator,
        project,
        &case.steps,
        StepOwner::TestCase,
        &format!("test case '{}'", case.name),
    )?;
    let mut out = String::new();

    write_step_imports(&mut out, project, &info.output_file_rel_path, &steps)?;
    writeln!(out)?;
    write_jsdoc(&mut out, &ind, 0, &case.description)?;
    writeln!(out, "export class {} {{", info.class_name)?;
    write_step_constructor(&mut out, &ind)?;
    writeln!(out)?;
    writeln!(out, "{}async run() {{", ind.at(1))?;
    write_body(&mut out, &ind, &steps.lines)?;
    writeln!(out, "{}}}", ind.at(1))?;
    writeln!(out, "}}")?;

    Ok(GeneratedFile::new(&info.output_file_rel_path, out))
}

pub fn render_test_routine(
    generator: &PlaywrightTypescriptGenerator,
    project: &NamedProject,
    id: RoutineId,
) -> Result<GeneratedFile, CodegenError> {
    let routine = project.meta().routine(id);
    let info = project.routine(id);
    let ind = Indentation::from_project(project.project());
    let steps = render_steps(
        generator,
        project,
        &routine.steps,
        StepOwner::TestRoutine(id),
        &format!("test routine '{}'", routine.name),
    )?;
    let params: Vec<String> = project
        .routine_params(id)
        .iter()
        .map(|param| format!("{}: string", param.name))
        .collect();
    let mut out = String::new();

    write_step_imports(&mut out, project, &info.output_file_rel_path, &steps)?;
    writeln!(out)?;
    write_jsdoc(&mut out, &ind, 0, &routine.description)?;
    writeln!(out, "export class {} {{", info.class_name)?;
    if !routine.data_sets.is_empty() {
        let names: Vec<String> = routine
            .data_sets
            .iter()
            .map(|ds| typescript_string_literal(&ds.name))
            .collect();
        writeln!(out, "{}static readonly dataSets = [{}] as const;", ind.at(1), names.join(", "))?;
        writeln!(out)?;
    }
    write_step_constructor(&mut out, &ind)?;
    writeln!(out)?;
    writeln!(out, "{}async run({}) {{", ind.at(1), params.join(", "))?;
    write_body(&mut out, &ind, &steps.lines)?;
    writeln!(out, "{}}}", ind.at(1))?;
    writeln!(out, "}}")?;

    Ok(GeneratedFile::new(&info.output_file_rel_path, out))
}

pub fn render_test_suite(
    _generator: &PlaywrightTypescriptGenerator,
    project: &NamedProject,
    id: SuiteId,
) -> Result<GeneratedFile, CodegenError> {
    let meta = project.meta();
    let suite = meta.suite(id);
    let info = project.suite(id);
    let ind = Indentation::from_project(project.project());
    let from = info.output_file_rel_path.as_str();
    let cases: Vec<CaseId> = suite.cases.iter().filter_map(|reference| reference.resolved()).collect();
    let mut out = String::new();

    writeln!(out, "import {{ test }} from '@playwright/test';")?;
    let imports: BTreeMap<&str, &str> = cases
        .iter()
        .map(|id| {
            let case_info = project.test_case(*id);
            (case_info.class_name.as_str(), case_info.output_file_rel_path.as_str())
        })
        .collect();
    for (class_name, path) in imports {
        writeln!(out, "import {{ {} }} from '{}';", class_name, relative_module_path(from, path))?;
    }
    writeln!(out)?;
    write_jsdoc(&mut out, &ind, 0, &suite.description)?;
    writeln!(out, "test.describe({}, () => {{", typescript_string_literal(&suite.name))?;

    for (i, (case_id, title)) in cases.iter().zip(project.suite_tests(id)).enumerate() {
        let case = meta.test_case(*case_id);
        let case_info = project.test_case(*case_id);
        if i > 0 {
            writeln!(out)?;
        }
        write_jsdoc(&mut out, &ind, 1, &case.description)?;
        writeln!(
            out,
            "{}test({}, async ({{ page }}) => {{",
            ind.at(1),
            typescript_string_literal(title)
        )?;
        writeln!(out, "{}await new {}(page).run();", ind.at(2), case_info.class_name)?;
        writeln!(out, "{}}});", ind.at(1))?;
    }
    writeln!(out, "}});")?;

    Ok(GeneratedFile::new(&info.output_file_rel_path, out))
}

pub fn render_environment_settings(project: &NamedProject) -> Result<GeneratedFile, CodegenError> {
    let ind = Indentation::from_project(project.project());
    let names: Vec<String> = project
        .meta()
        .environment_variables
        .iter()
        .map(|name| typescript_string_literal(name))
        .collect();
    let mut out = String::new();

    writeln!(out, "/** Variables declared by the project's environment files */")?;
    writeln!(out, "export const environmentVariableNames: readonly string[] = [{}];", names.join(", "))?;
    writeln!(out)?;
    writeln!(out, "export function getEnvironmentVariable(name: string): string {{")?;
    writeln!(out, "{}const value = process.env[name];", ind.at(1))?;
    writeln!(out, "{}if (value === undefined) {{", ind.at(1))?;
    writeln!(out, "{}throw new Error(`Environment variable '${{name}}' is not set`);", ind.at(2))?;
    writeln!(out, "{}}}", ind.at(1))?;
    writeln!(out, "{}return value;", ind.at(1))?;
    writeln!(out, "}}")?;

    Ok(GeneratedFile::new(ENVIRONMENT_SETTINGS_PATH, out))
}
