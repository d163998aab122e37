//! Source templates for pages, test cases, routines and suites (C#).

use std::fmt::Write;

use super::PlaywrightCSharpGenerator;
use crate::codegen::error::CodegenError;
use crate::codegen::generator::{render_steps, GeneratedFile, LocatorParams, TargetGenerator};
use crate::codegen::naming::NamedProject;
use crate::codegen::source_meta::{CaseId, ElementId, PageEntry, PageId, RoutineId, SuiteId};
use crate::codegen::target::Target;
use crate::codegen::utils::{csharp_string_literal, description_lines, escape_xml, Indentation};
use crate::codegen::validation::StepOwner;

/// `/// <summary>` block, nothing for an empty description
pub fn write_summary(out: &mut String, ind: &Indentation, level: usize, description: &str) -> std::fmt::Result {
    let lines = description_lines(description);
    if lines.is_empty() {
        return Ok(());
    }
    let prefix = ind.at(level);
    writeln!(out, "{}/// <summary>", prefix)?;
    for line in lines {
        writeln!(out, "{}/// {}", prefix, escape_xml(line))?;
    }
    writeln!(out, "{}/// </summary>", prefix)
}

fn write_constructor(out: &mut String, ind: &Indentation, class_name: &str) -> std::fmt::Result {
    writeln!(out, "{}public {}(IPage page) : base(page)", ind.at(1), class_name)?;
    writeln!(out, "{}{{", ind.at(1))?;
    writeln!(out, "{}}}", ind.at(1))
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

pub fn render_page(
    generator: &PlaywrightCSharpGenerator,
    project: &NamedProject,
    id: PageId,
) -> Result<GeneratedFile, CodegenError> {
    let page = project.meta().page(id);
    let info = project.page(id);
    let ind = Indentation::from_project(project.project());
    let mut out = String::new();

    writeln!(out, "namespace {};", info.full_namespace)?;
    writeln!(out)?;
    write_summary(&mut out, &ind, 0, &page.description)?;
    writeln!(out, "public partial class {} : PageBase", info.class_name)?;
    writeln!(out, "{{")?;
    write_constructor(&mut out, &ind, &info.class_name)?;

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
                    .map(|anchor| project.element_member(ElementId { page: id, index: anchor }));
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
                        anchor,
                    })
                    .map_err(|e| e.at(&format!("page '{}' element '{}'", page.name, element.name)))?;
                let locator_type = if element.locator_type.is_frame() {
                    "IFrameLocator"
                } else {
                    "ILocator"
                };

                writeln!(out)?;
                write_summary(&mut out, &ind, 1, &element.description)?;
                writeln!(out, "{}public {} {} => {};", ind.at(1), locator_type, member, locator)?;
            }
        }
    }
    writeln!(out, "}}")?;

    Ok(GeneratedFile::new(&info.output_file_rel_path, out))
}

pub fn render_test_case(
    generator: &PlaywrightCSharpGenerator,
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

    writeln!(out, "namespace {};", info.full_namespace)?;
    writeln!(out)?;
    write_summary(&mut out, &ind, 0, &case.description)?;
    writeln!(out, "public partial class {} : TestCaseBase", info.class_name)?;
    writeln!(out, "{{")?;
    write_constructor(&mut out, &ind, &info.class_name)?;
    writeln!(out)?;
    writeln!(out, "{}public async Task RunAsync()", ind.at(1))?;
    writeln!(out, "{}{{", ind.at(1))?;
    write_body(&mut out, &ind, &steps.lines)?;
    writeln!(out, "{}}}", ind.at(1))?;
    writeln!(out, "}}")?;

    Ok(GeneratedFile::new(&info.output_file_rel_path, out))
}

pub fn render_test_routine(
    generator: &PlaywrightCSharpGenerator,
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
        .map(|param| format!("string {}", param.name))
        .collect();
    let mut out = String::new();

    writeln!(out, "namespace {};", info.full_namespace)?;
    writeln!(out)?;
    write_summary(&mut out, &ind, 0, &routine.description)?;
    writeln!(out, "public partial class {} : TestRoutineBase", info.class_name)?;
    writeln!(out, "{{")?;
    if !routine.data_sets.is_empty() {
        let names: Vec<String> = routine.data_sets.iter().map(|ds| csharp_string_literal(&ds.name)).collect();
        writeln!(out, "{}public static readonly string[] DataSets = {{ {} }};", ind.at(1), names.join(", "))?;
        writeln!(out)?;
    }
    write_constructor(&mut out, &ind, &info.class_name)?;
    writeln!(out)?;
    writeln!(out, "{}public async Task RunAsync({})", ind.at(1), params.join(", "))?;
    writeln!(out, "{}{{", ind.at(1))?;
    write_body(&mut out, &ind, &steps.lines)?;
    writeln!(out, "{}}}", ind.at(1))?;
    writeln!(out, "}}")?;

    Ok(GeneratedFile::new(&info.output_file_rel_path, out))
}

pub fn render_test_suite(
    generator: &PlaywrightCSharpGenerator,
    project: &NamedProject,
    id: SuiteId,
) -> Result<GeneratedFile, CodegenError> {
    let meta = project.meta();
    let suite = meta.suite(id);
    let info = project.suite(id);
    let ind = Indentation::from_project(project.project());
    let (class_attribute, method_attribute) = match generator.target() {
        Target::PlaywrightCSharpNUnit => ("[TestFixture]", "[Test]"),
        _ => ("[TestClass]", "[TestMethod]"),
    };
    let mut out = String::new();

    writeln!(out, "namespace {};", info.full_namespace)?;
    writeln!(out)?;
    write_summary(&mut out, &ind, 0, &suite.description)?;
    writeln!(out, "{}", class_attribute)?;
    writeln!(out, "public partial class {} : TestSuiteBase", info.class_name)?;
    writeln!(out, "{{")?;

    let cases = suite.cases.iter().filter_map(|reference| reference.resolved());
    for (i, (case_id, method)) in cases.zip(project.suite_tests(id)).enumerate() {
        let case = meta.test_case(case_id);
        let case_info = project.test_case(case_id);
        if i > 0 {
            writeln!(out)?;
        }
        write_summary(&mut out, &ind, 1, &case.description)?;
        writeln!(out, "{}{}", ind.at(1), method_attribute)?;
        if let Some(first) = description_lines(&case.description).first() {
            writeln!(out, "{}[Description({})]", ind.at(1), csharp_string_literal(first))?;
        }
        writeln!(out, "{}public async Task {}()", ind.at(1), method)?;
        writeln!(out, "{}{{", ind.at(1))?;
        writeln!(
            out,
            "{}await new global::{}.{}(Page).RunAsync();",
            ind.at(2),
            case_info.full_namespace,
            case_info.class_name
        )?;
        writeln!(out, "{}}}", ind.at(1))?;
    }
    writeln!(out, "}}")?;

    Ok(GeneratedFile::new(&info.output_file_rel_path, out))
}

pub fn render_environment_settings(project: &NamedProject) -> Result<GeneratedFile, CodegenError> {
    let ind = Indentation::from_project(project.project());
    let names = &project.meta().environment_variables;
    let mut out = String::new();

    writeln!(out, "namespace {}.Support;", project.root_namespace())?;
    writeln!(out)?;
    writeln!(out, "public static class EnvironmentSettings")?;
    writeln!(out, "{{")?;
    writeln!(out, "{}/// <summary>", ind.at(1))?;
    writeln!(out, "{}/// Variables declared by the project's environment files", ind.at(1))?;
    writeln!(out, "{}/// </summary>", ind.at(1))?;
    if names.is_empty() {
        writeln!(out, "{}public static readonly IReadOnlyList<string> Names = Array.Empty<string>();", ind.at(1))?;
    } else {
        writeln!(out, "{}public static readonly IReadOnlyList<string> Names = new[]", ind.at(1))?;
        writeln!(out, "{}{{", ind.at(1))?;
        for name in names {
            writeln!(out, "{}{},", ind.at(2), csharp_string_literal(name))?;
        }
        writeln!(out, "{}}};", ind.at(1))?;
    }
    writeln!(out)?;
    writeln!(out, "{}public static string Get(string name)", ind.at(1))?;
    writeln!(out, "{}{{", ind.at(1))?;
    writeln!(out, "{}return Environment.GetEnvironmentVariable(name)", ind.at(2))?;
    writeln!(
        out,
        "{}?? throw new InvalidOperationException($\"Environment variable '{{name}}' is not set\");",
        ind.at(3)
    )?;
    writeln!(out, "{}}}", ind.at(1))?;
    writeln!(out, "}}")?;

    Ok(GeneratedFile::new("Support/EnvironmentSettings.cs", out))
}
