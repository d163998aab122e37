//! Project scaffold for Playwright .NET: build files, usings and support classes.

use std::fmt::Write;
use uuid::Uuid;

use crate::codegen::error::CodegenError;
use crate::codegen::generator::GeneratedFile;
use crate::codegen::naming::NamedProject;
use crate::codegen::target::Target;
use crate::codegen::utils::{csharp_string_literal, Indentation};

/// Project type GUID of SDK-style C# projects in solution files
const CSHARP_PROJECT_TYPE: &str = "9A19103F-16F7-4668-BE54-9A1E7A4F7556";

const PLAYWRIGHT_VERSION: &str = "1.44.0";
const TEST_SDK_VERSION: &str = "17.10.0";

/// Deterministic GUID derived from a name
pub fn stable_guid(name: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
        .to_string()
        .to_uppercase()
}

pub fn render_scaffold(target: Target, project: &NamedProject) -> Result<Vec<GeneratedFile>, CodegenError> {
    let root = project.root_namespace();
    Ok(vec![
        GeneratedFile::new(format!("{}.csproj", root), render_csproj(target, root)?),
        GeneratedFile::new(format!("{}.sln", root), render_sln(root)?),
        GeneratedFile::new(".runsettings", render_runsettings()?),
        GeneratedFile::new("Usings.cs", render_usings(target, root)?),
        GeneratedFile::new("Support/PageBase.cs", render_page_base(project)?),
        GeneratedFile::new("Support/TestCaseBase.cs", render_step_base(project, "TestCaseBase")?),
        GeneratedFile::new("Support/TestRoutineBase.cs", render_step_base(project, "TestRoutineBase")?),
        GeneratedFile::new("Support/TestSuiteBase.cs", render_suite_base(target, project)?),
        GeneratedFile::new("Support/PageDefinitions.cs", render_page_definitions(project)?),
    ])
}

fn render_csproj(target: Target, root: &str) -> Result<String, CodegenError> {
    let mut output = String::new();
    writeln!(output, "<Project Sdk=\"Microsoft.NET.Sdk\">")?;
    writeln!(output)?;
    writeln!(output, "  <PropertyGroup>")?;
    writeln!(output, "    <TargetFramework>net8.0</TargetFramework>")?;
    writeln!(output, "    <ImplicitUsings>enable</ImplicitUsings>")?;
    writeln!(output, "    <Nullable>enable</Nullable>")?;
    writeln!(output, "    <IsPackable>false</IsPackable>")?;
    writeln!(output, "    <IsTestProject>true</IsTestProject>")?;
    writeln!(output, "    <RootNamespace>{}</RootNamespace>", root)?;
    writeln!(output, "  </PropertyGroup>")?;
    writeln!(output)?;
    writeln!(output, "  <ItemGroup>")?;
    writeln!(output, "    <PackageReference Include=\"Microsoft.NET.Test.Sdk\" Version=\"{}\" />", TEST_SDK_VERSION)?;
    match target {
        Target::PlaywrightCSharpNUnit => {
            writeln!(output, "    <PackageReference Include=\"Microsoft.Playwright.NUnit\" Version=\"{}\" />", PLAYWRIGHT_VERSION)?;
            writeln!(output, "    <PackageReference Include=\"NUnit\" Version=\"3.14.0\" />")?;
            writeln!(output, "    <PackageReference Include=\"NUnit3TestAdapter\" Version=\"4.5.0\" />")?;
        }
        _ => {
            writeln!(output, "    <PackageReference Include=\"Microsoft.Playwright.MSTest\" Version=\"{}\" />", PLAYWRIGHT_VERSION)?;
            writeln!(output, "    <PackageReference Include=\"MSTest.TestAdapter\" Version=\"3.4.3\" />")?;
            writeln!(output, "    <PackageReference Include=\"MSTest.TestFramework\" Version=\"3.4.3\" />")?;
        }
    }
    writeln!(output, "  </ItemGroup>")?;
    writeln!(output)?;
    writeln!(output, "</Project>")?;
    Ok(output)
}

fn render_sln(root: &str) -> Result<String, CodegenError> {
    let project_guid = stable_guid(&format!("{}.csproj", root));
    let solution_guid = stable_guid(&format!("{}.sln", root));
    let mut output = String::new();

    writeln!(output)?;
    writeln!(output, "Microsoft Visual Studio Solution File, Format Version 12.00")?;
    writeln!(output, "# Visual Studio Version 17")?;
    writeln!(
        output,
        "Project(\"{{{}}}\") = \"{}\", \"{}.csproj\", \"{{{}}}\"",
        CSHARP_PROJECT_TYPE, root, root, project_guid
    )?;
    writeln!(output, "EndProject")?;
    writeln!(output, "Global")?;
    writeln!(output, "\tGlobalSection(SolutionConfigurationPlatforms) = preSolution")?;
    writeln!(output, "\t\tDebug|Any CPU = Debug|Any CPU")?;
    writeln!(output, "\t\tRelease|Any CPU = Release|Any CPU")?;
    writeln!(output, "\tEndGlobalSection")?;
    writeln!(output, "\tGlobalSection(ProjectConfigurationPlatforms) = postSolution")?;
    for config in ["Debug", "Release"] {
        writeln!(output, "\t\t{{{}}}.{}|Any CPU.ActiveCfg = {}|Any CPU", project_guid, config, config)?;
        writeln!(output, "\t\t{{{}}}.{}|Any CPU.Build.0 = {}|Any CPU", project_guid, config, config)?;
    }
    writeln!(output, "\tEndGlobalSection")?;
    writeln!(output, "\tGlobalSection(ExtensibilityGlobals) = postSolution")?;
    writeln!(output, "\t\tSolutionGuid = {{{}}}", solution_guid)?;
    writeln!(output, "\tEndGlobalSection")?;
    writeln!(output, "EndGlobal")?;
    Ok(output)
}

fn render_runsettings() -> Result<String, CodegenError> {
    let mut output = String::new();
    writeln!(output, "<?xml version=\"1.0\" encoding=\"utf-8\"?>")?;
    writeln!(output, "<RunSettings>")?;
    writeln!(output, "  <Playwright>")?;
    writeln!(output, "    <BrowserName>chromium</BrowserName>")?;
    writeln!(output, "    <LaunchOptions>")?;
    writeln!(output, "      <Headless>true</Headless>")?;
    writeln!(output, "    </LaunchOptions>")?;
    writeln!(output, "  </Playwright>")?;
    writeln!(output, "</RunSettings>")?;
    Ok(output)
}

fn render_usings(target: Target, root: &str) -> Result<String, CodegenError> {
    let (playwright, framework) = match target {
        Target::PlaywrightCSharpNUnit => ("Microsoft.Playwright.NUnit", "NUnit.Framework"),
        _ => ("Microsoft.Playwright.MSTest", "Microsoft.VisualStudio.TestTools.UnitTesting"),
    };
    let mut output = String::new();
    writeln!(output, "global using System.Text.RegularExpressions;")?;
    writeln!(output, "global using System.Threading.Tasks;")?;
    writeln!(output, "global using Microsoft.Playwright;")?;
    writeln!(output, "global using {};", playwright)?;
    writeln!(output, "global using {};", framework)?;
    writeln!(output, "global using static Microsoft.Playwright.Assertions;")?;
    writeln!(output, "global using {}.Support;", root)?;
    Ok(output)
}

fn render_page_base(project: &NamedProject) -> Result<String, CodegenError> {
    let ind = Indentation::from_project(project.project());
    let mut output = String::new();
    writeln!(output, "namespace {}.Support;", project.root_namespace())?;
    writeln!(output)?;
    writeln!(output, "public abstract class PageBase")?;
    writeln!(output, "{{")?;
    writeln!(output, "{}protected PageBase(IPage page)", ind.at(1))?;
    writeln!(output, "{}{{", ind.at(1))?;
    writeln!(output, "{}Page = page;", ind.at(2))?;
    writeln!(output, "{}}}", ind.at(1))?;
    writeln!(output)?;
    writeln!(output, "{}public IPage Page {{ get; }}", ind.at(1))?;
    writeln!(output, "}}")?;
    Ok(output)
}

/// Base of test cases and routines: the page plus its definitions
fn render_step_base(project: &NamedProject, class_name: &str) -> Result<String, CodegenError> {
    let ind = Indentation::from_project(project.project());
    let mut output = String::new();
    writeln!(output, "namespace {}.Support;", project.root_namespace())?;
    writeln!(output)?;
    writeln!(output, "public abstract class {}", class_name)?;
    writeln!(output, "{{")?;
    writeln!(output, "{}protected {}(IPage page)", ind.at(1), class_name)?;
    writeln!(output, "{}{{", ind.at(1))?;
    writeln!(output, "{}Page = page;", ind.at(2))?;
    writeln!(output, "{}Defs = new PageDefinitions(page);", ind.at(2))?;
    writeln!(output, "{}}}", ind.at(1))?;
    writeln!(output)?;
    writeln!(output, "{}public IPage Page {{ get; }}", ind.at(1))?;
    writeln!(output)?;
    writeln!(output, "{}public PageDefinitions Defs {{ get; }}", ind.at(1))?;
    writeln!(output, "}}")?;
    Ok(output)
}

fn render_suite_base(target: Target, project: &NamedProject) -> Result<String, CodegenError> {
    let ind = Indentation::from_project(project.project());
    let test_id_attribute = project.project().test_id_attribute_name.trim();
    let mut output = String::new();
    writeln!(output, "namespace {}.Support;", project.root_namespace())?;
    writeln!(output)?;
    writeln!(output, "public abstract class TestSuiteBase : PageTest")?;
    writeln!(output, "{{")?;
    if !test_id_attribute.is_empty() {
        let setup = match target {
            Target::PlaywrightCSharpNUnit => "[SetUp]",
            _ => "[TestInitialize]",
        };
        writeln!(output, "{}{}", ind.at(1), setup)?;
        writeln!(output, "{}public void ConfigureSelectors()", ind.at(1))?;
        writeln!(output, "{}{{", ind.at(1))?;
        writeln!(
            output,
            "{}Playwright.Selectors.SetTestIdAttribute({});",
            ind.at(2),
            csharp_string_literal(test_id_attribute)
        )?;
        writeln!(output, "{}}}", ind.at(1))?;
    }
    writeln!(output, "}}")?;
    Ok(output)
}

fn render_page_definitions(project: &NamedProject) -> Result<String, CodegenError> {
    let ind = Indentation::from_project(project.project());
    let meta = project.meta();
    let mut output = String::new();
    writeln!(output, "namespace {}.Support;", project.root_namespace())?;
    writeln!(output)?;
    writeln!(output, "public partial class PageDefinitions")?;
    writeln!(output, "{{")?;
    writeln!(output, "{}public PageDefinitions(IPage page)", ind.at(1))?;
    writeln!(output, "{}{{", ind.at(1))?;
    writeln!(output, "{}Page = page;", ind.at(2))?;
    writeln!(output, "{}}}", ind.at(1))?;
    writeln!(output)?;
    writeln!(output, "{}public IPage Page {{ get; }}", ind.at(1))?;
    for id in meta.page_ids() {
        let info = project.page(id);
        writeln!(output)?;
        writeln!(
            output,
            "{}public global::{}.{} {} => new(Page);",
            ind.at(1),
            info.full_namespace,
            info.class_name,
            project.page_property(id)
        )?;
    }
    writeln!(output, "}}")?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_guid() {
        assert_eq!(stable_guid("Demo.csproj"), stable_guid("Demo.csproj"));
        assert_ne!(stable_guid("Demo.csproj"), stable_guid("Demo.sln"));
        assert_eq!(stable_guid("x").len(), 36);
    }
}
