//! Rendering tests for both Playwright targets

mod common;

use common::{demo_project, file};
use qagen::codegen::generator::{create_generator, ActionParams, DataExpr, LocatorParams, TargetGenerator};
use qagen::codegen::naming::NamedProject;
use qagen::codegen::options::ScriptFlavor;
use qagen::codegen::source_meta::SourceProjectMetadata;
use qagen::codegen::validation::validate_project;
use qagen::codegen::{CodegenError, GeneratedFile, Target};
use qagen::file_defs::{ActionType, Language, LocatorType, TestFramework};

fn generate(language: Language, test_framework: Option<TestFramework>) -> (NamedProject, Vec<GeneratedFile>) {
    let files = demo_project(std::path::Path::new("/tmp/demo"), language, test_framework);
    let validated = validate_project(SourceProjectMetadata::build(&files)).expect("fixture is valid");
    let project = NamedProject::resolve(validated, ScriptFlavor::Sh).unwrap();
    let generated = create_generator(project.target()).generate_all(&project).unwrap();
    (project, generated)
}

#[test]
fn test_render_totality() {
    for target in Target::ALL {
        let generator = create_generator(target);
        let data = DataExpr {
            code: generator.string_literal("250"),
            literal: Some("250".to_string()),
        };
        let supported = generator.supported_actions();
        for action in ActionType::ALL {
            let params = ActionParams {
                action,
                element: Some("element"),
                data: Some(&data),
            };
            let rendered = generator.render_action(&params);
            if supported.contains(&action) {
                assert!(!rendered.unwrap().is_empty(), "{} on {}", action, target);
            } else {
                assert!(
                    matches!(rendered, Err(CodegenError::UnsupportedAction { .. })),
                    "{} on {}",
                    action,
                    target
                );
            }
        }
        for locator_type in LocatorType::ALL {
            let params = LocatorParams {
                locator_type,
                value: "field",
                anchor: Some("anchor"),
            };
            assert!(!generator.render_locator(&params).unwrap().is_empty());
        }
    }
}

#[test]
fn test_scenario_a_input_action_csharp() {
    let (_, files) = generate(Language::CSharp, None);
    let case = file(&files, "TestCases/Fills.cs");
    assert!(case.contains("namespace Demo.TestCases;"));
    assert!(case.contains("public partial class Fills : TestCaseBase"));
    assert!(case.contains("        await Defs.FillsScreen.Name.FillAsync(\"John\");"));
    assert!(case.contains("        // verify"));
    assert!(case.contains("await Defs.FillsScreen.Submit.ClickAsync();"));

    let page = file(&files, "Pages/FillsScreen.cs");
    assert!(page.contains("public ILocator Name => Page.Locator(\"[name='name']\");"));
    assert!(page.contains("public ILocator Bio => Page.GetByLabel(\"Bio\");"));
    assert!(page.contains("/// Form with the fields to fill"));
}

#[test]
fn test_scenario_c_dataset_threaded_to_call_site() {
    let (_, files) = generate(Language::CSharp, None);
    let case = file(&files, "TestCases/Fills.cs");
    assert!(case.contains("await new global::Demo.TestRoutines.FillName(Page).RunAsync(\"Jane\");"));
    assert!(case.contains(
        "await new global::Demo.TestRoutines.FillDistrictAndBio(Page).RunAsync(EnvironmentSettings.Get(\"DISTRICT\"), \"Short bio\");"
    ));

    let routine = file(&files, "TestRoutines/FillName.cs");
    assert!(routine.contains("public static readonly string[] DataSets = { \"DataSet Number One\", \"DataSet Number Two\" };"));
    assert!(routine.contains("public async Task RunAsync(string nameData)"));
    assert!(routine.contains("await Defs.FillsScreen.Name.FillAsync(nameData);"));

    let (_, ts_files) = generate(Language::Typescript, None);
    let ts_case = file(&ts_files, "test-cases/fills.ts");
    assert!(ts_case.contains("await new FillName(this.page).run(\"Jane\");"));
    assert!(ts_case.contains("import { FillName } from '../test-routines/fill-name';"));
}

#[test]
fn test_csharp_scaffold_and_suite() {
    let (_, files) = generate(Language::CSharp, Some(TestFramework::NUnit));
    let paths: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
    for expected in [
        "Demo.csproj",
        "Demo.sln",
        ".runsettings",
        "Usings.cs",
        "Support/PageDefinitions.cs",
        "Support/EnvironmentSettings.cs",
        "TestSuites/Regression.cs",
        ".environments/run.local.env.sh",
    ] {
        assert!(paths.contains(&expected), "missing {}", expected);
    }

    assert!(file(&files, "Demo.csproj").contains("Microsoft.Playwright.NUnit"));
    let suite = file(&files, "TestSuites/Regression.cs");
    assert!(suite.contains("[TestFixture]"));
    assert!(suite.contains("    [Test]"));
    assert!(suite.contains("[Description(\"Fills every field\")]"));
    assert!(suite.contains("await new global::Demo.TestCases.Fills(Page).RunAsync();"));

    assert!(file(&files, "Support/TestSuiteBase.cs").contains("SetTestIdAttribute(\"data-qa\")"));
    assert!(file(&files, "Support/PageDefinitions.cs")
        .contains("public global::Demo.Pages.FillsScreen FillsScreen => new(Page);"));
    let settings = file(&files, "Support/EnvironmentSettings.cs");
    assert!(settings.contains("\"BASE_URL\","));
    assert!(settings.contains("\"DISTRICT\","));

    let script = file(&files, ".environments/run.local.env.sh");
    assert!(script.starts_with("#!/bin/sh"));
    assert!(script.contains("export DISTRICT='Central'"));
    assert!(script.contains("dotnet test --settings .runsettings"));
}

#[test]
fn test_typescript_project() {
    let (project, files) = generate(Language::Typescript, None);
    assert_eq!(project.target(), Target::PlaywrightTypescript);

    let page = file(&files, "pages/fills-screen.ts");
    assert!(page.contains("export class FillsScreen {"));
    assert!(page.contains("    get name() {\n        return this.page.locator(\"[name='name']\");\n    }"));
    assert!(page.contains("return this.page.getByTestId(\"submit\");"));

    let case = file(&files, "test-cases/fills.ts");
    assert!(case.contains("import { PageDefinitions } from '../support/page-definitions';"));
    assert!(case.contains("import { getEnvironmentVariable } from '../support/environment-settings';"));
    assert!(case.contains("await this.defs.fillsScreen.name.fill(\"John\");"));
    assert!(case.contains(
        "await new FillDistrictAndBio(this.page).run(getEnvironmentVariable(\"DISTRICT\"), \"Short bio\");"
    ));

    let routine = file(&files, "test-routines/fill-district-and-bio.ts");
    assert!(routine.contains("async run(districtData: string, bioData: string) {"));
    assert!(routine.contains("await this.defs.fillsScreen.district.fill(districtData);"));

    let suite = file(&files, "tests/regression.spec.ts");
    assert!(suite.contains("import { Fills } from '../test-cases/fills';"));
    assert!(suite.contains("test.describe(\"Regression\", () => {"));
    assert!(suite.contains("    test(\"fills\", async ({ page }) => {\n        await new Fills(page).run();\n    });"));

    let config = file(&files, "playwright.config.ts");
    assert!(config.contains("testDir: './tests',"));
    assert!(config.contains("testIdAttribute: \"data-qa\","));

    let package: serde_json::Value = serde_json::from_str(file(&files, "package.json")).unwrap();
    assert_eq!(package["name"], "demo");
    assert!(package["devDependencies"]["@playwright/test"].is_string());

    assert!(file(&files, "support/page-definitions.ts").contains("import { FillsScreen } from '../pages/fills-screen';"));
    assert!(file(&files, ".environments/run.local.env.sh").contains("npx playwright test"));
}

#[test]
fn test_unique_output_paths() {
    for language in [Language::CSharp, Language::Typescript] {
        let (_, files) = generate(language, None);
        let mut paths: Vec<String> = files.iter().map(|f| f.rel_path.to_lowercase()).collect();
        let total = paths.len();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), total);
    }
}

#[test]
fn test_validator_registry_matches_generator_tables() {
    use qagen::codegen::validation::ActionValidatorRegistry;
    use std::collections::BTreeSet;

    for target in Target::ALL {
        let validated: BTreeSet<_> = ActionValidatorRegistry::for_target(target).actions().into_iter().collect();
        let rendered: BTreeSet<_> = create_generator(target).supported_actions().into_iter().collect();
        assert_eq!(validated, rendered, "{}", target);
    }
}
