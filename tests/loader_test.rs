//! Loading a project from disk and generating it end to end

use std::fs;

use qagen::codegen::fs_utils::write_file;
use qagen::codegen::manifest::{read_manifest, record_failure};
use qagen::codegen::progress::RecordingProgressSink;
use qagen::codegen::{generate_project, load_project, CodegenState};
use tempfile::TempDir;

fn write_demo(root: &std::path::Path) {
    write_file(
        root.join("demo.rmproj"),
        r#"{
            "fileVersion": 1,
            "name": "Demo",
            "automationFramework": "playwright",
            "language": "csharp",
            "testFramework": "mstest",
            "indent": "tabs"
        }"#,
    )
    .unwrap();
    write_file(
        root.join("page-definitions/forms/FillsScreen.page"),
        r#"{
            "id": "p-fills",
            "name": "FillsScreen",
            "elements": [
                { "type": "comment", "id": "c1", "comment": "Main form" },
                { "type": "pageElement", "id": "e1", "name": "form", "findBy": "Css", "locator": "form.main" },
                { "type": "pageElement", "id": "e2", "name": "name", "findBy": "RelativeCss", "locator": "[name='name']" }
            ]
        }"#,
    )
    .unwrap();
    write_file(
        root.join("test-cases/fills.tcase"),
        "id: t-fills\nname: fills\nsteps:\n  - type: testStep\n    id: s1\n    page: forms/FillsScreen\n    element: e2\n    action: Input\n    data: \"{{env.USER_NAME}}\"\n  - type: testStep\n    id: s2\n    page: ''\n    element: ''\n    action: Delay\n    data: 250\n",
    )
    .unwrap();
    write_file(
        root.join("test-suites/Smoke.tsuite"),
        r#"{ "id": "s-smoke", "name": "Smoke", "testcases": ["t-fills"] }"#,
    )
    .unwrap();
    write_file(root.join("config/qa.env"), "USER_NAME=qa-user\n").unwrap();
}

#[test]
fn test_load_project_from_disk() {
    let dir = TempDir::new().unwrap();
    write_demo(dir.path());

    let files = load_project(dir.path()).unwrap();
    assert_eq!(files.project.content.name, "Demo");
    assert_eq!(files.pages[0].rel_path(), "forms/FillsScreen.page");
    assert_eq!(files.test_cases[0].content.steps.len(), 2);
    assert_eq!(files.environments[0].content.variables["USER_NAME"], "qa-user");
}

#[tokio::test]
async fn test_generate_project_from_disk() {
    let dir = TempDir::new().unwrap();
    write_demo(dir.path());

    let outcome = generate_project(dir.path(), &RecordingProgressSink::new()).await.unwrap();
    assert_eq!(outcome.state, CodegenState::Done, "{}", outcome.message);

    let output = dir.path().join("output-code");
    let page = fs::read_to_string(output.join("Pages/Forms/FillsScreen.cs")).unwrap();
    assert!(page.contains("namespace Demo.Pages.Forms;"));
    assert!(page.contains("\t// Main form"));
    assert!(page.contains("\tpublic ILocator Name => Form.Locator(\"[name='name']\");"));

    let case = fs::read_to_string(output.join("TestCases/Fills.cs")).unwrap();
    assert!(case.contains("\t\tawait Defs.FillsScreen.Name.FillAsync(EnvironmentSettings.Get(\"USER_NAME\"));"));
    assert!(case.contains("\t\tawait Task.Delay(250);"));

    let manifest = read_manifest(&output).unwrap();
    assert_eq!(manifest.suites[0].tests[0].qualified_test_name, "Demo.TestSuites.Smoke.Fills");

    record_failure(&output, "build failed", None).unwrap();
    let manifest = read_manifest(&output).unwrap();
    assert_eq!(manifest.cases.len(), 1);
    assert_eq!(manifest.error.unwrap().message, "build failed");
}
