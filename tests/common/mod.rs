//! Shared project fixture for the integration tests

#![allow(dead_code)]

use std::path::Path;

use qagen::file_defs::{
    DataSetDef, EnvironmentDef, FileDef, Language, LocatorType, PageDef, PageElementDef, PageEntryDef, ProjectDef,
    SourceFiles, StepDef, TestCaseDef, TestFramework, TestRoutineDef, TestSuiteDef,
};

pub fn element(name: &str, find_by: LocatorType, locator: &str) -> PageEntryDef {
    PageEntryDef::Element(PageElementDef::new(name, find_by, locator))
}

pub fn fills_screen() -> PageDef {
    PageDef {
        id: "page-fills".to_string(),
        name: "FillsScreen".to_string(),
        description: "Form with the fields to fill".to_string(),
        elements: vec![
            element("name", LocatorType::Css, "[name='name']"),
            element("district", LocatorType::Id, "district"),
            element("bio", LocatorType::Label, "Bio"),
            element("submit", LocatorType::TestId, "submit"),
        ],
    }
}

pub fn fills_case() -> TestCaseDef {
    TestCaseDef {
        id: "case-fills".to_string(),
        name: "fills".to_string(),
        description: "Fills every field".to_string(),
        steps: vec![
            StepDef::action("FillsScreen", "name", "Input", "John"),
            StepDef::routine("FillName", "DataSet Number Two"),
            StepDef::routine("FillDistrictAndBio", "Default"),
            StepDef::comment("verify"),
            StepDef::action("FillsScreen", "submit", "Click", ""),
        ],
    }
}

pub fn fill_name() -> TestRoutineDef {
    TestRoutineDef {
        id: "routine-fill-name".to_string(),
        name: "FillName".to_string(),
        steps: vec![StepDef::action_per_dataset(
            "FillsScreen",
            "name",
            "Input",
            &[("DataSet Number One", "John"), ("DataSet Number Two", "Jane")],
        )],
        data_sets: vec![DataSetDef::new("DataSet Number One"), DataSetDef::new("DataSet Number Two")],
        ..Default::default()
    }
}

pub fn fill_district_and_bio() -> TestRoutineDef {
    TestRoutineDef {
        id: "routine-district-bio".to_string(),
        name: "FillDistrictAndBio".to_string(),
        steps: vec![
            StepDef::action_per_dataset("FillsScreen", "district", "Input", &[("Default", "{{env.DISTRICT}}")]),
            StepDef::action_per_dataset("FillsScreen", "bio", "Input", &[("Default", "Short bio")]),
        ],
        data_sets: vec![DataSetDef::new("Default")],
        ..Default::default()
    }
}

pub fn regression_suite() -> TestSuiteDef {
    TestSuiteDef {
        id: "suite-regression".to_string(),
        name: "Regression".to_string(),
        testcases: vec!["fills".to_string()],
        ..Default::default()
    }
}

/// The "Demo" project: one page, one case, two routines, one suite, one environment
pub fn demo_project(project_dir: &Path, language: Language, test_framework: Option<TestFramework>) -> SourceFiles {
    let mut descriptor = ProjectDef::new("Demo", language);
    descriptor.test_framework = test_framework;
    descriptor.test_id_attribute_name = "data-qa".to_string();

    let mut files = SourceFiles::new(project_dir, FileDef::new("", "Demo.rmproj", descriptor));
    files.pages.push(FileDef::new("", "FillsScreen.page", fills_screen()));
    files.test_cases.push(FileDef::new("", "fills.tcase", fills_case()));
    files.routines.push(FileDef::new("", "FillName.troutine", fill_name()));
    files
        .routines
        .push(FileDef::new("", "FillDistrictAndBio.troutine", fill_district_and_bio()));
    files.suites.push(FileDef::new("", "Regression.tsuite", regression_suite()));
    files.environments.push(FileDef::new(
        "",
        "local.env",
        EnvironmentDef::from_pairs([("DISTRICT", "Central"), ("BASE_URL", "https://example.test")]),
    ));
    files
}

/// Generated file content by output-relative path
pub fn file<'a>(files: &'a [qagen::codegen::GeneratedFile], rel_path: &str) -> &'a str {
    files
        .iter()
        .find(|f| f.rel_path == rel_path)
        .map(|f| f.content.as_str())
        .unwrap_or_else(|| panic!("{} was not generated", rel_path))
}
