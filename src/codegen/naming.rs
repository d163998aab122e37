//! Output naming: file paths, namespaces and identifiers for every entity.
//!
//! Names are assigned once per run, in sorted input-path order, and stored in
//! a [`NamedProject`] that generators query by entity id. Collisions are
//! resolved by numeric suffixes; paths are compared case-insensitively.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::codegen::error::CodegenError;
use crate::codegen::options::ScriptFlavor;
use crate::codegen::source_meta::{
    CaseId, ElementId, EnvId, PageId, RoutineId, SourceFileInfo, SourceProjectMetadata, StepData,
    StepNode, SuiteId,
};
use crate::codegen::target::Target;
use crate::codegen::utils::{sanitize_identifier, sanitize_path_segment, to_kebab_case, IdentifierCase};
use crate::codegen::validation::ValidatedProject;
use crate::file_defs::{Language, ProjectDef};

/// Suffixes tried per name before giving up
pub const RETRY_BUDGET: usize = 1000;

pub const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

pub const TYPESCRIPT_KEYWORDS: &[&str] = &[
    "any", "as", "async", "await", "boolean", "break", "case", "catch", "class", "const",
    "continue", "debugger", "declare", "default", "delete", "do", "else", "enum", "export",
    "extends", "false", "finally", "for", "from", "function", "get", "if", "implements", "import",
    "in", "instanceof", "interface", "let", "module", "new", "null", "number", "of", "package",
    "private", "protected", "public", "require", "return", "set", "static", "string", "super",
    "switch", "symbol", "this", "throw", "true", "try", "type", "typeof", "var", "void", "while",
    "with", "yield",
];

/// Kind of generated per-entity file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Page,
    TestCase,
    TestRoutine,
    TestSuite,
    Environment,
}

/// Naming conventions of one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLayout {
    pub target: Target,
    pub script_flavor: ScriptFlavor,
}

impl OutputLayout {
    pub fn new(target: Target, script_flavor: ScriptFlavor) -> Self {
        Self { target, script_flavor }
    }

    fn is_csharp(&self) -> bool {
        self.target.language() == Language::CSharp
    }

    /// Output folder of an entity kind, relative to the output root
    pub fn folder(&self, kind: OutputKind) -> &'static str {
        match (kind, self.is_csharp()) {
            (OutputKind::Page, true) => "Pages",
            (OutputKind::TestCase, true) => "TestCases",
            (OutputKind::TestRoutine, true) => "TestRoutines",
            (OutputKind::TestSuite, true) => "TestSuites",
            (OutputKind::Page, false) => "pages",
            (OutputKind::TestCase, false) => "test-cases",
            (OutputKind::TestRoutine, false) => "test-routines",
            (OutputKind::TestSuite, false) => "tests",
            (OutputKind::Environment, _) => ".environments",
        }
    }

    /// File name suffix including the extension
    pub fn suffix(&self, kind: OutputKind) -> String {
        match (kind, self.is_csharp()) {
            (OutputKind::Environment, _) => format!(".env.{}", self.script_flavor.extension()),
            (_, true) => ".cs".to_string(),
            (OutputKind::TestSuite, false) => ".spec.ts".to_string(),
            (_, false) => ".ts".to_string(),
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        if self.is_csharp() {
            CSHARP_KEYWORDS
        } else {
            TYPESCRIPT_KEYWORDS
        }
    }

    /// Casing of members (locators, page-definition properties)
    pub fn member_case(&self) -> IdentifierCase {
        if self.is_csharp() {
            IdentifierCase::Pascal
        } else {
            IdentifierCase::Camel
        }
    }

    pub fn class_name(&self, raw: &str) -> String {
        sanitize_identifier(raw, IdentifierCase::Pascal, self.keywords())
    }

    pub fn member_name(&self, raw: &str) -> String {
        sanitize_identifier(raw, self.member_case(), self.keywords())
    }

    pub fn parameter_name(&self, raw: &str) -> String {
        sanitize_identifier(raw, IdentifierCase::Camel, self.keywords())
    }

    fn folder_segment(&self, raw: &str) -> String {
        if self.is_csharp() {
            self.class_name(raw)
        } else {
            sanitize_path_segment(raw)
        }
    }
}

/// Derived output location and identifiers of one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFileInfo {
    pub input_file_name: String,
    /// Relative to the entity kind's input folder
    pub input_file_rel_path: String,
    pub output_file_name: String,
    /// Relative to the output root, `/`-separated
    pub output_file_rel_path: String,
    /// Empty for environments
    pub class_name: String,
    /// C#: namespace below the root; TypeScript: module folder
    pub sub_namespace: String,
    /// C#: full namespace; TypeScript: module path without extension
    pub full_namespace: String,
}

/// Parameter a routine takes for one of its per-dataset steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineParam {
    pub step_index: usize,
    pub name: String,
}

/// Set of taken names; lookups ignore ASCII case when asked to
#[derive(Debug, Default)]
struct NameSet {
    taken: HashSet<String>,
    ignore_case: bool,
}

impl NameSet {
    fn case_insensitive() -> Self {
        Self {
            taken: HashSet::new(),
            ignore_case: true,
        }
    }

    fn key(&self, name: &str) -> String {
        if self.ignore_case {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.taken.contains(&self.key(name))
    }

    fn insert(&mut self, name: &str) {
        let key = self.key(name);
        self.taken.insert(key);
    }

    /// Take `base`, or the first free suffixed form of it
    fn claim(&mut self, base: &str, scope: &str, suffixed: impl Fn(&str, usize) -> String) -> Result<String, CodegenError> {
        let name = first_free(base, scope, suffixed, |candidate| !self.contains(candidate))?;
        self.insert(&name);
        Ok(name)
    }
}

/// `base`, then `suffixed(base, 2)`, `suffixed(base, 3)`, ... within the retry budget
fn first_free(
    base: &str,
    scope: &str,
    suffixed: impl Fn(&str, usize) -> String,
    mut is_free: impl FnMut(&str) -> bool,
) -> Result<String, CodegenError> {
    if is_free(base) {
        return Ok(base.to_string());
    }
    for n in 2..RETRY_BUDGET + 2 {
        let candidate = suffixed(base, n);
        if is_free(&candidate) {
            return Ok(candidate);
        }
    }
    Err(CodegenError::NamingCollision {
        name: base.to_string(),
        scope: scope.to_string(),
    })
}

fn numeric_suffix(base: &str, n: usize) -> String {
    format!("{}{}", base, n)
}

/// Entity indices ordered by input path, ignoring case
fn sorted_by_path<'a>(files: impl Iterator<Item = &'a SourceFileInfo>) -> Vec<usize> {
    let keys: Vec<(String, String)> = files
        .map(|f| (f.rel_path().to_lowercase(), f.rel_path()))
        .collect();
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|a, b| keys[*a].cmp(&keys[*b]));
    order
}

/// Assigns file names while tracking what is already taken
struct FileNamer<'a> {
    layout: OutputLayout,
    root_namespace: &'a str,
    paths: NameSet,
    /// Lower-cased namespace -> class names (C#)
    namespaces: HashMap<String, NameSet>,
    /// Every class name (TypeScript)
    classes: NameSet,
}

impl<'a> FileNamer<'a> {
    fn new(layout: OutputLayout, root_namespace: &'a str) -> Self {
        Self {
            layout,
            root_namespace,
            paths: NameSet::case_insensitive(),
            namespaces: HashMap::new(),
            classes: NameSet::case_insensitive(),
        }
    }

    fn reserve_path(&mut self, path: &str) {
        self.paths.insert(path);
    }

    fn folder_segments(&self, file: &SourceFileInfo) -> Vec<String> {
        file.folder_path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| self.layout.folder_segment(s))
            .collect()
    }

    fn csharp_namespace(&self, parts: &[String]) -> String {
        let sub_namespace = parts.join(".");
        if self.root_namespace.is_empty() {
            sub_namespace
        } else {
            format!("{}.{}", self.root_namespace, sub_namespace)
        }
    }

    /// Claim every folder-derived namespace segment as a type name of its
    /// parent namespace, so no class can share a full name with a namespace
    fn reserve_namespaces(&mut self, kind: OutputKind, file: &SourceFileInfo) {
        if !self.layout.is_csharp() || kind == OutputKind::Environment {
            return;
        }
        let mut parts = vec![self.layout.folder(kind).to_string()];
        parts.extend(self.folder_segments(file));
        for depth in 1..parts.len() {
            let parent = self.csharp_namespace(&parts[..depth]).to_lowercase();
            self.namespaces
                .entry(parent)
                .or_insert_with(NameSet::case_insensitive)
                .insert(&parts[depth]);
        }
    }

    fn name(&mut self, kind: OutputKind, name: &str, file: &SourceFileInfo) -> Result<OutputFileInfo, CodegenError> {
        if kind == OutputKind::Environment {
            return self.name_environment(file);
        }
        let layout = self.layout;
        let segments = self.folder_segments(file);
        let mut parts = vec![layout.folder(kind).to_string()];
        parts.extend(segments.iter().cloned());
        let folder = parts.join("/");
        let suffix = layout.suffix(kind);
        let base_class = layout.class_name(name);
        let scope = format!("{} ({})", folder, file.rel_path());

        if layout.is_csharp() {
            let sub_namespace = parts.join(".");
            let full_namespace = self.csharp_namespace(&parts);
            let classes = self.namespaces.entry(full_namespace.to_lowercase()).or_insert_with(NameSet::case_insensitive);
            let paths = &self.paths;
            let class_name = first_free(&base_class, &scope, numeric_suffix, |candidate| {
                !classes.contains(candidate) && !paths.contains(&format!("{}/{}{}", folder, candidate, suffix))
            })?;
            classes.insert(&class_name);
            let output_file_name = format!("{}{}", class_name, suffix);
            let output_file_rel_path = format!("{}/{}", folder, output_file_name);
            self.paths.insert(&output_file_rel_path);

            Ok(OutputFileInfo {
                input_file_name: file.file_name.clone(),
                input_file_rel_path: file.rel_path(),
                output_file_name,
                output_file_rel_path,
                class_name,
                sub_namespace,
                full_namespace,
            })
        } else {
            let base_file = sanitize_path_segment(&to_kebab_case(&sanitize_identifier(name, IdentifierCase::Pascal, &[])));
            let class_name = self.classes.claim(&base_class, &scope, numeric_suffix)?;
            let paths = &self.paths;
            let file_stem = first_free(
                &base_file,
                &scope,
                |base, n| format!("{}-{}", base, n),
                |candidate| !paths.contains(&format!("{}/{}{}", folder, candidate, suffix)),
            )?;
            let output_file_rel_path = format!("{}/{}{}", folder, file_stem, suffix);
            self.paths.insert(&output_file_rel_path);

            let output_file_name = format!("{}{}", file_stem, suffix);
            let full_namespace = format!("{}/{}", folder, file_stem);

            Ok(OutputFileInfo {
                input_file_name: file.file_name.clone(),
                input_file_rel_path: file.rel_path(),
                output_file_name,
                output_file_rel_path,
                class_name,
                sub_namespace: segments.join("/"),
                full_namespace,
            })
        }
    }

    fn name_environment(&mut self, file: &SourceFileInfo) -> Result<OutputFileInfo, CodegenError> {
        let folder = self.layout.folder(OutputKind::Environment);
        let suffix = self.layout.suffix(OutputKind::Environment);
        let stem = sanitize_path_segment(file.stem());
        let scope = format!("{} ({})", folder, file.rel_path());
        let paths = &self.paths;
        let stem = first_free(
            &stem,
            &scope,
            |base, n| format!("{}-{}", base, n),
            |candidate| !paths.contains(&format!("{}/run.{}{}", folder, candidate, suffix)),
        )?;
        let output_file_name = format!("run.{}{}", stem, suffix);
        let output_file_rel_path = format!("{}/{}", folder, output_file_name);
        self.paths.insert(&output_file_rel_path);

        Ok(OutputFileInfo {
            input_file_name: file.file_name.clone(),
            input_file_rel_path: file.rel_path(),
            output_file_name,
            output_file_rel_path,
            class_name: String::new(),
            sub_namespace: String::new(),
            full_namespace: String::new(),
        })
    }
}

/// Validated project plus every derived output name
#[derive(Debug, Clone)]
pub struct NamedProject {
    validated: ValidatedProject,
    layout: OutputLayout,
    root_namespace: String,
    pages: Vec<OutputFileInfo>,
    test_cases: Vec<OutputFileInfo>,
    routines: Vec<OutputFileInfo>,
    suites: Vec<OutputFileInfo>,
    environments: Vec<OutputFileInfo>,
    element_members: Vec<Vec<String>>,
    page_properties: Vec<String>,
    routine_params: Vec<Vec<RoutineParam>>,
    suite_tests: Vec<Vec<String>>,
}

/// Paths the scaffold writes, kept out of entity naming
pub fn scaffold_paths(target: Target, root_namespace: &str) -> Vec<String> {
    match target.language() {
        Language::CSharp => vec![
            format!("{}.csproj", root_namespace),
            format!("{}.sln", root_namespace),
            ".runsettings".to_string(),
            "Usings.cs".to_string(),
            "Support/PageBase.cs".to_string(),
            "Support/TestCaseBase.cs".to_string(),
            "Support/TestRoutineBase.cs".to_string(),
            "Support/TestSuiteBase.cs".to_string(),
            "Support/PageDefinitions.cs".to_string(),
            "Support/EnvironmentSettings.cs".to_string(),
        ],
        Language::Typescript => vec![
            "package.json".to_string(),
            "tsconfig.json".to_string(),
            "playwright.config.ts".to_string(),
            "support/page-definitions.ts".to_string(),
            "support/environment-settings.ts".to_string(),
        ],
    }
}

/// Root namespace (C#) or package name seed (TypeScript) of a project
pub fn root_namespace(meta: &SourceProjectMetadata) -> String {
    let root = meta.root_namespace();
    if root.is_empty() || root == "Unnamed" {
        "TestProject".to_string()
    } else {
        root
    }
}

impl NamedProject {
    /// Assign names to every entity of a validated project
    pub fn resolve(validated: ValidatedProject, script_flavor: ScriptFlavor) -> Result<Self, CodegenError> {
        let layout = OutputLayout::new(validated.target(), script_flavor);
        let meta = validated.meta();
        let root_namespace = root_namespace(meta);

        let mut namer = FileNamer::new(layout, &root_namespace);
        for path in scaffold_paths(layout.target, &root_namespace) {
            namer.reserve_path(&path);
        }
        let folders = [
            (OutputKind::Page, meta.pages.iter().map(|p| &p.file).collect::<Vec<_>>()),
            (OutputKind::TestCase, meta.test_cases.iter().map(|c| &c.file).collect()),
            (OutputKind::TestRoutine, meta.routines.iter().map(|r| &r.file).collect()),
            (OutputKind::TestSuite, meta.suites.iter().map(|s| &s.file).collect()),
        ];
        for (kind, files) in &folders {
            for file in files {
                namer.reserve_namespaces(*kind, file);
            }
        }

        let pages = name_all(&mut namer, OutputKind::Page, meta.pages.iter().map(|p| (p.name.as_str(), &p.file)))?;
        let test_cases = name_all(
            &mut namer,
            OutputKind::TestCase,
            meta.test_cases.iter().map(|c| (c.name.as_str(), &c.file)),
        )?;
        let routines = name_all(
            &mut namer,
            OutputKind::TestRoutine,
            meta.routines.iter().map(|r| (r.name.as_str(), &r.file)),
        )?;
        let suites = name_all(&mut namer, OutputKind::TestSuite, meta.suites.iter().map(|s| (s.name.as_str(), &s.file)))?;
        let environments = name_all(
            &mut namer,
            OutputKind::Environment,
            meta.environments.iter().map(|e| (e.name.as_str(), &e.file)),
        )?;

        let element_members = name_element_members(meta, &layout, &pages)?;
        let page_properties = name_page_properties(meta, &layout)?;
        let routine_params = name_routine_params(meta, &layout)?;
        let suite_tests = name_suite_tests(meta, &layout, &suites)?;

        tracing::debug!(
            output_target = %layout.target,
            root_namespace = %root_namespace,
            "Resolved output names"
        );

        Ok(Self {
            validated,
            layout,
            root_namespace,
            pages,
            test_cases,
            routines,
            suites,
            environments,
            element_members,
            page_properties,
            routine_params,
            suite_tests,
        })
    }

    pub fn meta(&self) -> &SourceProjectMetadata {
        self.validated.meta()
    }

    pub fn project(&self) -> &ProjectDef {
        &self.validated.meta().project
    }

    pub fn target(&self) -> Target {
        self.layout.target
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn root_namespace(&self) -> &str {
        &self.root_namespace
    }

    pub fn page(&self, id: PageId) -> &OutputFileInfo {
        &self.pages[id.0]
    }

    pub fn test_case(&self, id: CaseId) -> &OutputFileInfo {
        &self.test_cases[id.0]
    }

    pub fn routine(&self, id: RoutineId) -> &OutputFileInfo {
        &self.routines[id.0]
    }

    pub fn suite(&self, id: SuiteId) -> &OutputFileInfo {
        &self.suites[id.0]
    }

    pub fn environment(&self, id: EnvId) -> &OutputFileInfo {
        &self.environments[id.0]
    }

    pub fn element_member(&self, id: ElementId) -> &str {
        &self.element_members[id.page.0][id.index]
    }

    /// Property of the page-definitions surface exposing a page
    pub fn page_property(&self, id: PageId) -> &str {
        &self.page_properties[id.0]
    }

    pub fn routine_params(&self, id: RoutineId) -> &[RoutineParam] {
        &self.routine_params[id.0]
    }

    pub fn routine_param(&self, id: RoutineId, step_index: usize) -> Option<&RoutineParam> {
        self.routine_params[id.0].iter().find(|p| p.step_index == step_index)
    }

    /// Test method names (C#) or titles (TypeScript), one per suite entry
    pub fn suite_tests(&self, id: SuiteId) -> &[String] {
        &self.suite_tests[id.0]
    }

    /// Every per-entity output path
    pub fn output_paths(&self) -> Vec<&str> {
        self.pages
            .iter()
            .chain(&self.test_cases)
            .chain(&self.routines)
            .chain(&self.suites)
            .chain(&self.environments)
            .map(|info| info.output_file_rel_path.as_str())
            .collect()
    }
}

fn name_all<'m>(
    namer: &mut FileNamer<'_>,
    kind: OutputKind,
    entities: impl Iterator<Item = (&'m str, &'m SourceFileInfo)>,
) -> Result<Vec<OutputFileInfo>, CodegenError> {
    let entities: Vec<_> = entities.collect();
    let mut named: Vec<Option<OutputFileInfo>> = vec![None; entities.len()];
    for index in sorted_by_path(entities.iter().map(|(_, file)| *file)) {
        let (name, file) = entities[index];
        named[index] = Some(namer.name(kind, name, file)?);
    }
    Ok(named.into_iter().flatten().collect())
}

fn name_element_members(
    meta: &SourceProjectMetadata,
    layout: &OutputLayout,
    pages: &[OutputFileInfo],
) -> Result<Vec<Vec<String>>, CodegenError> {
    meta.pages
        .iter()
        .zip(pages)
        .map(|(page, info)| {
            let mut taken = NameSet::default();
            match layout.target.language() {
                Language::CSharp => {
                    taken.insert("Page");
                    taken.insert(&info.class_name);
                }
                Language::Typescript => {
                    taken.insert("page");
                    taken.insert("constructor");
                }
            }
            let scope = format!("page '{}'", page.name);
            page.elements
                .iter()
                .map(|element| taken.claim(&layout.member_name(&element.name), &scope, numeric_suffix))
                .collect()
        })
        .collect()
}

fn name_page_properties(meta: &SourceProjectMetadata, layout: &OutputLayout) -> Result<Vec<String>, CodegenError> {
    let mut taken = NameSet::default();
    match layout.target.language() {
        Language::CSharp => {
            taken.insert("PageDefinitions");
            taken.insert("Page");
        }
        Language::Typescript => {
            taken.insert("page");
            taken.insert("constructor");
        }
    }
    let mut names = vec![String::new(); meta.pages.len()];
    for index in sorted_by_path(meta.pages.iter().map(|p| &p.file)) {
        names[index] = taken.claim(&layout.member_name(&meta.pages[index].name), "page definitions", numeric_suffix)?;
    }
    Ok(names)
}

fn name_routine_params(meta: &SourceProjectMetadata, layout: &OutputLayout) -> Result<Vec<Vec<RoutineParam>>, CodegenError> {
    meta.routines
        .iter()
        .map(|routine| {
            let mut taken = NameSet::default();
            taken.insert("page");
            taken.insert("defs");
            let scope = format!("routine '{}'", routine.name);
            let mut params = Vec::new();
            for (step_index, step) in routine.steps.iter().enumerate() {
                let StepNode::Action(action) = step else { continue };
                if !matches!(action.data, StepData::PerDataSet(_)) {
                    continue;
                }
                let subject = match action.element.resolved() {
                    Some(element) => meta.element(element).name.clone(),
                    None => action.action_name.clone(),
                };
                let base = layout.parameter_name(&format!("{} data", subject));
                params.push(RoutineParam {
                    step_index,
                    name: taken.claim(&base, &scope, numeric_suffix)?,
                });
            }
            Ok(params)
        })
        .collect()
}

fn name_suite_tests(
    meta: &SourceProjectMetadata,
    layout: &OutputLayout,
    suites: &[OutputFileInfo],
) -> Result<Vec<Vec<String>>, CodegenError> {
    meta.suites
        .iter()
        .zip(suites)
        .map(|(suite, info)| {
            let scope = format!("suite '{}'", suite.name);
            let mut taken = NameSet::default();
            suite
                .cases
                .iter()
                .filter_map(|reference| reference.resolved())
                .map(|case_id| {
                    let case_name = &meta.test_case(case_id).name;
                    match layout.target.language() {
                        Language::CSharp => {
                            taken.insert(&info.class_name);
                            taken.claim(&layout.class_name(case_name), &scope, numeric_suffix)
                        }
                        Language::Typescript => {
                            taken.claim(case_name, &scope, |base, n| format!("{} ({})", base, n))
                        }
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::validation::validate_project;
    use crate::file_defs::{
        DataSetDef, EnvironmentDef, FileDef, LocatorType, PageDef, PageElementDef, PageEntryDef, SourceFiles,
        StepDef, TestCaseDef, TestRoutineDef, TestSuiteDef,
    };

    fn page(name: &str, elements: &[&str]) -> PageDef {
        PageDef {
            name: name.to_string(),
            elements: elements
                .iter()
                .map(|e| PageEntryDef::Element(PageElementDef::new(*e, LocatorType::Id, "x")))
                .collect(),
            ..Default::default()
        }
    }

    fn project(language: Language) -> SourceFiles {
        let project = FileDef::new("", "My Shop.rmproj", ProjectDef::new("My Shop", language));
        let mut files = SourceFiles::new("/tmp/shop", project);
        files.pages.push(FileDef::new("b", "Login.page", page("Login", &["user name", "User-Name", "page"])));
        files.pages.push(FileDef::new("a", "Login.page", page("Login", &["class"])));
        files.test_cases.push(FileDef::new(
            "",
            "Login.tcase",
            TestCaseDef {
                id: "case-1".to_string(),
                name: "Login".to_string(),
                ..Default::default()
            },
        ));
        files.test_cases.push(FileDef::new(
            "smoke",
            "Login.tcase",
            TestCaseDef {
                name: "Login".to_string(),
                ..Default::default()
            },
        ));
        files.routines.push(FileDef::new(
            "",
            "FillName.troutine",
            TestRoutineDef {
                name: "FillName".to_string(),
                data_sets: vec![DataSetDef::new("One")],
                steps: vec![
                    StepDef::action_per_dataset("a/Login", "class", "Input", &[("One", "x")]),
                    StepDef::action_per_dataset("a/Login", "class", "Input", &[("One", "y")]),
                    StepDef::action_per_dataset("", "", "GoToUrl", &[("One", "http://x")]),
                ],
                ..Default::default()
            },
        ));
        files.suites.push(FileDef::new(
            "",
            "All.tsuite",
            TestSuiteDef {
                name: "All".to_string(),
                testcases: vec!["case-1".to_string(), "smoke/Login".to_string()],
                ..Default::default()
            },
        ));
        files.environments.push(FileDef::new("", "local.env", EnvironmentDef::default()));
        files
    }

    fn named(files: &SourceFiles, flavor: ScriptFlavor) -> NamedProject {
        let validated = validate_project(SourceProjectMetadata::build(files)).unwrap();
        NamedProject::resolve(validated, flavor).unwrap()
    }

    #[test]
    fn test_csharp_names() {
        let named = named(&project(Language::CSharp), ScriptFlavor::Sh);

        let b = named.page(PageId(0));
        let a = named.page(PageId(1));
        assert_eq!(a.output_file_rel_path, "Pages/A/Login.cs");
        assert_eq!(a.full_namespace, "MyShop.Pages.A");
        assert_eq!(b.output_file_rel_path, "Pages/B/Login.cs");
        assert_eq!(b.class_name, "Login");
        assert_eq!(b.sub_namespace, "Pages.B");

        assert_eq!(named.element_member(ElementId { page: PageId(0), index: 0 }), "UserName");
        assert_eq!(named.element_member(ElementId { page: PageId(0), index: 1 }), "UserName2");
        assert_eq!(named.element_member(ElementId { page: PageId(0), index: 2 }), "Page2");
        assert_eq!(named.page_property(PageId(1)), "Login");
        assert_eq!(named.page_property(PageId(0)), "Login2");

        let params: Vec<_> = named.routine_params(RoutineId(0)).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["classData", "classData2", "goToUrlData"]);

        assert_eq!(named.suite_tests(SuiteId(0)), &["Login".to_string(), "Login2".to_string()]);
        assert_eq!(named.environment(EnvId(0)).output_file_rel_path, ".environments/run.local.env.sh");
    }

    #[test]
    fn test_typescript_names() {
        let named = named(&project(Language::Typescript), ScriptFlavor::Bat);

        let a = named.page(PageId(1));
        let b = named.page(PageId(0));
        assert_eq!(a.output_file_rel_path, "pages/a/login.ts");
        assert_eq!(a.class_name, "Login");
        assert_eq!(a.full_namespace, "pages/a/login");
        assert_eq!(b.class_name, "Login2");
        assert_eq!(b.output_file_rel_path, "pages/b/login.ts");

        let case = named.test_case(CaseId(0));
        assert_eq!(case.output_file_rel_path, "test-cases/login.ts");
        assert_eq!(case.class_name, "Login3");

        assert_eq!(named.element_member(ElementId { page: PageId(0), index: 2 }), "page2");
        assert_eq!(named.element_member(ElementId { page: PageId(1), index: 0 }), "class_");
        assert_eq!(named.suite(SuiteId(0)).output_file_rel_path, "tests/all.spec.ts");
        assert_eq!(named.suite_tests(SuiteId(0)), &["Login".to_string(), "Login (2)".to_string()]);
        assert_eq!(named.environment(EnvId(0)).output_file_name, "run.local.env.bat");
    }

    #[test]
    fn test_naming_is_deterministic_and_unique() {
        for language in [Language::CSharp, Language::Typescript] {
            let files = project(language);
            let first = named(&files, ScriptFlavor::Sh);
            let second = named(&files, ScriptFlavor::Sh);
            assert_eq!(first.output_paths(), second.output_paths());

            let mut lowered: Vec<String> = first.output_paths().iter().map(|p| p.to_lowercase()).collect();
            let total = lowered.len();
            lowered.sort();
            lowered.dedup();
            assert_eq!(lowered.len(), total);
        }
    }

    #[test]
    fn test_class_never_shares_a_name_with_a_folder_namespace() {
        let project = FileDef::new("", "My Shop.rmproj", ProjectDef::new("My Shop", Language::CSharp));
        let mut files = SourceFiles::new("/tmp/shop", project);
        files.pages.push(FileDef::new("", "Login.page", page("Login", &["user"])));
        files.pages.push(FileDef::new("login", "Form.page", page("Form", &["user"])));
        files.pages.push(FileDef::new("zeta", "Form.page", page("Form", &["user"])));
        files.pages.push(FileDef::new("", "Zeta.page", page("Zeta", &["user"])));
        let named = named(&files, ScriptFlavor::Sh);

        assert_eq!(named.page(PageId(0)).class_name, "Login2");
        assert_eq!(named.page(PageId(0)).output_file_rel_path, "Pages/Login2.cs");
        assert_eq!(named.page(PageId(1)).full_namespace, "MyShop.Pages.Login");
        assert_eq!(named.page(PageId(3)).class_name, "Zeta2");

        let namespaces: HashSet<String> = (0..4).map(|i| named.page(PageId(i)).full_namespace.to_lowercase()).collect();
        for i in 0..4 {
            let info = named.page(PageId(i));
            let type_name = format!("{}.{}", info.full_namespace, info.class_name).to_lowercase();
            assert!(!namespaces.contains(&type_name), "{} is also a namespace", type_name);
        }
    }

    #[test]
    fn test_retry_budget_is_bounded() {
        let err = first_free("X", "scope", numeric_suffix, |_| false).unwrap_err();
        assert!(matches!(err, CodegenError::NamingCollision { .. }));
    }
}
