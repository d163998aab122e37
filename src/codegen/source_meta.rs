//! Source project metadata: the cross-referenced graph of one authored project.
//!
//! Entities live in per-kind arenas and refer to each other through typed
//! indices ([`PageId`], [`ElementId`], ...). Every reference found in the
//! file definitions is resolved once, here, by id, name or folder-relative
//! path. References that do not resolve are kept as [`Reference::Unresolved`]
//! (or `Ambiguous`/`Dependent`) so the validator can report all of them in one
//! pass; building never fails.

use indexmap::IndexMap;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::codegen::error::CodegenError;
use crate::codegen::target::Target;
use crate::codegen::utils::{sanitize_identifier, IdentifierCase};
use crate::file_defs::{
    ActionType, EnvironmentDef, FileDef, LocatorType, PageDef, PageEntryDef, ProjectDef,
    RawStepData, SourceFiles, StepDef, TestCaseDef, TestRoutineDef, TestSuiteDef,
};

/// Location of an entity's source file (content-less [`FileDef`])
pub type SourceFileInfo = FileDef<()>;

impl<T> FileDef<T> {
    pub fn location(&self) -> SourceFileInfo {
        FileDef {
            folder_path: self.folder_path.clone(),
            file_name: self.file_name.clone(),
            content: (),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    pub page: PageId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutineId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataSetId {
    pub routine: RoutineId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiteId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvId(pub usize);

/// Outcome of resolving one authored reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference<T> {
    /// Nothing was authored
    Absent,
    Resolved(T),
    /// No entity matches the text
    Unresolved(String),
    /// More than one entity carries the name
    Ambiguous(String),
    /// Not looked up because the owning reference did not resolve
    Dependent(String),
}

impl<T: Copy> Reference<T> {
    pub fn resolved(&self) -> Option<T> {
        match self {
            Reference::Resolved(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Reference::Absent)
    }
}

/// A data value after environment references were recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValue {
    Literal(String),
    /// Name of an environment variable
    Environment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepData {
    None,
    Single(DataValue),
    PerDataSet(IndexMap<String, DataValue>),
}

#[derive(Debug, Clone)]
pub struct ActionStep {
    pub id: String,
    /// Action as authored
    pub action_name: String,
    /// `None` when the authored name is not a known action
    pub action: Option<ActionType>,
    pub page: Reference<PageId>,
    pub element: Reference<ElementId>,
    pub data: StepData,
}

#[derive(Debug, Clone)]
pub struct RoutineCallStep {
    pub id: String,
    pub routine: Reference<RoutineId>,
    pub dataset: Reference<DataSetId>,
}

#[derive(Debug, Clone)]
pub enum StepNode {
    Action(ActionStep),
    RoutineCall(RoutineCallStep),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct ElementNode {
    pub id: String,
    pub name: String,
    pub description: String,
    pub locator_type: LocatorType,
    pub locator: String,
    /// Index of the element a relative locator chains on
    pub anchor: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum PageEntry {
    Element(usize),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct PageNode {
    pub id: String,
    pub name: String,
    pub description: String,
    pub file: SourceFileInfo,
    /// Elements and comments in authored order
    pub entries: Vec<PageEntry>,
    pub elements: Vec<ElementNode>,
}

#[derive(Debug, Clone)]
pub struct TestCaseNode {
    pub id: String,
    pub name: String,
    pub description: String,
    pub file: SourceFileInfo,
    pub steps: Vec<StepNode>,
}

#[derive(Debug, Clone)]
pub struct DataSetNode {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct RoutineNode {
    pub id: String,
    pub name: String,
    pub description: String,
    pub file: SourceFileInfo,
    pub steps: Vec<StepNode>,
    pub data_sets: Vec<DataSetNode>,
}

#[derive(Debug, Clone)]
pub struct SuiteNode {
    pub id: String,
    pub name: String,
    pub description: String,
    pub file: SourceFileInfo,
    pub cases: Vec<Reference<CaseId>>,
}

#[derive(Debug, Clone)]
pub struct EnvironmentNode {
    pub name: String,
    pub file: SourceFileInfo,
    pub variables: IndexMap<String, String>,
}

/// The resolved project graph
#[derive(Debug, Clone)]
pub struct SourceProjectMetadata {
    pub project_dir: PathBuf,
    pub project: ProjectDef,
    pub project_file: SourceFileInfo,
    pub pages: Vec<PageNode>,
    pub test_cases: Vec<TestCaseNode>,
    pub routines: Vec<RoutineNode>,
    pub suites: Vec<SuiteNode>,
    pub environments: Vec<EnvironmentNode>,
    /// Union of the variables declared by all environment files
    pub environment_variables: BTreeSet<String>,
}

/// id / path / name lookup for one entity kind
struct LookupIndex<T> {
    by_id: HashMap<String, T>,
    by_path: HashMap<String, T>,
    by_name: HashMap<String, Vec<T>>,
}

impl<T: Copy> LookupIndex<T> {
    fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            by_path: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    fn insert(&mut self, id: &str, name: &str, path: Option<String>, value: T) {
        let id = id.trim();
        if !id.is_empty() {
            self.by_id.entry(id.to_string()).or_insert(value);
        }
        if let Some(path) = path {
            self.by_path.entry(path).or_insert(value);
        }
        self.by_name.entry(name.to_string()).or_default().push(value);
    }

    fn resolve(&self, key: &str) -> Reference<T> {
        let key = key.trim();
        if key.is_empty() {
            return Reference::Absent;
        }
        if let Some(value) = self.by_id.get(key) {
            return Reference::Resolved(*value);
        }
        match self.by_name.get(key).map(Vec::as_slice) {
            Some([single]) => return Reference::Resolved(*single),
            Some([_, _, ..]) => return Reference::Ambiguous(key.to_string()),
            _ => {}
        }
        match self.by_path.get(key.trim_start_matches('/')) {
            Some(value) => Reference::Resolved(*value),
            None => Reference::Unresolved(key.to_string()),
        }
    }
}

fn environment_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\{\{\s*env\.([^\s{}]+)\s*\}\}$").expect("valid regex"))
}

/// Recognize `{{env.NAME}}`; everything else is a literal
pub fn parse_data_value(text: &str) -> DataValue {
    match environment_reference().captures(text.trim()) {
        Some(caps) => DataValue::Environment(caps[1].to_string()),
        None => DataValue::Literal(text.to_string()),
    }
}

fn convert_data(raw: Option<&RawStepData>) -> StepData {
    match raw {
        None => StepData::None,
        Some(RawStepData::Single(value)) => {
            let text = value.to_text();
            if text.is_empty() {
                StepData::None
            } else {
                StepData::Single(parse_data_value(&text))
            }
        }
        Some(RawStepData::PerDataSet(map)) => StepData::PerDataSet(
            map.iter()
                .map(|(dataset, value)| (dataset.clone(), parse_data_value(&value.to_text())))
                .collect(),
        ),
    }
}

fn display_name<T>(name: &str, file: &FileDef<T>) -> String {
    let name = name.trim();
    if name.is_empty() {
        file.stem().to_string()
    } else {
        name.to_string()
    }
}

/// Lookup maps built once per run
struct Indexes {
    pages: LookupIndex<PageId>,
    elements: Vec<LookupIndex<usize>>,
    cases: LookupIndex<CaseId>,
    routines: LookupIndex<RoutineId>,
    data_sets: Vec<LookupIndex<usize>>,
}

impl Indexes {
    fn resolve_element(&self, page: &Reference<PageId>, element: &str) -> Reference<ElementId> {
        let element = element.trim();
        if element.is_empty() {
            return Reference::Absent;
        }
        match page {
            Reference::Resolved(page_id) => match self.elements[page_id.0].resolve(element) {
                Reference::Resolved(index) => Reference::Resolved(ElementId {
                    page: *page_id,
                    index,
                }),
                Reference::Ambiguous(key) => Reference::Ambiguous(key),
                Reference::Unresolved(key) => Reference::Unresolved(key),
                _ => Reference::Unresolved(element.to_string()),
            },
            _ => Reference::Dependent(element.to_string()),
        }
    }

    fn resolve_data_set(&self, routine: &Reference<RoutineId>, dataset: &str) -> Reference<DataSetId> {
        let dataset = dataset.trim();
        if dataset.is_empty() {
            return Reference::Absent;
        }
        match routine {
            Reference::Resolved(routine_id) => match self.data_sets[routine_id.0].resolve(dataset) {
                Reference::Resolved(index) => Reference::Resolved(DataSetId {
                    routine: *routine_id,
                    index,
                }),
                Reference::Ambiguous(key) => Reference::Ambiguous(key),
                Reference::Unresolved(key) => Reference::Unresolved(key),
                _ => Reference::Unresolved(dataset.to_string()),
            },
            _ => Reference::Dependent(dataset.to_string()),
        }
    }

    fn resolve_steps(&self, steps: &[StepDef]) -> Vec<StepNode> {
        steps
            .iter()
            .map(|step| match step {
                StepDef::Action(def) => {
                    let page = self.pages.resolve(&def.page);
                    let element = self.resolve_element(&page, &def.element);
                    StepNode::Action(ActionStep {
                        id: def.id.clone(),
                        action_name: def.action.trim().to_string(),
                        action: ActionType::from_name(&def.action),
                        page,
                        element,
                        data: convert_data(def.data.as_ref()),
                    })
                }
                StepDef::Routine(def) => {
                    let routine = self.routines.resolve(&def.routine);
                    let dataset = self.resolve_data_set(&routine, &def.dataset);
                    StepNode::RoutineCall(RoutineCallStep {
                        id: def.id.clone(),
                        routine,
                        dataset,
                    })
                }
                StepDef::Comment(def) => StepNode::Comment(def.comment.clone()),
            })
            .collect()
    }
}

fn build_page(file: &FileDef<PageDef>) -> PageNode {
    let mut entries = Vec::new();
    let mut elements: Vec<ElementNode> = Vec::new();

    for entry in &file.content.elements {
        match entry {
            PageEntryDef::Element(def) => {
                let index = elements.len();
                let anchor = if def.find_by.is_relative() && index > 0 {
                    Some(index - 1)
                } else {
                    None
                };
                elements.push(ElementNode {
                    id: def.id.clone(),
                    name: def.name.trim().to_string(),
                    description: def.description.clone(),
                    locator_type: def.find_by,
                    locator: def.locator.clone(),
                    anchor,
                });
                entries.push(PageEntry::Element(index));
            }
            PageEntryDef::Comment(def) => entries.push(PageEntry::Comment(def.comment.clone())),
        }
    }

    PageNode {
        id: file.content.id.clone(),
        name: display_name(&file.content.name, file),
        description: file.content.description.clone(),
        file: file.location(),
        entries,
        elements,
    }
}

impl SourceProjectMetadata {
    /// Build the resolved graph from the loaded file definitions
    pub fn build(files: &SourceFiles) -> Self {
        let pages: Vec<PageNode> = files.pages.iter().map(build_page).collect();

        let mut page_index = LookupIndex::new();
        let mut element_indexes = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            page_index.insert(&page.id, &page.name, Some(page.file.rel_path_without_extension()), PageId(i));
            let mut elements = LookupIndex::new();
            for (j, element) in page.elements.iter().enumerate() {
                elements.insert(&element.id, &element.name, None, j);
            }
            element_indexes.push(elements);
        }

        let mut case_index = LookupIndex::new();
        for (i, file) in files.test_cases.iter().enumerate() {
            let name = display_name(&file.content.name, file);
            case_index.insert(&file.content.id, &name, Some(file.rel_path_without_extension()), CaseId(i));
        }

        let mut routine_index = LookupIndex::new();
        let mut data_set_indexes = Vec::with_capacity(files.routines.len());
        for (i, file) in files.routines.iter().enumerate() {
            let name = display_name(&file.content.name, file);
            routine_index.insert(&file.content.id, &name, Some(file.rel_path_without_extension()), RoutineId(i));
            let mut data_sets = LookupIndex::new();
            for (j, data_set) in file.content.data_sets.iter().enumerate() {
                data_sets.insert(&data_set.id, data_set.name.trim(), None, j);
            }
            data_set_indexes.push(data_sets);
        }

        let indexes = Indexes {
            pages: page_index,
            elements: element_indexes,
            cases: case_index,
            routines: routine_index,
            data_sets: data_set_indexes,
        };

        let test_cases = files
            .test_cases
            .iter()
            .map(|file| build_test_case(file, &indexes))
            .collect();
        let routines = files
            .routines
            .iter()
            .map(|file| build_routine(file, &indexes))
            .collect();
        let suites: Vec<SuiteNode> = files
            .suites
            .iter()
            .map(|file| build_suite(file, &indexes))
            .collect();
        let environments: Vec<EnvironmentNode> = files.environments.iter().map(build_environment).collect();

        let environment_variables = environments
            .iter()
            .flat_map(|env| env.variables.keys().cloned())
            .collect();

        let meta = SourceProjectMetadata {
            project_dir: files.project_dir.clone(),
            project: files.project.content.clone(),
            project_file: files.project.location(),
            pages,
            test_cases,
            routines,
            suites,
            environments,
            environment_variables,
        };

        tracing::debug!(
            pages = meta.pages.len(),
            test_cases = meta.test_cases.len(),
            routines = meta.routines.len(),
            suites = meta.suites.len(),
            environments = meta.environments.len(),
            "Built source project metadata"
        );
        meta
    }

    pub fn target(&self) -> Result<Target, CodegenError> {
        Target::from_project(&self.project)
    }

    /// Project display name, falling back to the descriptor file stem
    pub fn project_name(&self) -> String {
        display_name(&self.project.name, &self.project_file)
    }

    /// Configured root namespace, or one derived from the project name
    pub fn root_namespace(&self) -> String {
        let configured = self.project.root_namespace.trim();
        if configured.is_empty() {
            sanitize_identifier(&self.project_name(), IdentifierCase::Pascal, &[])
        } else {
            configured
                .split('.')
                .map(|part| sanitize_identifier(part, IdentifierCase::Pascal, &[]))
                .collect::<Vec<_>>()
                .join(".")
        }
    }

    pub fn page(&self, id: PageId) -> &PageNode {
        &self.pages[id.0]
    }

    pub fn element(&self, id: ElementId) -> &ElementNode {
        &self.pages[id.page.0].elements[id.index]
    }

    pub fn test_case(&self, id: CaseId) -> &TestCaseNode {
        &self.test_cases[id.0]
    }

    pub fn routine(&self, id: RoutineId) -> &RoutineNode {
        &self.routines[id.0]
    }

    pub fn data_set(&self, id: DataSetId) -> &DataSetNode {
        &self.routines[id.routine.0].data_sets[id.index]
    }

    pub fn suite(&self, id: SuiteId) -> &SuiteNode {
        &self.suites[id.0]
    }

    pub fn environment(&self, id: EnvId) -> &EnvironmentNode {
        &self.environments[id.0]
    }

    pub fn page_ids(&self) -> impl Iterator<Item = PageId> {
        (0..self.pages.len()).map(PageId)
    }

    pub fn case_ids(&self) -> impl Iterator<Item = CaseId> {
        (0..self.test_cases.len()).map(CaseId)
    }

    pub fn routine_ids(&self) -> impl Iterator<Item = RoutineId> {
        (0..self.routines.len()).map(RoutineId)
    }

    pub fn suite_ids(&self) -> impl Iterator<Item = SuiteId> {
        (0..self.suites.len()).map(SuiteId)
    }

    pub fn environment_ids(&self) -> impl Iterator<Item = EnvId> {
        (0..self.environments.len()).map(EnvId)
    }
}

fn build_test_case(file: &FileDef<TestCaseDef>, indexes: &Indexes) -> TestCaseNode {
    TestCaseNode {
        id: file.content.id.clone(),
        name: display_name(&file.content.name, file),
        description: file.content.description.clone(),
        file: file.location(),
        steps: indexes.resolve_steps(&file.content.steps),
    }
}

fn build_routine(file: &FileDef<TestRoutineDef>, indexes: &Indexes) -> RoutineNode {
    RoutineNode {
        id: file.content.id.clone(),
        name: display_name(&file.content.name, file),
        description: file.content.description.clone(),
        file: file.location(),
        steps: indexes.resolve_steps(&file.content.steps),
        data_sets: file
            .content
            .data_sets
            .iter()
            .map(|ds| DataSetNode {
                id: ds.id.clone(),
                name: ds.name.trim().to_string(),
                description: ds.description.clone(),
            })
            .collect(),
    }
}

fn build_suite(file: &FileDef<TestSuiteDef>, indexes: &Indexes) -> SuiteNode {
    SuiteNode {
        id: file.content.id.clone(),
        name: display_name(&file.content.name, file),
        description: file.content.description.clone(),
        file: file.location(),
        cases: file
            .content
            .testcases
            .iter()
            .map(|reference| indexes.cases.resolve(reference))
            .collect(),
    }
}

fn build_environment(file: &FileDef<EnvironmentDef>) -> EnvironmentNode {
    EnvironmentNode {
        name: file.stem().to_string(),
        file: file.location(),
        variables: file.content.variables.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_defs::{DataSetDef, Language, PageElementDef};

    fn files() -> SourceFiles {
        let project = FileDef::new("", "demo.rmproj", ProjectDef::new("demo", Language::CSharp));
        let mut files = SourceFiles::new("/tmp/demo", project);

        files.pages.push(FileDef::new(
            "",
            "FillsScreen.page",
            PageDef {
                id: "page-1".to_string(),
                name: "FillsScreen".to_string(),
                description: String::new(),
                elements: vec![
                    PageEntryDef::Element(PageElementDef::new("frame", LocatorType::IFrame, "#f")),
                    PageEntryDef::Element(PageElementDef::new("name", LocatorType::RelativeCss, "[name='name']")),
                ],
            },
        ));
        files.pages.push(FileDef::new("a", "Login.page", PageDef::default()));
        files.pages.push(FileDef::new("b", "Login.page", PageDef::default()));

        files.routines.push(FileDef::new(
            "",
            "FillName.troutine",
            TestRoutineDef {
                name: "FillName".to_string(),
                data_sets: vec![DataSetDef::new("DataSet Number Two")],
                steps: vec![StepDef::action_per_dataset(
                    "FillsScreen",
                    "name",
                    "Input",
                    &[("DataSet Number Two", "Jane")],
                )],
                ..Default::default()
            },
        ));

        files.test_cases.push(FileDef::new(
            "",
            "fills.tcase",
            TestCaseDef {
                name: "fills".to_string(),
                steps: vec![
                    StepDef::action("page-1", "name", "input", "{{env.USER_NAME}}"),
                    StepDef::action("Missing", "name", "Click", ""),
                    StepDef::action("Login", "", "Click", ""),
                    StepDef::action("b/Login", "", "Click", ""),
                    StepDef::routine("FillName", "DataSet Number Two"),
                    StepDef::routine("Nope", "DataSet Number Two"),
                ],
                ..Default::default()
            },
        ));
        files
    }

    #[test]
    fn test_resolves_references() {
        let meta = SourceProjectMetadata::build(&files());
        let steps = &meta.test_cases[0].steps;

        match &steps[0] {
            StepNode::Action(step) => {
                assert_eq!(step.action, Some(ActionType::Input));
                assert_eq!(step.page, Reference::Resolved(PageId(0)));
                assert_eq!(step.element, Reference::Resolved(ElementId { page: PageId(0), index: 1 }));
                assert_eq!(step.data, StepData::Single(DataValue::Environment("USER_NAME".to_string())));
            }
            other => panic!("unexpected {:?}", other),
        }
        match &steps[4] {
            StepNode::RoutineCall(call) => {
                assert_eq!(call.routine, Reference::Resolved(RoutineId(0)));
                assert_eq!(call.dataset.resolved().map(|d| d.index), Some(0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_references_are_kept() {
        let meta = SourceProjectMetadata::build(&files());
        let steps = &meta.test_cases[0].steps;

        match &steps[1] {
            StepNode::Action(step) => {
                assert_eq!(step.page, Reference::Unresolved("Missing".to_string()));
                assert_eq!(step.element, Reference::Dependent("name".to_string()));
                assert_eq!(step.data, StepData::None);
            }
            other => panic!("unexpected {:?}", other),
        }
        match &steps[5] {
            StepNode::RoutineCall(call) => {
                assert_eq!(call.routine, Reference::Unresolved("Nope".to_string()));
                assert!(matches!(call.dataset, Reference::Dependent(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ambiguous_names_and_path_references() {
        let meta = SourceProjectMetadata::build(&files());
        let steps = &meta.test_cases[0].steps;

        assert!(matches!(&steps[2], StepNode::Action(s) if s.page == Reference::Ambiguous("Login".to_string())));
        assert!(matches!(&steps[3], StepNode::Action(s) if s.page == Reference::Resolved(PageId(2))));
    }

    #[test]
    fn test_relative_locator_anchor() {
        let meta = SourceProjectMetadata::build(&files());
        let page = meta.page(PageId(0));
        assert_eq!(page.elements[0].anchor, None);
        assert_eq!(page.elements[1].anchor, Some(0));
    }

    #[test]
    fn test_names_fall_back_to_file_stem() {
        let meta = SourceProjectMetadata::build(&files());
        assert_eq!(meta.page(PageId(1)).name, "Login");
        assert_eq!(meta.root_namespace(), "Demo");
    }

    #[test]
    fn test_parse_data_value() {
        assert_eq!(parse_data_value("{{ env.BASE_URL }}"), DataValue::Environment("BASE_URL".to_string()));
        assert_eq!(parse_data_value("x {{env.A}}"), DataValue::Literal("x {{env.A}}".to_string()));
    }
}
