//! qagen CLI - generates Playwright test projects from authored test definitions

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use qagen::codegen::manifest::{build_manifest, read_manifest, record_failure};
use qagen::codegen::naming::NamedProject;
use qagen::codegen::progress::LogProgressSink;
use qagen::codegen::source_meta::StepNode;
use qagen::codegen::validation::validate_project;
use qagen::codegen::{
    create_generator, load_project, CodegenOrchestrator, CodegenState, GeneratorOptions, ProgressEvent,
    ProgressSink, SourceProjectMetadata,
};
use qagen::file_defs::StandardFolder;

#[derive(Parser)]
#[command(name = "qagen")]
#[command(version, about = "Generates Playwright test projects from authored test definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the project and generate the output project
    Generate {
        /// Project directory containing the .rmproj file
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Output directory (default: <project>/output-code)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Environment script flavor (sh, bat)
        #[arg(short, long)]
        script_flavor: Option<String>,
    },

    /// Validate the project without generating code
    Validate {
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },

    /// Print a JSON summary of the resolved project graph
    SourceMetadata {
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },

    /// Print the output manifest a generation would write, without writing code
    OutputMetadata {
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        #[arg(short, long)]
        script_flavor: Option<String>,
    },

    /// Print the manifest of a generated project
    ShowMetadata {
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Progress sink that also keeps a plain-text log of the run
struct RunLog {
    inner: LogProgressSink,
    file: Mutex<File>,
}

impl RunLog {
    fn create(project_dir: &Path) -> Result<(Self, PathBuf), String> {
        let dir = project_dir.join(StandardFolder::LOGS);
        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("gen-code.{}.log", stamp));
        let file = File::create(&path).map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
        Ok((
            Self {
                inner: LogProgressSink,
                file: Mutex::new(file),
            },
            path,
        ))
    }

    fn append(&self, line: &str) {
        if let Ok(mut file) = self.file.lock() {
            if let Err(e) = writeln!(file, "{}", line) {
                tracing::warn!("Failed to write run log: {}", e);
            }
        }
    }
}

impl ProgressSink for RunLog {
    fn notify(&self, event: &ProgressEvent) {
        self.inner.notify(event);
        self.append(&format!("[{}] [{}] {}", chrono::Local::now().format("%H:%M:%S"), event.phase, event.log));
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            project,
            output,
            script_flavor,
        } => generate(project, output, script_flavor).await,
        Commands::Validate { project } => validate(project),
        Commands::SourceMetadata { project } => source_metadata(project),
        Commands::OutputMetadata { project, script_flavor } => output_metadata(project, script_flavor),
        Commands::ShowMetadata { project, output } => show_metadata(project, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn generate(project_dir: PathBuf, output: Option<PathBuf>, script_flavor: Option<String>) -> Result<(), String> {
    let options = GeneratorOptions::resolve(&project_dir, output, script_flavor)?;
    let output_dir = options.output_dir.clone();
    let files = load_project(&project_dir).map_err(|e| e.to_string())?;
    let (run_log, log_path) = RunLog::create(&project_dir)?;

    let mut orchestrator = CodegenOrchestrator::new(options);
    let outcome = orchestrator.run(&files, &run_log).await;

    match serde_json::to_string_pretty(&outcome) {
        Ok(summary) => run_log.append(&summary),
        Err(e) => tracing::warn!("Failed to serialize run summary: {}", e),
    }

    match outcome.state {
        CodegenState::Done => {
            println!("✓ {}", outcome.message);
            println!("  Log: {}", log_path.display());
            Ok(())
        }
        CodegenState::ValidationFailed => {
            if let Some(report) = &outcome.report {
                for violation in report.iter() {
                    eprintln!("  {}", violation);
                }
            }
            Err(outcome.message)
        }
        _ => {
            if let Err(e) = record_failure(&output_dir, &outcome.message, outcome.data.clone()) {
                tracing::error!("Failed to record the failure in the manifest: {}", e);
            }
            Err(outcome.message)
        }
    }
}

fn validate(project_dir: PathBuf) -> Result<(), String> {
    let files = load_project(&project_dir).map_err(|e| e.to_string())?;
    let meta = SourceProjectMetadata::build(&files);
    match validate_project(meta) {
        Ok(validated) => {
            println!("✓ Project is valid for {}", validated.target());
            Ok(())
        }
        Err(report) => {
            for violation in report.iter() {
                eprintln!("  {}", violation);
            }
            Err(format!("{} validation error(s)", report.len()))
        }
    }
}

fn source_metadata(project_dir: PathBuf) -> Result<(), String> {
    let files = load_project(&project_dir).map_err(|e| e.to_string())?;
    let meta = SourceProjectMetadata::build(&files);

    let pages: Vec<_> = meta
        .pages
        .iter()
        .map(|page| {
            json!({
                "id": page.id,
                "name": page.name,
                "file": page.file.rel_path(),
                "elements": page.elements.iter().map(|e| json!({
                    "name": e.name,
                    "findBy": e.locator_type.to_string(),
                    "locator": e.locator,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();
    let step_counts = |steps: &[StepNode]| {
        let actions = steps.iter().filter(|s| matches!(s, StepNode::Action(_))).count();
        let routines = steps.iter().filter(|s| matches!(s, StepNode::RoutineCall(_))).count();
        json!({ "actions": actions, "routineCalls": routines })
    };
    let cases: Vec<_> = meta
        .test_cases
        .iter()
        .map(|case| {
            json!({
                "id": case.id,
                "name": case.name,
                "file": case.file.rel_path(),
                "steps": step_counts(&case.steps),
            })
        })
        .collect();
    let routines: Vec<_> = meta
        .routines
        .iter()
        .map(|routine| {
            json!({
                "id": routine.id,
                "name": routine.name,
                "file": routine.file.rel_path(),
                "steps": step_counts(&routine.steps),
                "dataSets": routine.data_sets.iter().map(|ds| ds.name.clone()).collect::<Vec<_>>(),
            })
        })
        .collect();
    let suites: Vec<_> = meta
        .suites
        .iter()
        .map(|suite| {
            let cases: Vec<&str> = suite
                .cases
                .iter()
                .filter_map(|reference| reference.resolved())
                .map(|id| meta.test_case(id).name.as_str())
                .collect();
            json!({ "id": suite.id, "name": suite.name, "file": suite.file.rel_path(), "cases": cases })
        })
        .collect();
    let environments: Vec<_> = meta
        .environments
        .iter()
        .map(|env| {
            json!({
                "name": env.name,
                "file": env.file.rel_path(),
                "variables": env.variables.keys().collect::<Vec<_>>(),
            })
        })
        .collect();

    let summary = json!({
        "project": meta.project_name(),
        "target": meta.target().map(|t| t.to_string()).unwrap_or_else(|e| e.to_string()),
        "rootNamespace": meta.root_namespace(),
        "pages": pages,
        "cases": cases,
        "routines": routines,
        "suites": suites,
        "environments": environments,
        "environmentVariables": meta.environment_variables,
    });
    let text = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn output_metadata(project_dir: PathBuf, script_flavor: Option<String>) -> Result<(), String> {
    let options = GeneratorOptions::resolve(&project_dir, None, script_flavor)?;
    let files = load_project(&project_dir).map_err(|e| e.to_string())?;
    let validated = validate_project(SourceProjectMetadata::build(&files))
        .map_err(|report| format!("Project is not valid:\n{}", report))?;
    let project = NamedProject::resolve(validated, options.script_flavor).map_err(|e| e.to_string())?;
    let generator = create_generator(project.target());
    let manifest = build_manifest(generator.as_ref(), &project);
    let text = serde_json::to_string_pretty(&manifest).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn show_metadata(project_dir: PathBuf, output: Option<PathBuf>) -> Result<(), String> {
    let options = GeneratorOptions::resolve(&project_dir, output, None)?;
    let manifest = read_manifest(&options.output_dir).map_err(|e| e.to_string())?;
    let text = serde_json::to_string_pretty(&manifest).map_err(|e| e.to_string())?;
    println!("{}", text);
    if let Some(error) = &manifest.error {
        return Err(format!("Last generation failed: {}", error.message));
    }
    Ok(())
}
