use clap::{Args, Parser, Subcommand, ValueEnum};
use keikaku::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeCli {
    Create,
    Patch,
}

impl From<ModeCli> for ExecutionMode {
    fn from(mode: ModeCli) -> Self {
        match mode {
            ModeCli::Create => ExecutionMode::Create,
            ModeCli::Patch => ExecutionMode::Patch,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum FormatCli {
    #[default]
    Text,
    Json,
}

/// Plan, order and narrate node-based project workflows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Args, Debug)]
struct DocumentArgs {
    /// Path to the workflow document JSON file (a built-in sample is used when omitted)
    document: Option<String>,

    /// Override the execution mode stored in the document
    #[arg(short, long, value_enum)]
    mode: Option<ModeCli>,

    /// Revision state file; overrides the planning context stored in the document
    #[arg(short, long)]
    state: Option<String>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Show the RUN/SKIP/BLOCKED verdict for every node
    Plan {
        #[command(flatten)]
        args: DocumentArgs,
        #[arg(short, long, value_enum, default_value_t)]
        format: FormatCli,
    },
    /// Print the nodes in dependency order
    Sort {
        #[command(flatten)]
        args: DocumentArgs,
    },
    /// Generate the instruction prompt for the AI coding agent
    Prompt {
        #[command(flatten)]
        args: DocumentArgs,
        /// Mention attached spec documents by name only
        #[arg(long)]
        no_specs: bool,
    },
    /// Report dangling connections, duplicate ids and cycles
    Validate {
        #[command(flatten)]
        args: DocumentArgs,
    },
    /// Record a finished run and advance the revision in the state file
    Commit {
        #[command(flatten)]
        args: DocumentArgs,
        /// Node ids whose actions failed (all other RUN nodes count as succeeded)
        #[arg(long, value_delimiter = ',')]
        failed: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keikaku=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        CliCommand::Plan { args, format } => run_plan(args, format),
        CliCommand::Sort { args } => run_sort(args),
        CliCommand::Prompt { args, no_specs } => run_prompt(args, no_specs),
        CliCommand::Validate { args } => run_validate(args),
        CliCommand::Commit { args, failed } => run_commit(args, failed),
    }
}

/// Loads the document and folds in the state file and CLI overrides.
fn load_document(args: &DocumentArgs) -> WorkflowDocument {
    let start = Instant::now();
    let mut document = match &args.document {
        Some(path) => WorkflowDocument::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load workflow: {}", e))),
        None => {
            info!("no workflow document provided, using the built-in sample");
            WorkflowDocument::sample()
        }
    };

    if let Some(path) = &args.state {
        let store = FileStore::new(path);
        match store.load() {
            Ok(Some(state)) => document.apply_state(&state),
            Ok(None) => info!(path = %path, "state file not found, starting from document state"),
            Err(e) => exit_with_error(&format!("Failed to load state: {}", e)),
        }
    }
    if let Some(mode) = args.mode {
        document.mode = mode.into();
    }

    debug!(
        nodes = document.workflow.nodes.len(),
        connections = document.workflow.connections.len(),
        elapsed = ?start.elapsed(),
        "loaded workflow document"
    );
    document
}

fn run_plan(args: DocumentArgs, format: FormatCli) {
    let document = load_document(&args);
    let start = Instant::now();
    let plan = document.plan();
    debug!(elapsed = ?start.elapsed(), "generated plan");

    match format {
        FormatCli::Text => print!("{}", PlanFormatter::format_plan(&plan)),
        FormatCli::Json => {
            let json = serde_json::to_string_pretty(&plan)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode plan: {}", e)));
            println!("{}", json);
        }
    }
}

fn run_sort(args: DocumentArgs) {
    let document = load_document(&args);
    let workflow = &document.workflow;
    for (position, node) in topological_sort(&workflow.nodes, &workflow.connections)
        .into_iter()
        .enumerate()
    {
        println!("{:>3}. {} ({})", position + 1, node.title, node.id);
    }
}

fn run_prompt(args: DocumentArgs, no_specs: bool) {
    let document = load_document(&args);
    let plan = document.plan();
    let generator = PromptGenerator::new(&document.workflow);
    let generator = if no_specs {
        generator.without_specs()
    } else {
        generator
    };
    print!("{}", generator.generate(&plan));
}

fn run_validate(args: DocumentArgs) {
    let document = load_document(&args);
    let warnings = validate(&document.workflow);
    if warnings.is_empty() {
        println!("Workflow is valid.");
        return;
    }
    println!("{} warning(s):", warnings.len());
    for warning in &warnings {
        println!("  - {}", warning);
    }
}

fn run_commit(args: DocumentArgs, failed: Vec<String>) {
    let Some(state_path) = args.state.clone() else {
        exit_with_error("A --state file is required to commit.");
    };
    let document = load_document(&args);

    let store = FileStore::new(&state_path);
    if let Err(e) = store.save(&document.revision_state()) {
        exit_with_error(&format!("Failed to write state: {}", e));
    }

    let mut session = WorkflowSession::open(document.workflow, store)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to open session: {}", e)));
    let plan = session.plan();

    let mut report = ExecutionReport::all_succeeded(&plan);
    for node_id in &failed {
        report.failed(node_id.clone(), "reported as failed");
    }

    let summary = session
        .commit(&plan, &report)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to commit: {}", e)));

    println!(
        "Committed revision {} ({} node(s) completed, {} failed).",
        summary.revision,
        summary.completed.len(),
        summary.failed.len()
    );

    if let Some(path) = &args.document {
        let mut updated = WorkflowDocument {
            workflow: session.workflow().clone(),
            ..Default::default()
        };
        updated.apply_state(session.state());
        let json = updated
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode workflow: {}", e)));
        fs::write(path, json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e)));
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
