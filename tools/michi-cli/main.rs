use clap::{Args, Parser, Subcommand};
use michi::describe::Describer;
use michi::instance::{InstanceCursor, StepRunner};
use michi::mapping::{MappingExecutor, MappingPolicy, NonNumericPolicy, UnresolvedRulePolicy};
use michi::repository::{DocumentRepository, FileStore, ProcessContext};
use michi::value::ValueRecord;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Validate, route and apply the data mappings of stored workflow processes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log evaluation details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report structural problems of a process's workflow
    Validate(ProcessArgs),
    /// Decide which step follows a completed step
    Route {
        #[command(flatten)]
        process: ProcessArgs,
        /// The completed step; omit to find the first step
        #[arg(short, long)]
        step: Option<String>,
        /// Path to the instance record JSON
        #[arg(short, long)]
        record: Option<String>,
    },
    /// Apply a step's data mappings to a record and print the result
    Apply {
        #[command(flatten)]
        process: ProcessArgs,
        #[arg(short, long)]
        step: String,
        /// Path to the instance record JSON
        #[arg(short, long)]
        record: String,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Complete the current step of many instances at once
    Advance {
        #[command(flatten)]
        process: ProcessArgs,
        /// Path to a JSON array of instance cursors
        #[arg(short, long)]
        instances: String,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Print every step with its routing and data mappings in readable form
    Describe(ProcessArgs),
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Path to the designer document JSON file
    #[arg(short, long)]
    document: String,
    /// Id of the process inside the document
    #[arg(short, long)]
    process: String,
}

#[derive(Args, Debug)]
struct PolicyArgs {
    /// Skip mappings whose gating rule no longer exists instead of applying them
    #[arg(long)]
    skip_unresolved_rules: bool,
    /// Skip add/subtract mappings with a non-numeric operand instead of counting it as zero
    #[arg(long)]
    skip_non_numeric: bool,
}

impl PolicyArgs {
    fn policy(&self) -> MappingPolicy {
        MappingPolicy {
            unresolved_rule: if self.skip_unresolved_rules {
                UnresolvedRulePolicy::Skip
            } else {
                UnresolvedRulePolicy::ApplyAlways
            },
            non_numeric: if self.skip_non_numeric {
                NonNumericPolicy::SkipMapping
            } else {
                NonNumericPolicy::ZeroContribution
            },
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Validate(args) => run_validate(&args),
        Command::Route {
            process,
            step,
            record,
        } => run_route(&process, step.as_deref(), record.as_deref()),
        Command::Apply {
            process,
            step,
            record,
            policy,
        } => run_apply(&process, &step, &record, policy.policy()),
        Command::Advance {
            process,
            instances,
            policy,
        } => run_advance(&process, &instances, policy.policy()),
        Command::Describe(args) => run_describe(&args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the document through a file store rooted at its directory.
fn load_process(args: &ProcessArgs) -> ProcessContext {
    let path = Path::new(&args.document);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let key = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_else(|| exit_with_error(&format!("Invalid document path '{}'", args.document)));

    let repository = DocumentRepository::with_key(FileStore::new(dir), key);
    repository
        .load_process(&args.process)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn load_record(path: &str) -> ValueRecord {
    let raw = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read record file '{}': {}", path, e)));
    serde_json::from_str(&raw)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse record JSON: {}", e)))
}

fn run_validate(args: &ProcessArgs) {
    let context = load_process(args);
    let errors = context.workflow.validate();
    if errors.is_empty() {
        println!(
            "Workflow '{}' is valid ({} steps)",
            context.workflow.name,
            context.workflow.len()
        );
        return;
    }
    println!("Workflow '{}' has problems:", context.workflow.name);
    for error in &errors {
        println!("  - {}", error);
    }
    std::process::exit(2);
}

fn run_route(args: &ProcessArgs, step: Option<&str>, record_path: Option<&str>) {
    let context = load_process(args);
    let record = record_path.map(load_record).unwrap_or_default();

    let decision = context
        .workflow
        .resolve_next_step(step, &record, &context.fields);

    match &decision.next_step_id {
        Some(next) => {
            let name = context.workflow.step(next).map_or(next.as_str(), |s| s.name.as_str());
            println!("  -> Next step: {} ({})", name, next);
        }
        None => println!("  -> Workflow ends"),
    }
    println!("  -> Via: {}", decision.via);
    println!("  -> Reason: {}", decision.reason);
}

fn run_apply(args: &ProcessArgs, step_id: &str, record_path: &str, policy: MappingPolicy) {
    let context = load_process(args);
    let step = context
        .workflow
        .step(step_id)
        .unwrap_or_else(|| exit_with_error(&format!("Step '{}' not found", step_id)));
    let record = load_record(record_path);

    let report = MappingExecutor::new(&context.fields, &context.rules)
        .with_policy(policy)
        .apply_with_report(&step.mappings.data, &record);

    for outcome in report.outcomes.iter().filter(|o| !o.applied()) {
        if let Some(reason) = &outcome.skipped {
            eprintln!("skipped '{}': {}", outcome.mapping_id, reason);
        }
    }
    let output = serde_json::to_string_pretty(&report.record)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize record: {}", e)));
    println!("{}", output);
}

fn run_advance(args: &ProcessArgs, instances_path: &str, policy: MappingPolicy) {
    let context = load_process(args);
    let raw = fs::read_to_string(instances_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read instances file '{}': {}",
            instances_path, e
        ))
    });
    let cursors: Vec<InstanceCursor> = serde_json::from_str(&raw)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse instances JSON: {}", e)));

    let start = Instant::now();
    let advances = StepRunner::from_context(&context)
        .with_policy(policy)
        .advance_all(&cursors);
    let duration = start.elapsed();

    let finished = advances.iter().filter(|a| a.is_finished()).count();
    let next: Vec<InstanceCursor> = advances.into_iter().map(|a| a.into_cursor()).collect();
    let output = serde_json::to_string_pretty(&next)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize instances: {}", e)));
    println!("{}", output);

    eprintln!("\n--- Advance Summary ---");
    eprintln!("Instances:  {}", next.len());
    eprintln!("Finished:   {}", finished);
    eprintln!("Evaluation: {:?}", duration);
}

fn run_describe(args: &ProcessArgs) {
    let context = load_process(args);
    let describer = Describer::new(&context.fields).with_datasets(&context.datasets);

    println!("{}", context.workflow.name);
    for step in context.workflow.ordered_steps() {
        println!("\n{}. {} [{}]", step.order, step.name, step.status);
        for routing in &step.mappings.routing {
            let target = routing
                .target()
                .map(|id| context.workflow.step(id).map_or(id, |s| s.name.as_str()))
                .unwrap_or("end");
            let condition = describer.describe_rule(routing.rule.as_ref());
            if condition.is_empty() {
                println!("   route '{}' -> {}", routing.name, target);
            } else {
                println!("   route '{}' when {} -> {}", routing.name, condition, target);
            }
        }
        for mapping in &step.mappings.data {
            let gate = mapping
                .gating_rule()
                .map(|id| format!(" (if rule '{}')", id))
                .unwrap_or_default();
            let disabled = if mapping.enabled { "" } else { " [disabled]" };
            println!(
                "   data {}{}{}",
                describer.describe_mapping(mapping),
                gate,
                disabled
            );
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
