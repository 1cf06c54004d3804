use chrono::{Duration, NaiveDate};
use clap::Parser;
use michi::field::{DatasetCatalog, Field, FieldType, choice_options};
use michi::instance::InstanceCursor;
use michi::repository::{DesignerDocument, ProcessContext};
use michi::value::ValueRecord;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use serde_json::{Value, json};
use std::fs;

const WORDS: [&str; 8] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
];

/// A CLI tool to generate instance records for the michi step runner
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the designer document JSON file
    #[arg(short, long)]
    document: String,

    /// Id of the process whose fields are populated
    #[arg(short, long)]
    process: String,

    /// The step every generated instance has just completed; omit for fresh instances
    #[arg(short, long)]
    step: Option<String>,

    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_instances.json")]
    output: String,

    /// How many instances to generate
    #[arg(short, long, default_value_t = 100)]
    count: usize,

    /// Probability that a field is left out of a record
    #[arg(long, default_value_t = 0.1)]
    missing: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rng();

    if !(0.0..=1.0).contains(&cli.missing) {
        eprintln!("Error: --missing ({}) must be between 0 and 1", cli.missing);
        std::process::exit(1);
    }

    let document: DesignerDocument = serde_json::from_str(&fs::read_to_string(&cli.document)?)?;
    let Some(context) = document.context(&cli.process) else {
        eprintln!("Error: process '{}' not found in '{}'", cli.process, cli.document);
        std::process::exit(1);
    };

    let fields = context.fields.mapping_fields();
    println!(
        "Generating {} instance(s) over {} field(s) of process '{}'...",
        cli.count,
        fields.len(),
        cli.process
    );

    let instances: Vec<InstanceCursor> = (0..cli.count)
        .map(|n| InstanceCursor {
            instance_id: format!("instance-{:05}", n + 1),
            current_step_id: cli.step.clone(),
            data: generate_record(&mut rng, &context, cli.missing),
        })
        .collect();

    let json_output = serde_json::to_string_pretty(&instances)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved instances to '{}'",
        cli.output
    );

    Ok(())
}

fn generate_record(rng: &mut ThreadRng, context: &ProcessContext, missing: f64) -> ValueRecord {
    let mut record = ValueRecord::new();
    for field in context.fields.mapping_fields() {
        if rng.random_bool(missing) {
            continue;
        }
        if let Some(value) = generate_value(rng, field, &context.datasets) {
            record.insert(field.id.clone(), value);
        }
    }
    record
}

fn generate_value(rng: &mut ThreadRng, field: &Field, datasets: &DatasetCatalog) -> Option<Value> {
    let value = match field.field_type {
        FieldType::Number => json!(rng.random_range(0..1000)),
        FieldType::Currency => json!((rng.random_range(0.0..10_000.0_f64) * 100.0).round() / 100.0),
        FieldType::Date => {
            let base = NaiveDate::from_ymd_opt(2024, 1, 1)?;
            let date = base + Duration::days(rng.random_range(0..730));
            json!(date.format("%Y-%m-%d").to_string())
        }
        FieldType::Text | FieldType::Textarea => json!(random_word(rng)),
        FieldType::Email => json!(format!("{}@example.com", random_word(rng))),
        FieldType::Select | FieldType::Dropdown => {
            let options = choice_options(field, datasets);
            json!(options.choose(rng)?.value())
        }
        FieldType::YesNo => json!(if rng.random_bool(0.5) { "Yes" } else { "No" }),
        FieldType::Checkbox => json!(rng.random_bool(0.5)),
        FieldType::User => json!(format!("user_{}", rng.random_range(1..=20))),
        FieldType::Users => {
            let count = rng.random_range(1..=3);
            json!((0..count)
                .map(|_| format!("user_{}", rng.random_range(1..=20)))
                .collect::<Vec<_>>())
        }
        FieldType::Id => return None,
    };
    Some(value)
}

fn random_word(rng: &mut ThreadRng) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("alpha")
}
