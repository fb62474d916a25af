//! Command-line interface for annot
//!
//! Usage:
//!   annot process `<path>` [--config `<config>`] [--pretty]  - Annotate one text file
//!   annot batch `<path>` [--concurrency `<n>`]               - Annotate one text per input line
//!   annot stages [--config `<config>`]                       - List the configured stages
//!
//! `process` and `batch` print the resulting contexts as JSON on stdout.
//! Pass `-` as the path to read from stdin.

use annot::{BatchOptions, Pipeline, PipelineConfig};
use clap::{Arg, ArgAction, Command};
use std::io::Read;

#[tokio::main]
async fn main() {
    env_logger::init();

    let matches = Command::new("annot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Deterministic text annotation: tokens, entities, sentences")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("process")
                .about("Annotate the contents of one file")
                .arg(
                    Arg::new("path")
                        .help("Path to the text file, or '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Path to a JSON pipeline configuration"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .help("Pretty-print the JSON output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Annotate each line of a file as its own text")
                .arg(
                    Arg::new("path")
                        .help("Path to the input file, or '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Path to a JSON pipeline configuration"),
                )
                .arg(
                    Arg::new("concurrency")
                        .long("concurrency")
                        .short('n')
                        .help("Number of concurrent workers")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("stages")
                .about("List the stages the configuration enables, in run order")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Path to a JSON pipeline configuration"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("process", process_matches)) => {
            let path = process_matches.get_one::<String>("path").unwrap();
            let config = load_config(process_matches.get_one::<String>("config"));
            let pretty = process_matches.get_flag("pretty");
            handle_process_command(path, config, pretty).await;
        }
        Some(("batch", batch_matches)) => {
            let path = batch_matches.get_one::<String>("path").unwrap();
            let config = load_config(batch_matches.get_one::<String>("config"));
            let concurrency = batch_matches.get_one::<usize>("concurrency").copied();
            handle_batch_command(path, config, concurrency).await;
        }
        Some(("stages", stages_matches)) => {
            let config = load_config(stages_matches.get_one::<String>("config"));
            handle_stages_command(config);
        }
        _ => unreachable!(),
    }
}

/// Handle the process command
async fn handle_process_command(path: &str, config: PipelineConfig, pretty: bool) {
    let text = read_input(path);
    let pipeline = Pipeline::with_config(config);
    let ctx = pipeline.process(&text).await.unwrap_or_else(|e| {
        eprintln!("Processing error: {}", e);
        std::process::exit(1);
    });

    let output = if pretty {
        serde_json::to_string_pretty(&ctx)
    } else {
        serde_json::to_string(&ctx)
    }
    .unwrap_or_else(|e| {
        eprintln!("Serialization error: {}", e);
        std::process::exit(1);
    });
    println!("{}", output);
}

/// Handle the batch command: one JSON context per input line, in input order.
async fn handle_batch_command(path: &str, config: PipelineConfig, concurrency: Option<usize>) {
    let texts: Vec<String> = read_input(path).lines().map(str::to_string).collect();
    let pipeline = Pipeline::with_config(config);
    let results = pipeline
        .process_batch(&texts, BatchOptions { concurrency })
        .await
        .unwrap_or_else(|e| {
            eprintln!("Batch error: {}", e);
            std::process::exit(1);
        });

    for ctx in &results {
        match serde_json::to_string(ctx) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Handle the stages command
fn handle_stages_command(config: PipelineConfig) {
    let pipeline = Pipeline::with_config(config);
    println!("Configured stages:\n");
    for name in pipeline.stage_names() {
        println!("  {}", name);
    }
}

fn load_config(path: Option<&String>) -> PipelineConfig {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&raw).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => PipelineConfig::default(),
    }
}

fn read_input(path: &str) -> String {
    if path == "-" {
        let mut buffer = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
            eprintln!("Error reading stdin: {}", e);
            std::process::exit(1);
        }
        buffer
    } else {
        std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        })
    }
}
