//! fx-hedge-sim CLI
//!
//! Run hedging simulations and inspect the strategy catalog from the
//! command line.
//!
//! # Usage
//!
//! ```bash
//! # Simulate a request file
//! fx-hedge-sim run --input request.json
//!
//! # Full JSON report
//! fx-hedge-sim run --input request.json --format json --output report.json
//!
//! # Inspect schemas
//! fx-hedge-sim schema strategy protective_put --form
//!
//! # Presets and recommendations
//! fx-hedge-sim presets --pair EUR/USD
//! fx-hedge-sim recommend --input scenario.json
//! ```

use fx_hedge_sim::core::currency::CurrencyPair;
use fx_hedge_sim::core::error::SimulationError;
use fx_hedge_sim::core::params::ParamRecord;
use fx_hedge_sim::core::schema::{DefaultContext, ParameterSchema};
use fx_hedge_sim::exit::ExitKind;
use fx_hedge_sim::form::form_controls;
use fx_hedge_sim::scenario::path::PathSummary;
use fx_hedge_sim::scenario::presets::presets;
use fx_hedge_sim::scenario::recommend::recommend;
use fx_hedge_sim::scenario::ScenarioParameters;
use fx_hedge_sim::simulation::{SimulationConfig, SimulationReport, Simulator};
use fx_hedge_sim::strategy::StrategyKind;
use serde::Serialize;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"fx-hedge-sim — scenario-driven options hedging simulator

USAGE:
    fx-hedge-sim <COMMAND> [OPTIONS]

COMMANDS:
    run         Simulate a strategy along one generated price path
    schema      Show parameter schemas for scenarios, strategies or exits
    presets     List scenario presets for a currency pair
    recommend   Suggest strategies for a scenario
    help        Show this message

OPTIONS (run):
    --input <FILE>      Path to JSON simulation request
    --format <FORMAT>   Output format: text (default) or json
    --output <FILE>     Write to file instead of stdout

OPTIONS (schema):
    schema scenario [--form]
    schema strategy [ID] [--form]
    schema exit [ID] [--form]

OPTIONS (presets):
    --pair <PAIR>       Currency pair (default: USD/MXN)

OPTIONS (recommend):
    --input <FILE>      Path to JSON scenario record

EXAMPLES:
    fx-hedge-sim run --input request.json
    fx-hedge-sim run --input request.json --format json --output report.json
    fx-hedge-sim schema strategy long_call --form
    fx-hedge-sim presets --pair GBP/USD
    fx-hedge-sim recommend --input scenario.json

LOGGING:
    Set RUST_LOG=debug to trace path generation and exit decisions."#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn option_value(args: &[String], i: usize, flag: &str, expected: &str) -> String {
    args.get(i)
        .cloned()
        .unwrap_or_else(|| fail(format!("{} requires {}", flag, expected)))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str, example: &str) -> T {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!("{}", example);
        process::exit(1);
    })
}

fn report_error(err: SimulationError) -> ! {
    match &err {
        SimulationError::InvalidParameters { target, errors } => {
            eprintln!("Invalid {} parameters:", target);
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field, message);
            }
            process::exit(2);
        }
        _ => fail(&err),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(format!("serializing output: {}", e)))
}

const REQUEST_EXAMPLE: &str = r#"{
  "scenario": { "initial_price": 18.5, "time_horizon_years": 0.5, "direction": "down", "seed": 42 },
  "strategy": { "type": "protective_put", "params": { "underlying_quantity": 100000 } },
  "exit": { "type": "stop_loss", "params": { "stop_loss_percentage": -0.3 } }
}"#;

const SCENARIO_EXAMPLE: &str = r#"{ "direction": "down", "expected_magnitude": 0.2, "annual_volatility": 0.15 }"#;

fn cmd_run(args: &[String]) {
    let mut input_path = None;
    let mut output_path: Option<String> = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(option_value(args, i, "--input", "a file path"));
            }
            "--format" => {
                i += 1;
                format = option_value(args, i, "--format", "'text' or 'json'");
            }
            "--output" => {
                i += 1;
                output_path = Some(option_value(args, i, "--output", "a file path"));
            }
            _ => fail(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    let config: SimulationConfig = read_json(&path, REQUEST_EXAMPLE);

    let inputs = config.resolve().unwrap_or_else(|e| report_error(e));
    let result = Simulator::simulate(&inputs.scenario, &inputs.strategy, &inputs.exit)
        .unwrap_or_else(|e| report_error(e));
    let report = SimulationReport::new(inputs, result);

    let rendered = match format.as_str() {
        "json" => to_json(&report),
        "text" => render_report(&report),
        other => fail(format!("Unknown format '{}': expected 'text' or 'json'", other)),
    };

    if let Some(path) = output_path {
        fs::write(&path, &rendered).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Simulation {} → {}", report.id, path);
    } else {
        println!("{}", rendered);
    }
}

fn render_report(report: &SimulationReport) -> String {
    let scenario = &report.scenario;
    let result = &report.result.final_result;
    let PathSummary {
        final_price,
        total_return,
        max_drawdown,
        realized_volatility,
    } = report.path_summary;

    let mut out = String::new();
    out.push_str(&format!("Simulation {}\n", report.id));
    out.push_str(&format!(
        "Scenario:  {} from {:.4}, {} {:.1}% over {} trading days (vol {:.1}%)\n",
        scenario.currency_pair(),
        scenario.initial_price(),
        scenario.direction().as_str(),
        scenario.expected_magnitude() * 100.0,
        scenario.trading_days(),
        scenario.annual_volatility() * 100.0
    ));
    out.push_str(&format!(
        "Strategy:  {} (initial cost {:.4})\n",
        report.strategy.kind(),
        report.initial_cost
    ));
    out.push_str(&format!("Exit:      {}\n", report.exit.kind()));
    out.push_str(&format!(
        "Path:      final {:.4} ({:+.2}%), max drawdown {:.2}%, realized vol {:.1}%\n",
        final_price,
        total_return * 100.0,
        max_drawdown * 100.0,
        realized_volatility * 100.0
    ));
    out.push_str(&format!("Total P&L:       {:.4}\n", result.total_pnl));
    out.push_str(&format!("Max loss:        {:.4}\n", result.max_loss));
    out.push_str(&format!("Max gain:        {:.4}\n", result.max_gain));
    out.push_str(&format!("Win probability: {:.1}%\n", result.win_probability * 100.0));
    match (result.exit_day, &result.exit_reason) {
        (Some(day), Some(reason)) => out.push_str(&format!("Exited on day {}: {}", day, reason)),
        (Some(day), None) => out.push_str(&format!("Exited on day {}", day)),
        _ => out.push_str("Held to expiry"),
    }
    out
}

fn default_context() -> DefaultContext {
    ScenarioParameters::from_record(&ParamRecord::new())
        .map(|s| s.default_context())
        .unwrap_or_else(|e| report_error(e))
}

fn print_schema(schema: &ParameterSchema, form: bool, ctx: Option<&DefaultContext>) {
    if form {
        println!("{}", to_json(&form_controls(schema, ctx)));
    } else {
        println!("{}", to_json(schema));
    }
}

#[derive(Serialize)]
struct CatalogEntry {
    id: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    compatible_exits: Option<Vec<&'static str>>,
}

fn cmd_schema(args: &[String]) {
    let form = args.iter().any(|a| a == "--form");
    let positional: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with("--"))
        .collect();

    match positional.as_slice() {
        ["scenario"] => print_schema(&ScenarioParameters::schema(), form, None),
        ["strategy"] => {
            let entries: Vec<CatalogEntry> = StrategyKind::ALL
                .iter()
                .map(|kind| CatalogEntry {
                    id: kind.id(),
                    description: kind.description(),
                    compatible_exits: Some(kind.compatible_exit_policies().iter().map(|e| e.id()).collect()),
                })
                .collect();
            println!("{}", to_json(&entries));
        }
        ["strategy", id] => {
            let kind: StrategyKind = id.parse().unwrap_or_else(|e| report_error(e));
            print_schema(&kind.schema(), form, Some(&default_context()));
        }
        ["exit"] => {
            let entries: Vec<CatalogEntry> = ExitKind::ALL
                .iter()
                .map(|kind| CatalogEntry {
                    id: kind.id(),
                    description: kind.description(),
                    compatible_exits: None,
                })
                .collect();
            println!("{}", to_json(&entries));
        }
        ["exit", id] => {
            let kind: ExitKind = id.parse().unwrap_or_else(|e| report_error(e));
            print_schema(&kind.schema(), form, None);
        }
        _ => fail("usage: schema <scenario|strategy|exit> [ID] [--form]"),
    }
}

fn cmd_presets(args: &[String]) {
    let mut pair = CurrencyPair::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--pair" => {
                i += 1;
                let label = option_value(args, i, "--pair", "a pair such as EUR/USD");
                pair = label.parse().unwrap_or_else(|e| fail(e));
            }
            _ => fail(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    #[derive(Serialize)]
    struct PresetOutput {
        name: String,
        scenario: ScenarioParameters,
    }

    let output: Vec<PresetOutput> = presets(&pair)
        .unwrap_or_else(|e| report_error(e))
        .into_iter()
        .map(|(preset, scenario)| PresetOutput {
            name: preset.to_string(),
            scenario,
        })
        .collect();
    println!("{}", to_json(&output));
}

fn cmd_recommend(args: &[String]) {
    let mut input_path = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(option_value(args, i, "--input", "a file path"));
            }
            _ => fail(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    let record: ParamRecord = match input_path {
        Some(path) => read_json(&path, SCENARIO_EXAMPLE),
        None => ParamRecord::new(),
    };
    let scenario = ScenarioParameters::from_record(&record).unwrap_or_else(|e| report_error(e));

    let recommendations = recommend(&scenario);
    if recommendations.is_empty() {
        eprintln!("No strategy stands out for this scenario.");
    }
    println!("{}", to_json(&recommendations));
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "run" => cmd_run(rest),
        "schema" => cmd_schema(rest),
        "presets" => cmd_presets(rest),
        "recommend" => cmd_recommend(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
