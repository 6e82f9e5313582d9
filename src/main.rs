//! Tank simulator entry point: CLI wiring and scenario-driven runs.

use std::path::Path;
use std::process;

use chrono::Local;

use raintank_sim::config::ScenarioConfig;
use raintank_sim::forecast::{RainfallForecast, SyntheticRainfall};
use raintank_sim::io::export::{export_comparison_json, export_csv, export_json};
use raintank_sim::runner::{ControllerKind, run_comparison, run_simulation};
use raintank_sim::sim::kpi::KpiReport;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    forecast_csv: Option<String>,
    controller: Option<String>,
    seed_override: Option<u64>,
    csv_out: Option<String>,
    json_out: Option<String>,
}

fn print_help() {
    eprintln!("raintank-sim — rainwater-harvesting tank simulator");
    eprintln!();
    eprintln!("Usage: raintank-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>     Load scenario from TOML config file");
    eprintln!("  --preset <name>       Use a built-in preset (baseline, drought, monsoon)");
    eprintln!("  --forecast <path>     Read rainfall forecast from CSV (date,rainfall_mm)");
    eprintln!("  --controller <name>   Override controller: pi, fuzzy, or both");
    eprintln!("  --seed <u64>          Override synthetic forecast seed");
    eprintln!("  --out <path>          Export daily records to CSV (single controller)");
    eprintln!("  --json-out <path>     Export results to JSON");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        forecast_csv: None,
        controller: None,
        seed_override: None,
        csv_out: None,
        json_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--forecast" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --forecast requires a path argument");
                    process::exit(1);
                }
                cli.forecast_csv = Some(args[i].clone());
            }
            "--controller" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --controller requires a name argument");
                    process::exit(1);
                }
                cli.controller = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out requires a path argument");
                    process::exit(1);
                }
                cli.csv_out = Some(args[i].clone());
            }
            "--json-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --json-out requires a path argument");
                    process::exit(1);
                }
                cli.json_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Builds the forecast from the scenario's configured source.
fn build_forecast(scenario: &ScenarioConfig) -> RainfallForecast {
    let fc = &scenario.forecast;
    let result = match fc.source.as_str() {
        "csv" => {
            // Validation guarantees a path is present for the csv source.
            let path = fc.csv_path.as_deref().unwrap_or_default();
            RainfallForecast::from_csv_path(Path::new(path))
        }
        _ => {
            let start = fc
                .start_date
                .unwrap_or_else(|| Local::now().date_naive());
            SyntheticRainfall::new(fc.wet_day_probability, fc.max_rain_mm, fc.seed)
                .generate(start, fc.days)
        }
    };

    match result {
        Ok(forecast) => forecast,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply CLI overrides
    if let Some(controller) = cli.controller {
        scenario.simulation.controller = controller;
    }
    if let Some(seed) = cli.seed_override {
        scenario.forecast.seed = seed;
    }
    if let Some(path) = cli.forecast_csv {
        scenario.forecast.source = "csv".to_string();
        scenario.forecast.csv_path = Some(path);
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let tank_config = match scenario.tank.to_tank_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    let forecast = build_forecast(&scenario);

    if scenario.simulation.controller == "both" {
        if cli.csv_out.is_some() {
            eprintln!("error: --out is for single-controller runs; use --json-out with \"both\"");
            process::exit(1);
        }

        let comparison = run_comparison(&tank_config, &forecast);

        println!("PI controller:");
        for r in &comparison.pi_results {
            println!("{r}");
        }
        println!("\n{}", KpiReport::from_records(&comparison.pi_results));

        println!("\nFuzzy controller:");
        for r in &comparison.fuzzy_results {
            println!("{r}");
        }
        println!("\n{}", KpiReport::from_records(&comparison.fuzzy_results));

        if let Some(ref path) = cli.json_out {
            if let Err(e) = export_comparison_json(&comparison, Path::new(path)) {
                eprintln!("error: failed to write JSON: {e}");
                process::exit(1);
            }
            eprintln!("Comparison written to {path}");
        }
        return;
    }

    // Validation leaves only "pi" and "fuzzy" at this point.
    let kind = match ControllerKind::from_name(&scenario.simulation.controller) {
        Some(kind) => kind,
        None => {
            eprintln!(
                "error: unsupported controller \"{}\"",
                scenario.simulation.controller
            );
            process::exit(1);
        }
    };

    let records = run_simulation(&tank_config, &forecast, kind);

    for r in &records {
        println!("{r}");
    }
    println!("\n{}", KpiReport::from_records(&records));

    if let Some(ref path) = cli.csv_out {
        if let Err(e) = export_csv(&records, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Records written to {path}");
    }
    if let Some(ref path) = cli.json_out {
        if let Err(e) = export_json(&records, Path::new(path)) {
            eprintln!("error: failed to write JSON: {e}");
            process::exit(1);
        }
        eprintln!("Records written to {path}");
    }
}
