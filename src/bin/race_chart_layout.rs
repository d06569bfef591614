use std::fs;
use std::path::PathBuf;

use race_chart::ChartConfig;
use race_chart::api::compute_layout;
use race_chart::ingest::normalize_csv;

const USAGE: &str = "usage: race_chart_layout --input <csv> [--config <json>] [--output <json>]";

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn main() {
    let _ = race_chart::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            ChartConfig::from_json_str(&raw).map_err(|err| err.to_string())?
        }
        None => ChartConfig::default(),
    };

    let file = fs::File::open(&args.input)
        .map_err(|err| format!("failed to open `{}`: {err}", args.input.display()))?;
    let dataset = normalize_csv(file).map_err(|err| err.to_string())?;
    if !dataset.dropped.is_empty() {
        eprintln!("skipped {} unusable row(s)", dataset.dropped.len());
    }
    if dataset.is_empty() {
        println!("no data");
        return Ok(());
    }

    let layout = compute_layout(&dataset.records, &config).map_err(|err| err.to_string())?;
    let json = layout.to_json_pretty().map_err(|err| err.to_string())?;
    match &args.output {
        Some(path) => fs::write(path, json)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut input = None::<PathBuf>;
    let mut config = None::<PathBuf>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --input".to_owned())?;
                input = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                config = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`\n{USAGE}")),
        }
    }

    let input = input.ok_or_else(|| format!("missing --input\n{USAGE}"))?;
    Ok(CliArgs {
        input,
        config,
        output,
    })
}
