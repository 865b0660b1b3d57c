#![doc = include_str!("../README.md")]

mod cli;

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use sequent_harness::report::render_text;
use sequent_harness::{run_suite, HarnessConfig};
use sequent_provers::backends::BackendKind;
use sequent_theory::Dialect;

/// Exit status for bad usage: arguments, files, selection, prover launch.
const EXIT_USAGE: i32 = 2;
/// Exit status when at least one test misses its expectation.
const EXIT_TEST_FAILURES: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(report) => {
            eprintln!("{report:?}");
            std::process::exit(EXIT_USAGE);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> miette::Result<i32> {
    let format = parse_output_format(&cli.format)?;
    let dialect = resolve_dialect(&cli)?;

    let source = fs::read_to_string(&cli.theory_file)
        .map_err(|err| {
            miette::miette!(
                "could not read theory file `{}`: {err}",
                cli.theory_file.display()
            )
        })?;
    let filename = cli.theory_file.display().to_string();
    let doc = sequent_theory::parse(&source, &filename, dialect)?;
    tracing::debug!(
        tests = doc.test_cases.len(),
        dialect = dialect.as_str(),
        "parsed theory document"
    );

    if cli.dry_run {
        println!("Test cases in {filename}:");
        for case in &doc.test_cases {
            println!(
                "  #{} {} (line {}, expect {})",
                case.index,
                case.name,
                case.line,
                case.polarity.as_str()
            );
        }
        return Ok(0);
    }

    let config = config_from_cli(&cli, dialect);
    let backend = config.backend(dialect);
    let report = run_suite(
        &doc,
        &source,
        &filename,
        &cli.tests,
        &config,
        backend.as_ref(),
    )
    .into_diagnostic()?;

    let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
    if let Some(path) = &cli.out {
        write_json_artifact(path, &json)?;
    }
    match format {
        OutputFormat::Json => println!("{json}"),
        OutputFormat::Text => print!("{}", render_text(&report, cli.verbose > 0)),
    }

    if report.all_matched() {
        Ok(0)
    } else {
        Ok(EXIT_TEST_FAILURES)
    }
}

fn parse_output_format(raw: &str) -> miette::Result<OutputFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(miette::miette!(
            "unknown output format '{other}'. Use: text | json"
        )),
    }
}

fn resolve_dialect(cli: &Cli) -> miette::Result<Dialect> {
    if let Some(raw) = &cli.dialect {
        return Dialect::from_str(raw).into_diagnostic();
    }
    Dialect::from_extension(&cli.theory_file).ok_or_else(|| {
        miette::miette!(
            "cannot infer the dialect of `{}`; pass --dialect prover9|tptp",
            cli.theory_file.display()
        )
    })
}

fn config_from_cli(cli: &Cli, dialect: Dialect) -> HarnessConfig {
    let mut config = HarnessConfig {
        timeout: Duration::from_secs(cli.timeout),
        jobs: cli.jobs,
        results_dir: if cli.no_transcripts {
            None
        } else {
            Some(cli.results_dir.clone())
        },
        ..HarnessConfig::default()
    };
    if let Some(path) = &cli.prover_path {
        match BackendKind::for_dialect(dialect) {
            BackendKind::Prover9 => config.prover9_path = path.clone(),
            BackendKind::Eprover => config.eprover_path = path.clone(),
        }
    }
    config
}

fn write_json_artifact(path: &Path, json: &str) -> miette::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
    }
    fs::write(path, json).into_diagnostic()?;
    Ok(())
}
