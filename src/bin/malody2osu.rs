//! Command line front end converting Malody key-mode charts into osu!mania beatmaps.

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use env_logger::Env;
use malody2osu::{
    batch::{BatchReport, collect_inputs, convert_batch},
    convert::default_config,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(help = "Chart files (.mc) or folders containing them.", required = true)]
    paths: Vec<PathBuf>,

    #[arg(
        short,
        long,
        default_value = ".",
        help = "Folder where the converted beatmaps are written."
    )]
    out_dir: PathBuf,

    #[arg(
        long,
        help = "Keep the source order of timing points and hit objects instead of sorting by time."
    )]
    keep_source_order: bool,

    #[arg(short, long, help = "Print debug logs.")]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

#[cfg(feature = "diagnostics")]
fn show_parse_errors(report: &BatchReport) {
    for (path, err) in &report.failed {
        let malody2osu::batch::ChartError::Parse(parse_error) = err else {
            continue;
        };
        if let Ok(source) = fs::read_to_string(path) {
            let name = path.display().to_string();
            malody2osu::diagnostics::emit_parse_error(&name, &source, parse_error);
        }
    }
}

#[cfg(not(feature = "diagnostics"))]
fn show_parse_errors(_report: &BatchReport) {}

fn print_summary(report: &BatchReport, out_dir: &Path) {
    println!(
        "converted {} of {} charts into {}",
        report.converted.len(),
        report.total(),
        out_dir.display()
    );
    for (path, mode) in &report.skipped {
        println!("  skipped {}: {mode}", path.display());
    }
    for (path, err) in &report.failed {
        println!("  failed {}: {err}", path.display());
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let inputs = collect_inputs(&cli.paths);
    if inputs.is_empty() {
        log::error!("no .mc chart found in the given paths");
        return ExitCode::FAILURE;
    }
    if let Err(err) = fs::create_dir_all(&cli.out_dir) {
        log::error!("cannot create {}: {err}", cli.out_dir.display());
        return ExitCode::FAILURE;
    }

    let config = if cli.keep_source_order {
        default_config().keep_source_order()
    } else {
        default_config()
    };
    log::debug!("converting {} charts with {config:?}", inputs.len());
    let report = convert_batch(&inputs, &cli.out_dir, &config);

    show_parse_errors(&report);
    print_summary(&report, &cli.out_dir);

    if report.exit_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
