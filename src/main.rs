mod error;
mod filter;
mod merge;
mod partition;
mod pipeline;
mod positions;
mod vcf_io;

use clap::{Arg, ArgMatches, Command};
use env_logger::Env;
use log::{error, info, warn};
use std::process::ExitCode;

use crate::partition::DEFAULT_WORKERS;
use crate::pipeline::{FilterConfig, RunSummary};

fn cli() -> Command {
    Command::new("vcf-site-filter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Keep only the VCF records whose (CHROM, POS) appears in a two-column position list. Header and record text are written back unchanged, in input order.")
        .arg(Arg::new("positions").short('p').long("positions").alias("position_file").help("Position file: <chrom>\\t<pos> per line, no header").required(true))
        .arg(Arg::new("vcf").short('v').long("vcf").alias("vcf_file").help("Input VCF file (plain text)").required(true))
        .arg(Arg::new("output").short('o').long("output").alias("output_vcf").help("Output VCF path (created or truncated)").required(true))
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of filter workers; values below 1 are treated as 1")
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64))
                .default_value("4"),
        )
}

fn config_from_matches(matches: &ArgMatches) -> FilterConfig {
    // required args are enforced by clap before we get here
    let get = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();
    let requested = matches.get_one::<i64>("threads").copied().unwrap_or(DEFAULT_WORKERS as i64);
    let cfg = FilterConfig::new(get("positions"), get("vcf"), get("output")).with_workers(requested);
    if cfg.workers() as i64 != requested {
        warn!("--threads {requested} clamped to {}", cfg.workers());
    }
    cfg
}

/// Exit status and user-facing line for a finished run.
fn report(cfg: &FilterConfig, result: &error::Result<RunSummary>) -> (u8, String) {
    match result {
        Ok(_) => (0, format!("Filtered VCF saved to {}", cfg.output.display())),
        Err(e) => (1, format!("[error] {e}")),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();
    let cfg = config_from_matches(&matches);

    info!("Running with arguments:");
    info!("    --positions : {}", cfg.positions.display());
    info!("    --vcf       : {}", cfg.vcf.display());
    info!("    --output    : {}", cfg.output.display());
    info!("    --threads   : {}", cfg.workers());

    let result = pipeline::run(&cfg);
    match &result {
        Ok(summary) => info!(
            "Done: {} of {} records kept ({} chunks, {} worker threads)",
            summary.records_kept, summary.records_read, summary.chunks, summary.workers
        ),
        Err(e) => error!("{e}"),
    }
    let (code, message) = report(&cfg, &result);
    if code == 0 {
        println!("{message}");
    } else {
        eprintln!("{message}");
    }
    ExitCode::from(code)
}
