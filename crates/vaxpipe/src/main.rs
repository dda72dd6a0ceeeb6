use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use vaxpipe_core::{ForecastOutput, PipelineConfig, VaccineRecord, run_forecast};

mod io;
mod logging;
mod report;

#[derive(Parser, Debug)]
#[command(name = "vaxpipe")]
#[command(about = "Monte Carlo forecast of the vaccine development pipeline")]
struct Args {
    /// Path to the vaccine registry file
    #[arg(long, default_value = "vaccines.json")]
    vaccines: PathBuf,

    /// Path to the parameter set file
    #[arg(long, default_value = "params.json")]
    params: PathBuf,

    /// Where to write the full forecast report
    #[arg(long, default_value = "output.json")]
    output: PathBuf,

    /// Where to write the benchmark summary
    #[arg(long, default_value = "summary.json")]
    summary: PathBuf,

    /// Where to write the per-trial phase-completion table (off by default)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Master seed for the run batch
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();
    logging::init_logging(&args.log_level);

    match run(&args) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            tracing::error!("forecast failed: {err:#}");
            // A supervisor polling the output file must see the failure
            // even when stderr is not captured.
            if let Err(marker_err) = io::atomic_write(&args.output, &report::error_marker(&err)) {
                tracing::error!(
                    "could not write the error marker to {}: {marker_err}",
                    args.output.display()
                );
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config: PipelineConfig = io::load_json(&args.params)
        .wrap_err_with(|| format!("failed to load parameters from {}", args.params.display()))?;
    let registry: Vec<VaccineRecord> = io::load_json(&args.vaccines).wrap_err_with(|| {
        format!(
            "failed to load the vaccine registry from {}",
            args.vaccines.display()
        )
    })?;

    // The per-trial log only exists when the engine collects it.
    if args.csv.is_some() {
        config.collect_trials = true;
    }

    tracing::info!(
        "starting forecast: {} vaccines, {} tries over {} months (seed {})",
        registry.len(),
        config.tries,
        config.months,
        args.seed
    );

    let output = run_forecast(&config, &registry, args.seed)?;

    tracing::info!(
        "P(any approval by month {}) = {:.3}, mean approved = {:.2}",
        output.months,
        output.final_approval_probability(),
        output.mean_approved_at_horizon()
    );

    write_reports(args, &output)
}

fn write_reports(args: &Args, output: &ForecastOutput) -> Result<()> {
    let mut rendered = serde_json::to_string_pretty(output)?;
    rendered.push('\n');
    io::atomic_write(&args.output, &rendered)
        .wrap_err_with(|| format!("failed to write {}", args.output.display()))?;
    tracing::info!("forecast report written to {}", args.output.display());

    io::atomic_write(&args.summary, &report::summary(output))
        .wrap_err_with(|| format!("failed to write {}", args.summary.display()))?;

    if let Some(path) = &args.csv {
        io::atomic_write(path, &report::trials_csv(output))
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        tracing::info!(
            "{} trial rows written to {}",
            output.trial_log.len(),
            path.display()
        );
    }
    Ok(())
}
