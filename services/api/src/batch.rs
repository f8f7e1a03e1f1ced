use clap::Args;
use std::path::{Path, PathBuf};
use txn_risk::batch::{BatchScorer, ScoredBatch};
use txn_risk::config::{load_risk_config, AppConfig};
use txn_risk::error::AppError;
use txn_risk::scoring::{RiskConfig, RiskEngine};
use txn_risk::telemetry;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to the input transaction CSV
    #[arg(long, default_value = "transactions_examples.csv")]
    pub(crate) input: PathBuf,
    /// Path of the CSV to write with decisions appended
    #[arg(long, default_value = "decisions.csv")]
    pub(crate) output: PathBuf,
    /// JSON risk configuration to use instead of RISK_CONFIG_PATH / defaults
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Number of scored rows to print after writing the output
    #[arg(long, default_value_t = 5)]
    pub(crate) preview: usize,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ConfigArgs {
    /// JSON risk configuration to load instead of RISK_CONFIG_PATH / defaults
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        input,
        output,
        config,
        preview,
    } = args;

    let app_config = AppConfig::load()?;
    telemetry::init(&app_config.telemetry)?;
    let risk = resolve_risk_config(app_config.risk, config.as_deref())?;

    let engine = RiskEngine::new(risk);
    let batch = BatchScorer::new(&engine).score_path(&input)?;
    batch.write_path(&output)?;

    render_preview(&batch, &output, preview);
    Ok(())
}

pub(crate) fn run_print_config(args: ConfigArgs) -> Result<(), AppError> {
    let app_config = AppConfig::load()?;
    let risk = resolve_risk_config(app_config.risk, args.config.as_deref())?;
    println!("{}", render_config(&risk));
    Ok(())
}

fn resolve_risk_config(loaded: RiskConfig, path: Option<&Path>) -> Result<RiskConfig, AppError> {
    match path {
        Some(path) => Ok(load_risk_config(Some(path))?),
        None => Ok(loaded),
    }
}

fn render_config(config: &RiskConfig) -> String {
    serde_json::to_string_pretty(config).unwrap_or_else(|err| format!("{{\"error\": \"{err}\"}}"))
}

fn render_preview(batch: &ScoredBatch, output: &Path, preview: usize) {
    let summary = batch.summary();
    println!(
        "Scored {} transactions -> {}",
        summary.total(),
        output.display()
    );
    println!(
        "ACCEPTED {} | IN_REVIEW {} | REJECTED {}",
        summary.accepted, summary.in_review, summary.rejected
    );

    if preview == 0 || batch.rows().is_empty() {
        return;
    }

    let id_column = batch
        .headers()
        .iter()
        .position(|column| column == "transaction_id");

    println!();
    for (index, row) in batch.rows().iter().take(preview).enumerate() {
        let label = id_column
            .and_then(|column| row.record.get(column))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("row {}", index + 1));
        let reasons = if row.result.reasons.is_empty() {
            "-".to_string()
        } else {
            row.result.reasons.to_string()
        };
        println!(
            "- {} | {} | score {} | {}",
            label, row.result.decision, row.result.risk_score, reasons
        );
    }
}
