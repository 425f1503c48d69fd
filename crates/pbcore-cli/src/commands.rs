//! Subcommand implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use pbcore_ingest::{read_biograf_export, read_tv2_file};
use pbcore_map::{BatchSummary, DirectorySink, biograf, run_batch, tv2};

use crate::cli::{BiografArgs, OutputArgs, Tv2Args};

/// Maps a TV2 spot export file.
pub fn run_tv2(args: &Tv2Args) -> Result<BatchSummary> {
    let records = read_tv2_file(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let mut sink = sink_for(&args.output)?;
    let summary =
        run_batch(&records, tv2::render, &mut sink).context("write output documents")?;
    finish(&args.output, &summary)?;
    Ok(summary)
}

/// Maps a cinema advertisement export directory.
pub fn run_biograf(args: &BiografArgs) -> Result<BatchSummary> {
    let export = read_biograf_export(&args.input)
        .with_context(|| format!("read export {}", args.input.display()))?;
    let mut sink = sink_for(&args.output)?;
    let relations = export.relations();
    let summary = run_batch(
        &export.records,
        |record| biograf::render(record, relations),
        &mut sink,
    )
    .context("write output documents")?;
    finish(&args.output, &summary)?;
    Ok(summary)
}

fn sink_for(output: &OutputArgs) -> Result<DirectorySink> {
    DirectorySink::create(&output.output_dir)
        .with_context(|| format!("create {}", output.output_dir.display()))
}

fn finish(output: &OutputArgs, summary: &BatchSummary) -> Result<()> {
    if let Some(path) = &output.report {
        write_report(path, summary)?;
    }
    info!(
        output_dir = %output.output_dir.display(),
        written = summary.written,
        failed = summary.failed,
        "run complete"
    );
    Ok(())
}

fn write_report(path: &Path, summary: &BatchSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serialize batch report")?;
    fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
