//! Parsing of `--pipeline` arguments.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dz_model::ViewPipeline;

/// Parses inline JSON, or reads it from a file when the argument starts with `@`.
///
/// No argument yields the empty pipeline.
pub fn parse_pipeline(arg: Option<&str>) -> Result<ViewPipeline> {
    let Some(arg) = arg else {
        return Ok(ViewPipeline::default());
    };
    let json = match arg.strip_prefix('@') {
        Some(path) => {
            let path = PathBuf::from(path);
            fs::read_to_string(&path)
                .with_context(|| format!("failed to read pipeline file {}", path.display()))?
        }
        None => arg.to_string(),
    };
    let pipeline: ViewPipeline =
        serde_json::from_str(&json).context("invalid pipeline JSON")?;
    tracing::debug!(
        filters = pipeline.filters.len(),
        sorts = pipeline.sort.len(),
        "parsed pipeline"
    );
    Ok(pipeline)
}
