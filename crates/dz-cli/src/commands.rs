use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use dz_cli::config::DisplaySection;
use dz_cli::pipeline::parse_pipeline;
use dz_cli::render::{
    correlation_table, counts_table, description_table, frequency_table, preview_table,
    skipped_table,
};
use dz_core::{Workspace, write_csv};
use dz_ingest::ImportOptions;
use dz_model::{ActiveView, CacheKey, ColumnKind, Table};

use crate::cli::{
    ConcatArgs, CorrelateArgs, DescribeArgs, InspectArgs, MergeArgs, ViewArgs,
};

/// State shared by one CLI invocation.
pub struct Session {
    workspace: Workspace,
    display: DisplaySection,
}

impl Session {
    pub fn new(display: DisplaySection) -> Self {
        Self {
            workspace: Workspace::default(),
            display,
        }
    }

    fn load(&self, path: &Path, options: &ImportOptions) -> Result<CacheKey> {
        let bytes =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let (key, _) = self.workspace.try_import(&filename, &bytes, options)?;
        Ok(key)
    }

    fn print_preview(&self, table: &Table, rows: Option<usize>) {
        let rows = rows.unwrap_or(self.display.preview_rows);
        println!(
            "{}",
            preview_table(table, rows, self.display.max_column_width)
        );
        if table.height() > rows {
            println!("({} of {} rows shown)", rows, table.height());
        }
    }
}

pub fn run_inspect(session: &Session, args: &InspectArgs, options: &ImportOptions) -> Result<()> {
    let key = session.load(&args.file, options)?;
    let view = ActiveView::new(key.clone());
    let counts = session.workspace.summary(&view)?;
    let rendered = session.workspace.render(&view)?;
    println!("{} {}", args.file.display(), key);
    println!("{}", counts_table(&counts));
    session.print_preview(&rendered.table, args.rows);
    Ok(())
}

pub fn run_view(session: &Session, args: &ViewArgs, options: &ImportOptions) -> Result<()> {
    let key = session.load(&args.file, options)?;
    let pipeline = parse_pipeline(args.pipeline.as_deref())?;
    let view = ActiveView::with_pipeline(key, pipeline);
    let rendered = session.workspace.render(&view)?;
    if !rendered.skipped.is_empty() {
        eprintln!("Skipped filters:");
        eprintln!("{}", skipped_table(&rendered.skipped));
    }
    session.print_preview(&rendered.table, args.rows);
    if let Some(output) = &args.output {
        write_output(output, &rendered.table)?;
    }
    Ok(())
}

pub fn run_describe(session: &Session, args: &DescribeArgs, options: &ImportOptions) -> Result<()> {
    let key = session.load(&args.file, options)?;
    let pipeline = parse_pipeline(args.pipeline.as_deref())?;
    let view = ActiveView::with_pipeline(key, pipeline);
    let filtered = session.workspace.filtered(&view)?;
    match filtered.table.kind(&args.column) {
        None => bail!("column not found: {}", args.column),
        Some(ColumnKind::Numeric) => {
            let description = session.workspace.describe_column(&view, &args.column)?;
            println!("{}", description_table(&description));
        }
        Some(_) => {
            let rows = session.workspace.frequencies(&view, &args.column)?;
            println!("{}", frequency_table(&args.column, &rows));
        }
    }
    Ok(())
}

pub fn run_correlate(
    session: &Session,
    args: &CorrelateArgs,
    options: &ImportOptions,
) -> Result<()> {
    let key = session.load(&args.file, options)?;
    let pipeline = parse_pipeline(args.pipeline.as_deref())?;
    let view = ActiveView::with_pipeline(key, pipeline);
    let matrix = session.workspace.correlation(&view)?;
    if matrix.is_empty() {
        println!("No numeric columns.");
    } else {
        println!("{}", correlation_table(&matrix));
    }
    Ok(())
}

pub fn run_concat(session: &Session, args: &ConcatArgs, options: &ImportOptions) -> Result<()> {
    let main = session.load(&args.main, options)?;
    let other = session.load(&args.other, options)?;
    let outcome = session
        .workspace
        .concat(&main, &other, args.axis.into())?;
    println!("{} {}", outcome.entry.name, outcome.entry.id);
    session.print_preview(&outcome.table, None);
    if let Some(output) = &args.output {
        write_output(output, &outcome.table)?;
    }
    Ok(())
}

pub fn run_merge(session: &Session, args: &MergeArgs, options: &ImportOptions) -> Result<()> {
    let main = session.load(&args.main, options)?;
    let other = session.load(&args.other, options)?;
    let outcome = session.workspace.merge(
        &main,
        &other,
        &args.left_key,
        &args.right_key,
        args.how.into(),
    )?;
    println!("{} {}", outcome.entry.name, outcome.entry.id);
    session.print_preview(&outcome.table, None);
    if let Some(output) = &args.output {
        write_output(output, &outcome.table)?;
    }
    Ok(())
}

fn write_output(path: &Path, table: &Table) -> Result<()> {
    let bytes = write_csv(table)?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = table.height(), "wrote csv");
    println!("Wrote {}", path.display());
    Ok(())
}
