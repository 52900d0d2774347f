//! `psearch apply`: run field edits through a search session.

use crate::output::{OutputMode, Report, emit, field, heading};
use anyhow::{Context, Result, bail};
use clap::Args;
use planning_search_core::config::SearchConfig;
use planning_search_core::params::decode_value;
use planning_search_core::schema::Change;
use planning_search_core::{ActiveFilter, FieldPath, FilterState, SearchSession};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Filter state JSON file to start from (`-` for stdin).
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Filter mode of the session. Defaults to the configured mode.
    #[arg(short, long)]
    pub mode: Option<ActiveFilter>,

    /// Field edit as PATH=VALUE. VALUE is JSON, or a plain string. Repeatable.
    #[arg(long = "set", value_name = "PATH=VALUE", required = true)]
    pub edits: Vec<String>,

    /// Apply all edits as a single update cycle.
    #[arg(long)]
    pub batch: bool,

    /// Also write the resulting state to this file.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ApplyReport {
    mode: ActiveFilter,
    changes: Vec<Change>,
    state: FilterState,
}

impl Report for ApplyReport {
    fn write_text(&self, w: &mut dyn Write) -> io::Result<()> {
        for change in &self.changes {
            writeln!(w, "{}={}", change.path, change.value)?;
        }
        Ok(())
    }

    fn write_pretty(&self, w: &mut dyn Write) -> io::Result<()> {
        heading(w, &format!("Applied changes ({})", self.mode))?;
        for change in &self.changes {
            field(w, change.path.as_str(), change.value.to_string())?;
        }
        writeln!(w)?;
        heading(w, "Filter state")?;
        let state = serde_json::to_string_pretty(&self.state).map_err(io::Error::other)?;
        writeln!(w, "{state}")
    }
}

fn parse_edit(raw: &str) -> Result<(FieldPath, Value)> {
    let Some((path, value)) = raw.split_once('=') else {
        bail!("Expected PATH=VALUE, got '{raw}'");
    };
    let path = path
        .parse::<FieldPath>()
        .with_context(|| format!("Invalid edit '{raw}'"))?;
    Ok((path, decode_value(path, value)))
}

pub fn run_apply(args: &ApplyArgs, config: &SearchConfig, output: OutputMode) -> Result<()> {
    let state = super::load_state(args.state.as_deref())?;
    let mode = args.mode.unwrap_or(config.default_filter);
    let mut session = SearchSession::with_state(mode, state);

    let edits = args
        .edits
        .iter()
        .map(|raw| parse_edit(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut changes = Vec::new();
    if args.batch {
        changes.extend(session.apply_batch(edits).context("Failed to apply edits")?);
    } else {
        for (path, value) in edits {
            let applied = session
                .apply(path, value)
                .with_context(|| format!("Failed to apply edit to {path}"))?;
            changes.extend(applied);
        }
    }

    if let Some(ref out) = args.out {
        let rendered = serde_json::to_string_pretty(session.state())?;
        std::fs::write(out, rendered + "\n")
            .with_context(|| format!("Failed to write {}", out.display()))?;
        tracing::info!(path = %out.display(), "wrote filter state");
    }

    let report = ApplyReport {
        mode,
        changes,
        state: session.into_state(),
    };

    emit(output, &report)
}
