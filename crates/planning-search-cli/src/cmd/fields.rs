//! `psearch fields`: show the search form layout for a filter mode.

use crate::output::{OutputMode, Report, emit, field};
use clap::Args;
use planning_search_core::config::SearchConfig;
use planning_search_core::schema::{FieldDescriptor, FieldOptions, fields_for};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Filter mode: combined, events, planning. Defaults to the configured mode.
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Filter state JSON file to bind values from (`-` for stdin).
    #[arg(short, long)]
    pub state: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(transparent)]
struct FieldList(Vec<FieldDescriptor>);

fn option_count(options: Option<&FieldOptions>) -> Option<usize> {
    options.map(|options| match options {
        FieldOptions::Terms(terms) => terms.len(),
        FieldOptions::Spike(spike) => spike.len(),
        FieldOptions::Ranges(ranges) => ranges.len(),
    })
}

impl Report for FieldList {
    fn write_text(&self, w: &mut dyn Write) -> io::Result<()> {
        if self.0.is_empty() {
            return Ok(());
        }
        writeln!(w, "path  label  value  mode")?;
        for descriptor in &self.0 {
            let mode = if descriptor.read_only { "ro" } else { "rw" };
            writeln!(
                w,
                "{}  {}  {}  {mode}",
                descriptor.path, descriptor.label, descriptor.value
            )?;
        }
        Ok(())
    }

    fn write_pretty(&self, w: &mut dyn Write) -> io::Result<()> {
        for descriptor in &self.0 {
            writeln!(w, "{}", descriptor.label)?;
            field(w, "  path", descriptor.path.as_str())?;
            field(w, "  value", descriptor.value.to_string())?;
            if let Some(count) = option_count(descriptor.options.as_ref()) {
                field(w, "  options", count.to_string())?;
            }
            if descriptor.read_only {
                field(w, "  read-only", "yes")?;
            }
        }
        Ok(())
    }
}

pub fn run_fields(
    args: &FieldsArgs,
    config: &SearchConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let state = super::load_state(args.state.as_deref())?;
    let mode = args
        .mode
        .clone()
        .unwrap_or_else(|| config.default_filter.to_string());

    let fields = FieldList(fields_for(&mode, &state, &config.options));
    tracing::debug!(%mode, count = fields.0.len(), "rendering search fields");
    if fields.0.is_empty() && !output.is_json() {
        eprintln!("No search fields for filter mode '{mode}'");
    }
    emit(output, &fields)
}
