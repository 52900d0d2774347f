//! `psearch params`: convert a filter state to and from query parameters.

use crate::output::{OutputMode, Report, emit, field, heading};
use anyhow::{Context, bail};
use clap::Args;
use planning_search_core::FilterState;
use planning_search_core::params::{from_params, to_params};
use serde::{Serialize, Serializer};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Filter state JSON file to encode (`-` for stdin).
    #[arg(short, long, conflicts_with = "decode")]
    pub state: Option<PathBuf>,

    /// Decode KEY=VALUE pairs back into a filter state instead.
    #[arg(long, value_name = "KEY=VALUE", num_args = 1..)]
    pub decode: Vec<String>,
}

fn split_pair(raw: &str) -> anyhow::Result<(&str, &str)> {
    match raw.split_once('=') {
        Some(pair) => Ok(pair),
        None => bail!("Expected KEY=VALUE, got '{raw}'"),
    }
}

/// Query parameters in encoding order. Serializes as a JSON object.
struct ParamList(Vec<(String, String)>);

impl Serialize for ParamList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, value)))
    }
}

impl Report for ParamList {
    fn write_text(&self, w: &mut dyn Write) -> io::Result<()> {
        for (key, value) in &self.0 {
            writeln!(w, "{key}={value}")?;
        }
        Ok(())
    }

    fn write_pretty(&self, w: &mut dyn Write) -> io::Result<()> {
        heading(w, &format!("Query parameters ({})", self.0.len()))?;
        for (key, value) in &self.0 {
            field(w, key, value)?;
        }
        Ok(())
    }
}

/// A state rebuilt from `--decode`. Text mode prints it as compact JSON.
#[derive(Serialize)]
#[serde(transparent)]
struct Decoded(FilterState);

impl Report for Decoded {
    fn write_text(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, &self.0)?;
        writeln!(w)
    }

    fn write_pretty(&self, w: &mut dyn Write) -> io::Result<()> {
        heading(w, "Filter state")?;
        serde_json::to_writer_pretty(&mut *w, &self.0)?;
        writeln!(w)
    }
}

pub fn run_params(args: &ParamsArgs, output: OutputMode) -> anyhow::Result<()> {
    if !args.decode.is_empty() {
        let pairs = args
            .decode
            .iter()
            .map(|raw| split_pair(raw))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let state = from_params(pairs).context("Failed to decode query parameters")?;
        return emit(output, &Decoded(state));
    }

    let state = super::load_state(args.state.as_deref())?;
    let params = ParamList(to_params(&state));
    tracing::debug!(count = params.0.len(), "encoded filter state");
    emit(output, &params)
}
