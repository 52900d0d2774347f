//! `psearch window`: resolve the effective date window of a filter state.

use crate::output::{OutputMode, Report, emit, field, heading};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Args;
use planning_search_core::config::SearchConfig;
use planning_search_core::model::Timestamp;
use planning_search_core::{DateRange, FilterState};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct WindowArgs {
    /// Filter state JSON file (`-` for stdin).
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Reference day as YYYY-MM-DD. Defaults to the local date.
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct DateWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<DateRange>,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

fn window_of(
    state: &FilterState,
    today: NaiveDate,
    config: &SearchConfig,
) -> Result<DateWindow> {
    let dates = &state.advanced_search.dates;
    let Some((start, end)) = dates.window(today, config.start_of_week) else {
        bail!("Date window around {today} runs past the supported calendar");
    };
    Ok(DateWindow {
        range: dates.range,
        start,
        end,
    })
}

fn bound(value: Option<Timestamp>) -> String {
    value.map_or_else(|| "-".to_string(), |ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string())
}

impl Report for DateWindow {
    fn write_text(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{} {}", bound(self.start), bound(self.end))
    }

    fn write_pretty(&self, w: &mut dyn Write) -> io::Result<()> {
        heading(w, "Date window")?;
        if let Some(range) = self.range {
            field(w, "range", range.label())?;
        }
        field(w, "start", bound(self.start))?;
        field(w, "end", bound(self.end))
    }
}

pub fn run_window(args: &WindowArgs, config: &SearchConfig, output: OutputMode) -> Result<()> {
    let state = super::load_state(args.state.as_deref())?;
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let window = window_of(&state, today, config)?;
    tracing::debug!(%today, range = ?window.range, "resolved date window");

    emit(output, &window)
}
