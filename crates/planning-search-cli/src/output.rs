//! Output formatting for `psearch` commands.
//!
//! Every command result is a [`Report`]: it serializes as JSON and knows how
//! to write itself as plain text and as pretty human output.
//!
//! Mode precedence, highest first:
//! 1. `--format`, or the hidden `--json` shorthand
//! 2. the `FORMAT` environment variable (`pretty`, `text`, `json`)
//! 3. `output` in the user config file
//! 4. [`OutputMode::Pretty`] on a terminal, [`OutputMode::Text`] when piped

use clap::ValueEnum;
use planning_search_core::SearchError;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

const RULE_WIDTH: usize = 72;
const KEY_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Headings and aligned fields for people.
    Pretty,
    /// One record per line, for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    fn from_setting(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some(Self::Pretty),
            "text" | "plain" | "table" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn pick(
        flag: Option<Self>,
        json: bool,
        env: Option<&str>,
        user: Option<&str>,
        tty: bool,
    ) -> Self {
        flag.or_else(|| json.then_some(Self::Json))
            .or_else(|| env.and_then(Self::from_setting))
            .or_else(|| user.and_then(Self::from_setting))
            .unwrap_or(if tty { Self::Pretty } else { Self::Text })
    }

    /// Resolve the mode from flags, `FORMAT`, the user config and stdout.
    pub fn resolve(flag: Option<Self>, json: bool, user: Option<&str>) -> Self {
        let env = std::env::var("FORMAT").ok();
        Self::pick(flag, json, env.as_deref(), user, io::stdout().is_terminal())
    }
}

/// Heading line followed by a rule.
pub fn heading(w: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(w, "{title}")?;
    writeln!(w, "{}", "-".repeat(RULE_WIDTH))
}

/// Aligned `key: value` line.
pub fn field(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    let key = format!("{key}:");
    writeln!(w, "{key:<KEY_WIDTH$} {}", value.as_ref())
}

/// A command result that can be written in every output mode.
pub trait Report: Serialize {
    fn write_text(&self, w: &mut dyn Write) -> io::Result<()>;

    fn write_pretty(&self, w: &mut dyn Write) -> io::Result<()>;
}

fn write_report<R: Report + ?Sized>(
    mode: OutputMode,
    report: &R,
    w: &mut dyn Write,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, report)?;
            writeln!(w)?;
        }
        OutputMode::Text => report.write_text(w)?,
        OutputMode::Pretty => report.write_pretty(w)?,
    }
    Ok(())
}

/// Write `report` to stdout.
pub fn emit<R: Report + ?Sized>(mode: OutputMode, report: &R) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(mode, report, &mut out)
}

/// Error payload written to stderr, `{"error": {...}}` in JSON mode.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub message: String,
    /// Stable `E####` code when the failure came from a field edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl From<&SearchError> for ErrorReport {
    fn from(err: &SearchError) -> Self {
        let code = err.code();
        Self {
            message: err.to_string(),
            code: Some(code.code()),
            hint: code.hint(),
        }
    }
}

impl From<&anyhow::Error> for ErrorReport {
    fn from(err: &anyhow::Error) -> Self {
        let source = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<SearchError>());
        match source {
            Some(search) => Self {
                message: format!("{err:#}"),
                ..Self::from(search)
            },
            None => Self {
                message: format!("{err:#}"),
                code: None,
                hint: None,
            },
        }
    }
}

fn write_error(mode: OutputMode, error: &ErrorReport, w: &mut dyn Write) -> io::Result<()> {
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut *w, &serde_json::json!({ "error": error }))?;
        return writeln!(w);
    }
    match error.code {
        Some(code) => writeln!(w, "error[{code}]: {}", error.message)?,
        None => writeln!(w, "error: {}", error.message)?,
    }
    if let Some(hint) = error.hint {
        writeln!(w, "  hint: {hint}")?;
    }
    Ok(())
}

/// Write `error` to stderr.
pub fn report_error(mode: OutputMode, error: &ErrorReport) -> io::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(mode, error, &mut out)
}
