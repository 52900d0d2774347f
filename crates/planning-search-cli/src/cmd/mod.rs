pub mod apply;
pub mod fields;
pub mod params;
pub mod window;

use anyhow::{Context, Result};
use planning_search_core::FilterState;
use std::io::Read;
use std::path::Path;

/// Read a filter state document. `None` starts from an empty state and `-`
/// reads from stdin. Missing keys take their defaults.
pub fn load_state(path: Option<&Path>) -> Result<FilterState> {
    let Some(path) = path else {
        return Ok(FilterState::default());
    };

    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read filter state from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse filter state in {}", path.display()))
}
