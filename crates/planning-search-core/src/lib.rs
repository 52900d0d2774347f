//! planning-search-core library.
//!
//! The filter state model behind the planning advanced search panel: the
//! date range resolver, the spike-state policy, the per-mode form schema and
//! the session that ties them together.
//!
//! # Conventions
//!
//! - **Errors**: [`error::SearchError`] at the field-path boundary,
//!   `anyhow::Result` for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod dates;
pub mod error;
pub mod model;
pub mod params;
pub mod policy;
pub mod schema;
pub mod session;

pub use error::{ErrorCode, SearchError};
pub use model::{ActiveFilter, DateFilter, DateRange, FieldPath, FilterState, SpikeState};
pub use session::SearchSession;
