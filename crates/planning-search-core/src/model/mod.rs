pub mod filter;
pub mod path;

pub use filter::{
    ActiveFilter, AdvancedSearch, DateFilter, DateRange, FilterState, Location, ParseEnumError,
    SpikeState, Term, Timestamp,
};
pub use path::FieldPath;
