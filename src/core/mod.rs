pub mod config;
pub mod filter;
pub mod paths;
pub mod selection;

pub use config::Config;
pub use filter::{write_filtered_dumps, FilterSummary};
pub use selection::{select_descendants, Query, QuerySet, SelectionOptions, SelectionReport};
