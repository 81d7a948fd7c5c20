pub mod series;
pub mod table;

// Re-exported for convenient access (e.g. `use crate::market_data::Series`).
pub use series::{Bar, Series};
pub use table::{AnalysisTable, TableRow};
