//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{analyze_ledger, execute_analyze, ledger_output_dir, validate_args};
pub use models::{AnalyzeArgs, LedgerReport};
pub use utils::{compute_metrics_file, display_version, validate_counts_file};
