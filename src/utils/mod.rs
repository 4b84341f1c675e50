//! Utility modules for configuration, error handling, and timeframes.

pub mod config;
pub mod error;
pub mod timeframe;

// Re-export commonly used types for convenience
pub use error::{
    AggregateError, ConfigError, IdentityError, LinkError, OutputError, ParseError, TimeframeError,
};
pub use timeframe::{intervals_overlap, parse_timeframe_end, parse_timeframe_start, Timeframe};
