//! Application layer: the chart lifecycle and its configuration.

pub mod config;
pub mod live_chart;

pub use config::ChartConfig;
pub use live_chart::{AttachOutcome, ChartStats, LiveChart, to_display_rows};
