use wasm_bindgen::prelude::*;

use crate::domain::logging::{LogComponent, init_logger, init_time_provider};
use crate::infrastructure::services::{BrowserTimeProvider, ConsoleLogger};

pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use app::LiveChartView;
pub use application::{AttachOutcome, ChartConfig, ChartStats, LiveChart};
pub use presentation::LiveChartApi;

/// Install panic hook, console logger and browser clock.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let logger = if cfg!(debug_assertions) {
        ConsoleLogger::new_development()
    } else {
        ConsoleLogger::new_production()
    };
    init_logger(Box::new(logger));
    init_time_provider(Box::new(BrowserTimeProvider::new()));

    log_info!(LogComponent::Presentation("Initialize"), "live tick chart ready");
}
