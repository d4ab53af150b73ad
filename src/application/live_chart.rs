use crate::application::config::ChartConfig;
use crate::domain::{
    chart::{DataTable, DeltaTracker, DisplayRow, TableFactory, ViewerElement},
    logging::LogComponent,
    market_data::TickRecord,
};
use serde::Serialize;
use crate::{log_debug, log_error, log_info, log_warn};

const COMPONENT: LogComponent = LogComponent::Application("LiveChart");

/// Result of mounting the chart onto its rendering element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// Configured, table created and loaded; appends will be drawn.
    Ready,
    /// Configured, but no table could be created or loaded; updates are no-ops.
    Degraded,
    /// The chart was already mounted; nothing was touched.
    AlreadyAttached,
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStats {
    pub updates_received: usize,
    pub updates_skipped: usize,
    pub rows_appended: usize,
    pub records_already_seen: usize,
    pub records_rejected: usize,
    pub append_failures: usize,
}

/// Map input ticks to table rows, one row per record, order preserved.
pub fn to_display_rows<'a>(records: impl IntoIterator<Item = &'a TickRecord>) -> Vec<DisplayRow> {
    records.into_iter().map(DisplayRow::from).collect()
}

/// Live tick chart: owns the table behind a viewer element and feeds it.
///
/// Lifecycle is two-phase. [`LiveChart::on_attach`] runs once when the
/// element exists and applies the view configuration before any data is
/// loaded. [`LiveChart::on_data_received`] runs per delivered batch and
/// appends only what the [`DeltaTracker`] has not seen yet. Neither phase
/// returns an error: missing capabilities degrade to an empty chart.
pub struct LiveChart<F, V>
where
    F: TableFactory,
    V: ViewerElement<Table = F::Table>,
{
    factory: F,
    config: ChartConfig,
    viewer: Option<V>,
    table: Option<F::Table>,
    tracker: DeltaTracker,
    stats: ChartStats,
}

impl<F, V> LiveChart<F, V>
where
    F: TableFactory,
    V: ViewerElement<Table = F::Table>,
{
    pub fn new(factory: F, config: ChartConfig) -> Self {
        let tracker = DeltaTracker::new(config.delta);
        Self { factory, config, viewer: None, table: None, tracker, stats: ChartStats::default() }
    }

    pub fn on_attach(&mut self, mut viewer: V) -> AttachOutcome {
        if self.viewer.is_some() {
            log_warn!(COMPONENT, "on_attach called twice; keeping the first element");
            return AttachOutcome::AlreadyAttached;
        }

        if let Err(e) = viewer.configure(&self.config.view) {
            log_warn!(COMPONENT, "view configuration incomplete: {}", e);
        }

        let schema = self.config.schema();
        let table = match self.factory.create_table(&schema) {
            Ok(Some(table)) => Some(table),
            Ok(None) => {
                log_warn!(COMPONENT, "table capability unavailable; chart will stay empty");
                None
            }
            Err(e) => {
                log_error!(COMPONENT, "table creation failed: {}", e);
                None
            }
        };

        self.table = table.and_then(|table| match viewer.attach(&table) {
            Ok(()) => Some(table),
            Err(e) => {
                log_error!(COMPONENT, "could not load table into viewer: {}", e);
                None
            }
        });
        self.viewer = Some(viewer);

        if self.table.is_some() {
            log_info!(COMPONENT, "attached with {} delta strategy", self.tracker.strategy());
            AttachOutcome::Ready
        } else {
            AttachOutcome::Degraded
        }
    }

    /// Append the not-yet-seen part of `records`; returns rows appended.
    pub fn on_data_received(&mut self, records: &[TickRecord]) -> usize {
        self.stats.updates_received += 1;

        let Some(table) = self.table.as_mut() else {
            self.stats.updates_skipped += 1;
            log_debug!(COMPONENT, "no table; ignoring {} records", records.len());
            return 0;
        };

        let pending = self.tracker.pending(records);
        self.stats.records_already_seen += records.len() - pending.len();
        if pending.is_empty() {
            return 0;
        }

        let rows = to_display_rows(pending.iter().copied());
        match table.update(&rows) {
            Ok(()) => {
                self.tracker.commit(pending);
                self.stats.rows_appended += rows.len();
                log_debug!(COMPONENT, "appended {} of {} records", rows.len(), records.len());
                rows.len()
            }
            Err(e) => {
                self.stats.append_failures += 1;
                log_error!(COMPONENT, "append of {} rows failed: {}", rows.len(), e);
                0
            }
        }
    }

    /// Like [`LiveChart::on_data_received`] for a JSON array of ticks.
    ///
    /// Malformed records are skipped and counted; a payload that is not an
    /// array counts as a skipped update.
    pub fn on_json_received(&mut self, json: &str) -> usize {
        match TickRecord::parse_batch(json) {
            Ok((records, rejected)) => {
                for error in &rejected {
                    log_warn!(COMPONENT, "skipping {}", error);
                }
                self.stats.records_rejected += rejected.len();
                self.on_data_received(&records)
            }
            Err(e) => {
                self.stats.updates_received += 1;
                self.stats.updates_skipped += 1;
                log_warn!(COMPONENT, "ignoring update: {}", e);
                0
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.viewer.is_some()
    }

    /// Attached and holding a table.
    pub fn is_ready(&self) -> bool {
        self.table.is_some()
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn stats(&self) -> ChartStats {
        self.stats
    }

    pub fn table(&self) -> Option<&F::Table> {
        self.table.as_ref()
    }

    pub fn viewer(&self) -> Option<&V> {
        self.viewer.as_ref()
    }
}
