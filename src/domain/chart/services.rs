use crate::domain::market_data::{RecordKey, Symbol, TickRecord, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// How the chart decides which records of a delivered batch are new.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeltaStrategy {
    /// Re-append every delivered record. Duplicates accumulate in the table.
    AppendAll,
    /// Append each distinct row at most once. Two quotes for the same
    /// `(stock, timestamp)` with different prices are both kept.
    #[default]
    DistinctKeys,
    /// Append only records newer than the latest one seen for their stock.
    Watermark,
}

/// Domain service remembering what has already reached the table.
///
/// Selection and commit are split so that records are only marked as
/// seen once the append that carried them succeeded.
#[derive(Debug, Clone, Default)]
pub struct DeltaTracker {
    strategy: DeltaStrategy,
    seen: HashSet<RecordKey>,
    watermarks: HashMap<Symbol, Timestamp>,
}

impl DeltaTracker {
    pub fn new(strategy: DeltaStrategy) -> Self {
        Self { strategy, ..Default::default() }
    }

    pub fn strategy(&self) -> DeltaStrategy {
        self.strategy
    }

    /// Records of `batch` that still have to be appended, in input order.
    pub fn pending<'a>(&self, batch: &'a [TickRecord]) -> Vec<&'a TickRecord> {
        match self.strategy {
            DeltaStrategy::AppendAll => batch.iter().collect(),
            DeltaStrategy::DistinctKeys => {
                let mut in_batch = HashSet::new();
                batch
                    .iter()
                    .filter(|record| {
                        let key = record.key();
                        !self.seen.contains(&key) && in_batch.insert(key)
                    })
                    .collect()
            }
            DeltaStrategy::Watermark => {
                let mut advanced: HashMap<Symbol, Timestamp> = HashMap::new();
                batch
                    .iter()
                    .filter(|record| {
                        let mark = advanced
                            .get(&record.stock)
                            .or_else(|| self.watermarks.get(&record.stock))
                            .copied();
                        let fresh = mark.is_none_or(|mark| record.timestamp > mark);
                        if fresh {
                            advanced.insert(record.stock.clone(), record.timestamp);
                        }
                        fresh
                    })
                    .collect()
            }
        }
    }

    /// Mark records as appended.
    pub fn commit<'a>(&mut self, appended: impl IntoIterator<Item = &'a TickRecord>) {
        match self.strategy {
            DeltaStrategy::AppendAll => {}
            DeltaStrategy::DistinctKeys => {
                self.seen.extend(appended.into_iter().map(TickRecord::key));
            }
            DeltaStrategy::Watermark => {
                for record in appended {
                    let mark = self.watermarks.entry(record.stock.clone()).or_insert(record.timestamp);
                    if record.timestamp > *mark {
                        *mark = record.timestamp;
                    }
                }
            }
        }
    }

    /// Number of keys or stocks currently remembered.
    pub fn tracked(&self) -> usize {
        match self.strategy {
            DeltaStrategy::AppendAll => 0,
            DeltaStrategy::DistinctKeys => self.seen.len(),
            DeltaStrategy::Watermark => self.watermarks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::Quote;

    fn tick(stock: &str, millis: i64) -> TickRecord {
        TickRecord::new(stock, None, None, Timestamp::from_millis(millis).unwrap())
    }

    #[test]
    fn distinct_keys_drops_duplicates_within_one_batch() {
        let tracker = DeltaTracker::new(DeltaStrategy::DistinctKeys);
        let batch = vec![tick("ABC", 1), tick("ABC", 1), tick("DEF", 1)];
        assert_eq!(tracker.pending(&batch).len(), 2);
    }

    #[test]
    fn distinct_keys_keeps_differently_priced_quotes_of_one_tick() {
        let tracker = DeltaTracker::new(DeltaStrategy::DistinctKeys);
        let priced = |ask| TickRecord::new("ABC", Some(Quote::priced(ask)), None, Timestamp::from_millis(1).unwrap());
        let batch = vec![priced(10.0), priced(12.0), priced(10.0)];
        let pending: Vec<_> = tracker.pending(&batch).into_iter().cloned().collect();
        assert_eq!(pending, vec![priced(10.0), priced(12.0)]);
    }

    #[test]
    fn pending_does_not_advance_without_commit() {
        let tracker = DeltaTracker::new(DeltaStrategy::Watermark);
        let batch = vec![tick("ABC", 1)];
        assert_eq!(tracker.pending(&batch).len(), 1);
        assert_eq!(tracker.pending(&batch).len(), 1);
        assert_eq!(tracker.tracked(), 0);
    }

    #[test]
    fn watermark_is_per_stock() {
        let mut tracker = DeltaTracker::new(DeltaStrategy::Watermark);
        let first = vec![tick("ABC", 10), tick("DEF", 5)];
        let pending = tracker.pending(&first);
        tracker.commit(pending);

        let second = vec![tick("ABC", 10), tick("DEF", 6), tick("ABC", 9), tick("ABC", 11)];
        let pending: Vec<_> = tracker.pending(&second).into_iter().cloned().collect();
        assert_eq!(pending, vec![tick("DEF", 6), tick("ABC", 11)]);
    }

    #[test]
    fn strategy_names() {
        assert_eq!(DeltaStrategy::DistinctKeys.as_ref(), "distinct_keys");
        assert_eq!("watermark".parse::<DeltaStrategy>().unwrap(), DeltaStrategy::Watermark);
    }
}
