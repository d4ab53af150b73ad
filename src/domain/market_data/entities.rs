pub use super::value_objects::{Price, Symbol, Timestamp};
use crate::domain::errors::RecordError;
use serde::{Deserialize, Serialize};

/// Best quote on one side of the book
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub size: Option<f64>,
}

impl Quote {
    pub fn priced(price: f64) -> Self {
        Self { price: Some(Price::from(price)), size: None }
    }
}

/// Domain entity - one market tick as delivered by the supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub stock: Symbol,
    #[serde(default)]
    pub top_ask: Option<Quote>,
    #[serde(default)]
    pub top_bid: Option<Quote>,
    pub timestamp: Timestamp,
}

/// Identity of a tick for de-duplication purposes: everything that ends up
/// in its table row. Prices are compared bit for bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub stock: Symbol,
    pub timestamp: Timestamp,
    ask_bits: u64,
    bid_bits: u64,
}

impl TickRecord {
    pub fn new(
        stock: impl Into<Symbol>,
        top_ask: Option<Quote>,
        top_bid: Option<Quote>,
        timestamp: Timestamp,
    ) -> Self {
        Self { stock: stock.into(), top_ask, top_bid, timestamp }
    }

    /// Ask price, or zero when the quote or its price is absent.
    pub fn ask_price(&self) -> Price {
        quoted_price(self.top_ask.as_ref())
    }

    /// Bid price, or zero when the quote or its price is absent.
    pub fn bid_price(&self) -> Price {
        quoted_price(self.top_bid.as_ref())
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            stock: self.stock.clone(),
            timestamp: self.timestamp,
            ask_bits: self.ask_price().value().to_bits(),
            bid_bits: self.bid_price().value().to_bits(),
        }
    }

    /// Parse a JSON array of ticks record by record.
    ///
    /// Only a payload that is not an array at all is an error; individual
    /// records that fail to parse are returned alongside the good ones.
    pub fn parse_batch(json: &str) -> Result<(Vec<TickRecord>, Vec<RecordError>), RecordError> {
        let raw: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(|e| RecordError::NotABatch(e.to_string()))?;

        let mut records = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();
        for (index, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<TickRecord>(value) {
                Ok(record) => records.push(record),
                Err(e) => rejected.push(RecordError::Malformed { index, reason: e.to_string() }),
            }
        }
        Ok((records, rejected))
    }
}

fn quoted_price(quote: Option<&Quote>) -> Price {
    quote.and_then(|q| q.price).unwrap_or(Price::ZERO)
}
