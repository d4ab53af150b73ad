use crate::domain::errors::SurfaceResult;
use crate::domain::market_data::{Symbol, TickRecord, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - rendering mode of the viewer, named as the viewer names it
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum ChartType {
    #[default]
    #[strum(serialize = "y_line")]
    #[serde(rename = "y_line")]
    YLine,

    #[strum(serialize = "y_area")]
    #[serde(rename = "y_area")]
    YArea,

    #[strum(serialize = "y_bar")]
    #[serde(rename = "y_bar")]
    YBar,

    #[strum(serialize = "x_bar")]
    #[serde(rename = "x_bar")]
    XBar,

    #[strum(serialize = "y_scatter")]
    #[serde(rename = "y_scatter")]
    YScatter,

    #[strum(serialize = "heatmap")]
    #[serde(rename = "heatmap")]
    Heatmap,

    #[strum(serialize = "hypergrid")]
    #[serde(rename = "hypergrid")]
    Grid,
}

/// Value Object - rule collapsing rows that share a pivot cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum Aggregate {
    #[strum(serialize = "avg")]
    #[serde(rename = "avg")]
    Avg,

    #[strum(serialize = "sum")]
    #[serde(rename = "sum")]
    Sum,

    #[strum(serialize = "count")]
    #[serde(rename = "count")]
    Count,

    #[strum(serialize = "distinct count")]
    #[serde(rename = "distinct count")]
    DistinctCount,

    #[strum(serialize = "first")]
    #[serde(rename = "first")]
    First,

    #[strum(serialize = "last")]
    #[serde(rename = "last")]
    Last,

    #[strum(serialize = "high")]
    #[serde(rename = "high")]
    High,

    #[strum(serialize = "low")]
    #[serde(rename = "low")]
    Low,
}

/// Column types understood by the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Datetime,
}

/// Fixed column layout of the data surface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TableSchema(BTreeMap<String, ColumnType>);

impl TableSchema {
    /// `{stock, top_ask_price, top_bid_price, timestamp}`
    pub fn ticks() -> Self {
        let columns = [
            ("stock", ColumnType::String),
            ("top_ask_price", ColumnType::Float),
            ("top_bid_price", ColumnType::Float),
            ("timestamp", ColumnType::Date),
        ];
        Self(columns.into_iter().map(|(name, kind)| (name.to_string(), kind)).collect())
    }

    pub fn column(&self, name: &str) -> Option<ColumnType> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> SurfaceResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Row shape appended to the data surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub stock: Symbol,
    pub top_ask_price: f64,
    pub top_bid_price: f64,
    pub timestamp: Timestamp,
}

impl From<&TickRecord> for DisplayRow {
    fn from(record: &TickRecord) -> Self {
        Self {
            stock: record.stock.clone(),
            top_ask_price: record.ask_price().value(),
            top_bid_price: record.bid_price().value(),
            timestamp: record.timestamp,
        }
    }
}

impl DisplayRow {
    pub fn batch_to_json(rows: &[DisplayRow]) -> SurfaceResult<String> {
        Ok(serde_json::to_string(rows)?)
    }
}

/// Value Object - declarative view parameters applied to the viewer once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub view: ChartType,
    pub column_pivots: Vec<String>,
    pub row_pivots: Vec<String>,
    pub columns: Vec<String>,
    pub aggregates: BTreeMap<String, Aggregate>,
}

impl Default for ViewConfig {
    /// One line per stock over time, showing the ask price, with duplicate
    /// `(stock, timestamp)` cells collapsed by distinct count and average.
    fn default() -> Self {
        let aggregates = [
            ("stock", Aggregate::DistinctCount),
            ("top_ask_price", Aggregate::Avg),
            ("top_bid_price", Aggregate::Avg),
            ("timestamp", Aggregate::DistinctCount),
        ];
        Self {
            view: ChartType::YLine,
            column_pivots: vec!["stock".to_string()],
            row_pivots: vec!["timestamp".to_string()],
            columns: vec!["top_ask_price".to_string()],
            aggregates: aggregates.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

impl ViewConfig {
    pub const VIEW: &'static str = "view";
    pub const COLUMN_PIVOTS: &'static str = "column-pivots";
    pub const ROW_PIVOTS: &'static str = "row-pivots";
    pub const COLUMNS: &'static str = "columns";
    pub const AGGREGATES: &'static str = "aggregates";

    /// Element attributes in application order; list and map values are JSON.
    pub fn attributes(&self) -> SurfaceResult<Vec<(&'static str, String)>> {
        Ok(vec![
            (Self::VIEW, self.view.as_ref().to_string()),
            (Self::COLUMN_PIVOTS, serde_json::to_string(&self.column_pivots)?),
            (Self::ROW_PIVOTS, serde_json::to_string(&self.row_pivots)?),
            (Self::COLUMNS, serde_json::to_string(&self.columns)?),
            (Self::AGGREGATES, serde_json::to_string(&self.aggregates)?),
        ])
    }
}
