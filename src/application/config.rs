use crate::domain::chart::{DeltaStrategy, TableSchema, ViewConfig};
use crate::domain::errors::AppError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ELEMENT_TAG: &str = "perspective-viewer";

/// Everything a chart instance needs besides its collaborators.
///
/// Every field has a default, so `{}` is a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Tag of the rendering element created or looked up on mount.
    pub element_tag: String,
    pub view: ViewConfig,
    pub delta: DeltaStrategy,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            element_tag: DEFAULT_ELEMENT_TAG.to_string(),
            view: ViewConfig::default(),
            delta: DeltaStrategy::default(),
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AppError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_delta(mut self, delta: DeltaStrategy) -> Self {
        self.delta = delta;
        self
    }

    /// The table schema is fixed; the view may only reference its columns.
    pub fn schema(&self) -> TableSchema {
        TableSchema::ticks()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.element_tag.trim().is_empty() {
            return Err(AppError::Configuration("element_tag cannot be empty".to_string()));
        }
        let schema = self.schema();
        let referenced = self
            .view
            .column_pivots
            .iter()
            .chain(&self.view.row_pivots)
            .chain(&self.view.columns)
            .chain(self.view.aggregates.keys());
        for column in referenced {
            if schema.column(column).is_none() {
                return Err(AppError::Configuration(format!(
                    "view references unknown column `{}`",
                    column
                )));
            }
        }
        Ok(())
    }
}
