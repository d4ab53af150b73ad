use super::value_objects::{DisplayRow, TableSchema, ViewConfig};
use crate::domain::errors::SurfaceResult;

/// Append-only, fixed-schema store consumed by the viewer.
pub trait DataTable {
    /// Append one batch of rows, keeping their order.
    fn update(&mut self, rows: &[DisplayRow]) -> SurfaceResult<()>;
}

/// Creates tables, if the hosting runtime offers the capability.
pub trait TableFactory {
    type Table: DataTable;

    /// `Ok(None)` means the capability is absent; the chart then stays empty.
    fn create_table(&self, schema: &TableSchema) -> SurfaceResult<Option<Self::Table>>;
}

/// The rendering element the chart draws into.
pub trait ViewerElement {
    type Table;

    fn set_attribute(&mut self, name: &str, value: &str) -> SurfaceResult<()>;

    /// Load a table so that its future appends become visible.
    fn attach(&mut self, table: &Self::Table) -> SurfaceResult<()>;

    fn configure(&mut self, config: &ViewConfig) -> SurfaceResult<()> {
        for (name, value) in config.attributes()? {
            self.set_attribute(name, &value)?;
        }
        Ok(())
    }
}
