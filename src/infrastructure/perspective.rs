//! Bindings to the Perspective viewer element and its worker tables.
//!
//! The library is reached only through `js_sys::Reflect`, so no JS glue is
//! generated and a missing library shows up as `Ok(None)` from the factory
//! rather than as a link error.

use js_sys::{Function, JSON, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Node};

use crate::domain::{
    chart::{DataTable, DisplayRow, TableFactory, TableSchema, ViewerElement},
    errors::{SurfaceError, SurfaceResult},
    logging::LogComponent,
};
use crate::log_debug;

const COMPONENT: LogComponent = LogComponent::Infrastructure("Perspective");

fn describe(value: JsValue) -> String {
    value
        .as_string()
        .or_else(|| JSON::stringify(&value).ok().and_then(|s| s.as_string()))
        .unwrap_or_else(|| format!("{:?}", value))
}

fn is_absent(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

fn method(target: &JsValue, name: &str) -> Result<Function, String> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(describe)?
        .dyn_into::<Function>()
        .map_err(|_| format!("`{}` is not a function", name))
}

fn to_js(json: &str) -> SurfaceResult<JsValue> {
    JSON::parse(json).map_err(|e| SurfaceError::Serialization(describe(e)))
}

/// A worker-backed table handle.
#[derive(Debug, Clone)]
pub struct PerspectiveTable {
    handle: JsValue,
}

impl PerspectiveTable {
    pub fn from_handle(handle: JsValue) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &JsValue {
        &self.handle
    }
}

impl DataTable for PerspectiveTable {
    fn update(&mut self, rows: &[DisplayRow]) -> SurfaceResult<()> {
        let payload = to_js(&DisplayRow::batch_to_json(rows)?)?;
        let update = method(&self.handle, "update").map_err(SurfaceError::Update)?;
        update.call1(&self.handle, &payload).map_err(|e| SurfaceError::Update(describe(e)))?;
        Ok(())
    }
}

/// Creates tables through an explicitly supplied Perspective module.
#[derive(Debug, Clone)]
pub struct PerspectiveWorkerFactory {
    module: JsValue,
}

impl PerspectiveWorkerFactory {
    pub fn new(module: JsValue) -> Self {
        Self { module }
    }

    /// Factory over `window.perspective`, for pages that load the library globally.
    pub fn from_window() -> Self {
        let module = web_sys::window()
            .and_then(|window| Reflect::get(&window, &JsValue::from_str("perspective")).ok())
            .unwrap_or(JsValue::UNDEFINED);
        Self::new(module)
    }

    pub fn is_available(&self) -> bool {
        !is_absent(&self.module)
    }
}

impl TableFactory for PerspectiveWorkerFactory {
    type Table = PerspectiveTable;

    fn create_table(&self, schema: &TableSchema) -> SurfaceResult<Option<PerspectiveTable>> {
        if !self.is_available() {
            return Ok(None);
        }
        let Ok(worker_fn) = method(&self.module, "worker") else {
            log_debug!(COMPONENT, "module has no worker(); no table");
            return Ok(None);
        };
        let worker = worker_fn
            .call0(&self.module)
            .map_err(|e| SurfaceError::CapabilityUnavailable(describe(e)))?;
        if is_absent(&worker) {
            return Ok(None);
        }

        let table_fn = method(&worker, "table").map_err(SurfaceError::CapabilityUnavailable)?;
        let handle = table_fn
            .call1(&worker, &to_js(&schema.to_json()?)?)
            .map_err(|e| SurfaceError::CapabilityUnavailable(describe(e)))?;
        if is_absent(&handle) {
            return Ok(None);
        }
        Ok(Some(PerspectiveTable::from_handle(handle)))
    }
}

/// The `<perspective-viewer>` element (or any element with the same contract).
#[derive(Debug, Clone)]
pub struct PerspectiveViewer {
    element: Element,
}

impl PerspectiveViewer {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// First element with `tag` in the document.
    pub fn locate(document: &Document, tag: &str) -> Option<Self> {
        document.get_elements_by_tag_name(tag).item(0).map(Self::new)
    }

    /// Create a `tag` element and append it to `parent`.
    pub fn create_in(parent: &Node, tag: &str) -> SurfaceResult<Self> {
        let document = parent.owner_document().ok_or_else(|| {
            SurfaceError::CapabilityUnavailable("container is not in a document".to_string())
        })?;
        let element = document
            .create_element(tag)
            .map_err(|e| SurfaceError::CapabilityUnavailable(describe(e)))?;
        parent
            .append_child(&element)
            .map_err(|e| SurfaceError::CapabilityUnavailable(describe(e)))?;
        Ok(Self::new(element))
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl ViewerElement for PerspectiveViewer {
    type Table = PerspectiveTable;

    fn set_attribute(&mut self, name: &str, value: &str) -> SurfaceResult<()> {
        self.element.set_attribute(name, value).map_err(|e| SurfaceError::Attribute {
            name: name.to_string(),
            reason: describe(e),
        })
    }

    fn attach(&mut self, table: &PerspectiveTable) -> SurfaceResult<()> {
        let load = method(&self.element, "load").map_err(SurfaceError::Load)?;
        load.call1(&self.element, table.handle()).map_err(|e| SurfaceError::Load(describe(e)))?;
        Ok(())
    }
}
