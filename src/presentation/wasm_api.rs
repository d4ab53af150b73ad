use js_sys::JSON;
use wasm_bindgen::prelude::*;

use crate::application::{AttachOutcome, ChartConfig, LiveChart};
use crate::domain::logging::LogComponent;
use crate::infrastructure::perspective::{PerspectiveViewer, PerspectiveWorkerFactory};
use crate::log_warn;

const COMPONENT: LogComponent = LogComponent::Presentation("WASM");

/// JS entry point for hosts that drive the chart themselves.
///
/// ```js
/// const chart = new LiveChartApi(perspective, null);
/// chart.onAttach(document.querySelector("perspective-viewer"));
/// streamer.onTick(records => chart.onDataReceived(records));
/// ```
#[wasm_bindgen]
pub struct LiveChartApi {
    chart: LiveChart<PerspectiveWorkerFactory, PerspectiveViewer>,
}

#[wasm_bindgen]
impl LiveChartApi {
    /// `perspective` is the library module (the object exposing `worker()`).
    /// `config_json` overrides [`ChartConfig`] fields; invalid JSON throws.
    #[wasm_bindgen(constructor)]
    pub fn new(perspective: JsValue, config_json: Option<String>) -> Result<LiveChartApi, JsValue> {
        let config = match config_json {
            Some(json) => ChartConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => ChartConfig::default(),
        };
        Ok(Self { chart: LiveChart::new(PerspectiveWorkerFactory::new(perspective), config) })
    }

    /// Mount onto `element`, or onto the first element with the configured
    /// tag when omitted. Returns whether appends will be drawn.
    #[wasm_bindgen(js_name = onAttach)]
    pub fn on_attach(&mut self, element: Option<web_sys::Element>) -> bool {
        let viewer = match element {
            Some(element) => Some(PerspectiveViewer::new(element)),
            None => web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| PerspectiveViewer::locate(&document, &self.chart.config().element_tag)),
        };
        let Some(viewer) = viewer else {
            log_warn!(COMPONENT, "no <{}> element to attach to", self.chart.config().element_tag);
            return false;
        };
        self.chart.on_attach(viewer) == AttachOutcome::Ready
    }

    /// Feed an array of tick objects; returns the number of rows appended.
    /// Never throws: input that is not JSON-serializable appends nothing.
    #[wasm_bindgen(js_name = onDataReceived)]
    pub fn on_data_received(&mut self, records: JsValue) -> usize {
        // `JSON.stringify` yields `undefined` for `undefined` and functions.
        match JSON::stringify(&records).ok().and_then(|json| json.as_string()) {
            Some(json) => self.chart.on_json_received(&json),
            None => {
                log_warn!(COMPONENT, "records are not serializable: {:?}", records);
                0
            }
        }
    }

    #[wasm_bindgen(js_name = onDataReceivedJson)]
    pub fn on_data_received_json(&mut self, json: &str) -> usize {
        self.chart.on_json_received(json)
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.chart.is_ready()
    }

    #[wasm_bindgen(js_name = rowCount)]
    pub fn row_count(&self) -> usize {
        self.chart.stats().rows_appended
    }

    #[wasm_bindgen(js_name = getChartStats)]
    pub fn get_chart_stats(&self) -> String {
        serde_json::to_string(&self.chart.stats()).unwrap_or_else(|_| "{}".to_string())
    }
}
