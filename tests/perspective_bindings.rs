#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Function, JSON, Reflect};
use live_tick_chart::LiveChartApi;
use live_tick_chart::application::{AttachOutcome, ChartConfig, LiveChart};
use live_tick_chart::domain::market_data::{Quote, TickRecord, Timestamp};
use live_tick_chart::infrastructure::perspective::{PerspectiveViewer, PerspectiveWorkerFactory};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

/// A stand-in for the library: `worker().table(schema)` returns an object
/// collecting every `update` payload in `rows`.
fn fake_module() -> JsValue {
    Function::new_no_args(
        "return { worker: () => ({ table: (schema) => ({ schema, rows: [], \
         update(batch) { this.rows.push(...batch); } }) }) };",
    )
    .call0(&JsValue::NULL)
    .unwrap()
}

fn element_with_load() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document.create_element("perspective-viewer").unwrap();
    let load = Function::new_with_args("table", "this.loaded = table;");
    Reflect::set(&element, &JsValue::from_str("load"), &load).unwrap();
    document.body().unwrap().append_child(&element).unwrap();
    element
}

fn viewer_with_load() -> PerspectiveViewer {
    PerspectiveViewer::new(element_with_load())
}

fn loaded_rows(element: &Element) -> Array {
    let loaded = Reflect::get(element, &JsValue::from_str("loaded")).unwrap();
    Array::from(&Reflect::get(&loaded, &JsValue::from_str("rows")).unwrap())
}

fn tick(stock: &str, ask: Option<f64>, millis: i64) -> TickRecord {
    TickRecord::new(stock, ask.map(Quote::priced), None, Timestamp::from_millis(millis).unwrap())
}

#[wasm_bindgen_test]
fn configures_loads_and_appends() {
    let viewer = viewer_with_load();
    let element = viewer.element().clone();
    let mut chart = LiveChart::new(PerspectiveWorkerFactory::new(fake_module()), ChartConfig::default());

    assert_eq!(chart.on_attach(viewer), AttachOutcome::Ready);
    assert_eq!(element.get_attribute("view").as_deref(), Some("y_line"));
    assert_eq!(element.get_attribute("row-pivots").as_deref(), Some(r#"["timestamp"]"#));

    let batch = vec![tick("ABC", Some(10.5), 1), tick("DEF", None, 2)];
    chart.on_data_received(&batch);
    chart.on_data_received(&batch);

    let rows = loaded_rows(&element);
    assert_eq!(rows.length(), 2);
    let second = rows.get(1);
    let ask = Reflect::get(&second, &JsValue::from_str("top_ask_price")).unwrap();
    assert_eq!(ask.as_f64(), Some(0.0));
}

#[wasm_bindgen_test]
fn missing_module_degrades() {
    let mut chart = LiveChart::new(PerspectiveWorkerFactory::new(JsValue::UNDEFINED), ChartConfig::default());

    assert_eq!(chart.on_attach(viewer_with_load()), AttachOutcome::Degraded);
    assert_eq!(chart.on_data_received(&[tick("ABC", Some(1.0), 1)]), 0);
}

#[wasm_bindgen_test]
fn worker_returning_null_degrades() {
    let module = Function::new_no_args("return { worker: () => null };").call0(&JsValue::NULL).unwrap();
    let mut chart = LiveChart::new(PerspectiveWorkerFactory::new(module), ChartConfig::default());

    assert_eq!(chart.on_attach(viewer_with_load()), AttachOutcome::Degraded);
}

#[wasm_bindgen_test]
fn api_attaches_and_appends_only_new_records() {
    let element = element_with_load();
    let mut api = LiveChartApi::new(fake_module(), None).unwrap();

    assert!(api.on_attach(Some(element.clone())));
    assert!(api.is_ready());

    let records = JSON::parse(
        r#"[{"stock":"ABC","top_ask":{"price":1.5,"size":3},"timestamp":"2019-02-01 14:09:46.286305"},
            {"stock":"DEF","top_bid":{"price":null},"timestamp":1549030186286}]"#,
    )
    .unwrap();
    assert_eq!(api.on_data_received(records.clone()), 2);
    assert_eq!(api.on_data_received(records), 0);
    assert_eq!(api.row_count(), 2);
    assert_eq!(loaded_rows(&element).length(), 2);

    let stats: serde_json::Value = serde_json::from_str(&api.get_chart_stats()).unwrap();
    assert_eq!(stats["rowsAppended"], 2);
    assert_eq!(stats["recordsAlreadySeen"], 2);
}

#[wasm_bindgen_test]
fn api_never_throws_on_unserializable_input() {
    let element = element_with_load();
    let mut api = LiveChartApi::new(fake_module(), None).unwrap();
    assert!(api.on_attach(Some(element.clone())));

    assert_eq!(api.on_data_received(JsValue::UNDEFINED), 0);
    assert_eq!(api.on_data_received(Function::new_no_args("").into()), 0);
    assert_eq!(api.on_data_received(JsValue::from_str("not a batch")), 0);
    assert_eq!(api.row_count(), 0);
    assert_eq!(loaded_rows(&element).length(), 0);
}

#[wasm_bindgen_test]
fn degraded_api_ignores_any_input() {
    let mut api = LiveChartApi::new(JsValue::UNDEFINED, None).unwrap();

    assert!(!api.on_attach(Some(element_with_load())));
    assert_eq!(api.on_data_received(JsValue::UNDEFINED), 0);
    assert_eq!(api.on_data_received(JSON::parse("[]").unwrap()), 0);
    assert!(!api.is_ready());
}

#[wasm_bindgen_test]
fn api_rejects_bad_config() {
    assert!(LiveChartApi::new(fake_module(), Some("{".to_string())).is_err());
}
