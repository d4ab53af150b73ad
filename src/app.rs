use leptos::html::Div;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    application::{ChartConfig, LiveChart},
    domain::{logging::LogComponent, market_data::TickRecord},
    infrastructure::perspective::{PerspectiveViewer, PerspectiveWorkerFactory},
    log_warn,
};

const COMPONENT: LogComponent = LogComponent::Presentation("LiveChartView");

/// Live chart of streaming ticks.
///
/// Renders a container, creates the viewer element inside it once the
/// container is mounted, then appends every new part of `data`.
#[component]
pub fn LiveChartView(
    /// Latest records from the tick supplier.
    #[prop(into)]
    data: Signal<Vec<TickRecord>>,
    /// Perspective module. Falls back to `window.perspective`.
    #[prop(optional)]
    factory: Option<PerspectiveWorkerFactory>,
    #[prop(optional)] config: Option<ChartConfig>,
) -> impl IntoView {
    let factory = factory.unwrap_or_else(PerspectiveWorkerFactory::from_window);
    let config = config.unwrap_or_default();
    let tag = config.element_tag.clone();

    let chart = Rc::new(RefCell::new(LiveChart::new(factory, config)));
    let rows_appended = create_rw_signal(0usize);
    let container = create_node_ref::<Div>();

    {
        let chart = Rc::clone(&chart);
        container.on_load(move |div| {
            let parent: &web_sys::Node = &div;
            let viewer = match PerspectiveViewer::create_in(parent, &tag) {
                Ok(viewer) => viewer,
                Err(e) => {
                    log_warn!(COMPONENT, "cannot create <{}>: {}", tag, e);
                    return;
                }
            };
            let mut chart = chart.borrow_mut();
            chart.on_attach(viewer);
            // Anything delivered before mount was skipped; replay it now.
            chart.on_data_received(&data.get_untracked());
            rows_appended.set(chart.stats().rows_appended);
        });
    }

    create_effect(move |_| {
        let records = data.get();
        let mut chart = chart.borrow_mut();
        chart.on_data_received(&records);
        rows_appended.set(chart.stats().rows_appended);
    });

    view! {
        <div class="live-chart" node_ref=container data-rows=move || rows_appended.get()></div>
    }
}
