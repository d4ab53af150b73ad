use live_tick_chart::application::{ChartConfig, LiveChart};
use live_tick_chart::domain::errors::RecordError;
use live_tick_chart::domain::market_data::TickRecord;
use live_tick_chart::infrastructure::memory::{InMemoryTableFactory, RecordingViewer, SurfaceJournal};

const SERVER_BATCH: &str = r#"[
    {"id":"0.109974697771","stock":"ABC","timestamp":"2019-02-11 22:06:30.572453",
     "top_bid":{"price":120.48,"size":109},"top_ask":{"price":121.2,"size":36}},
    {"id":"0.109974697771","stock":"DEF","timestamp":"2019-02-11 22:06:30.572453",
     "top_bid":{"price":117.87,"size":81},"top_ask":{"price":121.68,"size":4}}
]"#;

#[test]
fn parses_server_payload() {
    let (records, rejected) = TickRecord::parse_batch(SERVER_BATCH).unwrap();
    assert!(rejected.is_empty());
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].stock.value(), "ABC");
    assert_eq!(records[0].ask_price().value(), 121.2);
    assert_eq!(records[1].bid_price().value(), 117.87);
    assert_eq!(records[0].timestamp, records[1].timestamp);
}

#[test]
fn bad_records_are_reported_individually() {
    let json = r#"[
        {"stock":"ABC","timestamp":1},
        42,
        {"timestamp":2},
        {"stock":"DEF","timestamp":"last tuesday"},
        {"stock":"DEF","top_ask":null,"timestamp":3}
    ]"#;
    let (records, rejected) = TickRecord::parse_batch(json).unwrap();

    assert_eq!(records.len(), 2);
    let indices: Vec<usize> = rejected
        .iter()
        .map(|error| match error {
            RecordError::Malformed { index, .. } => *index,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn non_array_payload_is_rejected_whole() {
    assert!(matches!(TickRecord::parse_batch(r#"{"stock":"ABC"}"#), Err(RecordError::NotABatch(_))));
}

#[test]
fn json_updates_skip_bad_records_and_dedupe() {
    let journal = SurfaceJournal::new();
    let mut chart = LiveChart::new(InMemoryTableFactory::new(journal.clone()), ChartConfig::default());
    chart.on_attach(RecordingViewer::new(journal));

    assert_eq!(chart.on_json_received(SERVER_BATCH), 2);
    assert_eq!(chart.on_json_received(SERVER_BATCH), 0);
    assert_eq!(chart.on_json_received(r#"[{"stock":"ABC","timestamp":"2019-02-11 22:06:31"}, null]"#), 1);

    let stats = chart.stats();
    assert_eq!(stats.rows_appended, 3);
    assert_eq!(stats.records_rejected, 1);
    assert_eq!(stats.updates_received, 3);
}
