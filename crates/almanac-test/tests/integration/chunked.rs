//! Tests for chunked asynchronous batch assembly.
//!
//! Verifies agreement with the synchronous engine, ordering across
//! suspension points, and that suspensions really hand control back.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use almanac_test::almanac_core::config::{EngineConfig, YieldStrategy};
use futures::FutureExt;
use serde_json::json;

use super::helpers::*;

/// ## Summary
/// Synchronous and chunked assembly agree on success and on failure.
#[test_log::test(tokio::test)]
async fn matches_synchronous_engine() {
    let batch = events(12);
    let sync = create_events(Some(&batch), None).expect("sync batch should assemble");
    let chunked = create_events_async(Some(&batch), None)
        .await
        .expect("chunked batch should assemble");
    assert_eq!(sync, chunked);

    let mut broken = events(4);
    broken[2] = invalid_event(2);
    let sync_err = create_events(Some(&broken), None).expect_err("sync batch must fail");
    let chunked_err = create_events_async(Some(&broken), None)
        .await
        .expect_err("chunked batch must fail");
    assert_eq!(sync_err.to_string(), chunked_err.to_string());
}

/// ## Summary
/// A missing batch resolves to the missing-input error.
#[test_log::test(tokio::test)]
async fn missing_events_resolve_to_error() {
    let header = attrs(json!({ "calName": "ignored" }));
    let err = create_events_async(None, Some(&header))
        .await
        .expect_err("missing batch must fail");
    assert!(matches!(err, ServiceError::MissingInput));
}

/// ## Summary
/// Events keep their input order across several suspension points.
#[test_log::test(tokio::test)]
async fn large_batch_keeps_order() {
    let batch = events(2500);

    let text = create_events_async(Some(&batch), None)
        .await
        .expect("large batch should assemble");

    let positions = uid_positions(&text, batch.len());
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(text.ends_with("END:VCALENDAR\r\n"));
}

/// ## Summary
/// A failure after a suspension point still discards the whole batch.
#[test_log::test(tokio::test)]
async fn failure_after_suspension_discards_output() {
    let mut batch = events(2500);
    batch[1500] = invalid_event(1500);

    let err = create_events_async(Some(&batch), None)
        .await
        .expect_err("batch must fail");
    assert!(matches!(err, ServiceError::RfcError(_)));
}

/// ## Summary
/// Other work on the same task runs while a batch is being assembled.
#[test_log::test(tokio::test(flavor = "current_thread"))]
async fn suspensions_let_other_work_run() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let assembler = ChunkedAssembler::new(NonZeroUsize::MIN);
    let batch = events(10);
    let header = Attributes::new();

    let assembly = assembler.assemble(Some(&batch), &header).map({
        let log = Arc::clone(&log);
        move |result| {
            log.lock().expect("log lock").push("assembled");
            result
        }
    });
    let neighbour = {
        let log = Arc::clone(&log);
        async move {
            log.lock().expect("log lock").push("neighbour");
        }
    };

    let (result, ()) = tokio::join!(assembly, neighbour);

    assert!(result.is_ok());
    assert_eq!(*log.lock().expect("log lock"), ["neighbour", "assembled"]);
}

/// ## Summary
/// Settings select the cadence and the timer strategy.
#[test_log::test(tokio::test)]
async fn configured_timer_strategy() {
    let config = EngineConfig {
        yield_every: 3,
        yield_strategy: YieldStrategy::Timer,
        timer_delay_ms: 1,
    };
    let assembler = ChunkedAssembler::from_config(&config).expect("config is valid");
    assert_eq!(assembler.yield_every().get(), 3);
    assert_eq!(assembler.strategy(), YieldStrategy::Timer);

    let batch = events(10);
    let text = tokio::time::timeout(
        Duration::from_secs(5),
        assembler.assemble(Some(&batch), &Attributes::new()),
    )
    .await
    .expect("assembly should finish")
    .expect("batch should assemble");
    assert_eq!(uid_positions(&text, 10).len(), 10);
}
