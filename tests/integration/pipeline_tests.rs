//! Integration tests for the full ingestion pipeline:
//! source → windows → predictor → ledger → contract → broadcast → observers.

use crate::mock_adapters::{
    RecordingContract, RecordingPredictor, RecordingTransport, TransportCall, VecSource, reading,
    readings,
};

use cosentry::alert::BroadcastState;
use cosentry::app::service::{
    MonitorService, PREDICTED_CO_KEY, PREDICTION_PENDING, TickOutcome,
};
use cosentry::config::SystemConfig;
use cosentry::frame::AlertFrame;
use cosentry::ledger::PayloadValue;

fn make_service() -> MonitorService {
    MonitorService::new(&SystemConfig::default())
}

fn pending_value() -> PayloadValue {
    PayloadValue::Text(PREDICTION_PENDING.into())
}

// ── Window fill & predictor invocation ───────────────────────

#[test]
fn predictor_fires_only_on_a_full_window() {
    let mut service = make_service();
    let mut source = VecSource::new(readings(&[1.0; 31]));
    let mut predictor = RecordingPredictor::replying(Some(7.5));
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    for _ in 0..29 {
        service
            .tick(&mut source, &mut predictor, &mut transport, &mut contract)
            .unwrap();
    }
    assert!(
        predictor.calls.is_empty(),
        "29 readings must not trigger a prediction"
    );

    // 30th reading: exactly one invocation, all 30 vectors, arrival order.
    service
        .tick(&mut source, &mut predictor, &mut transport, &mut contract)
        .unwrap();
    assert_eq!(predictor.calls.len(), 1);
    let first = &predictor.calls[0];
    assert_eq!(first.len(), 30);
    // The temperature marker (feature 0) carries the reading's timestamp.
    assert_eq!(first[0][0], 1.0);
    assert_eq!(first[29][0], 30.0);

    // 31st reading: invoked again with vectors 2..=31.
    service
        .tick(&mut source, &mut predictor, &mut transport, &mut contract)
        .unwrap();
    assert_eq!(predictor.calls.len(), 2);
    let second = &predictor.calls[1];
    assert_eq!(second[0][0], 2.0);
    assert_eq!(second[29][0], 31.0);
}

#[test]
fn readings_are_pending_during_the_startup_transient() {
    let mut service = make_service();
    let mut source = VecSource::new(readings(&[4.5]));
    let mut predictor = RecordingPredictor::replying(Some(99.0));
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    let outcome = service
        .tick(&mut source, &mut predictor, &mut transport, &mut contract)
        .unwrap();
    let TickOutcome::Processed(updated) = outcome else {
        panic!("expected Processed");
    };
    assert_eq!(updated.metadata.get(PREDICTED_CO_KEY), Some(&pending_value()));

    let tail = service.ledger().latest().unwrap();
    assert_eq!(tail.payload().get(PREDICTED_CO_KEY), Some(&pending_value()));
}

#[test]
fn prediction_lands_in_metadata_and_ledger() {
    let mut service = make_service();
    let mut source = VecSource::new(readings(&[2.0; 30]));
    let mut predictor = RecordingPredictor::replying(Some(42.5));
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    let mut last = None;
    for _ in 0..30 {
        last = Some(
            service
                .tick(&mut source, &mut predictor, &mut transport, &mut contract)
                .unwrap(),
        );
    }
    let Some(TickOutcome::Processed(updated)) = last else {
        panic!("expected Processed");
    };
    assert_eq!(
        updated.metadata.get(PREDICTED_CO_KEY),
        Some(&PayloadValue::Num(42.5))
    );
    assert_eq!(
        service
            .ledger()
            .latest()
            .unwrap()
            .payload()
            .get(PREDICTED_CO_KEY),
        Some(&PayloadValue::Num(42.5))
    );
}

#[test]
fn predictor_failure_degrades_to_pending() {
    let mut service = make_service();
    let mut source = VecSource::new(readings(&[2.0; 30]));
    let mut predictor = RecordingPredictor::replying(None);
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    for _ in 0..30 {
        service
            .tick(&mut source, &mut predictor, &mut transport, &mut contract)
            .unwrap();
    }
    assert_eq!(predictor.calls.len(), 1, "window was full on the last tick");
    assert_eq!(
        service
            .ledger()
            .latest()
            .unwrap()
            .payload()
            .get(PREDICTED_CO_KEY),
        Some(&pending_value()),
        "failed prediction must be recorded as pending, not an error"
    );
}

// ── Alert broadcast ───────────────────────────────────────────

#[test]
fn broadcast_follows_the_threshold_scenario() {
    let mut service = make_service();
    let co_levels = [10.0, 20.0, 36.0, 40.0, 34.0, 36.0];
    let mut source = VecSource::new(readings(&co_levels));
    let mut predictor = RecordingPredictor::replying(None);
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    let mut states = Vec::new();
    for _ in 0..co_levels.len() {
        service
            .tick(&mut source, &mut predictor, &mut transport, &mut contract)
            .unwrap();
        states.push(service.broadcast_state());
    }

    use BroadcastState::{Advertising, Idle};
    assert_eq!(states, vec![Idle, Idle, Advertising, Advertising, Idle, Advertising]);

    // Transport driven only on transitions: start, stop, start.
    assert_eq!(transport.calls.len(), 3);
    assert!(matches!(transport.calls[0], TransportCall::Start(_)));
    assert_eq!(transport.calls[1], TransportCall::Stop);
    assert!(matches!(transport.calls[2], TransportCall::Start(_)));

    // The first start carries the 36.0 ppm reading, scaled and flagged.
    let TransportCall::Start(frame_bytes) = &transport.calls[0] else {
        unreachable!();
    };
    let frame = AlertFrame::decode(frame_bytes).unwrap();
    assert_eq!(frame.co_level, 3600);
    assert_eq!(frame.alert_flag, 1);
    assert_eq!(frame.device_id, SystemConfig::default().device_id);
}

#[test]
fn alert_uses_raw_co_not_the_prediction() {
    let mut service = make_service();
    // Prediction claims danger, raw reading is safe: no broadcast.
    let mut source = VecSource::new(readings(&[2.0; 30]));
    let mut predictor = RecordingPredictor::replying(Some(500.0));
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    for _ in 0..30 {
        service
            .tick(&mut source, &mut predictor, &mut transport, &mut contract)
            .unwrap();
    }
    assert_eq!(service.broadcast_state(), BroadcastState::Idle);
    assert!(transport.calls.is_empty());
}

// ── Data-integrity rejection ──────────────────────────────────

#[test]
fn malformed_reading_is_rejected_and_skipped() {
    let mut service = make_service();

    let mut bad = reading(2, 100.0); // dangerous CO, but malformed
    bad.sensor_resistances.truncate(10);
    let events = vec![reading(1, 5.0), bad, reading(3, 5.0)];

    let mut source = VecSource::new(events);
    let mut predictor = RecordingPredictor::replying(None);
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    let o1 = service
        .tick(&mut source, &mut predictor, &mut transport, &mut contract)
        .unwrap();
    let o2 = service
        .tick(&mut source, &mut predictor, &mut transport, &mut contract)
        .unwrap();
    let o3 = service
        .tick(&mut source, &mut predictor, &mut transport, &mut contract)
        .unwrap();

    assert!(matches!(o1, TickOutcome::Processed(_)));
    assert!(matches!(o2, TickOutcome::Rejected(_)));
    assert!(matches!(o3, TickOutcome::Processed(_)));

    // The rejected reading reached nothing downstream.
    assert_eq!(service.ledger().len(), 3, "genesis + two valid readings");
    assert_eq!(service.window_fill().0, 2);
    assert_eq!(service.classifier_fill().0, 2, "classifier window stays in lock-step");
    assert_eq!(contract.payloads.len(), 2);
    assert_eq!(service.broadcast_state(), BroadcastState::Idle);
    assert!(transport.calls.is_empty());
}

// ── Contract execution ────────────────────────────────────────

#[test]
fn contract_sees_the_flattened_payload() {
    let mut service = make_service();
    let mut source = VecSource::new(readings(&[36.2]));
    let mut predictor = RecordingPredictor::replying(None);
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    service
        .tick(&mut source, &mut predictor, &mut transport, &mut contract)
        .unwrap();

    assert_eq!(contract.payloads.len(), 1);
    let payload = &contract.payloads[0];
    assert_eq!(payload.get("co_ppm"), Some(&PayloadValue::Num(36.2)));
    assert_eq!(
        payload.get("hazard_level"),
        Some(&PayloadValue::Text("danger".into()))
    );
    assert_eq!(payload.get(PREDICTED_CO_KEY), Some(&pending_value()));
}

#[test]
fn contract_failure_never_aborts_the_tick() {
    let mut service = make_service();
    let mut source = VecSource::new(readings(&[36.2, 1.0]));
    let mut predictor = RecordingPredictor::replying(None);
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::failing();

    for _ in 0..2 {
        let outcome = service
            .tick(&mut source, &mut predictor, &mut transport, &mut contract)
            .unwrap();
        assert!(matches!(outcome, TickOutcome::Processed(_)));
    }
    assert_eq!(contract.payloads.len(), 2);
    assert!(service.ledger().validate());
    // Broadcast still ran despite the failing contract.
    assert_eq!(transport.calls.len(), 2); // start at 36.2, stop at 1.0
}

// ── Observers ─────────────────────────────────────────────────

#[test]
fn observers_receive_updated_readings_until_unregistered() {
    use crate::mock_adapters::SharedObserver;

    let mut service = make_service();
    let (observer, seen) = SharedObserver::new();
    let id = service.register_observer(Box::new(observer));

    let mut source = VecSource::new(readings(&[4.5, 4.6]));
    let mut predictor = RecordingPredictor::replying(None);
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    service
        .tick(&mut source, &mut predictor, &mut transport, &mut contract)
        .unwrap();
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(
        seen.borrow()[0].metadata.get(PREDICTED_CO_KEY),
        Some(&pending_value()),
        "observers see the annotated reading, not the raw one"
    );

    assert!(service.unregister_observer(id));
    service
        .tick(&mut source, &mut predictor, &mut transport, &mut contract)
        .unwrap();
    assert_eq!(seen.borrow().len(), 1, "unregistered observer stays silent");
}

// ── Termination & chain integrity ─────────────────────────────

#[test]
fn exhausted_source_stops_cleanly() {
    let mut service = make_service();
    let mut source = VecSource::new(Vec::new());
    let mut predictor = RecordingPredictor::replying(None);
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    let outcome = service
        .tick(&mut source, &mut predictor, &mut transport, &mut contract)
        .unwrap();
    assert!(matches!(outcome, TickOutcome::Exhausted));
    assert_eq!(service.tick_count(), 0);
    assert_eq!(service.ledger().len(), 1);
}

#[test]
fn ledger_stays_valid_through_a_full_run() {
    let mut service = make_service();
    let co_levels = [10.0, 20.0, 36.0, 40.0, 34.0, 36.0];
    let mut source = VecSource::new(readings(&co_levels));
    let mut predictor = RecordingPredictor::replying(None);
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();

    loop {
        match service
            .tick(&mut source, &mut predictor, &mut transport, &mut contract)
            .unwrap()
        {
            TickOutcome::Exhausted => break,
            _ => assert!(service.ledger().validate(), "valid after every append"),
        }
    }
    assert_eq!(service.ledger().len(), 7);
    assert_eq!(service.tick_count(), 6);

    let levels: Vec<_> = service.ledger().blocks()[1..]
        .iter()
        .map(|b| b.payload().get("hazard_level").cloned())
        .collect();
    let text = |s: &str| Some(PayloadValue::Text(s.into()));
    assert_eq!(
        levels,
        vec![
            text("warning"),
            text("warning"),
            text("danger"),
            text("danger"),
            text("warning"),
            text("danger"),
        ]
    );
}
