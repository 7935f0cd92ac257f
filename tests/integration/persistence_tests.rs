//! Integration tests for the persist / resume flow:
//! service run → JSONL store → restored ledger → continued run.

use crate::mock_adapters::{
    RecordingContract, RecordingPredictor, RecordingTransport, VecSource, readings,
};

use cosentry::adapters::store::JsonlBlockStore;
use cosentry::app::service::{MonitorService, TickOutcome};
use cosentry::config::SystemConfig;
use cosentry::ledger::Ledger;

fn drive(service: &mut MonitorService, co_levels: &[f64]) {
    let mut source = VecSource::new(readings(co_levels));
    let mut predictor = RecordingPredictor::replying(None);
    let mut transport = RecordingTransport::new();
    let mut contract = RecordingContract::new();
    loop {
        match service
            .tick(&mut source, &mut predictor, &mut transport, &mut contract)
            .unwrap()
        {
            TickOutcome::Exhausted => break,
            _ => {}
        }
    }
}

#[test]
fn a_persisted_run_resumes_and_extends() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonlBlockStore::new(dir.path().join("chain.jsonl"));
    let config = SystemConfig::default();

    // First session: three readings, every block persisted.
    let mut service = MonitorService::new(&config);
    drive(&mut service, &[4.5, 12.0, 1.5]);
    for block in service.ledger().blocks() {
        store.save_block(block).unwrap();
    }
    let first_tail = service.ledger().latest().unwrap().hash().to_string();

    // Second session: restore, verify, continue appending.
    let restored = Ledger::from_blocks(store.load_blocks().unwrap()).unwrap();
    assert_eq!(restored.len(), 4);
    let mut service = MonitorService::with_ledger(&config, restored);
    drive(&mut service, &[2.5]);

    assert_eq!(service.ledger().len(), 5);
    assert!(service.ledger().validate());
    assert_eq!(
        service.ledger().blocks()[3].hash(),
        first_tail,
        "resumed chain extends the original tail"
    );
    assert_eq!(service.ledger().latest().unwrap().previous_hash(), first_tail);
}

#[test]
fn a_tampered_store_never_becomes_a_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.jsonl");
    let mut store = JsonlBlockStore::new(&path);
    let config = SystemConfig::default();

    let mut service = MonitorService::new(&config);
    drive(&mut service, &[4.5, 12.0]);
    for block in service.ledger().blocks() {
        store.save_block(block).unwrap();
    }

    // Rewrite a sensor value on disk.
    let tampered = std::fs::read_to_string(&path).unwrap().replace("12.0", "1.0");
    std::fs::write(&path, tampered).unwrap();

    assert!(Ledger::from_blocks(store.load_blocks().unwrap()).is_err());
}
