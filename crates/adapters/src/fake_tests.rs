// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Instant;

#[tokio::test]
async fn records_calls_in_order() {
    let fake = FakeLedger::new();
    let tx = TxInfo::did();

    fake.open("pool").await.unwrap();
    fake.write(&tx, "k", "v").await.unwrap();
    fake.read(&tx, "k").await.unwrap();
    fake.close().await;

    assert_eq!(
        fake.calls(),
        vec![
            LedgerCall::Open {
                arg: "pool".to_string()
            },
            LedgerCall::Write {
                tx: tx.clone(),
                id: "k".to_string(),
                data: "v".to_string()
            },
            LedgerCall::Read {
                tx,
                id: "k".to_string()
            },
            LedgerCall::Close,
        ]
    );
    assert!(!fake.is_open());
}

#[tokio::test]
async fn missing_key_is_not_found_but_empty_value_is_a_hit() {
    let fake = FakeLedger::new().with_value("empty", "");

    assert_eq!(fake.read(&TxInfo::did(), "empty").await.unwrap().value, "");
    assert!(fake
        .read(&TxInfo::did(), "missing")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn injected_failures() {
    let fake = FakeLedger::new().with_value("k", "v");
    fake.fail_open("nope");
    fake.fail_reads("down");
    fake.fail_writes("full");

    assert!(matches!(
        fake.open("").await,
        Err(LedgerError::OpenFailed(_))
    ));
    assert!(matches!(
        fake.read(&TxInfo::did(), "k").await,
        Err(LedgerError::Remote(_))
    ));
    assert!(matches!(
        fake.write(&TxInfo::did(), "k", "w").await,
        Err(LedgerError::Remote(_))
    ));
    assert_eq!(fake.value("k").as_deref(), Some("v"));
    assert_eq!(fake.write_count(), 1);
    assert_eq!(fake.read_count(), 1);
}

#[tokio::test]
async fn read_delay_is_applied() {
    let fake = FakeLedger::new().with_value("k", "v");
    fake.set_read_delay(Duration::from_millis(30));

    let start = Instant::now();
    fake.read(&TxInfo::did(), "k").await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn writes_keep_the_update_flag() {
    let fake = FakeLedger::new();
    let tx = TxInfo::schema().as_update();

    fake.write(&tx, "s1", "{}").await.unwrap();

    let writes = fake.writes();
    assert_eq!(writes.len(), 1);
    assert!(writes[0].0.update);
    assert_eq!(writes[0].1, "s1");
}

#[tokio::test]
async fn record_id_can_be_overridden() {
    let fake = FakeLedger::new().with_value("k", "v");
    fake.set_record_id("other");

    let record = fake.read(&TxInfo::did(), "k").await.unwrap();

    assert_eq!((record.id.as_str(), record.value.as_str()), ("other", "v"));
}
