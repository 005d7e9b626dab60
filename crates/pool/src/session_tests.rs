// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lm_adapters::{EchoLedger, FakeLedger, LedgerCall, MemLedger};
use lm_core::names;
use proptest::prelude::*;
use std::time::Duration;

fn session_with(plugins: &[(&str, &FakeLedger)]) -> LedgerSession {
    let mut registry = Registry::new();
    for (name, ledger) in plugins {
        registry.register(*name, (*ledger).clone());
    }
    LedgerSession::new(Arc::new(registry))
}

fn handles(plugins: &[OpenPlugin]) -> Vec<i32> {
    plugins.iter().map(|plugin| plugin.handle.get()).collect()
}

#[tokio::test]
async fn mem_and_echo_open_as_minus_two() {
    let mut registry = Registry::new();
    registry.register(names::FINDY_MEM_LEDGER, MemLedger::new());
    registry.register(names::FINDY_ECHO_LEDGER, EchoLedger::new());
    let session = LedgerSession::new(Arc::new(registry));

    let handle = session
        .open_ledger(&["FINDY_MEM_LEDGER", "", "FINDY_ECHO_LEDGER", ""])
        .await
        .unwrap();

    assert_eq!(handle, Handle::new(-2));
    assert!(handle.is_plugin());
    assert!(!handle.is_native());
    let open = session.open_plugins().await;
    assert_eq!(handles(&open), vec![-1, -2]);
    assert_eq!(open[0].name, names::FINDY_MEM_LEDGER);
}

#[tokio::test]
async fn nothing_opened_returns_none() {
    let session = session_with(&[]);

    let handle = session.open_ledger(&["FINDY_MEM_LEDGER", ""]).await.unwrap();

    assert_eq!(handle, Handle::NONE);
    assert!(!session.is_open().await);
}

#[tokio::test]
async fn failed_open_is_skipped_without_using_a_handle() {
    let a = FakeLedger::new();
    let broken = FakeLedger::new();
    let c = FakeLedger::new();
    broken.fail_open("no route");
    let session = session_with(&[("A", &a), ("BROKEN", &broken), ("C", &c)]);

    let handle = session
        .open_ledger(&["A", "", "BROKEN", "", "MISSING", "", "C", ""])
        .await
        .unwrap();

    assert_eq!(handle, Handle::new(-2));
    let open = session.open_plugins().await;
    assert_eq!(handles(&open), vec![-1, -2]);
    assert_eq!(open[1].name, "C");
}

#[tokio::test]
async fn close_resets_allocation() {
    let a = FakeLedger::new();
    let b = FakeLedger::new();
    let session = session_with(&[("A", &a), ("B", &b)]);
    session.open_ledger(&["A", "", "B", ""]).await.unwrap();

    session.close_ledger(Handle::new(-2)).await;

    assert!(!a.is_open());
    assert!(!b.is_open());
    assert!(!session.is_open().await);
    assert_eq!(session.open_ledger(&["B", ""]).await.unwrap(), Handle::new(-1));
}

#[tokio::test]
async fn bare_plugin_name_opens_that_plugin() {
    let mem = FakeLedger::new();
    let real = FakeLedger::new();
    let session = session_with(&[(names::FINDY_MEM_LEDGER, &mem), (names::FINDY_LEDGER, &real)]);

    let handle = session.open_ledger(&["FINDY_MEM_LEDGER"]).await.unwrap();

    assert_eq!(handle, Handle::new(-1));
    assert_eq!(
        mem.calls(),
        vec![LedgerCall::Open {
            arg: String::new()
        }]
    );
    assert!(real.calls().is_empty());
}

#[tokio::test]
async fn bare_pool_name_opens_the_real_ledger() {
    let mem = FakeLedger::new();
    let real = FakeLedger::new();
    let session = session_with(&[(names::FINDY_MEM_LEDGER, &mem), (names::FINDY_LEDGER, &real)]);

    session.open_ledger(&["some_pool_name"]).await.unwrap();

    assert_eq!(
        real.calls(),
        vec![LedgerCall::Open {
            arg: "some_pool_name".to_string()
        }]
    );
    assert!(mem.calls().is_empty());
}

#[tokio::test]
async fn unpaired_arguments_open_nothing() {
    let a = FakeLedger::new();
    let session = session_with(&[("A", &a)]);

    let err = session.open_ledger(&["A", "", "A"]).await.unwrap_err();

    assert_eq!(err, ArgsError::Unpaired(3));
    assert!(a.calls().is_empty());
}

#[tokio::test]
async fn read_with_nothing_open_is_a_contract_violation() {
    let session = session_with(&[]);

    let err = session.read(&TxInfo::did(), "k").await.unwrap_err();

    assert!(matches!(err, LedgerError::NoLedgerOpen));
    assert!(err.is_contract_violation());
}

#[tokio::test]
async fn read_with_three_open_is_a_contract_violation() {
    let a = FakeLedger::new();
    let session = session_with(&[("A", &a)]);
    session.open_ledger(&["A", "", "A", "", "A", ""]).await.unwrap();

    let err = session.read(&TxInfo::did(), "k").await.unwrap_err();

    assert!(matches!(err, LedgerError::UnsupportedLedgerCount(3)));
    assert_eq!(a.read_count(), 0);
}

#[tokio::test]
async fn read_with_one_open_passes_through() {
    let a = FakeLedger::new().with_value("k", "v");
    let session = session_with(&[("A", &a)]);
    session.open_ledger(&["A", ""]).await.unwrap();

    assert_eq!(session.read(&TxInfo::did(), "k").await.unwrap().value, "v");
    assert!(session
        .read(&TxInfo::did(), "x")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn first_opened_is_authoritative() {
    let real = FakeLedger::new().with_value("k", "v1");
    real.set_read_delay(Duration::from_millis(30));
    let cache = FakeLedger::new();
    let session = session_with(&[("REAL", &real), ("CACHE", &cache)]);
    session.open_ledger(&["REAL", "pool", "CACHE", "c"]).await.unwrap();

    let record = session.read(&TxInfo::did(), "k").await.unwrap();
    assert_eq!(record.value, "v1");
    assert!(cache.writes()[0].0.update);

    // Second read is served by the refilled cache
    real.set_read_delay(Duration::from_millis(500));
    let start = std::time::Instant::now();
    assert_eq!(session.read(&TxInfo::did(), "k").await.unwrap().value, "v1");
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn write_fans_out_to_the_session() {
    let a = FakeLedger::new();
    let b = FakeLedger::new();
    let session = session_with(&[("A", &a), ("B", &b)]);
    session.open_ledger(&["A", "", "B", ""]).await.unwrap();

    session.write(&TxInfo::cred_def(), "cd", "{}").await.unwrap();

    assert_eq!(a.value("cd").as_deref(), Some("{}"));
    assert_eq!(b.value("cd").as_deref(), Some("{}"));
}

fn run<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(f)
}

proptest! {
    #[test]
    fn handles_count_down_from_minus_one(outcomes in proptest::collection::vec(any::<bool>(), 1..8)) {
        let ledgers: Vec<(String, FakeLedger)> = outcomes
            .iter()
            .enumerate()
            .map(|(i, opens)| {
                let ledger = FakeLedger::new();
                if !opens {
                    ledger.fail_open("refused");
                }
                (format!("P{}", i), ledger)
            })
            .collect();
        let mut registry = Registry::new();
        for (name, ledger) in &ledgers {
            registry.register(name.clone(), ledger.clone());
        }
        let session = LedgerSession::new(Arc::new(registry));
        let args: Vec<&str> = ledgers
            .iter()
            .flat_map(|(name, _)| [name.as_str(), ""])
            .collect();

        let (handle, open, reopened) = run(async {
            let handle = session.open_ledger(&args).await.unwrap();
            let open = session.open_plugins().await;
            session.close_ledger(handle).await;
            let reopened = session.open_ledger(&args).await.unwrap();
            (handle, open, reopened)
        });

        let opened = outcomes.iter().filter(|opens| **opens).count() as i32;
        let expected: Vec<i32> = (1..=opened).map(|n| -n).collect();
        prop_assert_eq!(handles(&open), expected);
        prop_assert_eq!(handle.get(), -opened);
        prop_assert_eq!(reopened, handle);

        let expected_names: Vec<String> = ledgers
            .iter()
            .zip(&outcomes)
            .filter(|(_, opens)| **opens)
            .map(|((name, _), _)| name.clone())
            .collect();
        let names: Vec<String> = open.iter().map(|plugin| plugin.name.clone()).collect();
        prop_assert_eq!(names, expected_names);
    }
}
