//! Refresh chain ordering and fallthrough

mod common;

use charm_refresh::{CharmId, RefreshChain, RefreshError};
use common::*;
use std::sync::atomic::Ordering;

fn meshuggah() -> CharmId {
    CharmId::from(url("meshuggah"))
}

#[smol_potat::test]
async fn test_single_refresher_resolves() {
    let mut chain = RefreshChain::new();
    chain.register(Box::new(ScriptedRefresher::new(Script::Resolve(meshuggah()))));

    let charm = chain.run(&basic_config("meshuggah")).await.unwrap();
    assert_eq!(charm, meshuggah());
}

#[smol_potat::test]
async fn test_no_refresher_allowed() {
    let mut chain = RefreshChain::new();
    chain.register(Box::new(ScriptedRefresher::new(Script::Decline)));

    let err = chain.run(&basic_config("meshuggah")).await.unwrap_err();
    assert!(matches!(err, RefreshError::Unable(_)));
    assert_eq!(err.to_string(), r#"unable to refresh "meshuggah""#);
}

#[smol_potat::test]
async fn test_declined_refresher_is_skipped() {
    let first = ScriptedRefresher::new(Script::Decline);
    let first_refreshes = first.refresh_calls.clone();

    let mut chain = RefreshChain::new();
    chain.register(Box::new(first));
    chain.register(Box::new(ScriptedRefresher::new(Script::Resolve(meshuggah()))));

    let charm = chain.run(&basic_config("meshuggah")).await.unwrap();
    assert_eq!(charm, meshuggah());
    assert_eq!(first_refreshes.load(Ordering::SeqCst), 0);
}

#[smol_potat::test]
async fn test_exhausted_refresher_falls_through() {
    let log = CallLog::default();
    let first = ScriptedRefresher::logged(Script::Decline, 1, &log);
    let first_allowed = first.allowed_calls.clone();
    let exhausted = ScriptedRefresher::logged(Script::Exhausted, 2, &log);
    let exhausted_refreshes = exhausted.refresh_calls.clone();
    let last = ScriptedRefresher::logged(Script::Resolve(meshuggah()), 3, &log);
    let last_refreshes = last.refresh_calls.clone();

    let mut chain = RefreshChain::new();
    chain.register(Box::new(first));
    chain.register(Box::new(exhausted));
    chain.register(Box::new(last));

    let charm = chain.run(&basic_config("meshuggah")).await.unwrap();
    assert_eq!(charm, meshuggah());
    assert_eq!(first_allowed.load(Ordering::SeqCst), 1);
    assert_eq!(exhausted_refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(last_refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["allowed#1", "allowed#2", "refresh#2", "allowed#3", "refresh#3"]
    );
}

#[smol_potat::test]
async fn test_terminal_error_stops_the_chain() {
    let last = ScriptedRefresher::new(Script::Resolve(meshuggah()));
    let last_allowed = last.allowed_calls.clone();

    let mut chain = RefreshChain::new();
    chain.register(Box::new(ScriptedRefresher::new(Script::Fail("boom"))));
    chain.register(Box::new(last));

    let err = chain.run(&basic_config("meshuggah")).await.unwrap_err();
    assert_eq!(err.to_string(), "boom");
    assert_eq!(last_allowed.load(Ordering::SeqCst), 0);
}

#[smol_potat::test]
async fn test_allowed_error_stops_the_chain() {
    let last = ScriptedRefresher::new(Script::Resolve(meshuggah()));
    let last_allowed = last.allowed_calls.clone();

    let mut chain = RefreshChain::new();
    chain.register(Box::new(ScriptedRefresher::new(Script::AllowedError("trap"))));
    chain.register(Box::new(last));

    let err = chain.run(&basic_config("meshuggah")).await.unwrap_err();
    assert_eq!(err.to_string(), "trap");
    assert_eq!(last_allowed.load(Ordering::SeqCst), 0);
}

#[smol_potat::test]
async fn test_default_chain_order() {
    let chain = RefreshChain::with_defaults(
        FakeAdder::new(),
        FakeResolver::new(url("meshuggah")),
        FakeRepository::new(OnDisk::Nothing),
    );
    assert_eq!(chain.list_refreshers(), vec!["local", "charm-store", "charm-hub"]);
}

#[smol_potat::test]
async fn test_default_chain_missing_local_path_is_unable() {
    let repository = FakeRepository::new(OnDisk::Nothing);
    let chain = RefreshChain::with_defaults(
        FakeAdder::new(),
        FakeResolver::new(url("meshuggah")),
        repository.clone(),
    );

    let err = chain.run(&basic_config("local:meshuggah")).await.unwrap_err();
    assert_eq!(err.to_string(), r#"unable to refresh "local:meshuggah""#);
    assert_eq!(repository.calls.lock().unwrap().len(), 1);
}

#[smol_potat::test]
async fn test_default_chain_routes_charm_store_urls() {
    let adder = FakeAdder::new();
    let chain = RefreshChain::with_defaults(
        adder.clone(),
        FakeResolver::new(url("cs:meshuggah-2")),
        FakeRepository::new(OnDisk::Nothing),
    );

    let charm = chain.run(&basic_config("cs:meshuggah")).await.unwrap();
    assert_eq!(charm.url, url("cs:meshuggah-2"));
    assert_eq!(adder.added.lock().unwrap().len(), 1);
}
