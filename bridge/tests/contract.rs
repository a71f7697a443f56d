//! Call-contract tests for the bridge
//!
//! Exercises the documented lifecycle end to end through the public
//! Rust API: out-of-order calls fail with sentinels instead of crashing,
//! and the happy path produces well-formed SHIORI/3.0 wire bytes whose
//! declared length matches the payload.

use shiori_bridge::{Bridge, BridgeConfig, GhostHandle, Phase};
use shiori_core::{RequestBuilder, ShioriError, DESCRIPT_FILE};

fn ghost_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(DESCRIPT_FILE),
        "name,Sample\ncraftman,tester\nversion,1.0\n",
    )
    .unwrap();
    dir
}

#[test]
fn end_to_end_scenario() {
    let dir = ghost_dir();
    let handle = GhostHandle::from_raw(42);
    let mut bridge = Bridge::default();

    assert!(bridge.initialize().is_ok());
    assert!(bridge.set_directory(dir.path().to_str().unwrap()).is_ok());
    assert!(bridge.load(handle, 0).is_ok());
    assert_eq!(bridge.ghost().unwrap().name, "Sample");

    let request = RequestBuilder::on_boot().sender("host").build();
    let wire = bridge.handle_request(handle, request.as_bytes()).unwrap();

    let text = String::from_utf8(wire.clone()).unwrap();
    assert_eq!(text.len(), wire.len());
    assert!(text.starts_with("SHIORI/3.0 200 OK\r\n\r\n"));
    let payload = &text["SHIORI/3.0 200 OK\r\n\r\n".len()..];
    assert!(payload.starts_with("\\h\\s[0]"));
    assert!(payload.ends_with("\\e"));

    assert!(bridge.unload().is_ok());
    assert!(bridge.finalize().is_ok());
    assert_eq!(bridge.phase(), Phase::Uninitialized);
}

#[test]
fn out_of_order_calls_are_sentinels_not_crashes() {
    let mut bridge = Bridge::default();
    let handle = GhostHandle::from_raw(7);

    assert!(matches!(
        bridge.load(handle, 0),
        Err(ShioriError::NotInitialized)
    ));
    assert!(matches!(bridge.unload(), Err(ShioriError::NotInitialized)));
    assert!(matches!(
        bridge.handle_request(handle, b"GET SHIORI/3.0\r\n\r\n"),
        Err(ShioriError::NotInitialized)
    ));

    // finalize before initialize is a tolerated no-op
    assert!(bridge.finalize().is_ok());
}

#[test]
fn request_between_unload_and_reload_is_protocol_error() {
    let mut bridge = Bridge::default();
    let handle = GhostHandle::from_raw(7);

    bridge.initialize().unwrap();
    bridge.load(handle, 0).unwrap();
    bridge.unload().unwrap();

    let wire = bridge
        .handle_request(handle, &RequestBuilder::on_boot().build().into_bytes())
        .unwrap();
    let text = String::from_utf8(wire).unwrap();
    assert!(text.starts_with("SHIORI/3.0 400 Bad Request\r\n"));

    // A new load makes the bridge answer again
    bridge.load(handle, 0).unwrap();
    let wire = bridge
        .handle_request(handle, &RequestBuilder::on_boot().build().into_bytes())
        .unwrap();
    assert!(String::from_utf8(wire)
        .unwrap()
        .starts_with("SHIORI/3.0 200 OK\r\n\r\n"));
}

#[test]
fn long_directory_is_truncated_never_overflowed() {
    let mut bridge = Bridge::new(BridgeConfig {
        max_directory_bytes: 16,
        ..BridgeConfig::default()
    });

    let long = format!("/ghosts/{}", "x".repeat(64));
    bridge.set_directory(&long).unwrap();

    let stored = bridge.directory().unwrap().to_str().unwrap();
    assert_eq!(stored.len(), 16);
    assert!(long.starts_with(stored));
}

#[test]
fn notifications_stay_silent_across_the_lifecycle() {
    let mut bridge = Bridge::default();
    let handle = GhostHandle::from_raw(1);

    bridge.initialize().unwrap();
    bridge.load(handle, 0).unwrap();

    let notify = RequestBuilder::on_second_change().build();
    let wire = bridge.handle_request(handle, notify.as_bytes()).unwrap();
    let text = String::from_utf8(wire).unwrap();
    assert!(text.starts_with("SHIORI/3.0 204 No Content\r\n"));
    assert!(text.ends_with("\r\n\r\n"));
}
