//! Device resolution against scripted discovery results

mod helpers;

use std::sync::atomic::Ordering;
use std::time::Duration;

use dlna_api::{ApiError, DeviceResolver};
use dlna_config::ConfigStore;
use helpers::*;
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(3);

#[test]
fn test_no_name_and_no_default_skips_discovery() {
    let source = StaticSource::named(&["Living Room TV"]);
    let calls = source.calls.clone();
    let resolver = DeviceResolver::new(source, FixedDefault::none());

    let result = resolver.resolve(None, TIMEOUT);

    assert!(matches!(result, Err(ApiError::NoDeviceSpecified)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_blank_name_falls_back_to_default() {
    let resolver = DeviceResolver::new(StaticSource::named(&["Kitchen Speaker"]), FixedDefault::named("kitchen"));

    let device = resolver.resolve(Some("   "), TIMEOUT).unwrap().unwrap();
    assert_eq!(device.name, "Kitchen Speaker");
}

#[test]
fn test_default_device_is_used_without_hint() {
    let source = StaticSource::named(&["Bedroom", "Office"]);
    let calls = source.calls.clone();
    let resolver = DeviceResolver::new(source, FixedDefault::named("Office"));

    let device = resolver.resolve(None, TIMEOUT).unwrap().unwrap();

    assert_eq!(device.name, "Office");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_hint_overrides_default() {
    let resolver = DeviceResolver::new(StaticSource::named(&["Bedroom", "Office"]), FixedDefault::named("Office"));

    let device = resolver.resolve(Some("bedroom"), TIMEOUT).unwrap().unwrap();
    assert_eq!(device.name, "Bedroom");
}

#[test]
fn test_exact_match_beats_partial_regardless_of_order() {
    let resolver = DeviceResolver::new(
        StaticSource::named(&["Living Room TV", "Living Room"]),
        FixedDefault::none(),
    );

    let device = resolver.resolve(Some("Living Room"), TIMEOUT).unwrap().unwrap();
    assert_eq!(device.name, "Living Room");
}

#[test]
fn test_partial_match() {
    let resolver = DeviceResolver::new(StaticSource::named(&["Bedroom", "Living Room TV"]), FixedDefault::none());

    let device = resolver.resolve(Some("tv"), TIMEOUT).unwrap().unwrap();
    assert_eq!(device.name, "Living Room TV");
}

#[test]
fn test_no_match_is_not_found() {
    let resolver = DeviceResolver::new(StaticSource::named(&["Bedroom"]), FixedDefault::none());
    assert_eq!(resolver.resolve(Some("Garage"), TIMEOUT).unwrap(), None);
}

#[test]
fn test_empty_network_is_not_found() {
    let resolver = DeviceResolver::new(StaticSource::new(Vec::new()), FixedDefault::named("Bedroom"));
    assert_eq!(resolver.resolve(None, TIMEOUT).unwrap(), None);
}

#[test]
fn test_timeout_is_passed_to_discovery() {
    let source = StaticSource::named(&["Bedroom"]);
    let last_timeout = source.last_timeout.clone();
    let resolver = DeviceResolver::new(source, FixedDefault::none());

    resolver.resolve(Some("Bedroom"), Duration::from_secs(9)).unwrap();
    assert_eq!(*last_timeout.lock().unwrap(), Some(Duration::from_secs(9)));
}

#[test]
fn test_discovery_failure_is_reported() {
    let resolver = DeviceResolver::new(StaticSource::broken(), FixedDefault::none());
    assert!(matches!(resolver.resolve(Some("Bedroom"), TIMEOUT), Err(ApiError::Discovery(_))));
}

#[test]
fn test_default_is_read_from_config_store_each_time() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::in_dir(dir.path());
    let resolver = DeviceResolver::new(StaticSource::named(&["Bedroom", "Office"]), ConfigStore::in_dir(dir.path()));

    assert!(matches!(resolver.resolve(None, TIMEOUT), Err(ApiError::NoDeviceSpecified)));

    store.save_default_device("office").unwrap();
    assert_eq!(resolver.resolve(None, TIMEOUT).unwrap().unwrap().name, "Office");

    store.save_default_device("Bedroom").unwrap();
    assert_eq!(resolver.resolve(None, TIMEOUT).unwrap().unwrap().name, "Bedroom");
}
