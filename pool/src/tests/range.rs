use std::net::Ipv4Addr;

use serde_json::json;
use test_log::test;

use crate::{
    codec::UNKNOWN_CIDR,
    err::RangeError,
    range::{IpRange, PoolSpec},
};

#[test]
fn serializes_with_provider_keys() {
    let pool = IpRange::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 254));
    let raw = json!({"ipRangeStart": "10.0.0.1", "ipRangeEnd": "10.0.0.254"});

    assert_eq!(serde_json::to_value(pool).unwrap(), raw);
    assert_eq!(serde_json::from_value::<IpRange>(raw).unwrap(), pool);
}

#[test]
fn display_is_first_dash_last() {
    let pool = IpRange::from_bounds("10.0.0.1", "10.0.0.254").unwrap();

    assert_eq!(pool.to_string(), "10.0.0.1-10.0.0.254");
}

#[test]
fn from_bounds_rejects_garbage() {
    assert_eq!(
        IpRange::from_bounds("10.0.0.1", "10.0.0.256").unwrap_err(),
        RangeError::MalformedAddress("10.0.0.256".to_owned())
    );
}

#[test]
fn addresses_are_inclusive() {
    let pool = IpRange::from_bounds("10.0.0.253", "10.0.1.1").unwrap();
    let all: Vec<_> = pool.addresses().map(|it| it.to_string()).collect();

    assert_eq!(all, ["10.0.0.253", "10.0.0.254", "10.0.0.255", "10.0.1.0", "10.0.1.1"]);
    assert_eq!(pool.len(), 5);
    assert!(pool.contains(&Ipv4Addr::new(10, 0, 0, 255)));
    assert!(!pool.contains(&Ipv4Addr::new(10, 0, 1, 2)));
}

#[test]
fn addresses_stop_at_the_top() {
    let pool = IpRange::from_bounds("255.255.255.254", "255.255.255.255").unwrap();

    assert_eq!(pool.addresses().count(), 2);
}

#[test]
fn inverted_range_is_empty() {
    let pool = IpRange::from_bounds("10.0.0.1", "10.0.0.0").unwrap();

    assert!(pool.is_empty());
    assert_eq!(pool.len(), 0);
    assert_eq!(pool.addresses().count(), 0);
}

#[test]
fn pool_spec_prefers_cidr() {
    let form = PoolSpec {
        cidr: Some("10.0.0.0/24".to_owned()),
        first: Some("10.0.0.10".to_owned()),
        last: Some("10.0.0.20".to_owned()),
    };

    assert_eq!(form.resolve().unwrap().to_string(), "10.0.0.1-10.0.0.254");
}

#[test]
fn pool_spec_falls_back_to_bounds() {
    let form = PoolSpec {
        cidr: Some("not a cidr".to_owned()),
        first: Some("10.0.0.10".to_owned()),
        last: Some("10.0.0.20".to_owned()),
    };

    assert_eq!(form.resolve().unwrap().to_string(), "10.0.0.10-10.0.0.20");
    assert_eq!(
        PoolSpec::from_bounds("10.0.0.10", "10.0.0.20").resolve().unwrap(),
        form.resolve().unwrap()
    );
}

#[test]
fn pool_spec_empty_cidr_means_bounds() {
    let form = PoolSpec {
        cidr: Some(String::new()),
        ..PoolSpec::from_bounds("192.168.0.1", "192.168.0.9")
    };

    assert_eq!(form.resolve().unwrap().to_string(), "192.168.0.1-192.168.0.9");
}

#[test]
fn pool_spec_reports_cidr_error_when_nothing_works() {
    assert_eq!(
        PoolSpec::from_cidr("10.0.0.0/40").resolve().unwrap_err(),
        RangeError::PrefixOutOfRange(40)
    );
    assert_eq!(
        PoolSpec::default().resolve().unwrap_err(),
        RangeError::MissingBounds
    );
    assert_eq!(
        PoolSpec::from_bounds("10.0.0.1", "nope").resolve().unwrap_err(),
        RangeError::MalformedAddress("nope".to_owned())
    );
}

#[test]
fn pool_spec_from_stored_range() {
    let pool = IpRange::from_bounds("10.0.0.1", "10.0.0.254").unwrap();
    let form = PoolSpec::from_range(&pool);

    assert_eq!(form.cidr.as_deref(), Some("10.0.0.0/24"));
    assert_eq!(form.resolve().unwrap(), pool);
    assert_ne!(form.cidr.as_deref(), Some(UNKNOWN_CIDR));
}

#[test]
fn pool_spec_json_shape() {
    let form: PoolSpec = serde_json::from_value(json!({"cidr": "10.0.0.0/24"})).unwrap();

    assert_eq!(form, PoolSpec::from_cidr("10.0.0.0/24"));
    assert_eq!(serde_json::to_value(&form).unwrap(), json!({"cidr": "10.0.0.0/24"}));
}
