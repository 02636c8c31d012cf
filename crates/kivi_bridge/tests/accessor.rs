//! End-to-end behavior of the accessor surface over a real on-disk store.

use kivi_bridge::{Accessor, BridgeError, DynValue, InstanceConfig, Op, Registry};
use std::path::Path;
use tempfile::tempdir;

fn open(dir: &Path, id: &str) -> Accessor {
    Accessor::new(InstanceConfig::new(id).path(dir)).unwrap()
}

fn set(accessor: &Accessor, key: &str, value: impl Into<DynValue>) {
    accessor.call(Op::Set, &[key.into(), value.into()]).unwrap();
}

#[test]
fn creation_outcomes_by_identifier_and_key_length() {
    let dir = tempdir().unwrap();

    // valid id, key lengths up to the limit
    for len in [0, 1, 16] {
        let config = InstanceConfig::new(format!("ok{len}"))
            .path(dir.path())
            .encryption_key(vec![0x2a; len]);
        assert!(Accessor::new(config).is_ok(), "key length {len}");
    }

    // oversized key
    let config = InstanceConfig::new("toolong")
        .path(dir.path())
        .encryption_key(vec![0x2a; 17]);
    assert!(matches!(
        Accessor::new(config),
        Err(BridgeError::EncryptionKeyTooLong { len: 17 })
    ));

    // empty identifier wins even when the key is also oversized
    let config = InstanceConfig::new("")
        .path(dir.path())
        .encryption_key(vec![0x2a; 17]);
    assert!(matches!(
        Accessor::new(config),
        Err(BridgeError::EmptyIdentifier)
    ));
}

#[test]
fn every_supported_type_round_trips() {
    let dir = tempdir().unwrap();
    let accessor = open(dir.path(), "types");

    let cases: Vec<(&str, DynValue, Op)> = vec![
        ("bt", true.into(), Op::GetBoolean),
        ("bf", false.into(), Op::GetBoolean),
        ("nz", 0.0.into(), Op::GetNumber),
        ("nn", (-12.75).into(), Op::GetNumber),
        ("nb", 9_007_199_254_740_991f64.into(), Op::GetNumber),
        ("se", "".into(), Op::GetString),
        ("su", "héllo wörld".into(), Op::GetString),
        ("xe", Vec::<u8>::new().into(), Op::GetBuffer),
        ("xb", vec![0u8, 255, 128].into(), Op::GetBuffer),
    ];

    for (key, value, get) in &cases {
        accessor
            .call(Op::Set, &[(*key).into(), value.clone()])
            .unwrap();
        assert_eq!(&accessor.call(*get, &[(*key).into()]).unwrap(), value);
    }
}

#[test]
fn absent_keys_are_undefined_on_every_getter() {
    let dir = tempdir().unwrap();
    let accessor = open(dir.path(), "absence");

    for op in [Op::GetBoolean, Op::GetNumber, Op::GetString, Op::GetBuffer] {
        let result = accessor.call(op, &["never-set".into()]).unwrap();
        assert!(result.is_undefined(), "{op:?} returned {result:?}");
    }

    // zero-forms stay distinguishable from absence
    set(&accessor, "zero", 0.0);
    set(&accessor, "off", false);
    set(&accessor, "blank", "");
    assert_eq!(
        accessor.call(Op::GetNumber, &["zero".into()]).unwrap(),
        DynValue::Number(0.0)
    );
    assert_eq!(
        accessor.call(Op::GetBoolean, &["off".into()]).unwrap(),
        DynValue::Bool(false)
    );
    assert_eq!(
        accessor.call(Op::GetString, &["blank".into()]).unwrap(),
        DynValue::String(String::new())
    );
}

#[test]
fn delete_of_absent_key_is_a_noop() {
    let dir = tempdir().unwrap();
    let accessor = open(dir.path(), "noop-delete");

    accessor.call(Op::Delete, &["ghost".into()]).unwrap();
    assert_eq!(
        accessor.call(Op::Contains, &["ghost".into()]).unwrap(),
        DynValue::Bool(false)
    );
}

#[test]
fn delete_all_empties_and_shrinks() {
    let dir = tempdir().unwrap();
    let accessor = open(dir.path(), "wipe");

    for i in 0..16 {
        set(&accessor, &format!("k{i}"), format!("value number {i}"));
    }
    let DynValue::Number(before) = accessor.call(Op::Size, &[]).unwrap() else {
        panic!("size must be a number");
    };

    accessor.call(Op::DeleteAll, &[]).unwrap();

    assert_eq!(
        accessor.call(Op::GetAllKeys, &[]).unwrap(),
        DynValue::Array(Vec::new())
    );
    let DynValue::Number(after) = accessor.call(Op::Size, &[]).unwrap() else {
        panic!("size must be a number");
    };
    assert!(after < before, "size did not decrease: {before} -> {after}");
}

#[test]
fn recrypt_then_reopen_with_each_key() {
    let dir = tempdir().unwrap();

    let accessor = open(dir.path(), "vault");
    set(&accessor, "token", "s3cret");
    accessor.call(Op::Recrypt, &["new-key".into()]).unwrap();
    assert_eq!(
        accessor.call(Op::GetString, &["token".into()]).unwrap(),
        DynValue::String("s3cret".to_string())
    );
    accessor.close();

    // reopen with the new key: data intact
    let reopened = Accessor::new(
        InstanceConfig::new("vault")
            .path(dir.path())
            .encryption_key("new-key".as_bytes().to_vec()),
    )
    .unwrap();
    assert_eq!(
        reopened.call(Op::GetString, &["token".into()]).unwrap(),
        DynValue::String("s3cret".to_string())
    );
    reopened.close();

    // reopen without the key: no data visible
    let wrong = open(dir.path(), "vault");
    assert!(wrong
        .call(Op::GetString, &["token".into()])
        .unwrap()
        .is_undefined());
}

#[test]
fn buffer_views_are_snapshots() {
    let dir = tempdir().unwrap();
    let accessor = open(dir.path(), "snapshots");

    set(&accessor, "blob", vec![10u8, 20, 30]);
    let DynValue::Buffer(view) = accessor.call(Op::GetBuffer, &["blob".into()]).unwrap() else {
        panic!("expected a buffer");
    };

    set(&accessor, "blob", vec![99u8]);
    accessor.call(Op::Delete, &["blob".into()]).unwrap();
    accessor.close();

    assert_eq!(view.as_slice(), &[10, 20, 30]);
}

#[test]
fn malformed_calls_never_mutate() {
    let dir = tempdir().unwrap();
    let accessor = open(dir.path(), "immutable-on-error");

    set(&accessor, "k", "original");

    // wrong arity
    assert!(accessor.call(Op::Set, &["k".into()]).is_err());
    // wrong key type
    assert!(accessor
        .call(Op::Set, &[DynValue::Number(1.0), "v".into()])
        .is_err());
    // unsupported value shape
    assert!(accessor
        .call(Op::Set, &["k".into(), DynValue::Undefined])
        .is_err());
    assert!(accessor
        .call(
            Op::Set,
            &["k".into(), DynValue::Array(vec![DynValue::Bool(true)])]
        )
        .is_err());

    assert_eq!(
        accessor.call(Op::GetString, &["k".into()]).unwrap(),
        DynValue::String("original".to_string())
    );
    assert_eq!(
        accessor.call(Op::GetAllKeys, &[]).unwrap(),
        DynValue::Array(vec![DynValue::String("k".to_string())])
    );
}

#[test]
fn values_survive_reopen() {
    let dir = tempdir().unwrap();

    let accessor = open(dir.path(), "durable");
    set(&accessor, "flag", true);
    set(&accessor, "pi", 3.14159);
    set(&accessor, "name", "kivi");
    set(&accessor, "raw", vec![1u8, 2, 3]);
    accessor.close();

    let reopened = open(dir.path(), "durable");
    assert_eq!(
        reopened.call(Op::GetBoolean, &["flag".into()]).unwrap(),
        DynValue::Bool(true)
    );
    assert_eq!(
        reopened.call(Op::GetNumber, &["pi".into()]).unwrap(),
        DynValue::Number(3.14159)
    );
    assert_eq!(
        reopened.call(Op::GetString, &["name".into()]).unwrap(),
        DynValue::String("kivi".to_string())
    );
    assert_eq!(
        reopened.call(Op::GetBuffer, &["raw".into()]).unwrap(),
        DynValue::from(vec![1u8, 2, 3])
    );
}

#[test]
fn registry_shares_instances_across_accessors() {
    let dir = tempdir().unwrap();
    let registry = Registry::new();

    let first = Accessor::from_instance(
        registry
            .get_or_create(InstanceConfig::new("app").path(dir.path()))
            .unwrap(),
    );
    let second = Accessor::from_instance(
        registry
            .get_or_create(InstanceConfig::new("app").path(dir.path()))
            .unwrap(),
    );

    first.call(Op::Set, &["k".into(), 7.0.into()]).unwrap();
    assert_eq!(
        second.call(Op::GetNumber, &["k".into()]).unwrap(),
        DynValue::Number(7.0)
    );
}
