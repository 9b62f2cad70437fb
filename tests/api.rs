use std::collections::HashMap;
use tempfile::TempDir;
use user_defaults::{DefaultBackend, Error, UserDefaults, UserDefaultsHandle, Value, ValueKind};

fn open(dir: &TempDir) -> UserDefaultsHandle<DefaultBackend> {
    UserDefaults::<DefaultBackend>::open(dir.path().join(".userDefaultsStore")).unwrap()
}

// ---- get / put --------------------------------------------------------------

#[test]
fn put_then_get_each_kind() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.put("s", "text").unwrap();
    db.put("b", true).unwrap();
    db.put("i", 42).unwrap();
    db.put("d", 2.5).unwrap();

    assert_eq!(db.get_string("s").unwrap(), "text");
    assert!(db.get_bool("b").unwrap());
    assert_eq!(db.get_int("i").unwrap(), 42);
    assert_eq!(db.get_double("d").unwrap(), 2.5);
    assert_eq!(db.get("i").unwrap(), Value::Int(42));
}

#[test]
fn overwrite_keeps_last_value() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    assert_eq!(db.put("k", 1).unwrap(), None);
    assert_eq!(db.put("k", "two").unwrap(), Some(Value::Int(1)));
    assert_eq!(db.get("k").unwrap(), Value::from("two"));
    assert_eq!(db.len(), 1);
}

#[test]
fn missing_key_is_reported() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    assert_eq!(
        db.get("nonexistent"),
        Err(Error::KeyNotFound("nonexistent".into()))
    );
    assert!(matches!(db.get_int("nonexistent"), Err(Error::KeyNotFound(_))));
    assert!(matches!(db.get_map("nonexistent"), Err(Error::KeyNotFound(_))));
}

#[test]
fn int_from_string_is_a_type_mismatch() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.put("k", "text").unwrap();
    assert_eq!(
        db.get_int("k"),
        Err(Error::TypeMismatch {
            key: "k".into(),
            expected: ValueKind::Int,
            found: ValueKind::String,
        })
    );
}

#[test]
fn numeric_strings_are_not_coerced() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.put("n", "123").unwrap();
    db.put("flag", "true").unwrap();
    db.put("num", 5).unwrap();
    assert!(matches!(db.get_int("n"), Err(Error::TypeMismatch { .. })));
    assert!(matches!(db.get_double("n"), Err(Error::TypeMismatch { .. })));
    assert!(matches!(db.get_bool("flag"), Err(Error::TypeMismatch { .. })));
    assert!(matches!(db.get_string("num"), Err(Error::TypeMismatch { .. })));
}

#[test]
fn numbers_convert_between_int_and_double() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.put("whole", 4.0).unwrap();
    db.put("frac", 4.5).unwrap();
    db.put("int", 7).unwrap();
    assert_eq!(db.get_int("whole").unwrap(), 4);
    assert!(matches!(
        db.get_int("frac"),
        Err(Error::TypeMismatch {
            found: ValueKind::Double,
            ..
        })
    ));
    assert_eq!(db.get_double("int").unwrap(), 7.0);
}

#[test]
fn non_finite_double_is_rejected() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    assert_eq!(
        db.put("nan", f64::NAN),
        Err(Error::NonFiniteNumber("nan".into()))
    );
    assert!(db.put("nested", vec![1.0, f64::INFINITY]).is_err());
    assert!(!db.has("nan"));
    assert!(!db.has("nested"));
}

// ---- arrays / maps ----------------------------------------------------------

#[test]
fn array_snapshot_keeps_order() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.put("array1", vec![10, 20, 30, 40, 50]).unwrap();
    let items = db.get_array("array1").unwrap();
    let ints: Vec<i64> = items.iter().filter_map(Value::as_i64).collect();
    assert_eq!(ints, vec![10, 20, 30, 40, 50]);
}

#[test]
fn mixed_array_and_nested_map() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    let mut inner = HashMap::new();
    inner.insert("deep".to_string(), Value::from(vec![1, 2]));
    let mixed = vec![Value::from("x"), Value::from(1), Value::from(inner)];
    db.put("mixed", mixed.clone()).unwrap();
    assert_eq!(db.get_array("mixed").unwrap(), mixed);
}

#[test]
fn map_snapshot_has_all_entries() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("x".into(), "y".into());
    m.insert("n".into(), 123.into());
    db.put("aMap", m.clone()).unwrap();
    assert_eq!(db.get_map("aMap").unwrap(), m);
}

#[test]
fn array_and_map_getters_check_kind() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.put("scalar", 1).unwrap();
    db.put("list", vec![1]).unwrap();
    assert!(matches!(
        db.get_array("scalar"),
        Err(Error::TypeMismatch {
            expected: ValueKind::Array,
            found: ValueKind::Int,
            ..
        })
    ));
    assert!(matches!(
        db.get_map("list"),
        Err(Error::TypeMismatch {
            expected: ValueKind::Map,
            found: ValueKind::Array,
            ..
        })
    ));
}

// ---- has / remove -----------------------------------------------------------

#[test]
fn has_follows_put_and_remove() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    assert!(!db.has("k"));
    db.put("k", 1).unwrap();
    assert!(db.has("k"));
    assert_eq!(db.remove("k"), Some(Value::Int(1)));
    assert!(!db.has("k"));
}

#[test]
fn remove_absent_key_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.put("keep", 1).unwrap();
    assert_eq!(db.remove("ghost"), None);
    assert_eq!(db.keys(), vec!["keep".to_string()]);
}

// ---- snapshots / clear ------------------------------------------------------

#[test]
fn keys_and_dictionary_representation() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.put("x", 10).unwrap();
    db.put("y", "twenty").unwrap();

    let mut keys = db.keys();
    keys.sort();
    assert_eq!(keys, vec!["x".to_string(), "y".to_string()]);

    let all = db.dictionary_representation();
    assert_eq!(all.len(), 2);
    assert_eq!(all["y"], Value::from("twenty"));
}

#[test]
fn clear_removes_all_entries() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    db.put("a", 1).unwrap();
    db.put("b", 2).unwrap();
    db.clear();
    assert!(db.is_empty());
    assert!(!db.has("a"));
}

// ---- builder / debug --------------------------------------------------------

#[test]
fn builder_rejects_empty_path() {
    let err = UserDefaults::<DefaultBackend>::builder("").build().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn debug_impls_dont_panic() {
    let dir = TempDir::new().unwrap();
    let handle = open(&dir);

    let dbg_store = format!("{:?}", *handle);
    assert!(dbg_store.contains("UserDefaults"));
    assert!(dbg_store.contains("path"));

    let dbg_handle = format!("{handle:?}");
    assert!(dbg_handle.contains("UserDefaults"));

    let builder = UserDefaults::<DefaultBackend>::builder(dir.path().join("other"));
    assert!(format!("{builder:?}").contains("UserDefaultsBuilder"));
}
