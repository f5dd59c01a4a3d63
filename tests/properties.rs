use std::sync::atomic::{AtomicUsize, Ordering};

use context_aware::{ContextRead, ContextStore};
use proptest::prelude::*;
use serde_json::{json, Value};

// The store is process-wide, so every case gets its own key namespace.
static CASE: AtomicUsize = AtomicUsize::new(0);

fn namespaced(key: &str) -> String {
    format!("prop{}.{key}", CASE.fetch_add(1, Ordering::Relaxed))
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn first_write_wins(key in "[a-z]{1,6}", v1 in scalar(), v2 in scalar()) {
        let ctx = ContextStore::instance();
        let key = namespaced(&key);
        ctx.set_context([(key.clone(), v1.clone())]);
        ctx.set_context([(key.clone(), v2)]);
        prop_assert_eq!(ctx.get(&key).unwrap(), v1);
    }

    #[test]
    fn merge_never_erases(a in scalar(), b in scalar()) {
        let ctx = ContextStore::instance();
        let ka = namespaced("a");
        let kb = namespaced("b");
        ctx.set_context([(ka.clone(), a.clone())]);
        ctx.set_context([(kb.clone(), b.clone())]);
        prop_assert_eq!(ctx.get(&ka).unwrap(), a);
        prop_assert_eq!(ctx.get(&kb).unwrap(), b);
    }
}

#[test]
fn test_instance_identity_across_threads() {
    let here = ContextStore::instance() as *const ContextStore as usize;
    let there = std::thread::spawn(|| ContextStore::instance() as *const ContextStore as usize)
        .join()
        .unwrap();
    assert_eq!(here, there);
}

#[test]
fn test_concurrent_writers_settle_on_one_value() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let ctx = ContextStore::instance();
                ctx.set_context([
                    ("race.shared".to_string(), json!(i)),
                    (format!("race.own{i}"), json!(i)),
                ]);
                ctx.get("race.shared").unwrap()
            })
        })
        .collect();
    let seen: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let ctx = ContextStore::instance();
    let settled = ctx.get("race.shared").unwrap();
    assert!(seen.iter().all(|v| *v == settled));
    for i in 0..8 {
        assert_eq!(ctx.get(&format!("race.own{i}")).unwrap(), json!(i));
    }
}
