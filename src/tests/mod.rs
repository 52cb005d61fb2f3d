//! Scenario tests for metric trees


use std::thread;

use rand::Rng;
use serde_json::Value;

use crate::{engine::XorEngine, Party, ShareEngine};

/// Runs `f` for the publisher on the current thread and for the partner on a
/// new one. Returns `(publisher, partner)` outputs.
pub(crate) fn run_parties<T, F>(seed: u8, f: F) -> (T, T)
where
    T: Send + 'static,
    F: Fn(XorEngine) -> T + Send + Clone + 'static,
{
    let (publisher, partner) = XorEngine::pair([seed; 32]);
    let partner_fn = f.clone();
    let handle = thread::spawn(move || partner_fn(partner));
    let publisher_out = f(publisher);
    (publisher_out, handle.join().expect("partner thread panicked"))
}

/// Splits every integer of `doc` into two XOR shares.
pub(crate) fn xor_split(doc: &Value, rng: &mut impl Rng) -> (Value, Value) {
    match doc {
        Value::Number(number) => {
            let value = number.as_i64().expect("integer document");
            let mask: i64 = rng.gen();
            (Value::from(value ^ mask), Value::from(mask))
        }
        Value::Array(items) => {
            let (publisher, partner) = items.iter().map(|item| xor_split(item, rng)).unzip();
            (Value::Array(publisher), Value::Array(partner))
        }
        Value::Object(entries) => {
            let mut publisher = serde_json::Map::new();
            let mut partner = serde_json::Map::new();
            for (key, entry) in entries {
                let (left, right) = xor_split(entry, rng);
                publisher.insert(key.clone(), left);
                partner.insert(key.clone(), right);
            }
            (Value::Object(publisher), Value::Object(partner))
        }
        other => panic!("not a metrics document: {other}"),
    }
}

/// Picks the share of `engine`'s party.
pub(crate) fn own<'a, T>(engine: &XorEngine, shares: &'a (T, T)) -> &'a T {
    match engine.party() {
        Party::Publisher => &shares.0,
        Party::Partner => &shares.1,
    }
}
