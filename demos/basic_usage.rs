//! Basic example of aggregating plaintext metrics
//!
//! This example demonstrates:
//! - Loading trees from JSON documents
//! - Accumulating one tree into another
//! - Replicating a tree with zero leaves
//! - Keeping the larger of two leaves with compare and mux
//! - Printing and exporting the result

use aggtree::{accumulate, from_json, new_like, to_document, PlaintextMetrics};

fn main() {
    // Metrics reported by two campaigns
    let first: PlaintextMetrics =
        from_json(r#"{"sales": 120, "conversions": [3, 1, 4], "reach": {"max": 18}}"#).unwrap();
    let second: PlaintextMetrics =
        from_json(r#"{"sales": 80, "conversions": [1, 5, 9], "reach": {"max": 26}, "views": 7}"#)
            .unwrap();

    // Start from zeros with the shape of the first report
    let mut total = new_like(&first);
    accumulate(&mut total, first.clone()).unwrap();

    // Keys only present in the second report are attached as is.
    // Keep the larger reach instead of summing it.
    let mut best_reach = first.get_at_key("reach").unwrap().get_at_key("max").unwrap().clone();
    let other_reach = second.get_at_key("reach").unwrap().get_at_key("max").unwrap();
    let keep_other = other_reach.is_greater_or_equal(&best_reach).unwrap();
    best_reach.mux(&keep_other, other_reach).unwrap();

    accumulate(&mut total, second).unwrap();
    println!("Accumulated tree:\n{}", total);
    println!("Document: {}", to_document(&total));
    println!("Largest reach: {}", to_document(&best_reach));
}
