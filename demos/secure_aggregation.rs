//! Example of aggregating secret-shared metrics between two parties
//!
//! This example demonstrates:
//! - Splitting inputs into XOR shares
//! - Promoting plaintext leaves to shares on each side
//! - Accumulating shared trees
//! - Revealing the result to the publisher only

use std::thread;

use aggtree::{
    accumulate, from_json, new_like, to_revealed_document, InputEncryption, MetricNode, Party,
    ShareEngine, SharePolicy, XorEngine, XorShare,
};

const REPORTS: [[i64; 3]; 3] = [[10, 2, 7], [4, 0, 1], [25, 6, 3]];
const MASKS: [[i64; 3]; 3] = [
    [0x2d1f_33a0, -0x11, 0x7ff0_0001],
    [-0x5151_5151, 0x0c0c, 0x42],
    [0x1234_5678_9abc, -1, 0x600d],
];

/// Runs one party. Both sides must make the same calls in the same order.
fn run(engine: XorEngine) -> Option<String> {
    let mut total: Option<MetricNode<XorShare>> = None;
    for (report, masks) in REPORTS.iter().zip(MASKS) {
        // the partner holds the masks, the publisher the masked values
        let shares = report.iter().zip(masks).map(|(value, mask)| match engine.party() {
            Party::Publisher => value ^ mask,
            Party::Partner => mask,
        });
        let doc = format!(
            r#"{{"clicks": [{}]}}"#,
            shares.map(|share| share.to_string()).collect::<Vec<_>>().join(", ")
        );

        let mut tree: MetricNode<XorShare> = from_json(&doc).unwrap();
        tree.promote_all(InputEncryption::Xor, SharePolicy::Private, &engine)
            .unwrap();
        let total = total.get_or_insert_with(|| new_like(&tree));
        accumulate(total, tree).unwrap();
    }

    let total = total.unwrap();
    println!("{} holds:\n{}", engine.party(), total);
    // the partner only gets a placeholder document back
    let revealed = to_revealed_document(&total, Party::Publisher).unwrap();
    (engine.party() == Party::Publisher).then(|| revealed.to_string())
}

fn main() {
    let (publisher, partner) = XorEngine::pair([42; 32]);
    let handle = thread::spawn(move || run(partner));
    let revealed = run(publisher);
    handle.join().unwrap();

    println!("Revealed to the publisher: {}", revealed.unwrap());
}
