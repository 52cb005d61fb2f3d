//! Whole-tree algorithms.
//!
//! Every traversal that can grow with the input (accumulate, replicate,
//! promote) runs on an explicit queue instead of the call stack.

mod accumulate;
mod promote;
mod replicate;
mod select;

pub use accumulate::accumulate;
pub use promote::promote_all;
pub use replicate::{has_same_shape, new_like};
pub use select::{is_greater_or_equal, mux};
