use crate::{engine::SecretShare, node::MetricNode, value::SecureValue};

/// Builds a tree with the shape of `src` and every leaf set to zero.
///
/// Zero leaves stay in the domain of the leaf they replace, so a secret tree
/// gives a secret tree of zeros bound to the same session.
pub fn new_like<S: SecretShare>(src: &MetricNode<S>) -> MetricNode<S> {
    src.map_leaves(SecureValue::zero_like)
}

/// True when both trees have the same tags, dict keys and list lengths.
///
/// Dict key order is not part of the shape.
pub fn has_same_shape<S: SecretShare>(lhs: &MetricNode<S>, rhs: &MetricNode<S>) -> bool {
    let mut stack = vec![(lhs, rhs)];
    while let Some(pair) = stack.pop() {
        match pair {
            (MetricNode::Value(_), MetricNode::Value(_)) => {}
            (MetricNode::List(lhs), MetricNode::List(rhs)) if lhs.len() == rhs.len() => {
                stack.extend(lhs.iter().zip(rhs));
            }
            (MetricNode::Dict(lhs), MetricNode::Dict(rhs)) if lhs.len() == rhs.len() => {
                for (key, lhs_child) in lhs {
                    let Some(rhs_child) = rhs.get(key) else {
                        return false;
                    };
                    stack.push((lhs_child, rhs_child));
                }
            }
            _ => return false,
        }
    }
    true
}

impl<S: SecretShare> MetricNode<S> {
    /// See [`new_like`].
    pub fn new_like(&self) -> Self {
        new_like(self)
    }
}
