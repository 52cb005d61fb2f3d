use std::{collections::VecDeque, mem};

use indexmap::IndexMap;

use crate::{
    engine::SecretShare,
    node::{by_key, MetricNode},
    MetricError,
};

/// Adds `src` into `dst`, leaf by leaf.
///
/// Dict keys missing from `dst` get `src`'s subtree moved in as is. Lists must
/// have the same length at every position. `src` is consumed: clone it first to
/// keep using it.
///
/// Leaves are added in breadth-first order, with dict children taken by sorted
/// key. The order only depends on the shape of the trees, so two parties
/// accumulating mirrored trees issue the same engine calls in the same order.
pub fn accumulate<S: SecretShare>(
    dst: &mut MetricNode<S>,
    src: MetricNode<S>,
) -> Result<(), MetricError<S::Error>> {
    if dst.node_type() != src.node_type() {
        return Err(MetricError::type_mismatch(dst.node_type(), src.node_type()));
    }

    let mut queue = VecDeque::from([(dst, src)]);
    let mut added = 0usize;
    let mut attached = 0usize;
    while let Some((lhs, mut rhs)) = queue.pop_front() {
        match &mut rhs {
            MetricNode::Dict(rhs) => {
                let lhs = lhs.as_dict_mut()?;
                let mut pending = IndexMap::with_capacity(rhs.len());
                for (key, child) in mem::take(rhs) {
                    if lhs.contains_key(&key) {
                        pending.insert(key, child);
                    } else {
                        // single use of rhs means nothing left to add down this path
                        lhs.insert(key, child);
                        attached += 1;
                    }
                }
                for (key, lhs_child) in by_key(lhs.iter_mut()) {
                    if let Some(rhs_child) = pending.swap_remove(key) {
                        queue.push_back((lhs_child, rhs_child));
                    }
                }
            }
            MetricNode::List(rhs) => {
                let lhs = lhs.as_list_mut()?;
                if lhs.len() != rhs.len() {
                    tracing::error!(
                        lhs = lhs.len(),
                        rhs = rhs.len(),
                        "lhs and rhs lists do not match in size"
                    );
                    return Err(MetricError::ShapeMismatch {
                        left: lhs.len(),
                        right: rhs.len(),
                    });
                }
                queue.extend(lhs.iter_mut().zip(mem::take(rhs)));
            }
            MetricNode::Value(rhs) => {
                let lhs = lhs.as_value_mut()?;
                *lhs = lhs.add(rhs)?;
                added += 1;
            }
        }
    }
    tracing::debug!(added, attached, "accumulated metrics");
    Ok(())
}

impl<S: SecretShare> MetricNode<S> {
    /// See [`accumulate`].
    pub fn accumulate(&mut self, src: MetricNode<S>) -> Result<(), MetricError<S::Error>> {
        accumulate(self, src)
    }
}

#[cfg(test)]
mod test {
    use std::convert::Infallible;

    use super::accumulate;
    use crate::{
        engine::Unshared, node::MetricNode, value::SecureValue, InputEncryption, MetricError,
    };

    type Node = MetricNode<Unshared>;

    fn list(values: &[i64]) -> Node {
        Node::List(values.iter().copied().map(Node::new_value).collect())
    }

    #[test]
    fn test_accumulate_values() {
        let mut dst = Node::new_value(40);
        accumulate(&mut dst, Node::new_value(2)).unwrap();
        assert_eq!(dst, Node::new_value(42));
    }

    #[test]
    fn test_accumulate_lists() {
        let mut dst = list(&[1, 2, 3]);
        accumulate(&mut dst, list(&[10, 20, 30])).unwrap();
        assert_eq!(dst, list(&[11, 22, 33]));
    }

    #[test]
    fn test_accumulate_attaches_missing_keys() {
        let mut dst = Node::new_dict();
        dst.insert("a", Node::new_value(1)).unwrap();
        let mut src = Node::new_dict();
        src.insert("a", Node::new_value(2)).unwrap();
        src.insert("b", list(&[5, 6])).unwrap();

        accumulate(&mut dst, src).unwrap();
        assert_eq!(dst.get_at_key("a").unwrap(), &Node::new_value(3));
        assert_eq!(dst.get_at_key("b").unwrap(), &list(&[5, 6]));
    }

    #[test]
    fn test_keys_only_in_dst_are_kept() {
        let mut dst = Node::new_dict();
        dst.insert("kept", Node::new_value(1)).unwrap();
        accumulate(&mut dst, Node::new_dict()).unwrap();
        assert_eq!(dst.get_at_key("kept").unwrap(), &Node::new_value(1));
    }

    #[test]
    fn test_list_length_mismatch() {
        let mut dst = list(&[1, 2, 3]);
        assert_eq!(
            accumulate(&mut dst, list(&[1, 2])),
            Err(MetricError::<Infallible>::ShapeMismatch { left: 3, right: 2 })
        );
    }

    #[test]
    fn test_root_type_mismatch() {
        let mut dst = Node::new_dict();
        assert_eq!(
            accumulate(&mut dst, list(&[1])),
            Err(MetricError::<Infallible>::TypeMismatch {
                expected: "dict".to_string(),
                found: "list".to_string()
            })
        );
    }

    #[test]
    fn test_nested_type_mismatch() {
        let mut dst = Node::new_dict();
        dst.insert("a", list(&[1])).unwrap();
        let mut src = Node::new_dict();
        src.insert("a", Node::new_value(1)).unwrap();
        assert!(matches!(
            accumulate(&mut dst, src),
            Err(MetricError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_mixed_encryption_is_rejected() {
        #[derive(Debug, Clone)]
        struct Fake;
        impl crate::engine::SecretShare for Fake {
            type Bit = ();
            type Error = Infallible;
            fn add(&self, _: &Self) -> Result<Self, Infallible> {
                Ok(Fake)
            }
            fn greater_or_equal(&self, _: &Self) -> Result<(), Infallible> {
                Ok(())
            }
            fn mux(&self, _: &(), _: &Self) -> Result<Self, Infallible> {
                Ok(Fake)
            }
            fn reveal_to(&self, _: crate::engine::Party) -> Result<Option<i64>, Infallible> {
                Ok(None)
            }
            fn zero_like(&self) -> Self {
                Fake
            }
            fn local_share(&self) -> i64 {
                0
            }
            fn party(&self) -> crate::engine::Party {
                crate::engine::Party::Publisher
            }
        }

        let mut dst = MetricNode::<Fake>::new_value(1);
        let src = MetricNode::<Fake>::from(SecureValue::SecretShared(Fake));
        assert!(matches!(
            accumulate(&mut dst, src),
            Err(MetricError::UnsupportedEncryption {
                operation: "accumulate",
                encryption: InputEncryption::Xor
            })
        ));
    }
}
