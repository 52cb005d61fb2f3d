mod print;

use std::{collections::VecDeque, fmt::Display, mem};

use indexmap::IndexMap;

pub use print::{DisplayTree, PrintOptions};

use crate::{engine::SecretShare, value::SecureValue, MetricError};

/// Tag of a [`MetricNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Value,
    List,
    Dict,
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value => write!(f, "value"),
            Self::List => write!(f, "list"),
            Self::Dict => write!(f, "dict"),
        }
    }
}

pub type MetricList<S> = Vec<MetricNode<S>>;
pub type MetricDict<S> = IndexMap<String, MetricNode<S>>;

/// A node of a metric tree.
///
/// Dropping, cloning and comparing nodes never recurse, so trees may be
/// arbitrarily deep.
///
/// # Type Parameters
/// * `S` - Share type of secret leaves. Use [`crate::Unshared`] for trees that stay in plaintext.
#[derive(Debug)]
pub enum MetricNode<S> {
    /// A single leaf
    Value(SecureValue<S>),
    /// Positional children
    List(MetricList<S>),
    /// Keyed children, in insertion order
    Dict(MetricDict<S>),
}

impl<S> From<SecureValue<S>> for MetricNode<S> {
    fn from(value: SecureValue<S>) -> Self {
        Self::Value(value)
    }
}

impl<S> Drop for MetricNode<S> {
    fn drop(&mut self) {
        let mut stack = match self {
            Self::Value(_) => return,
            Self::List(list) => mem::take(list),
            Self::Dict(dict) => mem::take(dict).into_values().collect(),
        };
        // children are emptied before they go out of scope
        while let Some(mut node) = stack.pop() {
            match &mut node {
                Self::Value(_) => {}
                Self::List(list) => stack.append(list),
                Self::Dict(dict) => stack.extend(mem::take(dict).into_values()),
            }
        }
    }
}

impl<S: Clone> Clone for MetricNode<S> {
    fn clone(&self) -> Self {
        self.map_leaves(SecureValue::clone)
    }
}

impl<S: PartialEq> PartialEq for MetricNode<S> {
    /// Dict key order is ignored.
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some(pair) = stack.pop() {
            match pair {
                (Self::Value(lhs), Self::Value(rhs)) if lhs == rhs => {}
                (Self::List(lhs), Self::List(rhs)) if lhs.len() == rhs.len() => {
                    stack.extend(lhs.iter().zip(rhs));
                }
                (Self::Dict(lhs), Self::Dict(rhs)) if lhs.len() == rhs.len() => {
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
}

impl<S: Eq> Eq for MetricNode<S> {}

/// Dict entries sorted by key.
///
/// Traversals that call the engine walk dicts in this order, so two parties
/// holding the same keys in a different insertion order stay in lockstep.
pub(crate) fn by_key<'a, V>(
    entries: impl IntoIterator<Item = (&'a String, V)>,
) -> Vec<(&'a String, V)> {
    let mut entries = entries.into_iter().collect::<Vec<_>>();
    entries.sort_unstable_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));
    entries
}

impl<S> MetricNode<S> {
    /// Copies the shape of `self`, mapping every leaf through `leaf` in
    /// breadth-first order. Dict keys keep their order.
    pub(crate) fn map_leaves<T>(
        &self,
        mut leaf: impl FnMut(&SecureValue<S>) -> SecureValue<T>,
    ) -> MetricNode<T> {
        let mut shallow = |node: &MetricNode<S>| match node {
            Self::Value(value) => MetricNode::Value(leaf(value)),
            Self::List(list) => MetricNode::List(Vec::with_capacity(list.len())),
            Self::Dict(dict) => MetricNode::Dict(IndexMap::with_capacity(dict.len())),
        };
        let mut root = shallow(self);
        {
            let mut queue = VecDeque::from([(self, &mut root)]);
            while let Some((src, dst)) = queue.pop_front() {
                match src {
                    Self::List(src) => {
                        if let MetricNode::List(dst) = dst {
                            dst.extend(src.iter().map(&mut shallow));
                            queue.extend(src.iter().zip(dst.iter_mut()));
                        }
                    }
                    Self::Dict(src) => {
                        if let MetricNode::Dict(dst) = dst {
                            dst.extend(
                                src.iter()
                                    .map(|(key, child)| (key.clone(), shallow(child))),
                            );
                            queue.extend(src.values().zip(dst.values_mut()));
                        }
                    }
                    // mapped when the node was created
                    Self::Value(_) => {}
                }
            }
        }
        root
    }

    /// Creates an empty node of the given tag. Value nodes hold a plaintext zero.
    pub fn new(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Value => Self::Value(SecureValue::default()),
            NodeType::List => Self::new_list(),
            NodeType::Dict => Self::new_dict(),
        }
    }

    /// Creates a value node holding a plaintext leaf.
    pub fn new_value(value: i64) -> Self {
        Self::Value(SecureValue::Plaintext(value))
    }

    pub fn new_list() -> Self {
        Self::List(Vec::new())
    }

    pub fn new_dict() -> Self {
        Self::Dict(IndexMap::new())
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Value(_) => NodeType::Value,
            Self::List(_) => NodeType::List,
            Self::Dict(_) => NodeType::Dict,
        }
    }
}

impl<S: SecretShare> MetricNode<S> {
    pub fn as_value(&self) -> Result<&SecureValue<S>, MetricError<S::Error>> {
        match self {
            Self::Value(value) => Ok(value),
            other => Err(MetricError::type_mismatch(NodeType::Value, other.node_type())),
        }
    }

    pub fn as_value_mut(&mut self) -> Result<&mut SecureValue<S>, MetricError<S::Error>> {
        match self {
            Self::Value(value) => Ok(value),
            other => Err(MetricError::type_mismatch(NodeType::Value, other.node_type())),
        }
    }

    pub fn as_list(&self) -> Result<&MetricList<S>, MetricError<S::Error>> {
        match self {
            Self::List(list) => Ok(list),
            other => Err(MetricError::type_mismatch(NodeType::List, other.node_type())),
        }
    }

    pub fn as_list_mut(&mut self) -> Result<&mut MetricList<S>, MetricError<S::Error>> {
        match self {
            Self::List(list) => Ok(list),
            other => Err(MetricError::type_mismatch(NodeType::List, other.node_type())),
        }
    }

    pub fn as_dict(&self) -> Result<&MetricDict<S>, MetricError<S::Error>> {
        match self {
            Self::Dict(dict) => Ok(dict),
            other => Err(MetricError::type_mismatch(NodeType::Dict, other.node_type())),
        }
    }

    pub fn as_dict_mut(&mut self) -> Result<&mut MetricDict<S>, MetricError<S::Error>> {
        match self {
            Self::Dict(dict) => Ok(dict),
            other => Err(MetricError::type_mismatch(NodeType::Dict, other.node_type())),
        }
    }

    /// Replaces the leaf of a value node.
    pub fn set_value(&mut self, value: SecureValue<S>) -> Result<(), MetricError<S::Error>> {
        *self.as_value_mut()? = value;
        Ok(())
    }

    /// Inserts `child` under `key`, returning the child it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        child: MetricNode<S>,
    ) -> Result<Option<MetricNode<S>>, MetricError<S::Error>> {
        match self {
            Self::Dict(dict) => Ok(dict.insert(key.into(), child)),
            other => Err(MetricError::misuse("insert", NodeType::Dict, other.node_type())),
        }
    }

    /// Pushes `child` at the end of a list node.
    pub fn append(&mut self, child: MetricNode<S>) -> Result<(), MetricError<S::Error>> {
        match self {
            Self::List(list) => {
                list.push(child);
                Ok(())
            }
            other => Err(MetricError::misuse("append", NodeType::List, other.node_type())),
        }
    }

    pub fn get_at_key(&self, key: &str) -> Result<&MetricNode<S>, MetricError<S::Error>> {
        self.as_dict()?
            .get(key)
            .ok_or_else(|| MetricError::KeyNotFound(key.to_string()))
    }

    pub fn get_at_index(&self, index: usize) -> Result<&MetricNode<S>, MetricError<S::Error>> {
        let list = self.as_list()?;
        list.get(index).ok_or(MetricError::IndexOutOfBounds {
            index,
            len: list.len(),
        })
    }

    /// Number of children of a container, 1 for a value.
    pub fn len(&self) -> usize {
        match self {
            Self::Value(_) => 1,
            Self::List(list) => list.len(),
            Self::Dict(dict) => dict.len(),
        }
    }

    /// True for containers without children.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Value(_) => false,
            Self::List(list) => list.is_empty(),
            Self::Dict(dict) => dict.is_empty(),
        }
    }

    /// Number of value nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        let mut stack = vec![self];
        let mut count = 0;
        while let Some(node) = stack.pop() {
            match node {
                Self::Value(_) => count += 1,
                Self::List(list) => stack.extend(list),
                Self::Dict(dict) => stack.extend(dict.values()),
            }
        }
        count
    }
}

#[cfg(test)]
mod test {
    use std::convert::Infallible;

    use super::{MetricNode, NodeType};
    use crate::{engine::Unshared, value::SecureValue, MetricError};

    type Node = MetricNode<Unshared>;

    #[test]
    fn test_new_by_tag() {
        assert_eq!(Node::new(NodeType::Value), Node::new_value(0));
        assert_eq!(Node::new(NodeType::List), Node::List(vec![]));
        assert_eq!(Node::new(NodeType::Dict).node_type(), NodeType::Dict);
        assert!(Node::new(NodeType::Dict).is_empty());
    }

    #[test]
    fn test_accessors_check_tag() {
        let node = Node::new_value(3);
        assert_eq!(node.as_value().unwrap(), &SecureValue::Plaintext(3));
        assert_eq!(
            node.as_list(),
            Err(MetricError::<Infallible>::TypeMismatch {
                expected: "list".to_string(),
                found: "value".to_string()
            })
        );
        assert!(node.as_dict().is_err());
        assert!(Node::new_list().as_value().is_err());
    }

    #[test]
    fn test_set_value() {
        let mut node = Node::new_value(3);
        node.set_value(SecureValue::Plaintext(5)).unwrap();
        assert_eq!(node, Node::new_value(5));
        assert!(Node::new_dict().set_value(SecureValue::Plaintext(1)).is_err());
    }

    #[test]
    fn test_insert_and_append() {
        let mut dict = Node::new_dict();
        assert_eq!(dict.insert("a", Node::new_value(1)).unwrap(), None);
        assert_eq!(
            dict.insert("a", Node::new_value(2)).unwrap(),
            Some(Node::new_value(1))
        );
        assert_eq!(
            dict.append(Node::new_value(1)),
            Err(MetricError::Misuse {
                operation: "append",
                expected: NodeType::List,
                found: NodeType::Dict
            })
        );

        let mut list = Node::new_list();
        list.append(Node::new_value(1)).unwrap();
        list.append(Node::new_value(2)).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.insert("a", Node::new_value(1)),
            Err(MetricError::Misuse {
                operation: "insert",
                expected: NodeType::Dict,
                found: NodeType::List
            })
        );
    }

    #[test]
    fn test_lookups() {
        let mut dict = Node::new_dict();
        dict.insert("list", Node::List(vec![Node::new_value(7)])).unwrap();

        let list = dict.get_at_key("list").unwrap();
        assert_eq!(list.get_at_index(0).unwrap(), &Node::new_value(7));
        assert_eq!(
            list.get_at_index(1),
            Err(MetricError::IndexOutOfBounds { index: 1, len: 1 })
        );
        assert_eq!(
            dict.get_at_key("missing"),
            Err(MetricError::KeyNotFound("missing".to_string()))
        );
        assert!(dict.get_at_index(0).is_err());
        assert!(list.get_at_key("list").is_err());
    }

    #[test]
    fn test_eq_ignores_key_order() {
        let mut lhs = Node::new_dict();
        lhs.insert("a", Node::new_value(1)).unwrap();
        lhs.insert("b", Node::List(vec![Node::new_value(2)])).unwrap();
        let mut rhs = Node::new_dict();
        rhs.insert("b", Node::List(vec![Node::new_value(2)])).unwrap();
        rhs.insert("a", Node::new_value(1)).unwrap();
        assert_eq!(lhs, rhs);

        rhs.insert("a", Node::new_value(5)).unwrap();
        assert_ne!(lhs, rhs);
        assert_ne!(Node::new_list(), Node::new_dict());
        assert_ne!(
            Node::List(vec![Node::new_value(1)]),
            Node::List(vec![Node::new_value(1), Node::new_value(1)])
        );
    }

    #[test]
    fn test_clone_is_deep() {
        let mut tree = Node::new_dict();
        tree.insert("z", Node::List(vec![Node::new_value(1), Node::new_dict()]))
            .unwrap();
        tree.insert("a", Node::new_value(2)).unwrap();

        let mut copy = tree.clone();
        assert_eq!(copy, tree);
        let keys = copy.as_dict().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, ["z", "a"]);

        copy.insert("a", Node::new_value(3)).unwrap();
        assert_eq!(tree.get_at_key("a").unwrap(), &Node::new_value(2));
    }

    #[test]
    fn test_by_key_sorts_entries() {
        let mut dict = Node::new_dict();
        for key in ["b", "c", "a"] {
            dict.insert(key, Node::new_value(0)).unwrap();
        }
        let sorted = super::by_key(dict.as_dict().unwrap().iter())
            .into_iter()
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>();
        assert_eq!(sorted, ["a", "b", "c"]);
    }

    #[test]
    fn test_leaf_count() {
        let mut dict = Node::new_dict();
        dict.insert("a", Node::new_value(1)).unwrap();
        dict.insert(
            "b",
            Node::List(vec![Node::new_value(1), Node::new_list(), Node::new_value(2)]),
        )
        .unwrap();
        assert_eq!(dict.leaf_count(), 3);
    }
}
