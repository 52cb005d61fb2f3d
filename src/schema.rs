//! Conversion between metric trees and JSON documents.
//!
//! Documents may only hold integers, arrays and objects. Arrays become lists,
//! objects become dicts (keeping key order) and integers become plaintext leaves.

use std::{collections::VecDeque, convert::Infallible};

use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    engine::{Party, SecretShare},
    node::{by_key, MetricNode},
    value::SecureValue,
    MetricError,
};

/// Builds a tree from a JSON document. Every leaf is plaintext.
pub fn from_document<S: SecretShare>(doc: &Value) -> Result<MetricNode<S>, MetricError<S::Error>> {
    let mut root = node_for(doc)?;
    {
        let mut queue = VecDeque::from([(doc, &mut root)]);
        while let Some((src, dst)) = queue.pop_front() {
            match src {
                Value::Array(items) => {
                    if let MetricNode::List(list) = dst {
                        for item in items {
                            list.push(node_for(item)?);
                        }
                        queue.extend(items.iter().zip(list.iter_mut()));
                    }
                }
                Value::Object(entries) => {
                    if let MetricNode::Dict(dict) = dst {
                        for (key, entry) in entries {
                            dict.insert(key.clone(), node_for(entry)?);
                        }
                        queue.extend(entries.values().zip(dict.values_mut()));
                    }
                }
                // leaves are filled in by `node_for`
                _ => {}
            }
        }
    }
    Ok(root)
}

/// Parses `text` as JSON and builds a tree from it.
pub fn from_json<S: SecretShare>(text: &str) -> Result<MetricNode<S>, MetricError<S::Error>> {
    let doc: Value = serde_json::from_str(text).map_err(|e| {
        tracing::error!(error = %e, "failed to parse metrics document");
        MetricError::MalformedDocument(e.to_string())
    })?;
    from_document(&doc)
}

/// Allocates the node matching the kind of `doc`, with no children yet.
fn node_for<S: SecretShare>(doc: &Value) -> Result<MetricNode<S>, MetricError<S::Error>> {
    let kind = match doc {
        Value::Number(number) => match number.as_i64() {
            Some(value) => return Ok(MetricNode::new_value(value)),
            None if number.is_u64() => "out of range integer",
            None => "float",
        },
        Value::Array(items) => return Ok(MetricNode::List(Vec::with_capacity(items.len()))),
        Value::Object(entries) => {
            return Ok(MetricNode::Dict(IndexMap::with_capacity(entries.len())))
        }
        Value::String(_) => "string",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    };
    tracing::error!(kind, "only integers, arrays and objects are supported");
    Err(MetricError::UnsupportedSchema(kind.to_string()))
}

/// Exports the local leaf values of `tree`.
///
/// Secret leaves export the local share word, which is meaningless on its own.
/// Nothing is revealed.
pub fn to_document<S: SecretShare>(tree: &MetricNode<S>) -> Value {
    build_document(tree, |value| {
        Ok::<_, Infallible>(match value {
            SecureValue::Plaintext(value) => *value,
            SecureValue::SecretShared(share) => share.local_share(),
        })
    })
    .unwrap_or_else(|never| match never {})
}

/// Reveals every leaf of a secret tree to `party` and exports the result.
///
/// Only `party` gets the real values. The other party gets a document of the
/// same shape filled with zeros, which must not be used. Plaintext leaves fail
/// with [`MetricError::UnsupportedEncryption`] as they need no reveal.
///
/// Leaves are revealed breadth first, dict children by sorted key, while the
/// document keeps the tree's key order.
pub fn to_revealed_document<S: SecretShare>(
    tree: &MetricNode<S>,
    party: Party,
) -> Result<Value, MetricError<S::Error>> {
    build_document(tree, |value| value.reveal_to(party).map(Option::unwrap_or_default))
}

/// Exports `tree`, turning each leaf into an integer through `leaf`.
///
/// `leaf` is called breadth first with dict children by sorted key.
fn build_document<S, E>(
    tree: &MetricNode<S>,
    mut leaf: impl FnMut(&SecureValue<S>) -> Result<i64, E>,
) -> Result<Value, E> {
    let mut root = Value::Null;
    {
        let mut queue = VecDeque::from([(tree, &mut root)]);
        while let Some((node, out)) = queue.pop_front() {
            match node {
                MetricNode::Dict(dict) => {
                    let keys = dict.keys().map(|key| (key.clone(), Value::Null));
                    *out = Value::Object(keys.collect());
                    if let Value::Object(entries) = out {
                        for (key, slot) in by_key(entries.iter_mut()) {
                            if let Some(child) = dict.get(key) {
                                queue.push_back((child, slot));
                            }
                        }
                    }
                }
                MetricNode::List(list) => {
                    *out = Value::Array(vec![Value::Null; list.len()]);
                    if let Value::Array(items) = out {
                        queue.extend(list.iter().zip(items.iter_mut()));
                    }
                }
                MetricNode::Value(value) => *out = Value::from(leaf(value)?),
            }
        }
    }
    Ok(root)
}

impl<S: SecretShare> MetricNode<S> {
    /// See [`from_document`].
    pub fn from_document(doc: &Value) -> Result<Self, MetricError<S::Error>> {
        from_document(doc)
    }

    /// See [`to_document`].
    pub fn to_document(&self) -> Value {
        to_document(self)
    }

    /// See [`to_revealed_document`].
    pub fn to_revealed_document(&self, party: Party) -> Result<Value, MetricError<S::Error>> {
        to_revealed_document(self, party)
    }
}
