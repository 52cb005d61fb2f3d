use std::fmt::{Display, Formatter, Result};

use super::MetricNode;
use crate::{engine::SecretShare, value::SecureValue};

/// Options of the indented tree printer.
///
/// Secret leaves are redacted unless `reveal_local_shares` is set. Even then only
/// the local share is printed, never a reconstructed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    pub reveal_local_shares: bool,
    pub indent: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            reveal_local_shares: false,
            indent: 2,
        }
    }
}

/// Helper returned by [`MetricNode::display`].
pub struct DisplayTree<'a, S> {
    node: &'a MetricNode<S>,
    options: PrintOptions,
}

impl<S: SecretShare> MetricNode<S> {
    /// Renders the tree with explicit print options.
    pub fn display(&self, options: PrintOptions) -> DisplayTree<'_, S> {
        DisplayTree {
            node: self,
            options,
        }
    }
}

/// Pending output of the printer.
enum Step<'a, S> {
    Node(&'a MetricNode<S>, usize),
    Key(&'a str, usize),
    Close(char, usize),
}

impl<S: SecretShare> DisplayTree<'_, S> {
    fn write_leaf(&self, f: &mut Formatter<'_>, value: &SecureValue<S>) -> Result {
        match value {
            SecureValue::Plaintext(value) => writeln!(f, "<{}>", value),
            SecureValue::SecretShared(share) if self.options.reveal_local_shares => writeln!(
                f,
                "<{}> secretXor<{}>",
                hex::encode(share.local_share().to_be_bytes()),
                share.party()
            ),
            SecureValue::SecretShared(_) => writeln!(f, "<secret>"),
        }
    }
}

impl<S: SecretShare> Display for DisplayTree<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let indent = self.options.indent;
        let mut stack = vec![Step::Node(self.node, 0)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Node(node, depth) => {
                    write!(f, "{:pad$}", "", pad = depth * indent)?;
                    match node {
                        MetricNode::Dict(dict) => {
                            writeln!(f, "map{{")?;
                            stack.push(Step::Close('}', depth));
                            for (key, child) in dict.iter().rev() {
                                stack.push(Step::Node(child, depth + 1));
                                stack.push(Step::Key(key, depth + 1));
                            }
                        }
                        MetricNode::List(list) => {
                            writeln!(f, "list[")?;
                            stack.push(Step::Close(']', depth));
                            let children = list.iter().rev();
                            stack.extend(children.map(|child| Step::Node(child, depth + 1)));
                        }
                        MetricNode::Value(value) => self.write_leaf(f, value)?,
                    }
                }
                Step::Key(key, depth) => {
                    writeln!(f, "{:pad$}{}:", "", key, pad = depth * indent)?;
                }
                Step::Close(bracket, depth) => {
                    writeln!(f, "{:pad$}{}", "", bracket, pad = depth * indent)?;
                }
            }
        }
        Ok(())
    }
}

impl<S: SecretShare> Display for MetricNode<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.display(PrintOptions::default()).fmt(f)
    }
}
