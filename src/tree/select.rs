use crate::{
    engine::SecretShare,
    node::{MetricNode, NodeType},
    value::Condition,
    MetricError,
};

/// Overwrites the leaf of `node` with the leaf of `replacement` when `condition` holds.
///
/// A plain condition is branched on directly. A secret condition goes through
/// the engine's oblivious select, so neither party learns which leaf was kept.
pub fn mux<S: SecretShare>(
    node: &mut MetricNode<S>,
    condition: &Condition<S>,
    replacement: &MetricNode<S>,
) -> Result<(), MetricError<S::Error>> {
    let replacement = value_operand(replacement)?;
    let current = node.as_value_mut()?;
    *current = current.select(condition, replacement)?;
    Ok(())
}

/// `lhs >= rhs` on two value leaves of the same encryption.
///
/// A secret result stays shared.
pub fn is_greater_or_equal<S: SecretShare>(
    lhs: &MetricNode<S>,
    rhs: &MetricNode<S>,
) -> Result<Condition<S>, MetricError<S::Error>> {
    value_operand(lhs)?.greater_or_equal(value_operand(rhs)?)
}

fn value_operand<S: SecretShare>(
    node: &MetricNode<S>,
) -> Result<&crate::value::SecureValue<S>, MetricError<S::Error>> {
    match node {
        MetricNode::Value(value) => Ok(value),
        other => Err(MetricError::type_mismatch(NodeType::Value, other.node_type())),
    }
}

impl<S: SecretShare> MetricNode<S> {
    /// See [`mux`].
    pub fn mux(
        &mut self,
        condition: &Condition<S>,
        replacement: &MetricNode<S>,
    ) -> Result<(), MetricError<S::Error>> {
        mux(self, condition, replacement)
    }

    /// See [`is_greater_or_equal`].
    pub fn is_greater_or_equal(
        &self,
        other: &MetricNode<S>,
    ) -> Result<Condition<S>, MetricError<S::Error>> {
        is_greater_or_equal(self, other)
    }
}

#[cfg(test)]
mod test {
    use std::convert::Infallible;

    use super::{is_greater_or_equal, mux};
    use crate::{
        engine::Unshared, node::MetricNode, value::Condition, InputEncryption, MetricError,
    };

    type Node = MetricNode<Unshared>;

    #[test]
    fn test_plaintext_mux() {
        for (condition, current, replacement) in
            [(false, 1, 2), (false, 2, 1), (true, 1, 2), (true, 2, 1)]
        {
            let mut node = Node::new_value(current);
            mux(
                &mut node,
                &Condition::Plain(condition),
                &Node::new_value(replacement),
            )
            .unwrap();
            let expected = if condition { replacement } else { current };
            assert_eq!(node, Node::new_value(expected));
        }
    }

    #[test]
    fn test_mux_requires_values() {
        let mut list = Node::List(vec![Node::new_value(1)]);
        assert_eq!(
            mux(&mut list, &Condition::Plain(true), &Node::new_value(2)),
            Err(MetricError::<Infallible>::TypeMismatch {
                expected: "value".to_string(),
                found: "list".to_string()
            })
        );
        let mut node = Node::new_value(1);
        assert!(node
            .mux(&Condition::Plain(true), &Node::new_dict())
            .is_err());
        assert_eq!(node, Node::new_value(1));
    }

    #[test]
    fn test_plaintext_compare() {
        let (a, b) = (Node::new_value(5), Node::new_value(3));
        assert!(matches!(
            is_greater_or_equal(&a, &b),
            Ok(Condition::Plain(true))
        ));
        assert!(matches!(b.is_greater_or_equal(&a), Ok(Condition::Plain(false))));
        assert!(matches!(a.is_greater_or_equal(&a), Ok(Condition::Plain(true))));
    }

    #[test]
    fn test_compare_requires_values() {
        let list = Node::new_list();
        assert!(matches!(
            is_greater_or_equal(&list, &Node::new_value(1)),
            Err(MetricError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_condition_encryption() {
        assert_eq!(
            Condition::<Unshared>::Plain(true).encryption(),
            InputEncryption::Plaintext
        );
    }
}
