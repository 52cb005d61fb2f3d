use std::collections::VecDeque;

use crate::{
    engine::{SecretShare, ShareEngine},
    node::{by_key, MetricNode},
    value::{InputEncryption, SecureValue, SharePolicy},
    MetricError,
};

/// Turns every plaintext leaf of `tree` into a share produced by `engine`.
///
/// * [`InputEncryption::Plaintext`] leaves the tree untouched.
/// * [`InputEncryption::Xor`] promotes each leaf under `policy`.
/// * Any other encryption fails with [`MetricError::UnsupportedEncryption`].
///
/// Leaves that are already shared are skipped. Leaves are visited breadth first,
/// dict children by sorted key, so public masks are drawn in the same order by
/// both parties.
pub fn promote_all<S, E>(
    tree: &mut MetricNode<S>,
    encryption: InputEncryption,
    policy: SharePolicy,
    engine: &E,
) -> Result<(), MetricError<S::Error>>
where
    S: SecretShare,
    E: ShareEngine<Share = S>,
{
    match encryption {
        InputEncryption::Plaintext => return Ok(()),
        InputEncryption::Xor => {}
        other => return Err(MetricError::unsupported_encryption("promote", other)),
    }

    let mut promoted = 0usize;
    let mut queue = VecDeque::from([tree]);
    while let Some(node) = queue.pop_front() {
        match node {
            MetricNode::Value(value @ SecureValue::Plaintext(_)) => {
                *value = value.promote(policy, engine)?;
                promoted += 1;
            }
            MetricNode::Value(SecureValue::SecretShared(_)) => {}
            MetricNode::List(list) => queue.extend(list.iter_mut()),
            MetricNode::Dict(dict) => {
                queue.extend(by_key(dict.iter_mut()).into_iter().map(|(_, child)| child));
            }
        }
    }
    tracing::debug!(promoted, party = %engine.party(), ?policy, "promoted leaves");
    Ok(())
}

impl<S: SecretShare> MetricNode<S> {
    /// See [`promote_all`].
    pub fn promote_all<E: ShareEngine<Share = S>>(
        &mut self,
        encryption: InputEncryption,
        policy: SharePolicy,
        engine: &E,
    ) -> Result<(), MetricError<S::Error>> {
        promote_all(self, encryption, policy, engine)
    }
}
