//! Leaf values of a metric tree.
//!
//! A leaf is either a plaintext integer or a share held through a
//! [`SecretShare`] engine. Both variants expose the same operations, so tree
//! algorithms are written once. Mixing the two in one operation is an error.

use std::fmt::Display;

use crate::{
    engine::{Party, SecretShare, ShareEngine},
    MetricError,
};

/// How the inputs of a computation are encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEncryption {
    /// Values are clear integers.
    Plaintext,
    /// Only the partner's inputs are XOR shares. Not supported by tree operations.
    PartnerXor,
    /// Every input is an XOR share.
    Xor,
}

impl Display for InputEncryption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plaintext => write!(f, "plaintext"),
            Self::PartnerXor => write!(f, "partner_xor"),
            Self::Xor => write!(f, "xor"),
        }
    }
}

/// How a plaintext leaf becomes a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharePolicy {
    /// The plaintext is the local party's share of an encrypted input.
    Private,
    /// The plaintext is a public constant known to the publisher.
    Public,
}

/// A metric leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecureValue<S> {
    Plaintext(i64),
    SecretShared(S),
}

/// Result of a leaf comparison, in the domain of the compared leaves.
#[derive(Debug, Clone)]
pub enum Condition<S: SecretShare> {
    Plain(bool),
    Secret(S::Bit),
}

impl<S: SecretShare> Condition<S> {
    pub fn encryption(&self) -> InputEncryption {
        match self {
            Self::Plain(_) => InputEncryption::Plaintext,
            Self::Secret(_) => InputEncryption::Xor,
        }
    }
}

impl<S> Default for SecureValue<S> {
    fn default() -> Self {
        Self::Plaintext(0)
    }
}

impl<S> From<i64> for SecureValue<S> {
    fn from(value: i64) -> Self {
        Self::Plaintext(value)
    }
}

impl<S: SecretShare> SecureValue<S> {
    pub fn encryption(&self) -> InputEncryption {
        match self {
            Self::Plaintext(_) => InputEncryption::Plaintext,
            Self::SecretShared(_) => InputEncryption::Xor,
        }
    }

    pub fn as_plaintext(&self) -> Option<i64> {
        match self {
            Self::Plaintext(value) => Some(*value),
            Self::SecretShared(_) => None,
        }
    }

    pub fn as_share(&self) -> Option<&S> {
        match self {
            Self::Plaintext(_) => None,
            Self::SecretShared(share) => Some(share),
        }
    }

    /// Zero in the same domain as `self`.
    pub fn zero_like(&self) -> Self {
        match self {
            Self::Plaintext(_) => Self::Plaintext(0),
            Self::SecretShared(share) => Self::SecretShared(share.zero_like()),
        }
    }

    /// Wrapping addition. Both sides must be in the same domain.
    pub fn add(&self, rhs: &Self) -> Result<Self, MetricError<S::Error>> {
        match (self, rhs) {
            (Self::Plaintext(lhs), Self::Plaintext(rhs)) => {
                Ok(Self::Plaintext(lhs.wrapping_add(*rhs)))
            }
            (Self::SecretShared(lhs), Self::SecretShared(rhs)) => lhs
                .add(rhs)
                .map(Self::SecretShared)
                .map_err(MetricError::engine),
            (_, rhs) => Err(MetricError::unsupported_encryption(
                "accumulate",
                rhs.encryption(),
            )),
        }
    }

    /// `self >= rhs`. A secret result is not revealed.
    pub fn greater_or_equal(&self, rhs: &Self) -> Result<Condition<S>, MetricError<S::Error>> {
        match (self, rhs) {
            (Self::Plaintext(lhs), Self::Plaintext(rhs)) => Ok(Condition::Plain(lhs >= rhs)),
            (Self::SecretShared(lhs), Self::SecretShared(rhs)) => lhs
                .greater_or_equal(rhs)
                .map(Condition::Secret)
                .map_err(MetricError::engine),
            (lhs, rhs) => Err(MetricError::type_mismatch(
                lhs.encryption(),
                rhs.encryption(),
            )),
        }
    }

    /// `if_true` when `condition` holds, `self` otherwise.
    ///
    /// A plain condition may be branched on. A secret one goes through the
    /// engine's oblivious select and is never inspected here.
    pub fn select(
        &self,
        condition: &Condition<S>,
        if_true: &Self,
    ) -> Result<Self, MetricError<S::Error>> {
        match (condition, self, if_true) {
            (Condition::Plain(condition), Self::Plaintext(_), Self::Plaintext(_)) => {
                Ok(if *condition { if_true.clone() } else { self.clone() })
            }
            (Condition::Secret(bit), Self::SecretShared(current), Self::SecretShared(if_true)) => {
                current
                    .mux(bit, if_true)
                    .map(Self::SecretShared)
                    .map_err(MetricError::engine)
            }
            _ => {
                let mismatched = if self.encryption() != condition.encryption() {
                    self.encryption()
                } else {
                    if_true.encryption()
                };
                Err(MetricError::unsupported_encryption("mux", mismatched))
            }
        }
    }

    /// Opens a secret leaf to `party`. Plaintext leaves need no reveal.
    pub fn reveal_to(&self, party: Party) -> Result<Option<i64>, MetricError<S::Error>> {
        match self {
            Self::Plaintext(_) => Err(MetricError::unsupported_encryption(
                "reveal",
                InputEncryption::Plaintext,
            )),
            Self::SecretShared(share) => share.reveal_to(party).map_err(MetricError::engine),
        }
    }

    /// Shares a plaintext leaf through `engine`. Secret leaves are returned as is.
    pub fn promote<E: ShareEngine<Share = S>>(
        &self,
        policy: SharePolicy,
        engine: &E,
    ) -> Result<Self, MetricError<S::Error>> {
        let Self::Plaintext(value) = self else {
            return Ok(self.clone());
        };
        let share = match policy {
            SharePolicy::Private => engine.share_private(*value),
            SharePolicy::Public => engine.share_public(*value),
        };
        share.map(Self::SecretShared).map_err(MetricError::engine)
    }
}
