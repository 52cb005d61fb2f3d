//! Secure computation engine interface
//!
//! The tree algorithms never touch shares directly. Every secret-shared leaf
//! goes through [`SecretShare`], and plaintext leaves are turned into shares by a
//! [`ShareEngine`]. The [`xor`] module ships an in-process two-party engine that
//! implements both traits.

pub mod xor;

use std::convert::Infallible;
use std::fmt::{Debug, Display};

pub use xor::{XorBit, XorEngine, XorError, XorShare};

/// The two parties of a secure computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Party {
    /// Party 0. Owns public inputs.
    Publisher,
    /// Party 1.
    Partner,
}

impl Party {
    pub fn id(self) -> usize {
        match self {
            Self::Publisher => 0,
            Self::Partner => 1,
        }
    }

    /// The other party.
    pub fn peer(self) -> Self {
        match self {
            Self::Publisher => Self::Partner,
            Self::Partner => Self::Publisher,
        }
    }
}

impl Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Publisher => write!(f, "publisher"),
            Self::Partner => write!(f, "partner"),
        }
    }
}

/// A secret-shared 64 bit integer held by the local party.
///
/// Every method except [`SecretShare::zero_like`], [`SecretShare::local_share`] and
/// [`SecretShare::party`] may run a protocol round with the peer, so both
/// parties must call them in the same order on matching shares.
pub trait SecretShare: Clone + Debug + Sized {
    /// Secret-shared boolean, the result of a comparison.
    type Bit: Clone + Debug;
    /// Error raised by the engine.
    type Error: Debug + Display;

    /// Wrapping addition of the two shared values.
    fn add(&self, rhs: &Self) -> Result<Self, Self::Error>;

    /// Signed `self >= rhs`. The result stays shared.
    fn greater_or_equal(&self, rhs: &Self) -> Result<Self::Bit, Self::Error>;

    /// Oblivious select: `if_true` when `condition` is set, `self` otherwise.
    fn mux(&self, condition: &Self::Bit, if_true: &Self) -> Result<Self, Self::Error>;

    /// Opens the value to `party`. Only that party gets `Some`.
    fn reveal_to(&self, party: Party) -> Result<Option<i64>, Self::Error>;

    /// A sharing of zero bound to the same session, computed locally.
    fn zero_like(&self) -> Self;

    /// The local share word. Not meaningful on its own.
    fn local_share(&self) -> i64;

    /// Party holding this share.
    fn party(&self) -> Party;
}

/// Turns local plaintext into shares.
pub trait ShareEngine {
    type Share: SecretShare;

    /// Local party.
    fn party(&self) -> Party;

    /// `value` is the local party's share of an XOR-encrypted input.
    fn share_private(
        &self,
        value: i64,
    ) -> Result<Self::Share, <Self::Share as SecretShare>::Error>;

    /// `value` is a public constant known to the [`Party::Publisher`].
    fn share_public(
        &self,
        value: i64,
    ) -> Result<Self::Share, <Self::Share as SecretShare>::Error>;
}

/// Share type of trees that never leave plaintext. It has no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unshared {}

impl SecretShare for Unshared {
    type Bit = Unshared;
    type Error = Infallible;

    fn add(&self, _rhs: &Self) -> Result<Self, Self::Error> {
        match *self {}
    }

    fn greater_or_equal(&self, _rhs: &Self) -> Result<Self::Bit, Self::Error> {
        match *self {}
    }

    fn mux(&self, _condition: &Self::Bit, _if_true: &Self) -> Result<Self, Self::Error> {
        match *self {}
    }

    fn reveal_to(&self, _party: Party) -> Result<Option<i64>, Self::Error> {
        match *self {}
    }

    fn zero_like(&self) -> Self {
        match *self {}
    }

    fn local_share(&self) -> i64 {
        match *self {}
    }

    fn party(&self) -> Party {
        match *self {}
    }
}
