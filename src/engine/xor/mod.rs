//! In-process two-party engine over XOR shares of 64 bit integers.
//!
//! Both parties live in the same process and talk over in-memory channels,
//! usually from two threads. Correlated randomness comes from a [`Dealer`]
//! seeded identically on both sides, which makes this engine suitable to exercise
//! the tree algorithms end to end but gives no privacy against anyone who knows
//! the seed.

mod channel;
mod circuit;
mod dealer;

use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard},
};

use thiserror::Error;

use super::{Party, SecretShare, ShareEngine};
use channel::Channel;
use dealer::Dealer;

/// Errors raised by the XOR engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XorError {
    /// The peer dropped its end of the link
    #[error("peer channel closed")]
    ChannelClosed,
    /// A previous holder of the session state panicked
    #[error("session state poisoned")]
    Poisoned,
    /// The peer sent a message of the wrong size, parties are out of sync
    #[error("unexpected message: expected {expected} words, got {got}")]
    UnexpectedMessage { expected: usize, got: usize },
}

/// State of one party: its identity, its end of the link and its dealer.
#[derive(Debug)]
pub(crate) struct Session {
    party: Party,
    channel: Channel,
    dealer: Mutex<Dealer>,
}

impl Session {
    pub(crate) fn pair(seed: [u8; 32]) -> (Self, Self) {
        let (publisher, partner) = Channel::pair();
        (
            Self {
                party: Party::Publisher,
                channel: publisher,
                dealer: Mutex::new(Dealer::new(seed)),
            },
            Self {
                party: Party::Partner,
                channel: partner,
                dealer: Mutex::new(Dealer::new(seed)),
            },
        )
    }

    fn dealer(&self) -> Result<MutexGuard<'_, Dealer>, XorError> {
        self.dealer.lock().map_err(|_| XorError::Poisoned)
    }
}

/// Handle on one party's session. Cloning shares the session.
#[derive(Debug, Clone)]
pub struct XorEngine {
    session: Arc<Session>,
}

impl XorEngine {
    /// Creates two connected engines, `(publisher, partner)`, sharing `seed`.
    pub fn pair(seed: [u8; 32]) -> (Self, Self) {
        let (publisher, partner) = Session::pair(seed);
        (
            Self {
                session: Arc::new(publisher),
            },
            Self {
                session: Arc::new(partner),
            },
        )
    }

    /// `bit` is the local party's share of an XOR-encrypted boolean.
    pub fn private_bit(&self, bit: bool) -> XorBit {
        XorBit {
            bit,
            session: self.session.clone(),
        }
    }

    /// `bit` is a public boolean known to the publisher.
    pub fn public_bit(&self, bit: bool) -> Result<XorBit, XorError> {
        let mask = self.session.dealer()?.mask() & 1 == 1;
        let bit = match self.session.party {
            Party::Publisher => bit ^ mask,
            Party::Partner => mask,
        };
        Ok(self.private_bit(bit))
    }
}

impl ShareEngine for XorEngine {
    type Share = XorShare;

    fn party(&self) -> Party {
        self.session.party
    }

    fn share_private(&self, value: i64) -> Result<XorShare, XorError> {
        Ok(XorShare {
            word: value as u64,
            session: self.session.clone(),
        })
    }

    fn share_public(&self, value: i64) -> Result<XorShare, XorError> {
        let mask = self.session.dealer()?.mask();
        let word = match self.session.party {
            Party::Publisher => value as u64 ^ mask,
            Party::Partner => mask,
        };
        Ok(XorShare {
            word,
            session: self.session.clone(),
        })
    }
}

/// Local XOR share of a 64 bit integer.
#[derive(Clone)]
pub struct XorShare {
    word: u64,
    session: Arc<Session>,
}

impl Debug for XorShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "XorShare {{ party: {}, share: {} }}",
            self.session.party,
            hex::encode(self.word.to_be_bytes())
        )
    }
}

impl XorShare {
    fn with_word(&self, word: u64) -> Self {
        Self {
            word,
            session: self.session.clone(),
        }
    }
}

impl SecretShare for XorShare {
    type Bit = XorBit;
    type Error = XorError;

    fn add(&self, rhs: &Self) -> Result<Self, XorError> {
        let (sum, _) = circuit::add_with_carry(&self.session, self.word, rhs.word, false)?;
        Ok(self.with_word(sum))
    }

    fn greater_or_equal(&self, rhs: &Self) -> Result<XorBit, XorError> {
        let bit = circuit::greater_or_equal(&self.session, self.word, rhs.word)?;
        Ok(XorBit {
            bit,
            session: self.session.clone(),
        })
    }

    fn mux(&self, condition: &XorBit, if_true: &Self) -> Result<Self, XorError> {
        let word = circuit::mux(&self.session, condition.bit, if_true.word, self.word)?;
        Ok(self.with_word(word))
    }

    fn reveal_to(&self, party: Party) -> Result<Option<i64>, XorError> {
        Ok(circuit::reveal(&self.session, self.word, party)?.map(|word| word as i64))
    }

    fn zero_like(&self) -> Self {
        self.with_word(0)
    }

    fn local_share(&self) -> i64 {
        self.word as i64
    }

    fn party(&self) -> Party {
        self.session.party
    }
}

/// Local XOR share of a boolean.
#[derive(Clone)]
pub struct XorBit {
    bit: bool,
    session: Arc<Session>,
}

impl Debug for XorBit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "XorBit {{ party: {}, share: {} }}", self.session.party, self.bit as u8)
    }
}

impl XorBit {
    /// Opens the bit to `party`. Only that party gets `Some`.
    pub fn reveal_to(&self, party: Party) -> Result<Option<bool>, XorError> {
        Ok(circuit::reveal(&self.session, self.bit as u64, party)?.map(|word| word & 1 == 1))
    }

    /// Shared NOT, computed locally.
    pub fn not(&self) -> Self {
        Self {
            bit: self.bit ^ (self.session.party == Party::Publisher),
            session: self.session.clone(),
        }
    }
}
