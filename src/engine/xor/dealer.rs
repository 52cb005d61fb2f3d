use sha2::{Digest, Sha256};

use crate::engine::Party;

/// One party's half of a Beaver triple: `(a0 ^ a1) & (b0 ^ b1) == c0 ^ c1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Triple {
    pub a: u64,
    pub b: u64,
    pub c: u64,
}

/// Correlated randomness derived from a seed both parties know.
///
/// Words come from SHA-256 in counter mode over the seed. Both dealers consume
/// the stream in lockstep, so the mirrored calls must happen in the same order on
/// both sides. Anyone holding the seed can recompute every mask.
#[derive(Debug, Clone)]
pub(crate) struct Dealer {
    seed: [u8; 32],
    counter: u64,
    block: [u64; 4],
    used: usize,
}

impl Dealer {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            seed,
            counter: 0,
            block: [0; 4],
            used: 4,
        }
    }

    fn refill(&mut self) {
        let digest: [u8; 32] = Sha256::new()
            .chain_update(self.seed)
            .chain_update(self.counter.to_be_bytes())
            .finalize()
            .into();
        for (word, chunk) in self.block.iter_mut().zip(digest.chunks_exact(8)) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            *word = u64::from_le_bytes(bytes);
        }
        self.counter += 1;
        self.used = 0;
    }

    pub fn next_word(&mut self) -> u64 {
        if self.used == self.block.len() {
            self.refill();
        }
        let word = self.block[self.used];
        self.used += 1;
        word
    }

    /// Mask used to share a public value.
    pub fn mask(&mut self) -> u64 {
        self.next_word()
    }

    /// Draws a full triple and hands out the half belonging to `party`.
    pub fn and_triple(&mut self, party: Party) -> Triple {
        let (a0, a1) = (self.next_word(), self.next_word());
        let (b0, b1) = (self.next_word(), self.next_word());
        let c0 = self.next_word();
        match party {
            Party::Publisher => Triple {
                a: a0,
                b: b0,
                c: c0,
            },
            Party::Partner => Triple {
                a: a1,
                b: b1,
                c: ((a0 ^ a1) & (b0 ^ b1)) ^ c0,
            },
        }
    }
}
