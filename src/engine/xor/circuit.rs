//! Boolean circuits over XOR shares.
//!
//! XOR and NOT are local. AND gates consume a Beaver triple each and cost one
//! exchange per batch.

use bitvec::prelude::*;

use super::{Session, XorError};
use crate::engine::Party;

const SIGN_BIT: u64 = 1 << 63;

/// Bitwise AND of shared words, one exchange for the whole batch.
pub(crate) fn and_words(session: &Session, x: &[u64], y: &[u64]) -> Result<Vec<u64>, XorError> {
    debug_assert_eq!(x.len(), y.len());
    let triples = {
        let mut dealer = session.dealer()?;
        x.iter()
            .map(|_| dealer.and_triple(session.party))
            .collect::<Vec<_>>()
    };

    let masked = x
        .iter()
        .zip(y)
        .zip(&triples)
        .flat_map(|((x, y), triple)| [x ^ triple.a, y ^ triple.b])
        .collect::<Vec<_>>();
    let peer = session.channel.exchange(masked.clone())?;
    tracing::trace!(party = %session.party, gates = triples.len(), "and round");

    let publisher = session.party == Party::Publisher;
    Ok(triples
        .iter()
        .enumerate()
        .map(|(i, triple)| {
            let d = masked[2 * i] ^ peer[2 * i];
            let e = masked[2 * i + 1] ^ peer[2 * i + 1];
            let mut z = triple.c ^ (d & triple.b) ^ (e & triple.a);
            if publisher {
                z ^= d & e;
            }
            z
        })
        .collect())
}

/// Ripple-carry adder. Returns the wrapping sum and the carry out of the top bit.
///
/// `carry_in` is public.
pub(crate) fn add_with_carry(
    session: &Session,
    x: u64,
    y: u64,
    carry_in: bool,
) -> Result<(u64, bool), XorError> {
    let generate = and_words(session, &[x], &[y])?[0];
    let propagate = x ^ y;
    let (generate, propagate) = (generate.view_bits::<Lsb0>(), propagate.view_bits::<Lsb0>());

    let mut carry = carry_in && session.party == Party::Publisher;
    let mut sum = 0u64;
    let sum_bits = sum.view_bits_mut::<Lsb0>();
    for i in 0..u64::BITS as usize {
        sum_bits.set(i, propagate[i] ^ carry);
        // c[i + 1] = g[i] ^ (p[i] & c[i])
        let pc = and_words(session, &[propagate[i] as u64], &[carry as u64])?[0] & 1;
        carry = generate[i] ^ (pc == 1);
    }
    Ok((sum, carry))
}

/// Signed `x >= y` as a shared bit.
///
/// Flipping the sign bit maps signed order onto unsigned order, and
/// `x + !y + 1` carries out exactly when `x >= y` unsigned.
pub(crate) fn greater_or_equal(session: &Session, x: u64, y: u64) -> Result<bool, XorError> {
    let (x, y) = match session.party {
        Party::Publisher => (x ^ SIGN_BIT, !(y ^ SIGN_BIT)),
        Party::Partner => (x, y),
    };
    let (_, carry) = add_with_carry(session, x, y, true)?;
    Ok(carry)
}

/// `if_true` when the shared `condition` is set, `if_false` otherwise.
pub(crate) fn mux(
    session: &Session,
    condition: bool,
    if_true: u64,
    if_false: u64,
) -> Result<u64, XorError> {
    // all ones or all zeros, XOR-ing to the mask of the shared bit
    let mask = 0u64.wrapping_sub(condition as u64);
    let selected = and_words(session, &[mask], &[if_true ^ if_false])?[0];
    Ok(if_false ^ selected)
}

/// Opens a shared word to `to`. The other party only sends.
pub(crate) fn reveal(session: &Session, word: u64, to: Party) -> Result<Option<u64>, XorError> {
    if session.party == to {
        let peer = session.channel.recv(1)?;
        Ok(Some(word ^ peer[0]))
    } else {
        session.channel.send(vec![word])?;
        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use std::thread;

    use super::{add_with_carry, and_words, greater_or_equal, mux, reveal};
    use crate::engine::{xor::Session, Party};

    /// Runs `f` for both parties on their own thread and returns both outputs.
    fn run_pair<T: Send + 'static>(
        f: impl Fn(&Session) -> T + Send + Sync + Clone + 'static,
    ) -> (T, T) {
        let (publisher, partner) = Session::pair([3; 32]);
        let g = f.clone();
        let handle = thread::spawn(move || g(&partner));
        let left = f(&publisher);
        (left, handle.join().unwrap())
    }

    fn share(party: Party, value: u64) -> u64 {
        match party {
            Party::Publisher => value ^ 0x5a5a_1234_dead_beef,
            Party::Partner => 0x5a5a_1234_dead_beef,
        }
    }

    #[test]
    fn test_and_words() {
        let (a, b) = run_pair(|s| {
            and_words(
                s,
                &[share(s.party, 0b1100), share(s.party, u64::MAX)],
                &[share(s.party, 0b1010), share(s.party, 42)],
            )
            .unwrap()
        });
        assert_eq!(a[0] ^ b[0], 0b1000);
        assert_eq!(a[1] ^ b[1], 42);
    }

    #[test]
    fn test_add_with_carry() {
        let (a, b) = run_pair(|s| {
            add_with_carry(s, share(s.party, u64::MAX), share(s.party, 2), false).unwrap()
        });
        assert_eq!(a.0 ^ b.0, 1);
        assert!(a.1 ^ b.1);

        let (a, b) = run_pair(|s| {
            add_with_carry(s, share(s.party, 40), share(s.party, 1), true).unwrap()
        });
        assert_eq!(a.0 ^ b.0, 42);
        assert!(!(a.1 ^ b.1));
    }

    #[test]
    fn test_greater_or_equal() {
        for (x, y, expected) in [
            (5i64, 3i64, true),
            (3, 5, false),
            (4, 4, true),
            (-1, 0, false),
            (0, -1, true),
            (i64::MIN, i64::MAX, false),
            (i64::MAX, i64::MIN, true),
        ] {
            let (a, b) = run_pair(move |s| {
                greater_or_equal(s, share(s.party, x as u64), share(s.party, y as u64)).unwrap()
            });
            assert_eq!(a ^ b, expected, "{x} >= {y}");
        }
    }

    #[test]
    fn test_mux() {
        for condition in [false, true] {
            let (a, b) = run_pair(move |s| {
                let bit = match s.party {
                    Party::Publisher => !condition,
                    Party::Partner => true,
                };
                mux(s, bit, share(s.party, 7), share(s.party, 9)).unwrap()
            });
            assert_eq!(a ^ b, if condition { 7 } else { 9 });
        }
    }

    #[test]
    fn test_reveal() {
        let (a, b) = run_pair(|s| reveal(s, share(s.party, 99), Party::Partner).unwrap());
        assert_eq!(a, None);
        assert_eq!(b, Some(99));
    }
}
