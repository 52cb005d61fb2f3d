use std::sync::{
    mpsc::{self, Receiver, Sender},
    Mutex,
};

use super::XorError;

/// One end of an in-memory duplex link between the two parties.
///
/// Sends never block, so both parties can send first and then receive.
#[derive(Debug)]
pub(crate) struct Channel {
    tx: Sender<Vec<u64>>,
    rx: Mutex<Receiver<Vec<u64>>>,
}

impl Channel {
    pub fn pair() -> (Self, Self) {
        let (tx0, rx1) = mpsc::channel();
        let (tx1, rx0) = mpsc::channel();
        (
            Self {
                tx: tx0,
                rx: Mutex::new(rx0),
            },
            Self {
                tx: tx1,
                rx: Mutex::new(rx1),
            },
        )
    }

    pub fn send(&self, words: Vec<u64>) -> Result<(), XorError> {
        self.tx.send(words).map_err(|_| XorError::ChannelClosed)
    }

    pub fn recv(&self, expected: usize) -> Result<Vec<u64>, XorError> {
        let words = self
            .rx
            .lock()
            .map_err(|_| XorError::Poisoned)?
            .recv()
            .map_err(|_| XorError::ChannelClosed)?;
        if words.len() != expected {
            return Err(XorError::UnexpectedMessage {
                expected,
                got: words.len(),
            });
        }
        Ok(words)
    }

    /// Sends `words` and waits for the same number of words from the peer.
    pub fn exchange(&self, words: Vec<u64>) -> Result<Vec<u64>, XorError> {
        let expected = words.len();
        self.send(words)?;
        self.recv(expected)
    }
}
