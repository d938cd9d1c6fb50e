//! Core types for two-party oblivious transfer with full simulation
//! security against malicious adversaries, following the DDH-based
//! construction of Hazay and Lindell.
//!
//! A session runs in two phases. Preprocessing samples the receiver's
//! session bases and binds them with a zero-knowledge proof of knowledge,
//! after which any number of transfers can run over the same bases. Each
//! transfer moves one of the sender's two values to the receiver according
//! to its choice bit, revealing neither the other value to the receiver nor
//! the choice bit to the sender.
//!
//! This crate is sans-io: parties are state machines over plain message
//! types, and the caller moves the messages.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

pub mod commit;
pub mod config;
mod error;
pub mod group;
pub mod msgs;
mod receiver;
pub mod sec;
mod sender;
pub mod sigma;
pub mod zkpok;

pub use error::{ReceiverError, SenderError};
pub use receiver::{state as receiver_state, Receiver};
pub use sender::{state as sender_state, Sender};

/// The id of a transfer.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TransferId(u64);

impl TransferId {
    pub(crate) fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the current id, incrementing the counter in-place.
    pub(crate) fn next(&mut self) -> Self {
        let id = *self;
        self.0 += 1;
        id
    }
}

impl Display for TransferId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "TransferId({})", self.0)
    }
}

/// The base elements fixed by preprocessing.
///
/// Immutable for the lifetime of a session: every transfer exponentiates
/// these same four elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessValues<E> {
    /// The group generator.
    pub g0: E,
    /// The second base, `g0^y`.
    pub g1: E,
    /// `g0^alpha0`.
    pub h0: E,
    /// `g1^(alpha0 + 1)`.
    pub h1: E,
}

/// The output of a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutput<T> {
    /// The id of the transfer.
    pub id: TransferId,
    /// The received value.
    pub value: T,
}

/// Derives a `len`-byte pad from a group element and a per-transfer tweak.
pub(crate) fn key_stream<E: Serialize>(
    key: &E,
    tweak: u128,
    len: usize,
) -> Result<Vec<u8>, bincode::Error> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&tweak.to_be_bytes());
    hasher.update(&bincode::serialize(key)?);

    let mut pad = vec![0u8; len];
    hasher.finalize_xof().fill(&mut pad);

    Ok(pad)
}
