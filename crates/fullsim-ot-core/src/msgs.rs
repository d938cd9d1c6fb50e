//! Message types.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Receiver preprocessing message carrying the session base elements.
///
/// Together with the group generator `g0` these fix the base pairs
/// `(g0, h0)` and `(g1, h1)` used by every transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverSetup<E> {
    /// The second base, `g0^y`.
    pub g1: E,
    /// `g0^alpha0`.
    pub h0: E,
    /// `g1^(alpha0 + 1)`.
    pub h1: E,
}

/// Pedersen commitment key, sent by the proof verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitmentKey<E> {
    /// The key element. The committer must not know its discrete log.
    pub key: E,
}

/// Commitment to the prover's sigma-protocol first message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigmaCommitment<E> {
    /// The opaque commitment value.
    pub commitment: E,
}

/// Sigma-protocol challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    /// A scalar in `[0, 2^t)` for statistical parameter `t`.
    pub value: BigUint,
}

/// Sigma-protocol response together with the decommitment of the first
/// message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigmaResponse<E> {
    /// The decommitted first message, one element per statement pair.
    pub first_message: Vec<E>,
    /// The commitment blinding factor.
    pub opening: BigUint,
    /// The response scalar `z = r + e * w mod q`.
    pub z: BigUint,
}

/// Receiver's per-transfer query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverQuery<E> {
    /// `g_sigma^r`.
    pub g: E,
    /// `h_sigma^r`.
    pub h: E,
}

/// Sender's answer for the group-element variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderAnswer<E> {
    /// Randomizer for the first value.
    pub u0: E,
    /// Ciphertext of the first value.
    pub c0: E,
    /// Randomizer for the second value.
    pub u1: E,
    /// Ciphertext of the second value.
    pub c1: E,
}

/// Sender's answer for the byte-string variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderAnswerBytes<E> {
    /// Randomizer for the first value.
    pub u0: E,
    /// Ciphertext of the first value.
    pub c0: Vec<u8>,
    /// Randomizer for the second value.
    pub u1: E,
    /// Ciphertext of the second value.
    pub c1: Vec<u8>,
}
