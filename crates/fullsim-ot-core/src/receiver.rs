use num_bigint::{BigUint, RandBigInt};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

use crate::{
    config::ReceiverConfig,
    error::ReceiverError,
    group::PrimeOrderGroup,
    key_stream,
    msgs::{
        Challenge, CommitmentKey, ReceiverQuery, ReceiverSetup, SenderAnswer, SenderAnswerBytes,
        SigmaCommitment, SigmaResponse,
    },
    sec::{Capability, MaliciousSecure, StandAloneSecure},
    sigma::{DhPair, DhStatement},
    zkpok, PreprocessValues, TransferId, TransferOutput,
};

type Error = ReceiverError;
type Result<T, E = Error> = core::result::Result<T, E>;

/// A full-simulation OT receiver.
///
/// Preprocessing is a one-shot state transition: `setup` fixes the session
/// bases, `commit`/`prove` run the binding ZKPOK, and only the resulting
/// [`state::Setup`] receiver can transfer. A receiver that needs fresh
/// preprocessing is reconstructed, never mutated back.
#[derive(Debug)]
pub struct Receiver<G: PrimeOrderGroup, T = state::Initialized> {
    group: G,
    config: ReceiverConfig,
    /// The current state of the protocol.
    state: T,
}

impl<G: PrimeOrderGroup> Receiver<G> {
    /// Creates a new receiver.
    ///
    /// Fails with a configuration error if the group is not DDH-hard, fails
    /// structural validation, or cannot accommodate the statistical
    /// parameter. No message is exchanged before these checks pass.
    pub fn new(config: ReceiverConfig, group: G) -> Result<Self> {
        Self::new_internal(config, group, ChaCha20Rng::from_entropy())
    }

    /// Creates a new receiver with the provided RNG seed.
    ///
    /// # Arguments
    ///
    /// * `seed` - The RNG seed used to generate the receiver's randomness.
    pub fn new_with_seed(config: ReceiverConfig, group: G, seed: [u8; 32]) -> Result<Self> {
        Self::new_internal(config, group, ChaCha20Rng::from_seed(seed))
    }

    fn new_internal(config: ReceiverConfig, group: G, rng: ChaCha20Rng) -> Result<Self> {
        if !group.capabilities().contains(Capability::DdhHard) {
            return Err(Error::UnsupportedGroup);
        }
        if !group.validate() {
            return Err(Error::InvalidGroup);
        }
        // 2^t < q, otherwise the challenge space wraps and soundness breaks.
        if config.statistical_security() as u64 >= group.order().bits() {
            return Err(Error::InvalidParameter(
                "statistical parameter too large for the group order",
            ));
        }

        Ok(Self {
            group,
            config,
            state: state::Initialized { rng },
        })
    }

    /// Starts preprocessing.
    ///
    /// Fixes the session bases `(g0, h0)` and `(g1, h1)` and returns the
    /// setup message to send to the sender, together with the receiver ready
    /// to prove knowledge of `alpha0`.
    pub fn setup(self) -> (ReceiverSetup<G::Element>, Receiver<G, state::Proving<G>>) {
        let Self {
            group,
            config,
            state: state::Initialized { mut rng },
        } = self;

        let g0 = group.generator();
        // y and alpha0 must keep the bases away from the identity: the
        // sender rejects degenerate queries, and alpha1 = alpha0 + 1 must
        // not wrap to zero mod q.
        let one = BigUint::from(1u32);
        let y = group.random_nonzero_scalar(&mut rng);
        let alpha0 = rng.gen_biguint_range(&one, &(group.order() - &one));
        let alpha1 = &alpha0 + 1u32;

        let g1 = group.exponentiate(&g0, &y);
        let h0 = group.exponentiate(&g0, &alpha0);
        let h1 = group.exponentiate(&g1, &alpha1);

        let values = PreprocessValues {
            g0: g0.clone(),
            g1: g1.clone(),
            h0: h0.clone(),
            h1: h1.clone(),
        };

        // alpha1 = alpha0 + 1, so h1 / g1 = g1^alpha0 and the tuple
        // (g0, h0, g1, h1/g1) shares the witness alpha0.
        let statement = DhStatement::new(vec![
            DhPair {
                base: g0,
                image: h0.clone(),
            },
            DhPair {
                base: g1.clone(),
                image: group.multiply(&h1, &group.inverse(&g1)),
            },
        ]);
        let prover = zkpok::Prover::new(
            group.clone(),
            statement,
            alpha0,
            config.statistical_security(),
        );

        (
            ReceiverSetup { g1, h0, h1 },
            Receiver {
                group,
                config,
                state: state::Proving {
                    rng,
                    prover,
                    values,
                },
            },
        )
    }
}

impl<G: PrimeOrderGroup> Receiver<G, state::Proving<G>> {
    /// Commits to the ZKPOK first message under the sender's commitment key.
    pub fn commit(
        &mut self,
        key: CommitmentKey<G::Element>,
    ) -> Result<SigmaCommitment<G::Element>> {
        let state::Proving { rng, prover, .. } = &mut self.state;

        prover.commit(&key, rng).map_err(Error::from)
    }

    /// Answers the sender's challenge, completing preprocessing.
    pub fn prove(
        self,
        challenge: Challenge,
    ) -> Result<(SigmaResponse<G::Element>, Receiver<G, state::Setup<G>>)> {
        let Self {
            group,
            config,
            state:
                state::Proving {
                    rng,
                    prover,
                    values,
                },
        } = self;

        let response = prover.prove(&challenge)?;

        Ok((
            response,
            Receiver {
                group,
                config,
                state: state::Setup {
                    rng,
                    transfer_id: TransferId::default(),
                    values,
                    pending: None,
                },
            },
        ))
    }
}

impl<G: PrimeOrderGroup> Receiver<G, state::Setup<G>> {
    /// Returns the preprocessing artifact.
    pub fn preprocess_values(&self) -> &PreprocessValues<G::Element> {
        &self.state.values
    }

    /// Starts a transfer, returning the query to send to the sender.
    ///
    /// Replaces any pending transfer: an interrupted exchange is abandoned
    /// and retried with fresh randomness, never resumed.
    ///
    /// # Arguments
    ///
    /// * `choice` - The selection bit.
    pub fn choose(&mut self, choice: bool) -> ReceiverQuery<G::Element> {
        let state::Setup {
            rng,
            values,
            pending,
            ..
        } = &mut self.state;

        // r = 0 would send the identity pair, which the sender rejects.
        let r = self.group.random_nonzero_scalar(rng);
        let (g, h) = if choice {
            (&values.g1, &values.h1)
        } else {
            (&values.g0, &values.h0)
        };

        let query = ReceiverQuery {
            g: self.group.exponentiate(g, &r),
            h: self.group.exponentiate(h, &r),
        };

        *pending = Some(state::Pending { choice, r });

        query
    }

    /// Completes a transfer in the group-element variant, recovering
    /// `x_sigma = c_sigma * u_sigma^(-r)`.
    ///
    /// The transfer id advances even when the answer is rejected, keeping
    /// the counters of both parties aligned.
    pub fn receive(
        &mut self,
        answer: SenderAnswer<G::Element>,
    ) -> Result<TransferOutput<G::Element>> {
        let state::Setup {
            transfer_id,
            pending,
            ..
        } = &mut self.state;

        let state::Pending { choice, r } = pending
            .take()
            .ok_or(Error::InvalidState("no transfer in progress"))?;
        let id = transfer_id.next();

        let SenderAnswer { u0, c0, u1, c1 } = answer;
        if ![&u0, &c0, &u1, &c1]
            .into_iter()
            .all(|e| self.group.is_member(e))
        {
            return Err(Error::Cheat("answer contains a non-member element"));
        }

        let (u, c) = if choice { (u1, c1) } else { (u0, c0) };
        let minus_r = (self.group.order() - &r) % self.group.order();
        let value = self
            .group
            .multiply(&c, &self.group.exponentiate(&u, &minus_r));

        Ok(TransferOutput { id, value })
    }

    /// Completes a transfer in the byte-string variant, recovering
    /// `x_sigma = c_sigma ^ KDF(u_sigma^r)`.
    ///
    /// The transfer id advances even when the answer is rejected. The id is
    /// the KDF tweak, so a rejected answer must consume it on both sides or
    /// every later pad would silently diverge.
    pub fn receive_bytes(
        &mut self,
        answer: SenderAnswerBytes<G::Element>,
    ) -> Result<TransferOutput<Vec<u8>>> {
        let state::Setup {
            transfer_id,
            pending,
            ..
        } = &mut self.state;

        let state::Pending { choice, r } = pending
            .take()
            .ok_or(Error::InvalidState("no transfer in progress"))?;
        let id = transfer_id.next();

        let SenderAnswerBytes { u0, c0, u1, c1 } = answer;
        if !self.group.is_member(&u0) || !self.group.is_member(&u1) {
            return Err(Error::Cheat("answer contains a non-member element"));
        }

        let (u, c) = if choice { (u1, c1) } else { (u0, c0) };

        let key = self.group.exponentiate(&u, &r);
        let pad = key_stream(&key, id.as_u64() as u128, c.len())?;
        let value = c.iter().zip(pad).map(|(c, p)| c ^ p).collect();

        Ok(TransferOutput { id, value })
    }
}

impl<G: PrimeOrderGroup, T: state::State> MaliciousSecure for Receiver<G, T> {}
impl<G: PrimeOrderGroup, T: state::State> StandAloneSecure for Receiver<G, T> {}

/// The receiver's state.
pub mod state {
    use std::fmt;

    use num_bigint::BigUint;
    use rand_chacha::ChaCha20Rng;

    use crate::{group::PrimeOrderGroup, zkpok, PreprocessValues, TransferId};

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl<G: crate::group::PrimeOrderGroup> Sealed for super::Proving<G> {}
        impl<G: crate::group::PrimeOrderGroup> Sealed for super::Setup<G> {}
    }

    /// The receiver's state.
    pub trait State: sealed::Sealed {}

    /// The receiver's initial state.
    pub struct Initialized {
        /// RNG used to generate the receiver's randomness.
        pub(super) rng: ChaCha20Rng,
    }

    impl State for Initialized {}

    impl fmt::Debug for Initialized {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Initialized").finish_non_exhaustive()
        }
    }

    /// The receiver's state while the preprocessing ZKPOK is in progress.
    pub struct Proving<G: PrimeOrderGroup> {
        /// RNG used to generate the receiver's randomness.
        pub(super) rng: ChaCha20Rng,
        /// ZKPOK prover for the witness `alpha0`.
        pub(super) prover: zkpok::Prover<G>,
        /// The artifact handed to the `Setup` state once the proof completes.
        pub(super) values: PreprocessValues<G::Element>,
    }

    impl<G: PrimeOrderGroup> State for Proving<G> {}

    impl<G: PrimeOrderGroup> fmt::Debug for Proving<G> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Proving").finish_non_exhaustive()
        }
    }

    /// The receiver's state once preprocessing has completed.
    pub struct Setup<G: PrimeOrderGroup> {
        /// RNG used to generate the per-transfer randomness.
        pub(super) rng: ChaCha20Rng,
        /// Current transfer id.
        pub(super) transfer_id: TransferId,
        /// The preprocessing artifact, immutable for the session.
        pub(super) values: PreprocessValues<G::Element>,
        /// The transfer currently awaiting the sender's answer.
        pub(super) pending: Option<Pending>,
    }

    impl<G: PrimeOrderGroup> State for Setup<G> {}

    impl<G: PrimeOrderGroup> fmt::Debug for Setup<G> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Setup")
                .field("transfer_id", &self.transfer_id)
                .finish_non_exhaustive()
        }
    }

    pub(super) struct Pending {
        pub(super) choice: bool,
        pub(super) r: BigUint,
    }
}
