use num_bigint::BigUint;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

use crate::{
    config::SenderConfig,
    error::SenderError,
    group::PrimeOrderGroup,
    key_stream,
    msgs::{
        Challenge, CommitmentKey, ReceiverQuery, ReceiverSetup, SenderAnswer, SenderAnswerBytes,
        SigmaCommitment, SigmaResponse,
    },
    sec::{Capability, MaliciousSecure, StandAloneSecure},
    sigma::{DhPair, DhStatement},
    zkpok, PreprocessValues, TransferId,
};

type Error = SenderError;
type Result<T, E = Error> = core::result::Result<T, E>;

/// A full-simulation OT sender.
///
/// Mirror image of the receiver: `setup` consumes the receiver's session
/// bases, `challenge`/`verify` run the verifier side of the binding ZKPOK,
/// and only a [`state::Setup`] sender can answer transfer queries.
#[derive(Debug)]
pub struct Sender<G: PrimeOrderGroup, T = state::Initialized> {
    group: G,
    config: SenderConfig,
    /// The current state of the protocol.
    state: T,
}

impl<G: PrimeOrderGroup> Sender<G> {
    /// Creates a new sender.
    ///
    /// Fails with a configuration error if the group is not DDH-hard, fails
    /// structural validation, or cannot accommodate the statistical
    /// parameter. No message is exchanged before these checks pass.
    pub fn new(config: SenderConfig, group: G) -> Result<Self> {
        Self::new_internal(config, group, ChaCha20Rng::from_entropy())
    }

    /// Creates a new sender with the provided RNG seed.
    ///
    /// # Arguments
    ///
    /// * `seed` - The RNG seed used to generate the sender's randomness.
    pub fn new_with_seed(config: SenderConfig, group: G, seed: [u8; 32]) -> Result<Self> {
        Self::new_internal(config, group, ChaCha20Rng::from_seed(seed))
    }

    fn new_internal(config: SenderConfig, group: G, rng: ChaCha20Rng) -> Result<Self> {
        if !group.capabilities().contains(Capability::DdhHard) {
            return Err(Error::UnsupportedGroup);
        }
        if !group.validate() {
            return Err(Error::InvalidGroup);
        }
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

    /// Consumes the receiver's setup message and starts verifying its ZKPOK,
    /// returning the commitment key to send back.
    pub fn setup(
        self,
        setup: ReceiverSetup<G::Element>,
    ) -> Result<(CommitmentKey<G::Element>, Sender<G, state::Verifying<G>>)> {
        let Self {
            group,
            config,
            state: state::Initialized { mut rng },
        } = self;

        let ReceiverSetup { g1, h0, h1 } = setup;
        if ![&g1, &h0, &h1].into_iter().all(|e| group.is_member(e)) {
            return Err(Error::Cheat("setup contains a non-member element"));
        }

        let g0 = group.generator();
        let values = PreprocessValues {
            g0: g0.clone(),
            g1: g1.clone(),
            h0: h0.clone(),
            h1: h1.clone(),
        };

        let statement = DhStatement::new(vec![
            DhPair { base: g0, image: h0 },
            DhPair {
                base: g1.clone(),
                image: group.multiply(&h1, &group.inverse(&g1)),
            },
        ]);
        let (key, verifier) = zkpok::Verifier::new(
            group.clone(),
            statement,
            config.statistical_security(),
            &mut rng,
        );

        Ok((
            key,
            Sender {
                group,
                config,
                state: state::Verifying {
                    rng,
                    verifier,
                    values,
                },
            },
        ))
    }
}

impl<G: PrimeOrderGroup> Sender<G, state::Verifying<G>> {
    /// Accepts the receiver's proof commitment and returns the challenge.
    pub fn challenge(
        &mut self,
        commitment: SigmaCommitment<G::Element>,
    ) -> Result<Challenge> {
        let state::Verifying { rng, verifier, .. } = &mut self.state;

        verifier.challenge(commitment, rng).map_err(Error::from)
    }

    /// Verifies the receiver's proof, completing preprocessing.
    pub fn verify(self, response: SigmaResponse<G::Element>) -> Result<Sender<G, state::Setup<G>>> {
        let Self {
            group,
            config,
            state:
                state::Verifying {
                    rng,
                    verifier,
                    values,
                },
        } = self;

        verifier.verify(response)?;

        Ok(Sender {
            group,
            config,
            state: state::Setup {
                rng,
                transfer_id: TransferId::default(),
                values,
            },
        })
    }
}

impl<G: PrimeOrderGroup> Sender<G, state::Setup<G>> {
    /// Answers a transfer query in the group-element variant.
    ///
    /// # Arguments
    ///
    /// * `query` - The receiver's query.
    /// * `msgs` - The two input values `[x0, x1]`.
    pub fn send(
        &mut self,
        query: ReceiverQuery<G::Element>,
        msgs: [G::Element; 2],
    ) -> Result<(TransferId, SenderAnswer<G::Element>)> {
        let [x0, x1] = msgs;
        if !self.group.is_member(&x0) || !self.group.is_member(&x1) {
            return Err(Error::InvalidInput("inputs must be group elements"));
        }

        let (query, id) = self.start_answer(query)?;
        let (u0, v0) = self.randomize(&query, false);
        let (u1, v1) = self.randomize(&query, true);

        Ok((
            id,
            SenderAnswer {
                u0,
                c0: self.group.multiply(&x0, &v0),
                u1,
                c1: self.group.multiply(&x1, &v1),
            },
        ))
    }

    /// Answers a transfer query in the byte-string variant.
    ///
    /// Both inputs must have the same length, otherwise the ciphertext
    /// lengths would leak which value was padded.
    pub fn send_bytes(
        &mut self,
        query: ReceiverQuery<G::Element>,
        msgs: [Vec<u8>; 2],
    ) -> Result<(TransferId, SenderAnswerBytes<G::Element>)> {
        let [x0, x1] = msgs;
        if x0.len() != x1.len() {
            return Err(Error::InvalidInput("inputs must have equal length"));
        }

        let (query, id) = self.start_answer(query)?;
        let (u0, v0) = self.randomize(&query, false);
        let (u1, v1) = self.randomize(&query, true);

        let tweak = id.as_u64() as u128;
        let pad0 = key_stream(&v0, tweak, x0.len())?;
        let pad1 = key_stream(&v1, tweak, x1.len())?;

        Ok((
            id,
            SenderAnswerBytes {
                u0,
                c0: x0.iter().zip(pad0).map(|(x, p)| x ^ p).collect(),
                u1,
                c1: x1.iter().zip(pad1).map(|(x, p)| x ^ p).collect(),
            },
        ))
    }

    fn start_answer(
        &mut self,
        query: ReceiverQuery<G::Element>,
    ) -> Result<(ReceiverQuery<G::Element>, TransferId)> {
        if !self.group.is_member(&query.g) || !self.group.is_member(&query.h) {
            return Err(Error::Cheat("query contains a non-member element"));
        }
        // The identity passes membership but collapses the randomization in
        // `randomize` to v = 1, leaking both inputs.
        let identity = self.group.identity();
        if query.g == identity || query.h == identity {
            return Err(Error::Cheat("query contains the identity element"));
        }

        Ok((query, self.state.transfer_id.next()))
    }

    /// The RAND randomization: `(u, v) = (g_i^s * h_i^t, g^s * h^t)` for
    /// fresh `s, t`. For the base pair matching the receiver's query
    /// `v = u^r`, for the other pair `v` is uniform given `u`.
    fn randomize(
        &mut self,
        query: &ReceiverQuery<G::Element>,
        second: bool,
    ) -> (G::Element, G::Element) {
        let state::Setup { rng, values, .. } = &mut self.state;

        let (gi, hi) = if second {
            (&values.g1, &values.h1)
        } else {
            (&values.g0, &values.h0)
        };

        let s: BigUint = self.group.random_scalar(rng);
        let t = self.group.random_scalar(rng);

        let u = self.group.multiply(
            &self.group.exponentiate(gi, &s),
            &self.group.exponentiate(hi, &t),
        );
        let v = self.group.multiply(
            &self.group.exponentiate(&query.g, &s),
            &self.group.exponentiate(&query.h, &t),
        );

        (u, v)
    }
}

impl<G: PrimeOrderGroup, T: state::State> MaliciousSecure for Sender<G, T> {}
impl<G: PrimeOrderGroup, T: state::State> StandAloneSecure for Sender<G, T> {}

/// The sender's state.
pub mod state {
    use std::fmt;

    use rand_chacha::ChaCha20Rng;

    use crate::{group::PrimeOrderGroup, zkpok, PreprocessValues, TransferId};

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl<G: crate::group::PrimeOrderGroup> Sealed for super::Verifying<G> {}
        impl<G: crate::group::PrimeOrderGroup> Sealed for super::Setup<G> {}
    }

    /// The sender's state.
    pub trait State: sealed::Sealed {}

    /// The sender's initial state.
    pub struct Initialized {
        /// RNG used to generate the sender's randomness.
        pub(super) rng: ChaCha20Rng,
    }

    impl State for Initialized {}

    impl fmt::Debug for Initialized {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Initialized").finish_non_exhaustive()
        }
    }

    /// The sender's state while it verifies the preprocessing ZKPOK.
    pub struct Verifying<G: PrimeOrderGroup> {
        /// RNG used to generate the sender's randomness.
        pub(super) rng: ChaCha20Rng,
        /// ZKPOK verifier for the receiver's proof.
        pub(super) verifier: zkpok::Verifier<G>,
        /// The artifact handed to the `Setup` state once the proof verifies.
        pub(super) values: PreprocessValues<G::Element>,
    }

    impl<G: PrimeOrderGroup> State for Verifying<G> {}

    impl<G: PrimeOrderGroup> fmt::Debug for Verifying<G> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Verifying").finish_non_exhaustive()
        }
    }

    /// The sender's state once preprocessing has completed.
    pub struct Setup<G: PrimeOrderGroup> {
        /// RNG used to generate the per-transfer randomness.
        pub(super) rng: ChaCha20Rng,
        /// Current transfer id.
        pub(super) transfer_id: TransferId,
        /// The preprocessing artifact, immutable for the session.
        pub(super) values: PreprocessValues<G::Element>,
    }

    impl<G: PrimeOrderGroup> State for Setup<G> {}

    impl<G: PrimeOrderGroup> fmt::Debug for Setup<G> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Setup")
                .field("transfer_id", &self.transfer_id)
                .finish_non_exhaustive()
        }
    }
}
