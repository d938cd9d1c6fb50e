//! Zero-knowledge proof of knowledge from a sigma protocol and a Pedersen
//! commitment.
//!
//! The prover commits to its sigma first message before the verifier reveals
//! the challenge, so a malicious verifier cannot bias the challenge on the
//! first message. Protocol:
//!
//! 1. Verifier sends a Pedersen commitment key.
//! 2. Prover sends a commitment to the sigma first message `a`.
//! 3. Verifier sends the challenge `e`.
//! 4. Prover decommits `a` and sends the sigma response `z`.
//! 5. Verifier checks the decommitment, then the sigma equations.
//!
//! A failed decommitment and a failed sigma check are the same outcome for
//! the caller: cheat detected, abort the session.

use num_bigint::BigUint;
use rand::{CryptoRng, Rng};

use crate::{
    commit,
    group::PrimeOrderGroup,
    msgs::{Challenge, CommitmentKey, SigmaCommitment, SigmaResponse},
    sigma::{self, DhStatement, SigmaError},
};

/// Errors that can occur on the prover side.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ProverError {
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("cheat detected: {0}")]
    Cheat(&'static str),
    #[error("sigma protocol error: {0}")]
    Sigma(#[from] SigmaError),
    #[error("message encoding failed: {0}")]
    Encode(#[from] bincode::Error),
}

/// Errors that can occur on the verifier side.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum VerifierError {
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("cheat detected: {0}")]
    Cheat(&'static str),
    #[error("message encoding failed: {0}")]
    Encode(#[from] bincode::Error),
}

/// Maps a sigma first message to the committed scalar, `H(a) mod q` with a
/// 64-byte blake3 output so the reduction is statistically uniform.
fn bind_first_message<G: PrimeOrderGroup>(
    group: &G,
    first_message: &[G::Element],
) -> Result<BigUint, bincode::Error> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&bincode::serialize(first_message)?);

    let mut wide = [0u8; 64];
    hasher.finalize_xof().fill(&mut wide);

    Ok(BigUint::from_bytes_le(&wide) % group.order())
}

#[derive(Debug)]
struct Committed<E> {
    first_message: Vec<E>,
    blinding: BigUint,
}

/// ZKPOK prover.
#[derive(Debug)]
pub struct Prover<G: PrimeOrderGroup> {
    group: G,
    sigma: sigma::Prover<G>,
    committed: Option<Committed<G::Element>>,
}

impl<G: PrimeOrderGroup> Prover<G> {
    /// Creates a new prover.
    pub fn new(group: G, statement: DhStatement<G::Element>, witness: BigUint, t: usize) -> Self {
        Self {
            sigma: sigma::Prover::new(group.clone(), statement, witness, t),
            group,
            committed: None,
        }
    }

    /// Commits to a fresh sigma first message under the verifier's key.
    pub fn commit<R: Rng + CryptoRng + ?Sized>(
        &mut self,
        key: &CommitmentKey<G::Element>,
        rng: &mut R,
    ) -> Result<SigmaCommitment<G::Element>, ProverError> {
        if !self.group.is_member(&key.key) {
            return Err(ProverError::Cheat("commitment key is not a group element"));
        }

        let first_message = self.sigma.commit(rng);
        let bound = bind_first_message(&self.group, &first_message)?;
        let (commitment, blinding) = commit::commit(&self.group, &key.key, &bound, rng);

        self.committed = Some(Committed {
            first_message,
            blinding,
        });

        Ok(SigmaCommitment { commitment })
    }

    /// Answers the challenge, decommitting the first message.
    pub fn prove(
        mut self,
        challenge: &Challenge,
    ) -> Result<SigmaResponse<G::Element>, ProverError> {
        let Committed {
            first_message,
            blinding,
        } = self
            .committed
            .take()
            .ok_or(ProverError::InvalidState("nothing committed"))?;

        let z = self.sigma.respond(&challenge.value)?;

        Ok(SigmaResponse {
            first_message,
            opening: blinding,
            z,
        })
    }
}

/// ZKPOK verifier.
#[derive(Debug)]
pub struct Verifier<G: PrimeOrderGroup> {
    group: G,
    sigma: sigma::Verifier<G>,
    key: G::Element,
    commitment: Option<G::Element>,
    challenge: Option<BigUint>,
}

impl<G: PrimeOrderGroup> Verifier<G> {
    /// Creates a new verifier, returning the commitment key to send to the
    /// prover.
    pub fn new<R: Rng + CryptoRng + ?Sized>(
        group: G,
        statement: DhStatement<G::Element>,
        t: usize,
        rng: &mut R,
    ) -> (CommitmentKey<G::Element>, Self) {
        // The trapdoor is only of use to a simulator, discard it.
        let (_trapdoor, key) = commit::generate_key(&group, rng);

        (
            CommitmentKey { key: key.clone() },
            Self {
                sigma: sigma::Verifier::new(group.clone(), statement, t),
                group,
                key,
                commitment: None,
                challenge: None,
            },
        )
    }

    /// Accepts the prover's commitment and samples the challenge.
    pub fn challenge<R: Rng + CryptoRng + ?Sized>(
        &mut self,
        commitment: SigmaCommitment<G::Element>,
        rng: &mut R,
    ) -> Result<Challenge, VerifierError> {
        if self.commitment.is_some() {
            return Err(VerifierError::InvalidState("already challenged"));
        }
        if !self.group.is_member(&commitment.commitment) {
            return Err(VerifierError::Cheat("commitment is not a group element"));
        }

        let e = self.sigma.challenge(rng);

        self.commitment = Some(commitment.commitment);
        self.challenge = Some(e.clone());

        Ok(Challenge { value: e })
    }

    /// Verifies the response against the earlier commitment and challenge.
    pub fn verify(self, response: SigmaResponse<G::Element>) -> Result<(), VerifierError> {
        let commitment = self
            .commitment
            .ok_or(VerifierError::InvalidState("no commitment received"))?;
        let challenge = self
            .challenge
            .ok_or(VerifierError::InvalidState("no challenge sent"))?;

        let bound = bind_first_message(&self.group, &response.first_message)?;
        if !commit::open_valid(&self.group, &self.key, &commitment, &bound, &response.opening) {
            return Err(VerifierError::Cheat("decommitment failed"));
        }

        self.sigma
            .verify(&response.first_message, &challenge, &response.z)
            .map_err(|_| VerifierError::Cheat("sigma verification failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        group::ModPGroup,
        sigma::DhPair,
    };

    use num_bigint::RandBigInt;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn group() -> ModPGroup {
        ModPGroup::new(
            BigUint::from(2039u32),
            BigUint::from(1019u32),
            BigUint::from(2u32),
        )
    }

    fn statement(group: &ModPGroup, witness: &BigUint) -> DhStatement<BigUint> {
        let g0 = group.generator();
        let g1 = group.exponentiate(&g0, &BigUint::from(5u32));

        DhStatement::new(vec![
            DhPair {
                base: g0.clone(),
                image: group.exponentiate(&g0, witness),
            },
            DhPair {
                base: g1.clone(),
                image: group.exponentiate(&g1, witness),
            },
        ])
    }

    #[test]
    fn test_zkpok_pass() {
        let group = group();
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        let witness = BigUint::from(321u32);
        let statement = statement(&group, &witness);

        let mut prover = Prover::new(group.clone(), statement.clone(), witness, 8);
        let (key, mut verifier) = Verifier::new(group, statement, 8, &mut rng);

        let commitment = prover.commit(&key, &mut rng).unwrap();
        let challenge = verifier.challenge(commitment, &mut rng).unwrap();
        let response = prover.prove(&challenge).unwrap();

        verifier.verify(response).unwrap();
    }

    #[test]
    fn test_zkpok_tampered_decommitment_fails() {
        let group = group();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let witness = BigUint::from(321u32);
        let statement = statement(&group, &witness);

        let mut prover = Prover::new(group.clone(), statement.clone(), witness, 8);
        let (key, mut verifier) = Verifier::new(group, statement, 8, &mut rng);

        let commitment = prover.commit(&key, &mut rng).unwrap();
        let challenge = verifier.challenge(commitment, &mut rng).unwrap();
        let mut response = prover.prove(&challenge).unwrap();

        response.opening += BigUint::from(1u32);

        assert!(matches!(
            verifier.verify(response),
            Err(VerifierError::Cheat(_))
        ));
    }

    /// A prover without the witness can only win by guessing the challenge,
    /// which succeeds with probability `2^-t`.
    #[test]
    fn test_zkpok_soundness_boundary() {
        let group = group();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let t = 8;
        let witness = BigUint::from(321u32);
        let statement = statement(&group, &witness);

        let trials = 4096;
        let mut accepted = 0;
        for _ in 0..trials {
            let (key, mut verifier) =
                Verifier::new(group.clone(), statement.clone(), t, &mut rng);

            // Guess the challenge, pick z freely and solve for the first
            // message: a_i = base_i^z * image_i^(-e).
            let guess = rng.gen_biguint(t as u64);
            let z = group.random_scalar(&mut rng);
            let first_message: Vec<BigUint> = statement
                .pairs()
                .iter()
                .map(|pair| {
                    group.multiply(
                        &group.exponentiate(&pair.base, &z),
                        &group.inverse(&group.exponentiate(&pair.image, &guess)),
                    )
                })
                .collect();

            let bound = bind_first_message(&group, &first_message).unwrap();
            let (commitment, blinding) = commit::commit(&group, &key.key, &bound, &mut rng);

            let challenge = verifier
                .challenge(SigmaCommitment { commitment }, &mut rng)
                .unwrap();
            let response = SigmaResponse {
                first_message,
                opening: blinding,
                z: z.clone(),
            };

            if verifier.verify(response).is_ok() {
                assert_eq!(challenge.value, guess);
                accepted += 1;
            }
        }

        // Mean is trials / 2^t = 16.
        assert!(
            (4..=40).contains(&accepted),
            "acceptance rate {accepted}/{trials} is far from 2^-{t}"
        );
    }
}
