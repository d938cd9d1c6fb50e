//! Sigma protocol for knowledge of a shared discrete logarithm.
//!
//! Proves knowledge of `w` such that `image = base^w` for every pair of a
//! statement, in three moves: the prover commits `a_i = base_i^r`, the
//! verifier challenges with `e <- [0, 2^t)`, the prover responds
//! `z = r + e * w mod q`, and the verifier accepts iff
//! `base_i^z == a_i * image_i^e` for every pair. A single pair is the plain
//! discrete-log proof; two pairs with a shared witness prove a
//! Diffie-Hellman tuple. Soundness error is `2^-t`.

use num_bigint::{BigUint, RandBigInt};
use rand::{CryptoRng, Rng};

use crate::group::PrimeOrderGroup;

/// A `(base, image)` pair of a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DhPair<E> {
    /// The base element.
    pub base: E,
    /// The claimed power of the base.
    pub image: E,
}

/// The statement being proven: `image = base^w` for every pair, with one
/// shared witness `w`.
#[derive(Debug, Clone, PartialEq)]
pub struct DhStatement<E> {
    pairs: Vec<DhPair<E>>,
}

impl<E> DhStatement<E> {
    /// Creates a new statement.
    pub fn new(pairs: Vec<DhPair<E>>) -> Self {
        Self { pairs }
    }

    /// Returns the statement pairs.
    pub fn pairs(&self) -> &[DhPair<E>] {
        &self.pairs
    }
}

/// Errors that can occur during a sigma-protocol exchange.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SigmaError {
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("challenge is out of range")]
    InvalidChallenge,
    #[error("proof rejected: {0}")]
    Rejected(&'static str),
}

/// Sigma-protocol prover.
#[derive(Debug)]
pub struct Prover<G: PrimeOrderGroup> {
    group: G,
    statement: DhStatement<G::Element>,
    witness: BigUint,
    /// Statistical parameter bounding the challenge.
    t: usize,
    r: Option<BigUint>,
}

impl<G: PrimeOrderGroup> Prover<G> {
    /// Creates a new prover.
    ///
    /// # Arguments
    ///
    /// * `group` - The group of the statement.
    /// * `statement` - The statement to prove.
    /// * `witness` - The shared discrete logarithm.
    /// * `t` - The statistical security parameter.
    pub fn new(group: G, statement: DhStatement<G::Element>, witness: BigUint, t: usize) -> Self {
        Self {
            group,
            statement,
            witness,
            t,
            r: None,
        }
    }

    /// Computes the first message `a_i = base_i^r` with fresh randomness.
    pub fn commit<R: Rng + CryptoRng + ?Sized>(&mut self, rng: &mut R) -> Vec<G::Element> {
        let r = self.group.random_scalar(rng);
        let first_message = self
            .statement
            .pairs()
            .iter()
            .map(|pair| self.group.exponentiate(&pair.base, &r))
            .collect();

        self.r = Some(r);
        first_message
    }

    /// Computes the response `z = r + e * w mod q`.
    ///
    /// The committed randomness is single-use and cleared here; responding
    /// again requires a fresh [`commit`](Self::commit).
    pub fn respond(&mut self, challenge: &BigUint) -> Result<BigUint, SigmaError> {
        if challenge.bits() > self.t as u64 {
            return Err(SigmaError::InvalidChallenge);
        }

        let r = self
            .r
            .take()
            .ok_or(SigmaError::InvalidState("no first message committed"))?;

        Ok((r + challenge * &self.witness) % self.group.order())
    }
}

/// Sigma-protocol verifier.
#[derive(Debug)]
pub struct Verifier<G: PrimeOrderGroup> {
    group: G,
    statement: DhStatement<G::Element>,
    t: usize,
}

impl<G: PrimeOrderGroup> Verifier<G> {
    /// Creates a new verifier.
    pub fn new(group: G, statement: DhStatement<G::Element>, t: usize) -> Self {
        Self { group, statement, t }
    }

    /// Samples a challenge `e <- [0, 2^t)`.
    pub fn challenge<R: Rng + CryptoRng + ?Sized>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint(self.t as u64)
    }

    /// Verifies a transcript `(a, e, z)`.
    ///
    /// Malformed or out-of-range fields reject, they never panic.
    pub fn verify(
        &self,
        first_message: &[G::Element],
        challenge: &BigUint,
        z: &BigUint,
    ) -> Result<(), SigmaError> {
        if first_message.len() != self.statement.pairs().len() {
            return Err(SigmaError::Rejected("first message has wrong arity"));
        }
        if challenge.bits() > self.t as u64 {
            return Err(SigmaError::InvalidChallenge);
        }
        if z >= self.group.order() {
            return Err(SigmaError::Rejected("response is out of range"));
        }

        for (pair, a) in self.statement.pairs().iter().zip(first_message) {
            if !self.group.is_member(a) {
                return Err(SigmaError::Rejected("first message is not in the group"));
            }

            let lhs = self.group.exponentiate(&pair.base, z);
            let rhs = self
                .group
                .multiply(a, &self.group.exponentiate(&pair.image, challenge));

            if lhs != rhs {
                return Err(SigmaError::Rejected("verification equation failed"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::ModPGroup;

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
        let g = group.generator();
        DhStatement::new(vec![DhPair {
            base: g.clone(),
            image: group.exponentiate(&g, witness),
        }])
    }

    #[test]
    fn test_sigma_pass() {
        let group = group();
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        let witness = BigUint::from(123u32);
        let statement = statement(&group, &witness);

        let mut prover = Prover::new(group.clone(), statement.clone(), witness, 8);
        let verifier = Verifier::new(group, statement, 8);

        let a = prover.commit(&mut rng);
        let e = verifier.challenge(&mut rng);
        let z = prover.respond(&e).unwrap();

        verifier.verify(&a, &e, &z).unwrap();
    }

    #[test]
    fn test_sigma_wrong_witness_fails() {
        let group = group();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let statement = statement(&group, &BigUint::from(123u32));

        // Prover claims a different witness.
        let mut prover = Prover::new(
            group.clone(),
            statement.clone(),
            BigUint::from(124u32),
            8,
        );
        let verifier = Verifier::new(group, statement, 8);

        let a = prover.commit(&mut rng);
        let e = BigUint::from(7u32);
        let z = prover.respond(&e).unwrap();

        assert!(verifier.verify(&a, &e, &z).is_err());
    }

    #[test]
    fn test_sigma_randomness_single_use() {
        let group = group();
        let mut rng = ChaCha20Rng::seed_from_u64(2);

        let witness = BigUint::from(55u32);
        let statement = statement(&group, &witness);
        let mut prover = Prover::new(group, statement, witness, 8);

        prover.commit(&mut rng);
        let e = BigUint::from(3u32);

        prover.respond(&e).unwrap();
        assert!(matches!(
            prover.respond(&e),
            Err(SigmaError::InvalidState(_))
        ));
    }

    #[test]
    fn test_sigma_challenge_out_of_range() {
        let group = group();
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        let witness = BigUint::from(9u32);
        let statement = statement(&group, &witness);

        let mut prover = Prover::new(group.clone(), statement.clone(), witness, 8);
        let verifier = Verifier::new(group, statement, 8);

        let a = prover.commit(&mut rng);
        let e = BigUint::from(256u32);

        assert!(matches!(
            prover.respond(&e),
            Err(SigmaError::InvalidChallenge)
        ));
        assert!(verifier
            .verify(&a, &e, &BigUint::from(1u32))
            .is_err());
    }
}
