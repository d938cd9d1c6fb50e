//! Pedersen commitment over the protocol group.
//!
//! Commits to a scalar `m` as `com = g^m * key^rho` for a uniform blinding
//! `rho`. The key is supplied by the party receiving the commitment, who is
//! the only one allowed to know its discrete log; the commitment is then
//! perfectly hiding for the committer and computationally binding under the
//! discrete-log assumption.

use num_bigint::BigUint;
use rand::{CryptoRng, Rng};

use crate::group::PrimeOrderGroup;

/// Generates a commitment key `g^tau`, returning the trapdoor `tau` and the
/// key.
pub fn generate_key<G: PrimeOrderGroup, R: Rng + CryptoRng + ?Sized>(
    group: &G,
    rng: &mut R,
) -> (BigUint, G::Element) {
    let trapdoor = group.random_scalar(rng);
    let key = group.exponentiate(&group.generator(), &trapdoor);

    (trapdoor, key)
}

/// Commits to `value`, returning the commitment and the blinding factor.
pub fn commit<G: PrimeOrderGroup, R: Rng + CryptoRng + ?Sized>(
    group: &G,
    key: &G::Element,
    value: &BigUint,
    rng: &mut R,
) -> (G::Element, BigUint) {
    let blinding = group.random_scalar(rng);
    let commitment = group.multiply(
        &group.exponentiate(&group.generator(), value),
        &group.exponentiate(key, &blinding),
    );

    (commitment, blinding)
}

/// Checks an opening of `commitment` to `value` under `blinding`.
pub fn open_valid<G: PrimeOrderGroup>(
    group: &G,
    key: &G::Element,
    commitment: &G::Element,
    value: &BigUint,
    blinding: &BigUint,
) -> bool {
    let expected = group.multiply(
        &group.exponentiate(&group.generator(), value),
        &group.exponentiate(key, blinding),
    );

    *commitment == expected
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

    #[test]
    fn test_commit_open() {
        let group = group();
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        let (_, key) = generate_key(&group, &mut rng);
        let value = BigUint::from(77u32);
        let (com, blinding) = commit(&group, &key, &value, &mut rng);

        assert!(open_valid(&group, &key, &com, &value, &blinding));
    }

    #[test]
    fn test_wrong_opening_fails() {
        let group = group();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let (_, key) = generate_key(&group, &mut rng);
        let value = BigUint::from(77u32);
        let (com, blinding) = commit(&group, &key, &value, &mut rng);

        assert!(!open_valid(
            &group,
            &key,
            &com,
            &BigUint::from(78u32),
            &blinding
        ));
        assert!(!open_valid(
            &group,
            &key,
            &com,
            &value,
            &(blinding + BigUint::from(1u32))
        ));
    }
}
