use num_bigint::BigUint;

use crate::{
    group::PrimeOrderGroup,
    sec::{Capability, CapabilitySet},
};

/// The subgroup of quadratic residues modulo a safe prime `p = 2q + 1`.
///
/// Elements are residues in `[1, p)` of order dividing `q`. With a safe
/// prime and a quadratic-residue generator the subgroup has prime order `q`
/// and DDH is assumed hard, so [`ModPGroup::new`] tags the group
/// [`Capability::DdhHard`]. [`ModPGroup::new_untagged`] builds the same
/// structure without the tag, for groups whose parameters do not justify the
/// assumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModPGroup {
    p: BigUint,
    q: BigUint,
    g: BigUint,
    caps: CapabilitySet,
}

impl ModPGroup {
    /// Creates a new group tagged DDH-hard.
    ///
    /// # Arguments
    ///
    /// * `p` - The safe prime modulus.
    /// * `q` - The subgroup order, `(p - 1) / 2`.
    /// * `g` - A generator of the order-`q` subgroup.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Self {
        Self {
            p,
            q,
            g,
            caps: CapabilitySet::EMPTY.with(Capability::DdhHard),
        }
    }

    /// Creates a new group with an empty capability set.
    pub fn new_untagged(p: BigUint, q: BigUint, g: BigUint) -> Self {
        Self {
            p,
            q,
            g,
            caps: CapabilitySet::EMPTY,
        }
    }
}

impl PrimeOrderGroup for ModPGroup {
    type Element = BigUint;

    fn capabilities(&self) -> CapabilitySet {
        self.caps
    }

    fn validate(&self) -> bool {
        let one = BigUint::from(1u32);
        let two = BigUint::from(2u32);

        self.g > one
            && self.g < self.p
            && self.p == &two * &self.q + &one
            && is_prime(&self.p)
            && is_prime(&self.q)
            && self.g.modpow(&self.q, &self.p) == one
    }

    fn order(&self) -> &BigUint {
        &self.q
    }

    fn generator(&self) -> BigUint {
        self.g.clone()
    }

    fn identity(&self) -> BigUint {
        BigUint::from(1u32)
    }

    fn is_member(&self, element: &BigUint) -> bool {
        let zero = BigUint::from(0u32);
        let one = BigUint::from(1u32);

        *element != zero && *element < self.p && element.modpow(&self.q, &self.p) == one
    }

    fn multiply(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    fn exponentiate(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        base.modpow(exponent, &self.p)
    }

    fn inverse(&self, element: &BigUint) -> BigUint {
        // Fermat: a^(p-2) = a^-1 mod p.
        let exp = &self.p - BigUint::from(2u32);
        element.modpow(&exp, &self.p)
    }
}

const SMALL_PRIMES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Miller-Rabin primality test over the fixed base set, deterministic for
/// all inputs below 3.3 * 10^24.
fn is_prime(n: &BigUint) -> bool {
    let zero = BigUint::from(0u32);
    let one = BigUint::from(1u32);

    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if n % &p == zero {
            return false;
        }
    }
    if *n < BigUint::from(2u32) {
        return false;
    }

    // n - 1 = d * 2^s with d odd.
    let n_minus_one = n - &one;
    let s = n_minus_one
        .trailing_zeros()
        .unwrap_or_default();
    let d = &n_minus_one >> s;

    'witness: for a in SMALL_PRIMES {
        let a = BigUint::from(a);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&BigUint::from(2u32), n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_group() -> ModPGroup {
        ModPGroup::new(
            BigUint::from(47u32),
            BigUint::from(23u32),
            BigUint::from(2u32),
        )
    }

    #[test]
    fn test_validate() {
        assert!(small_group().validate());

        // 45 = 2 * 22 + 1 but neither factor is prime.
        let bad = ModPGroup::new(
            BigUint::from(45u32),
            BigUint::from(22u32),
            BigUint::from(2u32),
        );
        assert!(!bad.validate());
    }

    #[test]
    fn test_membership() {
        let group = small_group();

        // Powers of the generator are members.
        let mut x = group.generator();
        for _ in 0..23 {
            assert!(group.is_member(&x));
            x = group.multiply(&x, &group.generator());
        }

        // -1 is not a quadratic residue mod 47.
        assert!(!group.is_member(&BigUint::from(46u32)));
        assert!(!group.is_member(&BigUint::from(0u32)));
        assert!(!group.is_member(&BigUint::from(47u32)));
    }

    #[test]
    fn test_inverse() {
        let group = small_group();
        let x = group.exponentiate(&group.generator(), &BigUint::from(13u32));

        assert_eq!(group.multiply(&x, &group.inverse(&x)), group.identity());
    }

    #[test]
    fn test_is_prime() {
        assert!(is_prime(&BigUint::from(2u32)));
        assert!(is_prime(&BigUint::from(1019u32)));
        assert!(is_prime(&BigUint::from(2039u32)));
        assert!(!is_prime(&BigUint::from(1u32)));
        assert!(!is_prime(&BigUint::from(1001u32)));
        assert!(!is_prime(&BigUint::from(2047u32)));
    }
}
