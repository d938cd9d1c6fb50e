use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::RistrettoPoint,
    scalar::Scalar,
    traits::Identity,
};
use num_bigint::BigUint;

use crate::{
    group::PrimeOrderGroup,
    sec::{Capability, CapabilitySet},
};

/// The order of the ristretto255 group, little-endian:
/// `2^252 + 27742317777372353535851937790883648493`.
const ORDER_LE: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
    0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x10,
];

/// The ristretto255 prime-order group.
///
/// Every `RistrettoPoint` is a valid group element by construction (invalid
/// encodings are rejected during deserialization), so membership checks are
/// trivial here.
#[derive(Debug, Clone)]
pub struct RistrettoGroup {
    order: BigUint,
}

impl RistrettoGroup {
    /// Creates a new group.
    pub fn new() -> Self {
        Self {
            order: BigUint::from_bytes_le(&ORDER_LE),
        }
    }

    fn to_scalar(&self, exponent: &BigUint) -> Scalar {
        let reduced = exponent % &self.order;
        let bytes = reduced.to_bytes_le();
        let mut buf = [0u8; 32];
        buf[..bytes.len()].copy_from_slice(&bytes);
        Scalar::from_bytes_mod_order(buf)
    }
}

impl Default for RistrettoGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimeOrderGroup for RistrettoGroup {
    type Element = RistrettoPoint;

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::EMPTY.with(Capability::DdhHard)
    }

    fn validate(&self) -> bool {
        true
    }

    fn order(&self) -> &BigUint {
        &self.order
    }

    fn generator(&self) -> RistrettoPoint {
        RISTRETTO_BASEPOINT_POINT
    }

    fn identity(&self) -> RistrettoPoint {
        RistrettoPoint::identity()
    }

    fn is_member(&self, _element: &RistrettoPoint) -> bool {
        true
    }

    fn multiply(&self, a: &RistrettoPoint, b: &RistrettoPoint) -> RistrettoPoint {
        a + b
    }

    fn exponentiate(&self, base: &RistrettoPoint, exponent: &BigUint) -> RistrettoPoint {
        base * self.to_scalar(exponent)
    }

    fn inverse(&self, element: &RistrettoPoint) -> RistrettoPoint {
        -element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponentiate() {
        let group = RistrettoGroup::new();
        let g = group.generator();

        let a = group.exponentiate(&g, &BigUint::from(3u32));
        let b = group.multiply(&group.multiply(&g, &g), &g);

        assert_eq!(a, b);
    }

    #[test]
    fn test_order_wraps() {
        let group = RistrettoGroup::new();
        let g = group.generator();

        // g^q = identity, g^(q + 1) = g.
        assert_eq!(group.exponentiate(&g, group.order()), group.identity());

        let q_plus_one = group.order() + BigUint::from(1u32);
        assert_eq!(group.exponentiate(&g, &q_plus_one), g);
    }

    #[test]
    fn test_inverse() {
        let group = RistrettoGroup::new();
        let x = group.exponentiate(&group.generator(), &BigUint::from(42u32));

        assert_eq!(group.multiply(&x, &group.inverse(&x)), group.identity());
    }
}
