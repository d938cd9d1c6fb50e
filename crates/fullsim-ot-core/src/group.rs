//! Prime-order group abstraction.
//!
//! The protocol is written against an opaque multiplicative group of prime
//! order `q`. No protocol logic assumes a concrete element representation;
//! everything it needs is expressed through [`PrimeOrderGroup`].

mod modp;
mod ristretto;

pub use modp::ModPGroup;
pub use ristretto::RistrettoGroup;

use std::fmt;

use num_bigint::{BigUint, RandBigInt};
use rand::{CryptoRng, Rng};
use serde::{de::DeserializeOwned, Serialize};

use crate::sec::CapabilitySet;

/// A group of prime order with a distinguished generator.
///
/// Scalars are arbitrary-precision integers reduced modulo the group order.
/// Every element received from a peer must pass [`is_member`](Self::is_member)
/// before it is used.
pub trait PrimeOrderGroup: Clone + fmt::Debug + Send + Sync + 'static {
    /// An opaque group element.
    type Element: Clone
        + PartialEq
        + Eq
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Returns the security capabilities this group declares.
    fn capabilities(&self) -> CapabilitySet;

    /// Checks the structural validity of the group parameters.
    fn validate(&self) -> bool;

    /// Returns the group order `q`.
    fn order(&self) -> &BigUint;

    /// Returns the generator.
    fn generator(&self) -> Self::Element;

    /// Returns the identity element.
    fn identity(&self) -> Self::Element;

    /// Returns whether `element` is a member of the group.
    fn is_member(&self, element: &Self::Element) -> bool;

    /// Multiplies two elements.
    fn multiply(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Raises `base` to `exponent`.
    fn exponentiate(&self, base: &Self::Element, exponent: &BigUint) -> Self::Element;

    /// Returns the multiplicative inverse of `element`.
    fn inverse(&self, element: &Self::Element) -> Self::Element;

    /// Samples a uniform scalar in `[0, q)`.
    fn random_scalar<R: Rng + CryptoRng + ?Sized>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint_below(self.order())
    }

    /// Samples a uniform scalar in `[1, q)`.
    fn random_nonzero_scalar<R: Rng + CryptoRng + ?Sized>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint_range(&BigUint::from(1u32), self.order())
    }
}
