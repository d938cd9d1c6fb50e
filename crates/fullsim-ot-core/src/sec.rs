//! Security-level capabilities.
//!
//! Groups and protocol implementations declare which security properties
//! they satisfy. Constructors check these declarations before any message is
//! exchanged, refusing to instantiate a protocol over collaborators whose
//! capabilities are insufficient.

/// A security property a component may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The decisional Diffie-Hellman problem is assumed hard.
    DdhHard,
    /// Secure against malicious adversaries.
    Malicious,
    /// Secure in the stand-alone model.
    StandAlone,
}

impl Capability {
    const fn bit(self) -> u8 {
        match self {
            Capability::DdhHard => 1 << 0,
            Capability::Malicious => 1 << 1,
            Capability::StandAlone => 1 << 2,
        }
    }
}

/// A set of declared capabilities.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Returns the set extended with `cap`.
    pub const fn with(self, cap: Capability) -> Self {
        Self(self.0 | cap.bit())
    }

    /// Returns whether `cap` is in the set.
    pub fn contains(&self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }
}

/// Marker for protocol implementations secure against malicious adversaries.
pub trait MaliciousSecure {}

/// Marker for protocol implementations secure in the stand-alone model.
pub trait StandAloneSecure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_set() {
        let set = CapabilitySet::EMPTY.with(Capability::DdhHard);

        assert!(set.contains(Capability::DdhHard));
        assert!(!set.contains(Capability::Malicious));

        let set = set.with(Capability::Malicious).with(Capability::StandAlone);
        assert!(set.contains(Capability::StandAlone));
    }
}
