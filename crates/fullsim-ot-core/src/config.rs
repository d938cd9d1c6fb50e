//! Protocol configuration.

use derive_builder::Builder;

const DEFAULT_STATISTICAL_SECURITY: usize = 40;

/// Receiver configuration.
#[derive(Debug, Clone, Builder)]
pub struct ReceiverConfig {
    /// Statistical security parameter `t` of the preprocessing ZKPOK.
    #[builder(default = "DEFAULT_STATISTICAL_SECURITY")]
    statistical_security: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            statistical_security: DEFAULT_STATISTICAL_SECURITY,
        }
    }
}

impl ReceiverConfig {
    /// Creates a new builder for ReceiverConfig.
    pub fn builder() -> ReceiverConfigBuilder {
        ReceiverConfigBuilder::default()
    }

    /// Returns the statistical security parameter.
    pub fn statistical_security(&self) -> usize {
        self.statistical_security
    }
}

/// Sender configuration.
#[derive(Debug, Clone, Builder)]
pub struct SenderConfig {
    /// Statistical security parameter `t` of the preprocessing ZKPOK.
    #[builder(default = "DEFAULT_STATISTICAL_SECURITY")]
    statistical_security: usize,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            statistical_security: DEFAULT_STATISTICAL_SECURITY,
        }
    }
}

impl SenderConfig {
    /// Creates a new builder for SenderConfig.
    pub fn builder() -> SenderConfigBuilder {
        SenderConfigBuilder::default()
    }

    /// Returns the statistical security parameter.
    pub fn statistical_security(&self) -> usize {
        self.statistical_security
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ReceiverConfig::builder().build().unwrap();
        assert_eq!(config.statistical_security(), DEFAULT_STATISTICAL_SECURITY);

        let config = SenderConfig::builder().statistical_security(8).build().unwrap();
        assert_eq!(config.statistical_security(), 8);
    }
}
