use crate::zkpok;

/// Errors that can occur when using the receiver.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReceiverError {
    #[error("group does not declare the DDH-hard capability")]
    UnsupportedGroup,
    #[error("group failed validation")]
    InvalidGroup,
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("cheat detected: {0}")]
    Cheat(&'static str),
    #[error("zero-knowledge proof error: {0}")]
    Zk(#[from] zkpok::ProverError),
    #[error("message encoding failed: {0}")]
    Encode(#[from] bincode::Error),
}

impl ReceiverError {
    /// Returns whether the error signals a cheating peer.
    pub fn is_cheat(&self) -> bool {
        matches!(
            self,
            ReceiverError::Cheat(_) | ReceiverError::Zk(zkpok::ProverError::Cheat(_))
        )
    }
}

/// Errors that can occur when using the sender.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SenderError {
    #[error("group does not declare the DDH-hard capability")]
    UnsupportedGroup,
    #[error("group failed validation")]
    InvalidGroup,
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("cheat detected: {0}")]
    Cheat(&'static str),
    #[error("zero-knowledge proof error: {0}")]
    Zk(#[from] zkpok::VerifierError),
    #[error("message encoding failed: {0}")]
    Encode(#[from] bincode::Error),
}

impl SenderError {
    /// Returns whether the error signals a cheating peer.
    pub fn is_cheat(&self) -> bool {
        matches!(
            self,
            SenderError::Cheat(_) | SenderError::Zk(zkpok::VerifierError::Cheat(_))
        )
    }
}
