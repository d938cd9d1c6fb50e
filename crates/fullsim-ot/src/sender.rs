use fullsim_ot_core::{
    config::SenderConfig,
    group::PrimeOrderGroup,
    sender_state as state, Sender as Core, SenderError as CoreError, TransferId,
};

use serio::{stream::IoStreamExt as _, IoSink, IoStream, SinkExt as _};

type Error = SenderError;

#[derive(Debug)]
enum State<G: PrimeOrderGroup> {
    Initialized(Core<G, state::Initialized>),
    Setup(Core<G, state::Setup<G>>),
    Error,
}

impl<G: PrimeOrderGroup> State<G> {
    fn take(&mut self) -> Self {
        std::mem::replace(self, Self::Error)
    }
}

/// Full-simulation OT sender.
#[derive(Debug)]
pub struct Sender<G: PrimeOrderGroup> {
    state: State<G>,
}

impl<G: PrimeOrderGroup> Sender<G> {
    /// Creates a new sender.
    pub fn new(config: SenderConfig, group: G) -> Result<Self, Error> {
        Ok(Self {
            state: State::Initialized(Core::new(config, group)?),
        })
    }

    /// Creates a new sender with the provided RNG seed.
    ///
    /// # Arguments
    ///
    /// * `seed` - The RNG seed used to generate the sender's randomness.
    pub fn new_with_seed(config: SenderConfig, group: G, seed: [u8; 32]) -> Result<Self, Error> {
        Ok(Self {
            state: State::Initialized(Core::new_with_seed(config, group, seed)?),
        })
    }

    /// Runs the preprocessing phase with the receiver.
    ///
    /// An error here poisons the sender, a fresh one must be constructed to
    /// retry. In particular a rejected proof leaves the sender unusable.
    pub async fn setup<Io: IoSink + IoStream + Send + Unpin>(
        &mut self,
        io: &mut Io,
    ) -> Result<(), Error> {
        let sender = match self.state.take() {
            State::Initialized(sender) => sender,
            state @ State::Setup(_) => {
                self.state = state;
                return Err(Error::state("setup already complete"));
            }
            State::Error => return Err(Error::state("sender is in an error state")),
        };

        let setup_msg = io.expect_next().await?;
        let (key, mut sender) = sender.setup(setup_msg)?;
        io.send(key).await?;

        let commitment = io.expect_next().await?;
        let challenge = sender.challenge(commitment)?;
        io.send(challenge).await?;

        let response = io.expect_next().await?;
        let sender = sender.verify(response)?;

        self.state = State::Setup(sender);

        Ok(())
    }

    /// Runs a transfer in the group-element variant.
    ///
    /// # Arguments
    ///
    /// * `io` - The io channel to the receiver.
    /// * `msgs` - The two input values `[x0, x1]`.
    pub async fn send<Io: IoSink + IoStream + Send + Unpin>(
        &mut self,
        io: &mut Io,
        msgs: [G::Element; 2],
    ) -> Result<TransferId, Error> {
        let State::Setup(sender) = &mut self.state else {
            return Err(Error::state("sender is not set up"));
        };

        let query = io.expect_next().await?;
        let (id, answer) = sender.send(query, msgs)?;
        io.send(answer).await?;

        Ok(id)
    }

    /// Runs a transfer in the byte-string variant.
    pub async fn send_bytes<Io: IoSink + IoStream + Send + Unpin>(
        &mut self,
        io: &mut Io,
        msgs: [Vec<u8>; 2],
    ) -> Result<TransferId, Error> {
        let State::Setup(sender) = &mut self.state else {
            return Err(Error::state("sender is not set up"));
        };

        let query = io.expect_next().await?;
        let (id, answer) = sender.send_bytes(query, msgs)?;
        io.send(answer).await?;

        Ok(id)
    }
}

/// Sender error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct SenderError(#[from] ErrorRepr);

impl SenderError {
    fn state(err: impl Into<String>) -> Self {
        Self(ErrorRepr::State(err.into()))
    }

    /// Returns whether the error signals a cheating peer.
    pub fn is_cheat(&self) -> bool {
        matches!(&self.0, ErrorRepr::Core(e) if e.is_cheat())
    }
}

#[derive(Debug, thiserror::Error)]
enum ErrorRepr {
    #[error("core error: {0}")]
    Core(#[source] CoreError),
    #[error("state error: {0}")]
    State(String),
    #[error("io error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<CoreError> for SenderError {
    fn from(e: CoreError) -> Self {
        Self(ErrorRepr::Core(e))
    }
}

impl From<std::io::Error> for SenderError {
    fn from(e: std::io::Error) -> Self {
        Self(ErrorRepr::Io(e))
    }
}
