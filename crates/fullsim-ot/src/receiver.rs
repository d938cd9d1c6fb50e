use fullsim_ot_core::{
    config::ReceiverConfig,
    group::PrimeOrderGroup,
    receiver_state as state, Receiver as Core, ReceiverError as CoreError, TransferOutput,
};

use serio::{stream::IoStreamExt as _, IoSink, IoStream, SinkExt as _};

type Error = ReceiverError;

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

/// Full-simulation OT receiver.
#[derive(Debug)]
pub struct Receiver<G: PrimeOrderGroup> {
    state: State<G>,
}

impl<G: PrimeOrderGroup> Receiver<G> {
    /// Creates a new receiver.
    pub fn new(config: ReceiverConfig, group: G) -> Result<Self, Error> {
        Ok(Self {
            state: State::Initialized(Core::new(config, group)?),
        })
    }

    /// Creates a new receiver with the provided RNG seed.
    ///
    /// # Arguments
    ///
    /// * `seed` - The RNG seed used to generate the receiver's randomness.
    pub fn new_with_seed(config: ReceiverConfig, group: G, seed: [u8; 32]) -> Result<Self, Error> {
        Ok(Self {
            state: State::Initialized(Core::new_with_seed(config, group, seed)?),
        })
    }

    /// Runs the preprocessing phase with the sender.
    ///
    /// An error here poisons the receiver, a fresh one must be constructed
    /// to retry.
    pub async fn setup<Io: IoSink + IoStream + Send + Unpin>(
        &mut self,
        io: &mut Io,
    ) -> Result<(), Error> {
        let receiver = match self.state.take() {
            State::Initialized(receiver) => receiver,
            state @ State::Setup(_) => {
                self.state = state;
                return Err(Error::state("setup already complete"));
            }
            State::Error => return Err(Error::state("receiver is in an error state")),
        };

        let (setup_msg, mut receiver) = receiver.setup();
        io.send(setup_msg).await?;

        let key = io.expect_next().await?;
        let commitment = receiver.commit(key)?;
        io.send(commitment).await?;

        let challenge = io.expect_next().await?;
        let (response, receiver) = receiver.prove(challenge)?;
        io.send(response).await?;

        self.state = State::Setup(receiver);

        Ok(())
    }

    /// Runs a transfer in the group-element variant.
    ///
    /// # Arguments
    ///
    /// * `io` - The io channel to the sender.
    /// * `choice` - The selection bit.
    pub async fn transfer<Io: IoSink + IoStream + Send + Unpin>(
        &mut self,
        io: &mut Io,
        choice: bool,
    ) -> Result<TransferOutput<G::Element>, Error> {
        let State::Setup(receiver) = &mut self.state else {
            return Err(Error::state("receiver is not set up"));
        };

        io.send(receiver.choose(choice)).await?;
        let answer = io.expect_next().await?;

        receiver.receive(answer).map_err(Error::from)
    }

    /// Runs a transfer in the byte-string variant.
    pub async fn transfer_bytes<Io: IoSink + IoStream + Send + Unpin>(
        &mut self,
        io: &mut Io,
        choice: bool,
    ) -> Result<TransferOutput<Vec<u8>>, Error> {
        let State::Setup(receiver) = &mut self.state else {
            return Err(Error::state("receiver is not set up"));
        };

        io.send(receiver.choose(choice)).await?;
        let answer = io.expect_next().await?;

        receiver.receive_bytes(answer).map_err(Error::from)
    }
}

/// Receiver error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ReceiverError(#[from] ErrorRepr);

impl ReceiverError {
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

impl From<CoreError> for ReceiverError {
    fn from(e: CoreError) -> Self {
        Self(ErrorRepr::Core(e))
    }
}

impl From<std::io::Error> for ReceiverError {
    fn from(e: std::io::Error) -> Self {
        Self(ErrorRepr::Io(e))
    }
}
