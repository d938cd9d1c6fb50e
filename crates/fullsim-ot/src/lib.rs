//! Two-party oblivious transfer with full simulation security against
//! malicious adversaries, under the DDH assumption.
//!
//! This crate drives the sans-io state machines of `fullsim-ot-core` over a
//! [`serio`] channel. A session runs `setup` once, then any number of
//! transfers.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod receiver;
mod sender;

pub use receiver::{Receiver, ReceiverError};
pub use sender::{Sender, SenderError};

pub use fullsim_ot_core::{TransferId, TransferOutput};

#[cfg(test)]
mod tests {
    use super::*;

    use fullsim_ot_core::{
        config::{ReceiverConfig, SenderConfig},
        group::{ModPGroup, PrimeOrderGroup, RistrettoGroup},
        msgs::{ReceiverQuery, SenderAnswer},
    };

    use num_bigint::BigUint;
    use serio::{channel::duplex, stream::IoStreamExt as _, SinkExt as _};

    fn modp() -> ModPGroup {
        ModPGroup::new(
            BigUint::from(47u32),
            BigUint::from(23u32),
            BigUint::from(2u32),
        )
    }

    fn modp_configs() -> (SenderConfig, ReceiverConfig) {
        // q = 23 is 5 bits, the challenge space must stay below it.
        (
            SenderConfig::builder()
                .statistical_security(4)
                .build()
                .unwrap(),
            ReceiverConfig::builder()
                .statistical_security(4)
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_ot_bytes() {
        let (mut io_s, mut io_r) = duplex(8);

        let (sender_config, receiver_config) = modp_configs();
        let mut sender = Sender::new_with_seed(sender_config, modp(), [1u8; 32]).unwrap();
        let mut receiver = Receiver::new_with_seed(receiver_config, modp(), [2u8; 32]).unwrap();

        let (sender_res, receiver_res) =
            futures::join!(sender.setup(&mut io_s), receiver.setup(&mut io_r));
        sender_res.unwrap();
        receiver_res.unwrap();

        for choice in [false, true] {
            let (id, output) = futures::join!(
                sender.send_bytes(&mut io_s, [b"A".to_vec(), b"B".to_vec()]),
                receiver.transfer_bytes(&mut io_r, choice),
            );

            let output = output.unwrap();
            assert_eq!(id.unwrap(), output.id);
            assert_eq!(output.value, if choice { b"B".to_vec() } else { b"A".to_vec() });
        }
    }

    #[tokio::test]
    async fn test_ot_ristretto_elements() {
        let (mut io_s, mut io_r) = duplex(8);

        let group = RistrettoGroup::new();
        let mut sender = Sender::new(SenderConfig::default(), group.clone()).unwrap();
        let mut receiver = Receiver::new(ReceiverConfig::default(), group.clone()).unwrap();

        let (sender_res, receiver_res) =
            futures::join!(sender.setup(&mut io_s), receiver.setup(&mut io_r));
        sender_res.unwrap();
        receiver_res.unwrap();

        let g = group.generator();
        let x0 = group.exponentiate(&g, &BigUint::from(5u32));
        let x1 = group.exponentiate(&g, &BigUint::from(7u32));

        for choice in [false, true] {
            let (id, output) = futures::join!(
                sender.send(&mut io_s, [x0.clone(), x1.clone()]),
                receiver.transfer(&mut io_r, choice),
            );

            id.unwrap();
            let output = output.unwrap();
            assert_eq!(output.value, if choice { x1.clone() } else { x0.clone() });
        }
    }

    #[tokio::test]
    async fn test_receiver_aborts_on_forged_answer() {
        let (mut io_s, mut io_r) = duplex(8);

        let (sender_config, receiver_config) = modp_configs();
        let mut sender = Sender::new_with_seed(sender_config, modp(), [3u8; 32]).unwrap();
        let mut receiver = Receiver::new_with_seed(receiver_config, modp(), [4u8; 32]).unwrap();

        let (sender_res, receiver_res) =
            futures::join!(sender.setup(&mut io_s), receiver.setup(&mut io_r));
        sender_res.unwrap();
        receiver_res.unwrap();

        // Answer the query by hand with an element outside the order-23
        // subgroup. 46 = -1 mod 47 has order 2.
        let (_, output) = futures::join!(
            async {
                let _query: ReceiverQuery<BigUint> = io_s.expect_next().await.unwrap();
                io_s.send(SenderAnswer {
                    u0: BigUint::from(46u32),
                    c0: BigUint::from(1u32),
                    u1: BigUint::from(1u32),
                    c1: BigUint::from(1u32),
                })
                .await
                .unwrap();
            },
            receiver.transfer(&mut io_r, false),
        );

        assert!(output.unwrap_err().is_cheat());
    }

    #[tokio::test]
    async fn test_transfer_before_setup_fails() {
        let (_, mut io_r) = duplex(8);

        let (_, receiver_config) = modp_configs();
        let mut receiver = Receiver::new(receiver_config, modp()).unwrap();

        assert!(receiver.transfer(&mut io_r, false).await.is_err());
    }
}
