//! Hashed time-locked transfers driven through full blocks.

#[cfg(test)]
mod tests {
    use k256::ecdsa::SigningKey;
    use sha2::{Digest, Sha256};
    use shared_types::{Hash, Identifier, TxHash};
    use xl_06_tx_pipeline::{tx_hash, TxResult};
    use xl_07_app::Application;

    use crate::support::{
        app_with_genesis, claim_raw, hashed_transfer_raw, key, key_address, query_value,
        register_raw,
    };

    const SECRET: &[u8; 32] = b"cross-chain atomic swap preimage";

    fn commitment() -> Hash {
        Sha256::digest(SECRET).into()
    }

    /// Block 1 at time 1: fund alice, register bob, escrow 20 for bob
    /// expiring at time 10.
    fn escrowed_app(alice: &SigningKey, bob: &SigningKey) -> (Application, TxHash) {
        let mut app = app_with_genesis(&[(key_address(alice), 100, 0)]);

        app.begin_block([1u8; 32], 1);
        assert!(app.deliver_tx(&register_raw(bob)).unwrap().is_success());
        let htlc = hashed_transfer_raw(
            alice,
            Identifier::Addr(key_address(alice)),
            Identifier::Addr(key_address(bob)),
            20,
            commitment(),
            10,
            1,
        );
        let res = app.deliver_tx(&htlc).unwrap();
        assert!(res.is_success());
        app.commit();
        (app, tx_hash(&htlc))
    }

    #[test]
    fn test_receiver_claims_before_expiry() {
        let alice = key(1);
        let bob = key(2);
        let (mut app, htlc_hash) = escrowed_app(&alice, &bob);

        // Escrowed funds already left the creator.
        let value = query_value(&app, "account_info", key_address(&alice).to_string().into_bytes());
        assert_eq!(value["balance"], "80");
        let value = query_value(&app, "tx_state", hex::encode(htlc_hash).into_bytes());
        assert_eq!(value["status"], "pending");

        app.begin_block([2u8; 32], 9);
        let claim = claim_raw(
            &bob,
            Identifier::Addr(key_address(&bob)),
            htlc_hash,
            SECRET.to_vec(),
            1,
        );
        assert!(app.deliver_tx(&claim).unwrap().is_success());
        app.commit();

        let value = query_value(&app, "account_info", key_address(&bob).to_string().into_bytes());
        assert_eq!(value["balance"], "20");
        // The escrowing transaction resolves to success.
        let value = query_value(&app, "tx_state", hex::encode(htlc_hash).into_bytes());
        assert_eq!(value["status"], "success");
    }

    #[test]
    fn test_expiry_is_inclusive_and_revoke_refunds() {
        let alice = key(3);
        let bob = key(4);
        let (mut app, htlc_hash) = escrowed_app(&alice, &bob);

        // At exactly the expiry time the claim window has closed.
        app.begin_block([2u8; 32], 10);
        let claim = claim_raw(
            &bob,
            Identifier::Addr(key_address(&bob)),
            htlc_hash,
            SECRET.to_vec(),
            1,
        );
        let res = app.deliver_tx(&claim).unwrap();
        assert_eq!(res.code, TxResult::claim_hashed_transfer_expired().code);

        let revoke = claim_raw(
            &alice,
            Identifier::Addr(key_address(&alice)),
            htlc_hash,
            Vec::new(),
            2,
        );
        assert!(app.deliver_tx(&revoke).unwrap().is_success());
        app.commit();

        // The escrow flows back to the creator in full.
        let value = query_value(&app, "account_info", key_address(&alice).to_string().into_bytes());
        assert_eq!(value["balance"], "100");
        // The failed claim still burned the receiver's nonce.
        let value = query_value(&app, "account_info", key_address(&bob).to_string().into_bytes());
        assert_eq!(value["next_nonce"], 2);
    }

    #[test]
    fn test_creator_cannot_revoke_before_expiry() {
        let alice = key(5);
        let bob = key(6);
        let (mut app, htlc_hash) = escrowed_app(&alice, &bob);

        app.begin_block([2u8; 32], 5);
        let revoke = claim_raw(
            &alice,
            Identifier::Addr(key_address(&alice)),
            htlc_hash,
            Vec::new(),
            2,
        );
        let res = app.deliver_tx(&revoke).unwrap();
        assert_eq!(
            res.code,
            TxResult::claim_hashed_transfer_not_yet_expired().code
        );
        app.commit();

        // Still escrowed and still claimable.
        let value = query_value(&app, "tx_state", hex::encode(htlc_hash).into_bytes());
        assert_eq!(value["status"], "pending");
    }
}
