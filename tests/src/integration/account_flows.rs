//! Registration and transfer flows across committed blocks.

#[cfg(test)]
mod tests {
    use shared_types::Identifier;
    use xl_06_tx_pipeline::{tx_hash, TxResult};
    use xl_07_app::query::{CODE_INVALID_IDENTIFIER, CODE_OK};

    use crate::support::{
        app_with_genesis, key, key_address, query, query_value, register_raw, transfer_raw,
    };

    #[test]
    fn test_unbound_transfer_absorbed_by_later_registration() {
        let alice = key(1);
        let bob = key(2);
        let alice_addr = key_address(&alice);
        let bob_addr = key_address(&bob);

        let mut app = app_with_genesis(&[(alice_addr, 100, 0)]);

        app.begin_block([1u8; 32], 1);
        let transfer = transfer_raw(
            &alice,
            Identifier::Addr(alice_addr),
            Identifier::Addr(bob_addr),
            40,
            1,
        );
        assert!(app.deliver_tx(&transfer).unwrap().is_success());
        app.commit();

        // The funds sit on the bare address record until registration.
        let value = query_value(&app, "address_info", bob_addr.to_string().into_bytes());
        assert_eq!(value["balance"], "40");
        let res = query(&app, "account_info", bob_addr.to_string().into_bytes(), 0);
        assert_eq!(res.code, CODE_INVALID_IDENTIFIER);

        app.begin_block([2u8; 32], 2);
        assert!(app.deliver_tx(&register_raw(&bob)).unwrap().is_success());
        app.commit();

        // Registration binds the address and absorbs its balance.
        let value = query_value(&app, "account_info", bob_addr.to_string().into_bytes());
        assert_eq!(value["balance"], "40");
        assert_eq!(value["next_nonce"], 1);
    }

    #[test]
    fn test_failed_transfer_still_consumes_nonce() {
        let alice = key(3);
        let alice_addr = key_address(&alice);

        let mut app = app_with_genesis(&[(alice_addr, 10, 0)]);

        app.begin_block([1u8; 32], 1);
        let overdraft = transfer_raw(
            &alice,
            Identifier::Addr(alice_addr),
            Identifier::Addr(key_address(&key(4))),
            50,
            1,
        );
        let res = app.deliver_tx(&overdraft).unwrap();
        assert_eq!(res.code, TxResult::transfer_not_enough_balance().code);
        app.commit();

        // The balance is untouched but the nonce is burned.
        let value = query_value(&app, "account_info", alice_addr.to_string().into_bytes());
        assert_eq!(value["balance"], "10");
        assert_eq!(value["next_nonce"], 2);

        let value = query_value(
            &app,
            "tx_state",
            hex::encode(tx_hash(&overdraft)).into_bytes(),
        );
        assert_eq!(value["status"], "fail");
    }

    #[test]
    fn test_replay_across_blocks_rejected() {
        let alice = key(5);
        let alice_addr = key_address(&alice);
        let sink = key_address(&key(6));

        let mut app = app_with_genesis(&[(alice_addr, 100, 0)]);

        app.begin_block([1u8; 32], 1);
        let transfer = transfer_raw(
            &alice,
            Identifier::Addr(alice_addr),
            Identifier::Addr(sink),
            10,
            1,
        );
        assert!(app.deliver_tx(&transfer).unwrap().is_success());
        app.commit();

        // The same envelope in a later block is a replay.
        app.begin_block([2u8; 32], 2);
        let res = app.deliver_tx(&transfer).unwrap();
        assert_eq!(res.code, TxResult::transfer_duplicated().code);

        // A fresh nonce goes through.
        let next = transfer_raw(
            &alice,
            Identifier::Addr(alice_addr),
            Identifier::Addr(sink),
            10,
            2,
        );
        assert!(app.deliver_tx(&next).unwrap().is_success());
        app.commit();

        let value = query_value(&app, "address_info", sink.to_string().into_bytes());
        assert_eq!(value["balance"], "20");

        let res = query(&app, "account_info", alice_addr.to_string().into_bytes(), 0);
        assert_eq!(res.code, CODE_OK);
        let value: serde_json::Value = serde_json::from_slice(&res.value).unwrap();
        assert_eq!(value["next_nonce"], 3);
    }
}
