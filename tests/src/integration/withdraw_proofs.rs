//! Withdrawal receipts, proofs, and the header commitment fold.

#[cfg(test)]
mod tests {
    use shared_types::{Address, Identifier};
    use xl_01_state_tree::PathProof;
    use xl_05_withdraw::{
        commitment_root, header_proof, root_from_app_leaf, BlockHeader, PackedWithdraw,
    };
    use xl_06_tx_pipeline::tx_hash;
    use xl_07_app::query::{
        CODE_OK, CODE_WITHDRAW_PROOF_INVALID_HEIGHT, CODE_WITHDRAW_PROOF_NOT_EXIST,
    };
    use xl_07_app::{AppConfig, Application};

    use crate::support::{
        app_with_genesis, genesis_json, key, key_address, query, query_value, withdraw_raw,
    };

    const DESTINATION: Address = Address([0xEE; 20]);

    #[test]
    fn test_withdraw_proof_verifies_against_header_commitment() {
        let alice = key(1);
        let alice_addr = key_address(&alice);

        let mut app = app_with_genesis(&[(alice_addr, 100, 0)]);

        app.begin_block([1u8; 32], 1);
        let withdraw = withdraw_raw(&alice, Identifier::Addr(alice_addr), DESTINATION, 30, 1, 1);
        let res = app.deliver_tx(&withdraw).unwrap();
        assert!(res.is_success());
        assert!(res
            .tags
            .contains(&("withdraw.height".to_string(), "1".to_string())));
        let packed = PackedWithdraw::from_bytes(res.data.as_ref().unwrap()).unwrap();
        let app_hash = app.commit();

        let value = query_value(&app, "account_info", alice_addr.to_string().into_bytes());
        assert_eq!(value["balance"], "69");

        let proof = query(&app, "withdraw_proof", packed.to_bytes().to_vec(), 1);
        assert_eq!(proof.code, CODE_OK);

        // The proof walks to the full withdrawal root, whose truncation
        // the app hash carries.
        let (_, withdraw_root) = app.store().roots_at(1).unwrap();
        assert_eq!(&app_hash[..20], &withdraw_root[..20]);
        let leaf = PathProof::verify(&proof.value, &packed.tree_key(), &withdraw_root).unwrap();
        assert_eq!(leaf.value, tx_hash(&withdraw).to_vec());

        // The external verifier refolds the app-hash leaf with the four
        // header siblings into the block commitment.
        let header = BlockHeader {
            app_hash: app_hash.to_vec(),
            chain_id: "crossledger-test".to_string(),
            height: 1,
            time: 1,
            ..Default::default()
        };
        assert_eq!(
            root_from_app_leaf(&header.app_leaf(), &header_proof(&header)),
            commitment_root(&header)
        );
    }

    #[test]
    fn test_pruned_heights_reject_proof_queries() {
        let alice = key(2);
        let alice_addr = key_address(&alice);

        let mut app = Application::new(&AppConfig { keep_versions: 2 });
        app.init_chain(&genesis_json(&[(alice_addr, 100, 0)])).unwrap();

        app.begin_block([1u8; 32], 1);
        let withdraw = withdraw_raw(&alice, Identifier::Addr(alice_addr), DESTINATION, 30, 1, 1);
        let res = app.deliver_tx(&withdraw).unwrap();
        assert!(res.is_success());
        let packed = PackedWithdraw::from_bytes(res.data.as_ref().unwrap()).unwrap();
        app.commit();

        for height in 2..=5u64 {
            app.begin_block([height as u8; 32], height);
            app.commit();
        }

        // The receipt's own height fell off the retention window.
        let res = query(&app, "withdraw_proof", packed.to_bytes().to_vec(), 1);
        assert_eq!(res.code, CODE_WITHDRAW_PROOF_INVALID_HEIGHT);

        // It persists in retained versions of the tree.
        let res = query(&app, "withdraw_proof", packed.to_bytes().to_vec(), 5);
        assert_eq!(res.code, CODE_OK);

        // Beyond the commit horizon is invalid rather than missing.
        let res = query(&app, "withdraw_proof", packed.to_bytes().to_vec(), 6);
        assert_eq!(res.code, CODE_WITHDRAW_PROOF_INVALID_HEIGHT);

        // A withdrawal that never happened is missing.
        let mut absent = packed;
        absent.nonce = 99;
        let res = query(&app, "withdraw_proof", absent.to_bytes().to_vec(), 5);
        assert_eq!(res.code, CODE_WITHDRAW_PROOF_NOT_EXIST);
    }
}
