//! Deposit proposals and approvals under the weighted approver quorum.

#[cfg(test)]
mod tests {
    use shared_types::{Address, Amount, Identifier};
    use xl_03_deposit::{DepositInput, Proposal};
    use xl_06_tx_pipeline::{tx_hash, TxStatus};

    use crate::support::{
        app_with_genesis, deposit_approval_raw, deposit_raw, key, key_address, query_value,
    };

    /// Distinct values per address so a double or missed credit is
    /// visible in the balances.
    const INPUTS: [(Address, u64); 3] = [
        (Address([0xAA; 20]), 500),
        (Address([0xBB; 20]), 200),
        (Address([0xCC; 20]), 300),
    ];

    fn proposal(block_number: u64) -> Proposal {
        Proposal {
            block_number,
            inputs: INPUTS
                .iter()
                .map(|&(from_addr, value)| DepositInput {
                    from_addr,
                    value: Amount::from(value),
                })
                .collect(),
        }
    }

    /// Every input address holds exactly its proposed value.
    fn assert_all_inputs_credited(app: &xl_07_app::Application) {
        for (addr, expected) in INPUTS {
            let value = query_value(app, "address_info", addr.to_string().into_bytes());
            assert_eq!(value["balance"], expected.to_string(), "address {addr}");
        }
    }

    #[test]
    fn test_weighted_quorum_executes_deposit() {
        let approvers = [key(1), key(2), key(3)];
        let weights = [33u32, 34, 33];
        let accounts: Vec<_> = approvers
            .iter()
            .zip(weights)
            .map(|(key, weight)| (key_address(key), 0, weight))
            .collect();

        let mut app = app_with_genesis(&accounts);

        app.begin_block([1u8; 32], 1);
        let first = deposit_raw(
            &approvers[0],
            Identifier::Addr(key_address(&approvers[0])),
            proposal(77),
            1,
        );
        let res = app.deliver_tx(&first).unwrap();
        assert!(res.is_success());
        // 33 of 100 is short of the strict two-thirds quorum.
        assert_eq!(res.status, TxStatus::Pending);

        let second = deposit_raw(
            &approvers[1],
            Identifier::Addr(key_address(&approvers[1])),
            proposal(77),
            1,
        );
        let res = app.deliver_tx(&second).unwrap();
        assert!(res.is_success());
        // 67 of 100 crosses it and every input lands exactly once.
        assert_eq!(res.status, TxStatus::Success);
        app.commit();

        assert_all_inputs_credited(&app);
    }

    #[test]
    fn test_exact_two_thirds_is_not_enough() {
        let approvers = [key(4), key(5), key(6)];
        let accounts: Vec<_> = approvers
            .iter()
            .map(|key| (key_address(key), 0, 1u32))
            .collect();

        let mut app = app_with_genesis(&accounts);

        app.begin_block([1u8; 32], 1);
        for (index, approver) in approvers.iter().enumerate() {
            let raw = deposit_raw(
                approver,
                Identifier::Addr(key_address(approver)),
                proposal(78),
                1,
            );
            let res = app.deliver_tx(&raw).unwrap();
            assert!(res.is_success());
            // 2 of 3 is exactly two thirds and must stay pending.
            let expected = if index < 2 {
                TxStatus::Pending
            } else {
                TxStatus::Success
            };
            assert_eq!(res.status, expected, "approver {index}");
        }
        app.commit();

        assert_all_inputs_credited(&app);
    }

    #[test]
    fn test_approval_by_hash_resolves_pending_deposit() {
        let proposer = key(7);
        let approver = key(8);
        let accounts = [
            (key_address(&proposer), 0, 1u32),
            (key_address(&approver), 0, 1u32),
        ];

        let mut app = app_with_genesis(&accounts);

        app.begin_block([1u8; 32], 1);
        let deposit = deposit_raw(
            &proposer,
            Identifier::Addr(key_address(&proposer)),
            proposal(79),
            1,
        );
        let res = app.deliver_tx(&deposit).unwrap();
        assert_eq!(res.status, TxStatus::Pending);

        let approval = deposit_approval_raw(
            &approver,
            Identifier::Addr(key_address(&approver)),
            tx_hash(&deposit),
            1,
        );
        assert!(app.deliver_tx(&approval).unwrap().is_success());
        app.commit();

        // The quorum flips the original deposit from pending to success.
        let value = query_value(&app, "tx_state", hex::encode(tx_hash(&deposit)).into_bytes());
        assert_eq!(value["status"], "success");

        assert_all_inputs_credited(&app);
    }
}
