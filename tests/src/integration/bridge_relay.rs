//! Relay-side plumbing: endpoint health, bounded retry, and nonce
//! serialization for proof submission.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use xl_08_bridge::{EndpointPool, RetryPolicy, Submitter};

    #[test]
    fn test_relay_routes_around_dead_endpoint() {
        let mut pool = EndpointPool::new(["http://relay-a:8545", "http://relay-b:8545"]);
        let mut rng = StdRng::seed_from_u64(11);
        // Each failure halves the dead endpoint's weight, so the pool
        // converges on the live one well within the attempt budget.
        let policy = RetryPolicy { max_attempts: 64 };

        let chosen = policy
            .run(|_| {
                let index = pool.pick(&mut rng).map_err(|e| e.to_string())?;
                if index == 0 {
                    pool.report_failure(index);
                    Err("connection refused".to_string())
                } else {
                    pool.report_success(index);
                    Ok(index)
                }
            })
            .unwrap();

        assert_eq!(pool.url(chosen), Some("http://relay-b:8545"));
        assert!(pool.weight(0).unwrap() < pool.weight(1).unwrap());
    }

    #[test]
    fn test_failed_submission_retries_with_same_nonce() {
        let submitter = Submitter::new(7);
        let policy = RetryPolicy { max_attempts: 3 };
        let mut seen = Vec::new();

        let result = policy.run(|attempt| {
            submitter.submit(|nonce| {
                seen.push(nonce);
                if attempt < 3 {
                    Err("timeout")
                } else {
                    Ok(nonce)
                }
            })
        });

        assert_eq!(result, Ok(7));
        // Every attempt reused the unconsumed nonce.
        assert_eq!(seen, vec![7, 7, 7]);
        assert_eq!(submitter.next_nonce(), 8);
    }
}
