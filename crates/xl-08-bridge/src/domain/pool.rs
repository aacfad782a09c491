//! Weighted endpoint selection.

use rand::Rng;
use tracing::debug;

use crate::domain::errors::BridgeError;

/// Starting and maximum reliability weight.
const INITIAL_WEIGHT: u64 = 0xFFFF_FFFF;

#[derive(Debug, Clone)]
struct Endpoint {
    url: String,
    weight: u64,
}

/// A set of external-chain endpoints with per-endpoint reliability
/// weights. Weights stay in `[1, INITIAL_WEIGHT]`: an endpoint can fade
/// to near-zero probability but is never unreachable, so a recovered
/// node can earn its weight back.
#[derive(Debug, Clone)]
pub struct EndpointPool {
    endpoints: Vec<Endpoint>,
}

impl EndpointPool {
    pub fn new<I, S>(urls: I) -> EndpointPool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EndpointPool {
            endpoints: urls
                .into_iter()
                .map(|url| Endpoint {
                    url: url.into(),
                    weight: INITIAL_WEIGHT,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn url(&self, index: usize) -> Option<&str> {
        self.endpoints.get(index).map(|e| e.url.as_str())
    }

    pub fn weight(&self, index: usize) -> Option<u64> {
        self.endpoints.get(index).map(|e| e.weight)
    }

    /// Pick an endpoint index, with probability proportional to weight.
    pub fn pick(&self, rng: &mut impl Rng) -> Result<usize, BridgeError> {
        if self.endpoints.is_empty() {
            return Err(BridgeError::NoEndpoints);
        }
        let total: u64 = self.endpoints.iter().map(|e| e.weight).sum();
        let mut ticket = rng.gen_range(0..total);
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            if ticket < endpoint.weight {
                return Ok(index);
            }
            ticket -= endpoint.weight;
        }
        // gen_range(0..total) is strictly below the summed weights.
        Ok(self.endpoints.len() - 1)
    }

    /// Doubling with a set low bit recovers a floored endpoint in at
    /// most 32 successes.
    pub fn report_success(&mut self, index: usize) {
        if let Some(endpoint) = self.endpoints.get_mut(index) {
            endpoint.weight = ((endpoint.weight << 1) | 1).min(INITIAL_WEIGHT);
        }
    }

    pub fn report_failure(&mut self, index: usize) {
        if let Some(endpoint) = self.endpoints.get_mut(index) {
            endpoint.weight = (endpoint.weight >> 1) | 1;
            debug!(
                "[xl-08] Endpoint {} demoted to weight {}",
                endpoint.url, endpoint.weight
            );
        }
    }
}
