pub mod errors;
pub mod pool;
pub mod retry;
pub mod submitter;

pub use errors::BridgeError;
pub use pool::EndpointPool;
pub use retry::RetryPolicy;
pub use submitter::Submitter;
