pub mod regeneration_request;

pub use regeneration_request::{RegenerationRequest, DEFAULT_CONCURRENCY};
