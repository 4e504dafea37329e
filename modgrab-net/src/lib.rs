// modgrab-net/src/lib.rs
pub mod api;
pub mod download;
pub mod limit;
pub mod validation;

pub use api::{ModrinthClient, Registry};
pub use limit::RateLimiter;
pub use validation::{validate_url, verify_sha512};
