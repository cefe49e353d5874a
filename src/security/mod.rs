//! Authentication and request admission.
//!
//! - [`token`]: HS256 access tokens
//! - [`password`]: argon2 password hashing
//! - [`middleware`]: bearer/cookie extraction into [`UserContext`]
//! - [`rate_limit`]: global token bucket

pub mod claims;
pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod token;

pub use claims::{UserClaims, UserContext};
pub use rate_limit::AppRateLimiter;
pub use token::{IssuedToken, TokenError, TokenService};
