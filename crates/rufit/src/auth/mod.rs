//! Authentication primitives.
//!
//! Login credentials, the bearer token pair, and the per-request flags that
//! say which token a call carries.

mod credentials;
mod flags;
mod tokens;

pub use credentials::{Credentials, Registration};
pub use flags::{AuthFlags, RequestAuth};
pub use tokens::{AccessToken, RefreshToken, TokenPair};
