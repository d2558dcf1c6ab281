// unigate-api: Async Rust client for the UniGate access-control API
//
// Credential store -> token cache -> middleware -> typed endpoint callers.

pub mod client;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod token_cache;
pub mod transport;
pub mod types;

pub use client::{ApiClient, Download};
pub use credentials::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionToken, TokenChannel,
    TokenStream,
};
pub use error::Error;
pub use middleware::{Middleware, RequestAuthenticator, UnauthorizedHandler};
pub use token_cache::TokenCache;
pub use transport::{TlsMode, TransportConfig};
