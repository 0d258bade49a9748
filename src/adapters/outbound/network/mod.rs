pub mod oidc;
pub mod tpa_client;

pub use oidc::{OidcClientCredentials, TokenCache};
pub use tpa_client::TpaClient;
