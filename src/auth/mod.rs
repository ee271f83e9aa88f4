//! # Auth Module
//!
//! Credential handling: Argon2id password hashes, HS256 token issuance,
//! and the verifier used by the auth middleware.

pub mod credentials;
pub mod crypto;
pub mod errors;
pub mod jwt;

pub use credentials::CredentialManager;
pub use crypto::PasswordHash;
pub use errors::{AuthError, AuthResult};
pub use jwt::{Claims, JwtConfig, TokenIssuer, TokenVerifier, TOKEN_TTL_MINUTES};
