// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod lockout;
pub mod password;
pub mod revocation;
pub mod token;
mod verifier;

pub use lockout::{LockoutGuard, DEFAULT_LOCKOUT_DURATION, DEFAULT_MAX_ATTEMPTS};
pub use password::{
    generate_password, hash_password_secure, hash_password_with_cost,
    validate_password_strength, verify_password, PasswordRequirements, MIN_PASSWORD_LENGTH,
};
pub use revocation::RevocationRegistry;
pub use token::{Claims, TokenIssuer, DEFAULT_TOKEN_TTL};
pub use verifier::{CredentialVerifier, VerifiedUser};
