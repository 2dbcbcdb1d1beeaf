// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_LOGIN_HIT: &str = "auth.login.hit";
pub const AUTH_LOGIN_FAILED: &str = "auth.login.failed";
pub const AUTH_LOCKOUT: &str = "auth.lockout";
pub const AUTH_TOKEN_ISSUED: &str = "auth.token.issued";
pub const AUTH_TOKEN_REVOKED: &str = "auth.token.revoked";
pub const AUTH_GATE_REJECTED: &str = "auth.gate.rejected";
pub const AUTH_PASSWORD_CHANGED: &str = "auth.password.changed";
