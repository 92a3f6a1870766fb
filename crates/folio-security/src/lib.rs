//! # Folio Security
//!
//! JWT access tokens for Folio. Verification consults a
//! [`RevocationLedger`](folio_cache::RevocationLedger) so a logged-out token
//! is rejected before its natural expiry.

pub mod jwt;

pub use jwt::*;
