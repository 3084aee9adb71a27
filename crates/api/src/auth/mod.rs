//! Bearer-token verification.
//!
//! Tokens are issued by the identity service; this server only checks the
//! signature and expiry and reads the username from `sub`.

pub mod jwt;
