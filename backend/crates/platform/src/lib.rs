//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64)
//! - Bearer credential extraction
//! - Outbound mail delivery

pub mod bearer;
pub mod crypto;
pub mod mail;
