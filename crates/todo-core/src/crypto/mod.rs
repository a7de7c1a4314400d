//! Password-based text encryption.
//!
//! Callers use this to protect individual strings before handing them to the
//! store; the store itself never encrypts.
//!
//! - **Age**: passphrase recipients (scrypt KDF, random salt and nonce)
//! - **Base64**: ASCII transport of the age payload
//!
//! Decryption is fail-soft: any failure, including an empty plaintext, yields
//! `None` so callers can tell "no value" apart from a fault.

pub mod text;

pub use text::{decrypt, encrypt};
