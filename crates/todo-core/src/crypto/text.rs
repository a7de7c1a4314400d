//! Age encryption of strings.

use std::io::{Read, Write};
use std::iter;

use age::secrecy::SecretString;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use crate::error::{Result, TodoError};

/// Encrypt `data` with `password`, returning base64 ciphertext.
///
/// Output differs between calls for the same input; only the matching
/// password can recover it.
///
/// # Examples
///
/// ```
/// use todo_core::crypto::{decrypt, encrypt};
///
/// let ciphertext = encrypt("buy milk", "hunter2").unwrap();
/// assert_eq!(decrypt(&ciphertext, "hunter2").as_deref(), Some("buy milk"));
/// ```
pub fn encrypt(data: &str, password: &str) -> Result<String> {
    let encryptor =
        age::Encryptor::with_user_passphrase(SecretString::from(password.to_string()));

    let mut encrypted = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut encrypted)
        .map_err(|e| TodoError::Crypto(format!("Failed to create encryptor: {}", e)))?;

    writer
        .write_all(data.as_bytes())
        .map_err(|e| TodoError::Crypto(format!("Encryption write failed: {}", e)))?;

    writer
        .finish()
        .map_err(|e| TodoError::Crypto(format!("Encryption finish failed: {}", e)))?;

    Ok(STANDARD.encode(encrypted))
}

/// Decrypt base64 ciphertext produced by [`encrypt`].
///
/// Returns `None` on a wrong password, malformed input, non-UTF-8 plaintext,
/// or an empty plaintext.
pub fn decrypt(ciphertext: &str, password: &str) -> Option<String> {
    let encrypted = STANDARD.decode(ciphertext.trim()).ok()?;
    let decryptor = age::Decryptor::new(encrypted.as_slice()).ok()?;

    let identity = age::scrypt::Identity::new(SecretString::from(password.to_string()));
    let mut reader = decryptor
        .decrypt(iter::once(&identity as &dyn age::Identity))
        .ok()?;

    let mut decrypted = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut decrypted).ok()?;

    let text = std::str::from_utf8(&decrypted).ok()?;
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let password = "test-passphrase-secure-123";
        let plaintext = "Hello, World! This is secret data.";

        let encrypted = encrypt(plaintext, password).unwrap();
        let decrypted = decrypt(&encrypted, password);

        assert_eq!(decrypted.as_deref(), Some(plaintext));
    }

    #[test]
    fn test_ciphertext_is_ascii_and_hides_plaintext() {
        let encrypted = encrypt("PLAINTEXT_MARKER_123", "pw").unwrap();

        assert!(encrypted.is_ascii());
        assert!(!encrypted.contains("PLAINTEXT_MARKER_123"));
    }

    #[test]
    fn test_same_input_different_ciphertext() {
        let first = encrypt("same plaintext", "same-password").unwrap();
        let second = encrypt("same plaintext", "same-password").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_password_returns_none() {
        let encrypted = encrypt("secret data", "correct-passphrase-123").unwrap();

        assert_eq!(decrypt(&encrypted, "wrong-passphrase-456"), None);
    }

    #[test]
    fn test_corrupted_data_returns_none() {
        let encrypted = encrypt("secret data", "test-passphrase-secure-123").unwrap();
        let mut bytes = STANDARD.decode(&encrypted).unwrap();
        let len = bytes.len();
        bytes[len / 2] ^= 0xFF;
        let corrupted = STANDARD.encode(bytes);

        assert_eq!(decrypt(&corrupted, "test-passphrase-secure-123"), None);
    }

    #[test]
    fn test_non_ciphertext_returns_none() {
        assert_eq!(decrypt("not base64 at all!", "pw"), None);
        assert_eq!(decrypt(&STANDARD.encode("plain words"), "pw"), None);
        assert_eq!(decrypt("", "pw"), None);
    }

    #[test]
    fn test_empty_plaintext_returns_none() {
        let encrypted = encrypt("", "test-passphrase-secure-123").unwrap();

        assert_eq!(decrypt(&encrypted, "test-passphrase-secure-123"), None);
    }

    #[test]
    fn test_unicode_round_trip() {
        let plaintext = "Купить хлеб 🍞";
        let encrypted = encrypt(plaintext, "пароль").unwrap();

        assert_eq!(decrypt(&encrypted, "пароль").as_deref(), Some(plaintext));
    }
}
