use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::thread_rng;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::errors::CapitalError;

const PEM_LINE_LEN: usize = 64;

/// Encrypt a password for `POST /session`.
///
/// The server expects `base64("password|timestamp")` encrypted with its
/// public key using PKCS#1 v1.5 padding, then base64 encoded again.
/// `encryption_key` is the base64 DER key from `GET /session/encryptionKey`.
pub fn encrypt_password(
    encryption_key: &str,
    timestamp: i64,
    password: &str,
) -> Result<String, CapitalError> {
    let input = BASE64.encode(format!("{password}|{timestamp}"));

    let pem = public_key_pem(encryption_key);
    let public_key = RsaPublicKey::from_public_key_pem(&pem)
        .map_err(|e| encryption_error(format!("Invalid encryption key: {e}")))?;

    let mut rng = thread_rng();
    let encrypted = public_key
        .encrypt(&mut rng, Pkcs1v15Encrypt, input.as_bytes())
        .map_err(|e| encryption_error(format!("Failed to encrypt password: {e}")))?;

    Ok(BASE64.encode(encrypted))
}

/// Wrap a bare base64 key into a PEM `PUBLIC KEY` block.
fn public_key_pem(encryption_key: &str) -> String {
    let compact: Vec<char> = encryption_key
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let mut pem = String::from("-----BEGIN PUBLIC KEY-----\n");
    for line in compact.chunks(PEM_LINE_LEN) {
        pem.extend(line);
        pem.push('\n');
    }
    pem.push_str("-----END PUBLIC KEY-----");
    pem
}

fn encryption_error(detail: String) -> CapitalError {
    CapitalError::generic(format!("Password encryption failed: {detail}"))
}
