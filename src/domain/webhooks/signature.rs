//! HubSpot v1 webhook signatures: `hex(sha256(client_secret + raw_body))`.

use sha2::{Digest, Sha256};

pub const SIGNATURE_HEADER: &str = "x-hubspot-signature";

pub fn compute_signature(client_secret: &str, body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(client_secret.as_bytes());
    hasher.update(body);
    hex::encode(hasher.finalize())
}

/// Compare in constant time so the signature cannot be guessed byte by byte
pub fn verify_signature(client_secret: &str, body: &[u8], signature: &str) -> bool {
    let expected = compute_signature(client_secret, body);
    let provided = signature.trim().to_ascii_lowercase();

    if expected.len() != provided.len() {
        return false;
    }

    expected
        .bytes()
        .zip(provided.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
