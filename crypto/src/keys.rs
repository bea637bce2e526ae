//! Ed25519 key generation and secret-key loading.

use std::path::Path;

use claimdrop_types::{KeyPair, PrivateKey, PublicKey};
use ed25519_dalek::SigningKey;
use zeroize::Zeroizing;

use crate::CryptoError;

/// Generate a new Ed25519 key pair from the operating system's entropy source.
pub fn generate_keypair() -> Result<KeyPair, CryptoError> {
    let mut seed = Zeroizing::new([0u8; 32]);
    getrandom::getrandom(&mut seed[..]).map_err(|e| CryptoError::Entropy(e.to_string()))?;
    Ok(keypair_from_seed(&seed))
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    let public = public_from_private(&private);
    KeyPair { public, private }
}

/// Derive a key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Parse a secret key from its text form.
///
/// Accepted encodings:
/// - hex of a 32-byte seed
/// - hex of a 64-byte `seed || public` keypair (tweetnacl / Solana layout)
/// - a JSON array of 64 byte values, as written by `solana-keygen`
///
/// For the 64-byte forms the embedded public half must match the key derived
/// from the seed.
pub fn parse_private_key(text: &str) -> Result<KeyPair, CryptoError> {
    let text = text.trim();
    let bytes = Zeroizing::new(if text.starts_with('[') {
        serde_json::from_str::<Vec<u8>>(text)
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?
    } else {
        hex::decode(text).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?
    });

    match bytes.len() {
        32 => {
            let mut seed = Zeroizing::new([0u8; 32]);
            seed.copy_from_slice(&bytes);
            Ok(keypair_from_seed(&seed))
        }
        64 => {
            let mut seed = Zeroizing::new([0u8; 32]);
            seed.copy_from_slice(&bytes[..32]);
            let kp = keypair_from_seed(&seed);
            if kp.public.0[..] != bytes[32..] {
                return Err(CryptoError::KeyMismatch);
            }
            Ok(kp)
        }
        n => Err(CryptoError::InvalidLength(n)),
    }
}

/// Read and parse a secret key file (see [`parse_private_key`]).
pub fn read_private_key_file(path: &Path) -> Result<KeyPair, CryptoError> {
    let contents = Zeroizing::new(std::fs::read_to_string(path)?);
    parse_private_key(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn generate_produces_valid_keypair() {
        let kp = generate_keypair().unwrap();
        assert_ne!(kp.public.0, [0u8; 32]);
        assert_eq!(public_from_private(&kp.private), kp.public);
    }

    #[test]
    fn keypair_from_private_roundtrip() {
        let kp1 = generate_keypair().unwrap();
        let kp2 = keypair_from_private(PrivateKey(kp1.private.0));
        assert_eq!(kp1.public, kp2.public);
    }

    #[test]
    fn keypair_from_seed_deterministic() {
        let kp1 = keypair_from_seed(&[42u8; 32]);
        let kp2 = keypair_from_seed(&[42u8; 32]);
        assert_eq!(kp1.public, kp2.public);
        assert_ne!(kp1.public, keypair_from_seed(&[43u8; 32]).public);
    }

    #[test]
    fn parse_hex_seed() {
        let kp = parse_private_key(&"07".repeat(32)).unwrap();
        assert_eq!(kp.public, keypair_from_seed(&[7u8; 32]).public);
    }

    #[test]
    fn parse_hex_full_keypair() {
        let expected = keypair_from_seed(&[9u8; 32]);
        let text = format!("{}{}", "09".repeat(32), expected.public.to_hex());
        let kp = parse_private_key(&text).unwrap();
        assert_eq!(kp.public, expected.public);
    }

    #[test]
    fn parse_json_array_keypair() {
        let expected = keypair_from_seed(&[5u8; 32]);
        let mut bytes = vec![5u8; 32];
        bytes.extend_from_slice(&expected.public.0);
        let text = serde_json::to_string(&bytes).unwrap();
        let kp = parse_private_key(&text).unwrap();
        assert_eq!(kp.public, expected.public);
    }

    #[test]
    fn mismatched_public_half_is_rejected() {
        let text = format!("{}{}", "09".repeat(32), "00".repeat(32));
        assert!(matches!(parse_private_key(&text), Err(CryptoError::KeyMismatch)));
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(matches!(
            parse_private_key(&"01".repeat(16)),
            Err(CryptoError::InvalidLength(16))
        ));
        assert!(matches!(
            parse_private_key("not hex"),
            Err(CryptoError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn read_key_file_with_trailing_newline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", "11".repeat(32)).unwrap();
        let kp = read_private_key_file(file.path()).unwrap();
        assert_eq!(kp.public, keypair_from_seed(&[0x11u8; 32]).public);
    }
}
