//! Wallet-compatible signature verification.
//!
//! Implements the Bitcoin signed-message scheme used by standard wallet
//! software: a 65-byte recoverable ECDSA signature (base64) over the
//! magic-prefixed double-SHA256 of the message. Verification recovers
//! the public key from the signature and compares its P2PKH address to
//! the claimed one, honoring the compressed/uncompressed header flag.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ripemd::Ripemd160;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1};
use sha2::{Digest, Sha256};

use crate::challenge::{check_window, parse_issue_time};
use crate::error::VerifyError;

/// Prefix string of the signed-message digest.
const MESSAGE_MAGIC: &str = "Bitcoin Signed Message:\n";

/// Which network's address encoding recovered keys are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// P2PKH address version byte.
    pub fn p2pkh_version(self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet => 0x6f,
        }
    }
}

/// Double-SHA256 of the magic-prefixed message, the digest wallets sign.
pub fn magic_hash(message: &str) -> [u8; 32] {
    let mut buf = Vec::with_capacity(MESSAGE_MAGIC.len() + message.len() + 10);
    write_varint(&mut buf, MESSAGE_MAGIC.len() as u64);
    buf.extend_from_slice(MESSAGE_MAGIC.as_bytes());
    write_varint(&mut buf, message.len() as u64);
    buf.extend_from_slice(message.as_bytes());

    let first = Sha256::digest(&buf);
    Sha256::digest(first).into()
}

/// Bitcoin variable-length integer.
fn write_varint(buf: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => buf.push(n as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&n.to_le_bytes());
        }
    }
}

/// Derive the P2PKH base58check address for a public key.
pub fn p2pkh_address(key: &PublicKey, compressed: bool, network: Network) -> String {
    let serialized: Vec<u8> = if compressed {
        key.serialize().to_vec()
    } else {
        key.serialize_uncompressed().to_vec()
    };

    let hash160 = Ripemd160::digest(Sha256::digest(&serialized));

    let mut payload = Vec::with_capacity(21);
    payload.push(network.p2pkh_version());
    payload.extend_from_slice(&hash160);
    bs58::encode(payload).with_check().into_string()
}

/// Verify a wallet signature over `message` for `address`.
///
/// `signature` is the base64 of a 65-byte recoverable signature: one
/// header byte (27..=34, recovery id plus compressed flag) followed by
/// the 64-byte compact signature. Undecodable input is
/// [`VerifyError::MalformedSignature`]; a decodable signature that does
/// not match the address is [`VerifyError::SignatureInvalid`].
pub fn verify_wallet_signature(
    message: &str,
    address: &str,
    signature: &str,
    network: Network,
) -> Result<(), VerifyError> {
    let raw = BASE64
        .decode(signature)
        .map_err(|e| VerifyError::MalformedSignature(e.to_string()))?;
    if raw.len() != 65 {
        return Err(VerifyError::MalformedSignature(format!(
            "expected 65 bytes, got {}",
            raw.len()
        )));
    }

    let header = raw[0];
    if !(27..=34).contains(&header) {
        return Err(VerifyError::MalformedSignature(format!(
            "unsupported header byte {header}"
        )));
    }
    let compressed = header >= 31;
    let recovery_id = RecoveryId::from_i32(i32::from((header - 27) & 3))
        .map_err(|e| VerifyError::MalformedSignature(e.to_string()))?;
    let recoverable = RecoverableSignature::from_compact(&raw[1..], recovery_id)
        .map_err(|e| VerifyError::MalformedSignature(e.to_string()))?;

    let digest = Message::from_digest(magic_hash(message));

    let secp = Secp256k1::verification_only();
    let key = secp
        .recover_ecdsa(&digest, &recoverable)
        .map_err(|_| VerifyError::SignatureInvalid)?;

    if p2pkh_address(&key, compressed, network) == address {
        Ok(())
    } else {
        Err(VerifyError::SignatureInvalid)
    }
}

/// Full submission check: parse the embedded issue time, check the
/// expiry window against `now`, then verify the signature. Expiry is
/// checked before the signature so a stale challenge is always
/// reported as [`VerifyError::Expired`].
///
/// Pure predicate plus parse; no mutation, no internal clock.
pub fn verify_submission_at(
    message: &str,
    address: &str,
    signature: &str,
    network: Network,
    now: i64,
) -> Result<(), VerifyError> {
    let issue_time = parse_issue_time(message)?;
    check_window(issue_time, now)?;
    verify_wallet_signature(message, address, signature, network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::issue_challenge;
    use secp256k1::SecretKey;

    /// A wallet counterpart for tests: the system under test only
    /// verifies, so signing lives here.
    fn sign(message: &str, secret: &SecretKey, compressed: bool) -> String {
        let secp = Secp256k1::new();
        let digest = Message::from_digest(magic_hash(message));
        let (recovery_id, compact) = secp
            .sign_ecdsa_recoverable(&digest, secret)
            .serialize_compact();

        let mut raw = Vec::with_capacity(65);
        let flag = if compressed { 4 } else { 0 };
        raw.push(27 + recovery_id.to_i32() as u8 + flag);
        raw.extend_from_slice(&compact);
        BASE64.encode(raw)
    }

    fn wallet(seed: u8) -> (SecretKey, PublicKey) {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
        let public = PublicKey::from_secret_key(&secp, &secret);
        (secret, public)
    }

    #[test]
    fn test_verify_compressed_signature() {
        let (secret, public) = wallet(0x11);
        let address = p2pkh_address(&public, true, Network::Mainnet);

        let message = issue_challenge(&address, 1_700_000_000);
        let signature = sign(&message, &secret, true);

        assert_eq!(
            verify_wallet_signature(&message, &address, &signature, Network::Mainnet),
            Ok(())
        );
    }

    #[test]
    fn test_verify_uncompressed_signature() {
        let (secret, public) = wallet(0x22);
        let address = p2pkh_address(&public, false, Network::Mainnet);

        let message = issue_challenge(&address, 1_700_000_000);
        let signature = sign(&message, &secret, false);

        assert_eq!(
            verify_wallet_signature(&message, &address, &signature, Network::Mainnet),
            Ok(())
        );
    }

    #[test]
    fn test_testnet_address_differs() {
        let (secret, public) = wallet(0x33);
        let mainnet = p2pkh_address(&public, true, Network::Mainnet);
        let testnet = p2pkh_address(&public, true, Network::Testnet);
        assert_ne!(mainnet, testnet);

        let message = issue_challenge(&testnet, 1_700_000_000);
        let signature = sign(&message, &secret, true);

        assert_eq!(
            verify_wallet_signature(&message, &testnet, &signature, Network::Testnet),
            Ok(())
        );
        assert_eq!(
            verify_wallet_signature(&message, &testnet, &signature, Network::Mainnet),
            Err(VerifyError::SignatureInvalid)
        );
    }

    #[test]
    fn test_wrong_address_rejected() {
        let (secret, _) = wallet(0x44);
        let (_, other_public) = wallet(0x55);
        let other_address = p2pkh_address(&other_public, true, Network::Mainnet);

        let message = issue_challenge(&other_address, 1_700_000_000);
        let signature = sign(&message, &secret, true);

        assert_eq!(
            verify_wallet_signature(&message, &other_address, &signature, Network::Mainnet),
            Err(VerifyError::SignatureInvalid)
        );
    }

    #[test]
    fn test_tampered_message_rejected() {
        let (secret, public) = wallet(0x66);
        let address = p2pkh_address(&public, true, Network::Mainnet);

        let message = issue_challenge(&address, 1_700_000_000);
        let signature = sign(&message, &secret, true);

        let tampered = format!("{message}x");
        assert_eq!(
            verify_wallet_signature(&tampered, &address, &signature, Network::Mainnet),
            Err(VerifyError::SignatureInvalid)
        );
    }

    #[test]
    fn test_malformed_signature_inputs() {
        assert!(matches!(
            verify_wallet_signature("m", "addr", "not-base64!!!", Network::Mainnet),
            Err(VerifyError::MalformedSignature(_))
        ));

        // Valid base64, wrong length.
        let short = BASE64.encode([0u8; 10]);
        assert!(matches!(
            verify_wallet_signature("m", "addr", &short, Network::Mainnet),
            Err(VerifyError::MalformedSignature(_))
        ));

        // 65 bytes but header byte out of range.
        let mut raw = vec![0u8; 65];
        raw[0] = 99;
        let bad_header = BASE64.encode(&raw);
        assert!(matches!(
            verify_wallet_signature("m", "addr", &bad_header, Network::Mainnet),
            Err(VerifyError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_submission_window_boundary() {
        let (secret, public) = wallet(0x77);
        let address = p2pkh_address(&public, true, Network::Mainnet);

        let issued = 1_700_000_000;
        let message = issue_challenge(&address, issued);
        let signature = sign(&message, &secret, true);

        // t + 299: inside the window, signature valid.
        assert_eq!(
            verify_submission_at(&message, &address, &signature, Network::Mainnet, issued + 299),
            Ok(())
        );

        // t + 300: expired before the signature is even looked at.
        assert_eq!(
            verify_submission_at(&message, &address, &signature, Network::Mainnet, issued + 300),
            Err(VerifyError::Expired {
                elapsed: 300,
                window: 300
            })
        );
    }

    #[test]
    fn test_known_address_derivation() {
        // Secret key 0x01..01 has a well-known compressed pubkey; sanity
        // check that derivation is stable across runs.
        let (_, public) = wallet(0x01);
        let a1 = p2pkh_address(&public, true, Network::Mainnet);
        let a2 = p2pkh_address(&public, true, Network::Mainnet);
        assert_eq!(a1, a2);
        assert!(a1.starts_with('1'));

        let uncompressed = p2pkh_address(&public, false, Network::Mainnet);
        assert_ne!(a1, uncompressed);
    }
}
