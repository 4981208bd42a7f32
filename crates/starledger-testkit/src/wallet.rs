//! A wallet counterpart for tests.
//!
//! The ledger never creates signatures; tests need something that does.
//! `TestWallet` holds a secp256k1 keypair and signs messages in the
//! standard wallet message-prefix scheme, producing exactly the base64
//! 65-byte recoverable signatures the proof layer verifies.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use starledger_proof::{magic_hash, p2pkh_address, Network};

/// A test-only wallet: keypair plus address encoding choices.
#[derive(Clone)]
pub struct TestWallet {
    secret: SecretKey,
    public: PublicKey,
    /// Whether to sign with the compressed-key header flag.
    pub compressed: bool,
    /// Which network's address encoding to use.
    pub network: Network,
}

impl TestWallet {
    /// Generate a wallet from a fresh random key.
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let secret = SecretKey::new(&mut rand::thread_rng());
        let public = PublicKey::from_secret_key(&secp, &secret);
        Self {
            secret,
            public,
            compressed: true,
            network: Network::Mainnet,
        }
    }

    /// Deterministic wallet from a 32-byte seed.
    ///
    /// Panics if the seed is not a valid secp256k1 scalar; test seeds
    /// like `[7; 32]` are fine.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&seed).expect("seed is not a valid secret key");
        let public = PublicKey::from_secret_key(&secp, &secret);
        Self {
            secret,
            public,
            compressed: true,
            network: Network::Mainnet,
        }
    }

    /// Use the uncompressed-key address and signature header.
    pub fn uncompressed(mut self) -> Self {
        self.compressed = false;
        self
    }

    /// Use the given network's address encoding.
    pub fn on_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// The wallet's public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// The wallet's P2PKH address.
    pub fn address(&self) -> String {
        p2pkh_address(&self.public, self.compressed, self.network)
    }

    /// Sign a message in the wallet message-prefix scheme, returning the
    /// base64 65-byte recoverable signature.
    pub fn sign(&self, message: &str) -> String {
        let secp = Secp256k1::new();
        let digest = Message::from_digest(magic_hash(message));
        let (recovery_id, compact) = secp
            .sign_ecdsa_recoverable(&digest, &self.secret)
            .serialize_compact();

        let flag = if self.compressed { 4 } else { 0 };
        let mut raw = Vec::with_capacity(65);
        raw.push(27 + recovery_id.to_i32() as u8 + flag);
        raw.extend_from_slice(&compact);
        BASE64.encode(raw)
    }
}

impl std::fmt::Debug for TestWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TestWallet({})", self.address())
    }
}
