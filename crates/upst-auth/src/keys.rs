//! RSA key material bound into the session token.

use base64::{Engine, engine::general_purpose::STANDARD};
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use upst_core::{Error, Result};
use zeroize::Zeroizing;

/// Modulus size of generated keys.
pub const KEY_BITS: usize = 2048;

/// RSA keypair generated once per run and held in memory only.
pub struct KeyPair {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl KeyPair {
    /// Generate a fresh 2048-bit keypair.
    pub fn generate() -> Result<Self> {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, KEY_BITS)
            .map_err(|e| Error::KeyMaterial(format!("RSA key generation failed: {}", e)))?;
        Ok(Self::from_private_key(private_key))
    }

    pub fn from_private_key(private_key: RsaPrivateKey) -> Self {
        let public_key = RsaPublicKey::from(&private_key);
        Self {
            private_key,
            public_key,
        }
    }

    /// Load a fixed keypair from a PKCS#1 PEM private key.
    pub fn from_pkcs1_pem(pem: &str) -> Result<Self> {
        let private_key = RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|e| Error::KeyMaterial(format!("Invalid PKCS#1 private key: {}", e)))?;
        Ok(Self::from_private_key(private_key))
    }

    pub fn bits(&self) -> usize {
        self.public_key.size() * 8
    }

    /// SubjectPublicKeyInfo DER encoding of the public key.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        let document = self
            .public_key
            .to_public_key_der()
            .map_err(|e| Error::KeyMaterial(format!("Public key DER export failed: {}", e)))?;
        Ok(document.as_bytes().to_vec())
    }

    /// Base64 of the DER public key, as sent in the `public_key` form field.
    pub fn public_key_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.public_key_der()?))
    }

    pub fn fingerprint(&self) -> Result<Fingerprint> {
        Ok(Fingerprint::of_der(&self.public_key_der()?))
    }

    /// PKCS#1 PEM of the private key.
    pub fn private_key_pem(&self) -> Result<Zeroizing<String>> {
        self.private_key
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| Error::KeyMaterial(format!("Private key PEM export failed: {}", e)))
    }

    /// SubjectPublicKeyInfo PEM of the public key.
    pub fn public_key_pem(&self) -> Result<String> {
        self.public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| Error::KeyMaterial(format!("Public key PEM export failed: {}", e)))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// Colon-delimited lowercase hex MD5 of a DER public key.
///
/// Used by the provider as a lookup key only, never for security decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of_der(der: &[u8]) -> Self {
        let digest = hex::encode(md5::compute(der).0);
        let pairs: Vec<&str> = (0..digest.len()).step_by(2).map(|i| &digest[i..i + 2]).collect();
        Self(pairs.join(":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
