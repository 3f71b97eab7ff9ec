use crate::crypto::block_modes;
use crate::crypto::cipher_traits::CipherPrimitive;
use crate::crypto::cipher_types::{BlockMode, PaddingMode};
use crate::crypto::errors::Result;

/// Key material and mode selection for one cipher.
///
/// Setters never validate; key sizes are checked when a
/// [`Cipher`](crate::crypto::cipher_context::Cipher) is built from the config,
/// and IV/nonce lengths when data is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherConfig {
    key: Vec<u8>,
    iv: Vec<u8>,
    nonce: Vec<u8>,
    aad: Vec<u8>,
    block: BlockMode,
    padding: PaddingMode,
    strict_padding: bool,
}

impl CipherConfig {
    pub fn new(block: BlockMode) -> Self {
        let padding = if block.requires_padding() {
            PaddingMode::PKCS7
        } else {
            PaddingMode::No
        };
        Self {
            key: Vec::new(),
            iv: Vec::new(),
            nonce: Vec::new(),
            aad: Vec::new(),
            block,
            padding,
            strict_padding: false,
        }
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_iv(mut self, iv: impl Into<Vec<u8>>) -> Self {
        self.iv = iv.into();
        self
    }

    pub fn with_nonce(mut self, nonce: impl Into<Vec<u8>>) -> Self {
        self.nonce = nonce.into();
        self
    }

    pub fn with_aad(mut self, aad: impl Into<Vec<u8>>) -> Self {
        self.aad = aad.into();
        self
    }

    pub fn with_padding(mut self, padding: PaddingMode) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_strict_padding(mut self, strict: bool) -> Self {
        self.strict_padding = strict;
        self
    }

    pub fn set_key(&mut self, key: &[u8]) {
        self.key = key.to_vec();
    }

    pub fn set_iv(&mut self, iv: &[u8]) {
        self.iv = iv.to_vec();
    }

    pub fn set_nonce(&mut self, nonce: &[u8]) {
        self.nonce = nonce.to_vec();
    }

    pub fn set_aad(&mut self, aad: &[u8]) {
        self.aad = aad.to_vec();
    }

    pub fn set_padding(&mut self, padding: PaddingMode) {
        self.padding = padding;
    }

    pub fn set_block(&mut self, block: BlockMode) {
        self.block = block;
    }

    /// Makes decryption fail on malformed padding instead of returning the data as is.
    pub fn set_strict_padding(&mut self, strict: bool) {
        self.strict_padding = strict;
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    pub fn aad(&self) -> &[u8] {
        &self.aad
    }

    pub fn block(&self) -> BlockMode {
        self.block
    }

    pub fn padding(&self) -> PaddingMode {
        self.padding
    }

    pub fn strict_padding(&self) -> bool {
        self.strict_padding
    }

    /// Pads (CBC/ECB) and encrypts `src` with `primitive` in the configured mode.
    pub fn encrypt(&self, src: &[u8], primitive: Option<&dyn CipherPrimitive>) -> Result<Vec<u8>> {
        block_modes::encrypt(src, self, primitive)
    }

    /// Decrypts `src` with `primitive` and removes padding (CBC/ECB).
    pub fn decrypt(&self, src: &[u8], primitive: Option<&dyn CipherPrimitive>) -> Result<Vec<u8>> {
        block_modes::decrypt(src, self, primitive)
    }
}
