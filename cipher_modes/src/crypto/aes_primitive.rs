use crate::crypto::cipher_traits::{AeadPrimitive, Algorithm, CipherPrimitive, KeySizePolicy};
use crate::crypto::errors::{PrimitiveError, Result};
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};

type Aes192Gcm = AesGcm<Aes192, U12>;

pub const AES_BLOCK_SIZE: usize = 16;
pub const GCM_NONCE_SIZE: usize = 12;

/// AES backed by the RustCrypto `aes` and `aes-gcm` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes;

impl Algorithm for Aes {
    fn policy(&self) -> KeySizePolicy {
        KeySizePolicy::AES
    }

    fn new_primitive(&self, key: &[u8]) -> Result<Box<dyn CipherPrimitive>> {
        Ok(Box::new(AesPrimitive::new(key)?))
    }
}

enum AesBlock {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

macro_rules! with_block {
    ($block:expr, $cipher:ident => $body:expr) => {
        match $block {
            AesBlock::Aes128($cipher) => $body,
            AesBlock::Aes192($cipher) => $body,
            AesBlock::Aes256($cipher) => $body,
        }
    };
}

pub struct AesPrimitive {
    block: AesBlock,
    key: Vec<u8>,
}

impl AesPrimitive {
    pub fn new(key: &[u8]) -> Result<Self> {
        KeySizePolicy::AES.check(key)?;
        let block = match key.len() {
            16 => AesBlock::Aes128(Aes128::new(GenericArray::from_slice(key))),
            24 => AesBlock::Aes192(Aes192::new(GenericArray::from_slice(key))),
            _ => AesBlock::Aes256(Aes256::new(GenericArray::from_slice(key))),
        };
        Ok(Self {
            block,
            key: key.to_vec(),
        })
    }
}

impl CipherPrimitive for AesPrimitive {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn encrypt(&self, dst: &mut [u8], src: &[u8]) {
        dst.copy_from_slice(src);
        with_block!(&self.block, cipher => cipher.encrypt_block(GenericArray::from_mut_slice(dst)));
    }

    fn decrypt(&self, dst: &mut [u8], src: &[u8]) {
        dst.copy_from_slice(src);
        with_block!(&self.block, cipher => cipher.decrypt_block(GenericArray::from_mut_slice(dst)));
    }

    fn new_gcm(&self, nonce_size: usize) -> std::result::Result<Box<dyn AeadPrimitive>, PrimitiveError> {
        if nonce_size != GCM_NONCE_SIZE {
            return Err(PrimitiveError::new(format!(
                "cipher: incorrect nonce length {nonce_size}, must be {GCM_NONCE_SIZE} bytes"
            )));
        }
        let invalid_key = |_| PrimitiveError::new("cipher: invalid key length for GCM");
        let aead: Box<dyn AeadPrimitive> = match self.key.len() {
            16 => Box::new(Gcm(Aes128Gcm::new_from_slice(&self.key).map_err(invalid_key)?)),
            24 => Box::new(Gcm(Aes192Gcm::new_from_slice(&self.key).map_err(invalid_key)?)),
            _ => Box::new(Gcm(Aes256Gcm::new_from_slice(&self.key).map_err(invalid_key)?)),
        };
        Ok(aead)
    }
}

struct Gcm<C>(C);

impl<C> Gcm<C> {
    fn check_nonce(nonce: &[u8]) -> std::result::Result<(), PrimitiveError> {
        if nonce.len() != GCM_NONCE_SIZE {
            return Err(PrimitiveError::new(format!(
                "cipher: incorrect nonce length {}, must be {GCM_NONCE_SIZE} bytes",
                nonce.len()
            )));
        }
        Ok(())
    }
}

impl<C> AeadPrimitive for Gcm<C>
where
    C: Aead + Send + Sync,
{
    fn nonce_size(&self) -> usize {
        GCM_NONCE_SIZE
    }

    fn seal(&self, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> std::result::Result<Vec<u8>, PrimitiveError> {
        Self::check_nonce(nonce)?;
        self.0
            .encrypt(GenericArray::from_slice(nonce), Payload { msg: plaintext, aad })
            .map_err(|_| PrimitiveError::new("cipher: failed to seal message"))
    }

    fn open(&self, nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> std::result::Result<Vec<u8>, PrimitiveError> {
        Self::check_nonce(nonce)?;
        self.0
            .decrypt(GenericArray::from_slice(nonce), Payload { msg: ciphertext, aad })
            .map_err(|_| PrimitiveError::new("cipher: message authentication failed"))
    }
}
