use crate::crypto::cipher_types::{BlockMode, PaddingMode};
use std::borrow::Cow;
use std::io;
use std::sync::Arc;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CipherError>;

/// Failure reported by an external primitive (AEAD construction, tag check).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PrimitiveError {
    message: Cow<'static, str>,
}

impl PrimitiveError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Error)]
pub enum CipherError {
    #[error("{algorithm}: invalid key size {size}, must be {expected} bytes")]
    KeySize {
        algorithm: &'static str,
        size: usize,
        expected: String,
    },

    #[error("crypto/cipher: iv cannot be empty for {mode} mode")]
    EmptyIv { mode: BlockMode },

    #[error("crypto/cipher: invalid iv length {size} for {mode} mode, must be {expected} bytes")]
    InvalidIv {
        mode: BlockMode,
        size: usize,
        expected: String,
    },

    #[error("crypto/cipher: nonce cannot be empty for {mode} mode")]
    EmptyNonce { mode: BlockMode },

    #[error("crypto/cipher: invalid src length {size} for {mode} mode, must be a multiple of {block_size} bytes")]
    InvalidSourceLength {
        mode: BlockMode,
        size: usize,
        block_size: usize,
    },

    #[error("crypto/cipher: failed to create cipher for {mode} mode: {source}")]
    CreateCipher {
        mode: BlockMode,
        #[source]
        source: PrimitiveError,
    },

    #[error("crypto/cipher: unsupported block mode {mode:?}")]
    UnsupportedBlockMode { mode: String },

    #[error("crypto/cipher: unsupported padding mode {padding:?}")]
    UnsupportedPaddingMode { padding: String },

    #[error("crypto/cipher: cipher primitive cannot be nil for {mode} mode")]
    NilPrimitive { mode: BlockMode },

    #[error("crypto/cipher: invalid {padding} padding")]
    InvalidPadding { padding: PaddingMode },

    #[error("crypto/cipher: {padding} padding cannot encode block size {block_size}")]
    UnsupportedBlockSize {
        padding: PaddingMode,
        block_size: usize,
    },

    #[error("{algorithm}: failed to encrypt data: {source}")]
    Encrypt {
        algorithm: &'static str,
        #[source]
        source: Box<CipherError>,
    },

    #[error("{algorithm}: failed to decrypt data: {source}")]
    Decrypt {
        algorithm: &'static str,
        #[source]
        source: Box<CipherError>,
    },

    #[error("{algorithm}: failed to read encrypted data: {source}")]
    Read {
        algorithm: &'static str,
        #[source]
        source: Box<CipherError>,
    },

    #[error("io: {0}")]
    Io(#[source] Arc<io::Error>),

    #[error("crypto/cipher: buffer size {buffer_size} is smaller than data size {data_size}")]
    Buffer { buffer_size: usize, data_size: usize },

    #[error("crypto/cipher: stream already closed")]
    StreamClosed,
}

impl CipherError {
    pub(crate) fn encrypt(algorithm: &'static str, source: CipherError) -> Self {
        CipherError::Encrypt {
            algorithm,
            source: Box::new(source),
        }
    }

    pub(crate) fn decrypt(algorithm: &'static str, source: CipherError) -> Self {
        CipherError::Decrypt {
            algorithm,
            source: Box::new(source),
        }
    }

    pub(crate) fn read(algorithm: &'static str, source: CipherError) -> Self {
        CipherError::Read {
            algorithm,
            source: Box::new(source),
        }
    }
}

impl From<io::Error> for CipherError {
    fn from(err: io::Error) -> Self {
        CipherError::Io(Arc::new(err))
    }
}

impl From<CipherError> for io::Error {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::Io(inner) => io::Error::new(inner.kind(), CipherError::Io(inner)),
            other => io::Error::other(other),
        }
    }
}
