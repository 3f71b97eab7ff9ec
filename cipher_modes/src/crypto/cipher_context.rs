use crate::crypto::cipher_config::CipherConfig;
use crate::crypto::cipher_traits::{Algorithm, CipherPrimitive};
use crate::crypto::errors::{CipherError, Result};
use crate::crypto::stream::{StreamDecrypter, StreamEncrypter, StreamPolicy};
use std::io::{Read, Write};

/// Lifecycle of a cipher or stream object. `Errored` is terminal.
#[derive(Debug, Clone)]
pub(crate) enum Status {
    Ready,
    Closed,
    Errored(CipherError),
}

impl Status {
    #[inline]
    pub(crate) fn check(&self) -> Result<()> {
        match self {
            Status::Ready => Ok(()),
            Status::Closed => Err(CipherError::StreamClosed),
            Status::Errored(err) => Err(err.clone()),
        }
    }

    pub(crate) fn error(&self) -> Option<&CipherError> {
        match self {
            Status::Errored(err) => Some(err),
            _ => None,
        }
    }
}

/// A block cipher algorithm bound to a [`CipherConfig`].
///
/// The key is checked against the algorithm's [`KeySizePolicy`] once, here.
/// A rejected key is kept and returned by every later operation.
///
/// [`KeySizePolicy`]: crate::crypto::cipher_traits::KeySizePolicy
#[derive(Clone)]
pub struct Cipher<A: Algorithm> {
    algorithm: A,
    config: CipherConfig,
    status: Status,
}

impl<A: Algorithm> Cipher<A> {
    pub fn new(algorithm: A, config: CipherConfig) -> Self {
        let status = match algorithm.policy().check(config.key()) {
            Ok(()) => Status::Ready,
            Err(err) => {
                log::debug!("rejecting {} cipher: {}", config.block(), err);
                Status::Errored(err)
            }
        };
        Self {
            algorithm,
            config,
            status,
        }
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// The error recorded at construction, if the key was rejected.
    pub fn error(&self) -> Option<&CipherError> {
        self.status.error()
    }

    pub fn encrypt(&self, src: &[u8]) -> Result<Vec<u8>> {
        self.status.check()?;
        if src.is_empty() {
            return Ok(Vec::new());
        }
        let primitive = self
            .new_primitive()
            .map_err(|err| CipherError::encrypt(self.algorithm.name(), err))?;
        self.config.encrypt(src, Some(primitive.as_ref()))
    }

    pub fn decrypt(&self, src: &[u8]) -> Result<Vec<u8>> {
        self.status.check()?;
        if src.is_empty() {
            return Ok(Vec::new());
        }
        let primitive = self
            .new_primitive()
            .map_err(|err| CipherError::decrypt(self.algorithm.name(), err))?;
        self.config.decrypt(src, Some(primitive.as_ref()))
    }

    /// Wraps `writer` so that bytes written to it are encrypted.
    pub fn stream_encrypter<W: Write>(&self, writer: W) -> StreamEncrypter<W, A> {
        StreamEncrypter::new(self.clone(), writer, StreamPolicy::default())
    }

    pub fn stream_encrypter_with_policy<W: Write>(
        &self,
        writer: W,
        policy: StreamPolicy,
    ) -> StreamEncrypter<W, A> {
        StreamEncrypter::new(self.clone(), writer, policy)
    }

    /// Wraps `reader` so that reads return decrypted bytes.
    pub fn stream_decrypter<R: Read>(&self, reader: R) -> StreamDecrypter<R, A> {
        StreamDecrypter::new(self.clone(), reader)
    }

    pub(crate) fn status(&self) -> &Status {
        &self.status
    }

    pub(crate) fn new_primitive(&self) -> Result<Box<dyn CipherPrimitive>> {
        self.algorithm.new_primitive(self.config.key())
    }
}
