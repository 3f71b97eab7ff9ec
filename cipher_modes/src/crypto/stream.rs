use crate::crypto::block_modes::{check_aligned, Direction, ModeEngine};
use crate::crypto::cipher_context::{Cipher, Status};
use crate::crypto::cipher_traits::{Algorithm, CipherPrimitive};
use crate::crypto::errors::{CipherError, Result};
use crate::crypto::padding::{pad, padding_block_size};
use std::io::{self, Read, Write};

/// How a [`StreamEncrypter`] turns writes into ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamPolicy {
    /// Encrypt complete blocks as they arrive and pad the tail on close.
    /// The sink receives exactly the one-shot ciphertext of everything written.
    #[default]
    Incremental,
    /// Pad and encrypt the whole accumulated buffer on every write and emit
    /// the result, matching older stream writers byte for byte.
    Reencrypt,
}

/// Encrypting adapter over a [`Write`] sink.
///
/// Call [`close`](StreamEncrypter::close) after the last write: the padded
/// final block (or the GCM message) is only produced there.
pub struct StreamEncrypter<W: Write, A: Algorithm> {
    cipher: Cipher<A>,
    writer: W,
    policy: StreamPolicy,
    primitive: Option<Box<dyn CipherPrimitive>>,
    engine: Option<ModeEngine>,
    buffer: Vec<u8>,
    processed: usize,
    received: usize,
    status: Status,
}

impl<W: Write, A: Algorithm> StreamEncrypter<W, A> {
    pub(crate) fn new(cipher: Cipher<A>, writer: W, policy: StreamPolicy) -> Self {
        let status = cipher.status().clone();
        Self {
            cipher,
            writer,
            policy,
            primitive: None,
            engine: None,
            buffer: Vec::new(),
            processed: 0,
            received: 0,
            status,
        }
    }

    pub fn policy(&self) -> StreamPolicy {
        self.policy
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Accepts `chunk` and returns its length. Errors are recorded and
    /// returned again by every later call.
    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<usize> {
        self.status.check()?;
        match self.process(chunk) {
            Ok(()) => Ok(chunk.len()),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Emits the final padded block or sealed message and flushes the sink.
    pub fn close(&mut self) -> Result<()> {
        if let Status::Closed = self.status {
            return Ok(());
        }
        self.status.check()?;
        if let Err(err) = self.finish() {
            return Err(self.fail(err));
        }
        log::debug!(
            "closed {} stream encrypter after {} bytes",
            self.cipher.config().block(),
            self.received
        );
        self.status = Status::Closed;
        Ok(())
    }

    fn fail(&mut self, err: CipherError) -> CipherError {
        log::debug!("stream encrypter failed: {err}");
        self.status = Status::Errored(err.clone());
        err
    }

    fn prepare(&mut self) -> Result<()> {
        if self.primitive.is_none() {
            let name = self.cipher.algorithm().name();
            let primitive = self
                .cipher
                .new_primitive()
                .map_err(|err| CipherError::encrypt(name, err))?;
            self.primitive = Some(primitive);
        }
        if self.engine.is_none() {
            if let Some(primitive) = self.primitive.as_deref() {
                self.engine = Some(ModeEngine::new(
                    self.cipher.config(),
                    primitive,
                    Direction::Encrypt,
                )?);
            }
        }
        Ok(())
    }

    fn process(&mut self, chunk: &[u8]) -> Result<()> {
        self.prepare()?;
        self.received += chunk.len();
        self.buffer.extend_from_slice(chunk);

        let mode = self.cipher.config().block();
        let (Some(primitive), Some(engine)) = (self.primitive.as_deref(), self.engine.as_mut()) else {
            return Err(CipherError::NilPrimitive { mode });
        };

        let output = match self.policy {
            StreamPolicy::Reencrypt => self.cipher.config().encrypt(&self.buffer, Some(primitive))?,
            StreamPolicy::Incremental => match engine {
                ModeEngine::Blocks(chain) => {
                    // At least one byte stays buffered so the padding on close
                    // sees the real last byte of the plaintext. A padding unit
                    // that differs from the block size only lines up for some
                    // total lengths, so nothing is emitted before close.
                    let unit = padding_block_size(self.cipher.config().padding(), chain.block_size);
                    let aligned = match self.buffer.len() {
                        _ if unit != chain.block_size => 0,
                        0 => 0,
                        len => (len - 1) / chain.block_size * chain.block_size,
                    };
                    let output = chain.apply(primitive, &self.buffer[..aligned]);
                    self.buffer.drain(..aligned);
                    self.processed += aligned;
                    output
                }
                ModeEngine::Keystream(keystream) => {
                    let output = keystream.apply(primitive, &self.buffer);
                    self.processed += self.buffer.len();
                    self.buffer.clear();
                    output
                }
                // Sealed in one piece on close.
                ModeEngine::Aead(_) => Vec::new(),
            },
        };

        emit(&mut self.writer, self.cipher.algorithm().name(), &output)
    }

    fn finish(&mut self) -> Result<()> {
        let name = self.cipher.algorithm().name();
        if self.policy == StreamPolicy::Incremental && self.received > 0 {
            self.prepare()?;
            let config = self.cipher.config();
            let (Some(primitive), Some(engine)) = (self.primitive.as_deref(), self.engine.as_mut()) else {
                return Err(CipherError::NilPrimitive {
                    mode: config.block(),
                });
            };

            let output = match engine {
                ModeEngine::Blocks(chain) => {
                    let padded = pad(&self.buffer, chain.block_size, config.padding());
                    check_aligned(config.block(), self.processed + padded.len(), chain.block_size)?;
                    self.buffer.clear();
                    chain.apply(primitive, &padded)
                }
                ModeEngine::Keystream(_) => Vec::new(),
                ModeEngine::Aead(gcm) => {
                    let sealed = gcm.seal(&self.buffer)?;
                    self.buffer.clear();
                    sealed
                }
            };
            emit(&mut self.writer, name, &output)?;
        }
        self.writer
            .flush()
            .map_err(|err| CipherError::encrypt(name, err.into()))
    }
}

fn emit<W: Write>(writer: &mut W, name: &'static str, output: &[u8]) -> Result<()> {
    if output.is_empty() {
        return Ok(());
    }
    writer
        .write_all(output)
        .map_err(|err| CipherError::encrypt(name, err.into()))
}

impl<W: Write, A: Algorithm> Write for StreamEncrypter<W, A> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = self.status.error() {
            return Err(err.clone().into());
        }
        self.writer.flush()
    }
}

/// Decrypting adapter over a [`Read`] source.
///
/// The first read drains the source and decrypts it in one pass; later reads
/// are served from the cached plaintext.
pub struct StreamDecrypter<R: Read, A: Algorithm> {
    cipher: Cipher<A>,
    reader: R,
    primitive: Option<Box<dyn CipherPrimitive>>,
    plaintext: Option<Vec<u8>>,
    position: usize,
    status: Status,
}

impl<R: Read, A: Algorithm> StreamDecrypter<R, A> {
    pub(crate) fn new(cipher: Cipher<A>, reader: R) -> Self {
        let status = cipher.status().clone();
        Self {
            cipher,
            reader,
            primitive: None,
            plaintext: None,
            position: 0,
            status,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Copies decrypted bytes into `buf` and advances the cursor.
    ///
    /// Returns `Ok(0)` once everything has been read. When `buf` cannot hold
    /// the rest of the plaintext it is filled completely and
    /// [`CipherError::Buffer`] reports the sizes; the remaining bytes are
    /// returned by the next call.
    pub fn read_plaintext(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.status.check()?;
        if let Err(err) = self.fill() {
            log::debug!("stream decrypter failed: {err}");
            self.status = Status::Errored(err.clone());
            return Err(err);
        }

        let Some(plaintext) = self.plaintext.as_deref() else {
            return Ok(0);
        };
        let remaining = &plaintext[self.position..];
        let copied = remaining.len().min(buf.len());
        buf[..copied].copy_from_slice(&remaining[..copied]);
        self.position += copied;

        if copied < remaining.len() {
            return Err(CipherError::Buffer {
                buffer_size: buf.len(),
                data_size: plaintext.len(),
            });
        }
        Ok(copied)
    }

    fn fill(&mut self) -> Result<()> {
        if self.plaintext.is_some() {
            return Ok(());
        }
        let name = self.cipher.algorithm().name();

        let mut ciphertext = Vec::new();
        self.reader
            .read_to_end(&mut ciphertext)
            .map_err(|err| CipherError::read(name, err.into()))?;

        let plaintext = if ciphertext.is_empty() {
            Vec::new()
        } else {
            if self.primitive.is_none() {
                let primitive = self
                    .cipher
                    .new_primitive()
                    .map_err(|err| CipherError::decrypt(name, err))?;
                self.primitive = Some(primitive);
            }
            self.cipher
                .config()
                .decrypt(&ciphertext, self.primitive.as_deref())?
        };

        log::debug!(
            "decrypted {} ciphertext bytes into {} plaintext bytes",
            ciphertext.len(),
            plaintext.len()
        );
        self.plaintext = Some(plaintext);
        Ok(())
    }
}

impl<R: Read, A: Algorithm> Read for StreamDecrypter<R, A> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.read_plaintext(buf) {
            Ok(copied) => Ok(copied),
            // A short buffer is an ordinary partial read here.
            Err(CipherError::Buffer { buffer_size, .. }) => Ok(buffer_size),
            Err(err) => Err(err.into()),
        }
    }
}
