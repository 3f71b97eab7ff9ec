use crate::crypto::cipher_config::CipherConfig;
use crate::crypto::cipher_traits::{AeadPrimitive, CipherPrimitive};
use crate::crypto::cipher_types::BlockMode;
use crate::crypto::errors::{CipherError, PrimitiveError, Result};
use crate::crypto::padding::{
    has_length_byte, pad, padding_block_size, unpad, unpad_strict, MAX_LENGTH_BYTE_BLOCK,
};
use rayon::prelude::*;

// ECB inputs at least this large are split across the rayon pool.
const PARALLELISM_THRESHOLD: usize = 64 * 1024;
// Nonce length that CTR accepts in place of a full counter block.
const CTR_NONCE_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Encrypt,
    Decrypt,
}

/// Pads (CBC/ECB) and encrypts `src` in the mode selected by `config`.
pub fn encrypt(
    src: &[u8],
    config: &CipherConfig,
    primitive: Option<&dyn CipherPrimitive>,
) -> Result<Vec<u8>> {
    let mode = config.block();
    let primitive = primitive.ok_or(CipherError::NilPrimitive { mode })?;

    match ModeEngine::new(config, primitive, Direction::Encrypt)? {
        ModeEngine::Blocks(mut chain) => {
            let padded = pad(src, chain.block_size, config.padding());
            check_aligned(mode, padded.len(), chain.block_size)?;
            Ok(chain.apply(primitive, &padded))
        }
        ModeEngine::Keystream(mut keystream) => Ok(keystream.apply(primitive, src)),
        ModeEngine::Aead(gcm) => gcm.seal(src),
    }
}

/// Decrypts `src` in the mode selected by `config` and strips padding (CBC/ECB).
pub fn decrypt(
    src: &[u8],
    config: &CipherConfig,
    primitive: Option<&dyn CipherPrimitive>,
) -> Result<Vec<u8>> {
    let mode = config.block();
    let primitive = primitive.ok_or(CipherError::NilPrimitive { mode })?;

    match ModeEngine::new(config, primitive, Direction::Decrypt)? {
        ModeEngine::Blocks(mut chain) => {
            check_aligned(mode, src.len(), chain.block_size)?;
            let plain = chain.apply(primitive, src);
            if config.strict_padding() {
                unpad_strict(&plain, chain.block_size, config.padding())
            } else {
                Ok(unpad(&plain, config.padding()))
            }
        }
        ModeEngine::Keystream(mut keystream) => Ok(keystream.apply(primitive, src)),
        ModeEngine::Aead(gcm) => gcm.open(src),
    }
}

pub(crate) fn check_aligned(mode: BlockMode, size: usize, block_size: usize) -> Result<()> {
    if size % block_size != 0 {
        return Err(CipherError::InvalidSourceLength {
            mode,
            size,
            block_size,
        });
    }
    Ok(())
}

/// Validated, resumable state for one pass over the data.
pub(crate) enum ModeEngine {
    /// ECB and CBC: whole blocks only.
    Blocks(BlockChain),
    /// CTR, CFB and OFB: any length, continues mid-block.
    Keystream(Keystream),
    /// GCM: the whole message in one call.
    Aead(Gcm),
}

impl ModeEngine {
    pub(crate) fn new(
        config: &CipherConfig,
        primitive: &dyn CipherPrimitive,
        direction: Direction,
    ) -> Result<Self> {
        let mode = config.block();
        let block_size = primitive.block_size();
        log::trace!("preparing {mode} {direction:?} with block size {block_size}");

        if block_size == 0 {
            return Err(CipherError::CreateCipher {
                mode,
                source: PrimitiveError::new("cipher: block size must not be zero"),
            });
        }
        let padding = config.padding();
        if mode.requires_padding()
            && has_length_byte(padding)
            && padding_block_size(padding, block_size) > MAX_LENGTH_BYTE_BLOCK
        {
            return Err(CipherError::UnsupportedBlockSize {
                padding,
                block_size,
            });
        }

        let engine = match mode {
            BlockMode::ECB => ModeEngine::Blocks(BlockChain {
                mode,
                direction,
                block_size,
                prev: Vec::new(),
            }),
            BlockMode::CBC => ModeEngine::Blocks(BlockChain {
                mode,
                direction,
                block_size,
                prev: checked_iv(mode, config.iv(), block_size)?.to_vec(),
            }),
            BlockMode::CFB | BlockMode::OFB => ModeEngine::Keystream(Keystream::new(
                mode,
                direction,
                checked_iv(mode, config.iv(), block_size)?.to_vec(),
            )),
            BlockMode::CTR => ModeEngine::Keystream(Keystream::new(
                mode,
                direction,
                counter_block(config, block_size)?,
            )),
            BlockMode::GCM => ModeEngine::Aead(Gcm::new(config, primitive)?),
        };
        Ok(engine)
    }
}

fn checked_iv(mode: BlockMode, iv: &[u8], block_size: usize) -> Result<&[u8]> {
    if iv.is_empty() {
        return Err(CipherError::EmptyIv { mode });
    }
    if iv.len() != block_size {
        return Err(CipherError::InvalidIv {
            mode,
            size: iv.len(),
            expected: block_size.to_string(),
        });
    }
    Ok(iv)
}

/// Initial CTR counter: the IV, or the nonce when no IV is set.
///
/// A 12-byte value is zero-extended so the low bytes count from zero.
fn counter_block(config: &CipherConfig, block_size: usize) -> Result<Vec<u8>> {
    let mode = BlockMode::CTR;
    let source = if config.iv().is_empty() {
        config.nonce()
    } else {
        config.iv()
    };

    if source.is_empty() {
        return Err(CipherError::EmptyIv { mode });
    }
    if source.len() == block_size {
        return Ok(source.to_vec());
    }
    if source.len() == CTR_NONCE_SIZE && CTR_NONCE_SIZE < block_size {
        let mut counter = source.to_vec();
        counter.resize(block_size, 0);
        return Ok(counter);
    }
    Err(CipherError::InvalidIv {
        mode,
        size: source.len(),
        expected: format!("{block_size} or {CTR_NONCE_SIZE}"),
    })
}

pub(crate) struct BlockChain {
    mode: BlockMode,
    direction: Direction,
    pub(crate) block_size: usize,
    // Previous ciphertext block for CBC, empty for ECB.
    prev: Vec<u8>,
}

impl BlockChain {
    /// Transforms block-aligned `data`, carrying the CBC chain across calls.
    pub(crate) fn apply(&mut self, primitive: &dyn CipherPrimitive, data: &[u8]) -> Vec<u8> {
        let block_size = self.block_size;
        let mut out = vec![0u8; data.len()];

        match (self.mode, self.direction) {
            (BlockMode::CBC, Direction::Encrypt) => {
                let mut block = vec![0u8; block_size];
                for (dst, src) in out.chunks_mut(block_size).zip(data.chunks(block_size)) {
                    for ((b, &s), &p) in block.iter_mut().zip(src).zip(&self.prev) {
                        *b = s ^ p;
                    }
                    primitive.encrypt(dst, &block);
                    self.prev.copy_from_slice(dst);
                }
            }
            (BlockMode::CBC, Direction::Decrypt) => {
                for (dst, src) in out.chunks_mut(block_size).zip(data.chunks(block_size)) {
                    primitive.decrypt(dst, src);
                    for (d, &p) in dst.iter_mut().zip(&self.prev) {
                        *d ^= p;
                    }
                    self.prev.copy_from_slice(src);
                }
            }
            (_, direction) if data.len() >= PARALLELISM_THRESHOLD => {
                out.par_chunks_mut(block_size)
                    .zip(data.par_chunks(block_size))
                    .for_each(|(dst, src)| transform(primitive, direction, dst, src));
            }
            (_, direction) => {
                for (dst, src) in out.chunks_mut(block_size).zip(data.chunks(block_size)) {
                    transform(primitive, direction, dst, src);
                }
            }
        }

        out
    }
}

#[inline]
fn transform(primitive: &dyn CipherPrimitive, direction: Direction, dst: &mut [u8], src: &[u8]) {
    match direction {
        Direction::Encrypt => primitive.encrypt(dst, src),
        Direction::Decrypt => primitive.decrypt(dst, src),
    }
}

pub(crate) struct Keystream {
    mode: BlockMode,
    direction: Direction,
    // CTR: next counter. OFB: last keystream block. CFB: ciphertext being collected.
    register: Vec<u8>,
    keystream: Vec<u8>,
    used: usize,
}

impl Keystream {
    fn new(mode: BlockMode, direction: Direction, register: Vec<u8>) -> Self {
        let block_size = register.len();
        Self {
            mode,
            direction,
            register,
            keystream: vec![0u8; block_size],
            used: block_size,
        }
    }

    /// XORs `data` with the keystream, resuming where the previous call stopped.
    pub(crate) fn apply(&mut self, primitive: &dyn CipherPrimitive, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len());
        for &byte in data {
            if self.used == self.keystream.len() {
                self.refill(primitive);
            }
            let mixed = byte ^ self.keystream[self.used];
            if self.mode == BlockMode::CFB {
                self.register[self.used] = match self.direction {
                    Direction::Encrypt => mixed,
                    Direction::Decrypt => byte,
                };
            }
            self.used += 1;
            out.push(mixed);
        }
        out
    }

    fn refill(&mut self, primitive: &dyn CipherPrimitive) {
        primitive.encrypt(&mut self.keystream, &self.register);
        match self.mode {
            BlockMode::CTR => increment_counter(&mut self.register),
            BlockMode::OFB => self.register.copy_from_slice(&self.keystream),
            _ => {}
        }
        self.used = 0;
    }
}

/// Big-endian increment over the whole counter block.
#[inline]
fn increment_counter(counter: &mut [u8]) {
    for byte in counter.iter_mut().rev() {
        let (next, overflow) = byte.overflowing_add(1);
        *byte = next;
        if !overflow {
            break;
        }
    }
}

pub(crate) struct Gcm {
    aead: Box<dyn AeadPrimitive>,
    nonce: Vec<u8>,
    aad: Vec<u8>,
}

impl Gcm {
    fn new(config: &CipherConfig, primitive: &dyn CipherPrimitive) -> Result<Self> {
        let mode = BlockMode::GCM;
        if config.nonce().is_empty() {
            return Err(CipherError::EmptyNonce { mode });
        }
        let aead = primitive
            .new_gcm(config.nonce().len())
            .map_err(|source| CipherError::CreateCipher { mode, source })?;
        Ok(Self {
            aead,
            nonce: config.nonce().to_vec(),
            aad: config.aad().to_vec(),
        })
    }

    pub(crate) fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.aead
            .seal(&self.nonce, plaintext, &self.aad)
            .map_err(|source| CipherError::CreateCipher {
                mode: BlockMode::GCM,
                source,
            })
    }

    pub(crate) fn open(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.aead
            .open(&self.nonce, ciphertext, &self.aad)
            .map_err(|source| CipherError::CreateCipher {
                mode: BlockMode::GCM,
                source,
            })
    }
}
