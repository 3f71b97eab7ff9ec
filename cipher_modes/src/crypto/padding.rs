use crate::crypto::cipher_types::PaddingMode;
use crate::crypto::errors::{CipherError, Result};
use rand::RngCore;

const PKCS5_BLOCK_SIZE: usize = 8;
const ISO_MARKER: u8 = 0x80;

/// Largest pad that a single length byte can describe.
pub const MAX_LENGTH_BYTE_BLOCK: usize = u8::MAX as usize;

/// Block size the scheme actually pads to: 8 for PKCS5, `block_size` otherwise.
#[inline]
pub fn padding_block_size(padding: PaddingMode, block_size: usize) -> usize {
    match padding {
        PaddingMode::PKCS5 => PKCS5_BLOCK_SIZE,
        _ => block_size,
    }
}

/// Schemes whose last byte stores the pad length.
#[inline]
pub(crate) fn has_length_byte(padding: PaddingMode) -> bool {
    matches!(
        padding,
        PaddingMode::PKCS5 | PaddingMode::PKCS7 | PaddingMode::AnsiX923 | PaddingMode::ISO10126
    )
}

/// Pads `src` up to a multiple of `block_size` according to `padding`.
///
/// PKCS5 always pads to 8 bytes regardless of `block_size`. Length-byte
/// schemes (PKCS7, AnsiX923, ISO10126) need `block_size <= 255`; the mode
/// dispatcher rejects larger primitives before padding.
pub fn pad(src: &[u8], block_size: usize, padding: PaddingMode) -> Vec<u8> {
    let block_size = padding_block_size(padding, block_size);
    if padding == PaddingMode::No || block_size == 0 {
        return src.to_vec();
    }

    let padding_length = block_size - src.len() % block_size;
    if padding == PaddingMode::Zero && padding_length == block_size && !src.is_empty() {
        return src.to_vec();
    }

    let mut data = Vec::with_capacity(src.len() + padding_length);
    data.extend_from_slice(src);

    match padding {
        PaddingMode::No => {}
        PaddingMode::Zero => data.resize(src.len() + padding_length, 0),
        PaddingMode::PKCS5 | PaddingMode::PKCS7 => {
            data.resize(src.len() + padding_length, padding_length as u8);
        }
        PaddingMode::AnsiX923 => {
            data.resize(src.len() + padding_length - 1, 0);
            data.push(padding_length as u8);
        }
        PaddingMode::ISO9797_1 | PaddingMode::ISO7816_4 | PaddingMode::Bit => {
            data.push(ISO_MARKER);
            data.resize(src.len() + padding_length, 0);
        }
        PaddingMode::ISO10126 => {
            let mut filler = vec![0u8; padding_length - 1];
            rand::rng().fill_bytes(&mut filler);
            data.extend_from_slice(&filler);
            data.push(padding_length as u8);
        }
        PaddingMode::TBC => {
            let fill = match src.last() {
                Some(&last) if last & 0x80 != 0 => 0xFF,
                _ => 0x00,
            };
            data.resize(src.len() + padding_length, fill);
        }
    }

    data
}

/// Removes padding added by [`pad`].
///
/// Malformed padding is not reported: the input comes back unchanged.
/// Use [`unpad_strict`] to get an error instead.
pub fn unpad(src: &[u8], padding: PaddingMode) -> Vec<u8> {
    match padding_start(src, padding) {
        Some(end) => src[..end].to_vec(),
        None => {
            log::warn!("{padding} padding is malformed, returning data unchanged");
            src.to_vec()
        }
    }
}

/// Removes padding and fails with [`CipherError::InvalidPadding`] when it is malformed.
///
/// `block_size` bounds the pad: a length byte or 0x80 marker further back than
/// one block cannot have been produced by [`pad`].
pub fn unpad_strict(src: &[u8], block_size: usize, padding: PaddingMode) -> Result<Vec<u8>> {
    if src.is_empty() {
        return Ok(Vec::new());
    }
    let end = padding_start(src, padding).ok_or(CipherError::InvalidPadding { padding })?;
    let pad_length = src.len() - end;
    let within_block = pad_length <= padding_block_size(padding, block_size);
    // Zero and TBC carry no length byte, so any trailing run is acceptable.
    let valid = match padding {
        PaddingMode::PKCS5 | PaddingMode::PKCS7 => {
            let value = src[src.len() - 1];
            within_block && src[end..].iter().all(|&b| b == value)
        }
        PaddingMode::AnsiX923
        | PaddingMode::ISO10126
        | PaddingMode::ISO9797_1
        | PaddingMode::ISO7816_4
        | PaddingMode::Bit => within_block,
        _ => true,
    };
    if !valid {
        return Err(CipherError::InvalidPadding { padding });
    }
    Ok(src[..end].to_vec())
}

/// Offset where the padding begins, or `None` when the padding is malformed.
fn padding_start(src: &[u8], padding: PaddingMode) -> Option<usize> {
    if src.is_empty() {
        return Some(0);
    }

    match padding {
        PaddingMode::No => Some(src.len()),
        PaddingMode::Zero => Some(
            src.iter()
                .rposition(|&b| b != 0)
                .map_or(0, |pos| pos + 1),
        ),
        PaddingMode::PKCS5 | PaddingMode::PKCS7 | PaddingMode::ISO10126 => {
            let padding_length = *src.last()? as usize;
            if padding_length == 0 || padding_length > src.len() {
                return None;
            }
            Some(src.len() - padding_length)
        }
        PaddingMode::AnsiX923 => {
            let padding_length = *src.last()? as usize;
            if padding_length == 0 || padding_length > src.len() {
                return None;
            }
            let start = src.len() - padding_length;
            src[start..src.len() - 1]
                .iter()
                .all(|&b| b == 0)
                .then_some(start)
        }
        PaddingMode::ISO9797_1 | PaddingMode::ISO7816_4 | PaddingMode::Bit => {
            let marker = src.iter().rposition(|&b| b == ISO_MARKER)?;
            src[marker + 1..]
                .iter()
                .all(|&b| b == 0)
                .then_some(marker)
        }
        PaddingMode::TBC => {
            let fill = *src.last()?;
            Some(
                src.iter()
                    .rposition(|&b| b != fill)
                    .map_or(0, |pos| pos + 1),
            )
        }
    }
}
