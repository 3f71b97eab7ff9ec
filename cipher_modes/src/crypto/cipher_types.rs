use crate::crypto::errors::CipherError;
use std::fmt;
use std::str::FromStr;

/// Chaining mode used to run a block primitive over arbitrary-length data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockMode {
    CBC,
    ECB,
    CTR,
    GCM,
    CFB,
    OFB,
}

impl BlockMode {
    pub const ALL: [BlockMode; 6] = [
        BlockMode::CBC,
        BlockMode::ECB,
        BlockMode::CTR,
        BlockMode::GCM,
        BlockMode::CFB,
        BlockMode::OFB,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockMode::CBC => "CBC",
            BlockMode::ECB => "ECB",
            BlockMode::CTR => "CTR",
            BlockMode::GCM => "GCM",
            BlockMode::CFB => "CFB",
            BlockMode::OFB => "OFB",
        }
    }

    /// Modes that transform whole blocks and therefore go through padding.
    #[inline]
    pub fn requires_padding(&self) -> bool {
        matches!(self, BlockMode::CBC | BlockMode::ECB)
    }

    /// Modes that XOR a keystream with the data and accept any length.
    #[inline]
    pub fn is_stream_mode(&self) -> bool {
        matches!(self, BlockMode::CTR | BlockMode::CFB | BlockMode::OFB)
    }
}

impl fmt::Display for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockMode {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CipherError::UnsupportedBlockMode {
                mode: s.to_string(),
            })
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaddingMode {
    No,
    Zero,
    PKCS5,
    PKCS7,
    AnsiX923,
    ISO9797_1,
    ISO10126,
    ISO7816_4,
    Bit,
    TBC,
}

impl PaddingMode {
    pub const ALL: [PaddingMode; 10] = [
        PaddingMode::No,
        PaddingMode::Zero,
        PaddingMode::PKCS5,
        PaddingMode::PKCS7,
        PaddingMode::AnsiX923,
        PaddingMode::ISO9797_1,
        PaddingMode::ISO10126,
        PaddingMode::ISO7816_4,
        PaddingMode::Bit,
        PaddingMode::TBC,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaddingMode::No => "No",
            PaddingMode::Zero => "Zero",
            PaddingMode::PKCS5 => "PKCS5",
            PaddingMode::PKCS7 => "PKCS7",
            PaddingMode::AnsiX923 => "AnsiX.923",
            PaddingMode::ISO9797_1 => "ISO9797-1",
            PaddingMode::ISO10126 => "ISO10126",
            PaddingMode::ISO7816_4 => "ISO7816-4",
            PaddingMode::Bit => "Bit",
            PaddingMode::TBC => "TBC",
        }
    }

    /// Schemes that append a whole extra block when the input is already aligned.
    #[inline]
    pub fn always_pads(&self) -> bool {
        !matches!(self, PaddingMode::No | PaddingMode::Zero)
    }
}

impl fmt::Display for PaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaddingMode {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "ANSI_X923", "ansix923" and "AnsiX.923" all name the same scheme.
        let wanted = normalize(s);
        PaddingMode::ALL
            .into_iter()
            .find(|padding| normalize(padding.as_str()) == wanted)
            .ok_or_else(|| CipherError::UnsupportedPaddingMode {
                padding: s.to_string(),
            })
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
