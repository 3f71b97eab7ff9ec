pub mod crypto;

pub use crypto::aes_primitive::{Aes, AesPrimitive};
pub use crypto::cipher_config::CipherConfig;
pub use crypto::cipher_context::Cipher;
pub use crypto::cipher_io::{CipherInput, CipherOutput};
pub use crypto::cipher_traits::*;
pub use crypto::cipher_types::*;
pub use crypto::errors::{CipherError, PrimitiveError, Result};
pub use crypto::stream::{StreamDecrypter, StreamEncrypter, StreamPolicy};
