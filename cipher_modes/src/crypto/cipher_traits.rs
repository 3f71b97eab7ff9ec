use crate::crypto::errors::{CipherError, PrimitiveError, Result};
use std::fmt;
use std::sync::Arc;

/// Single-block transform supplied by an audited cipher implementation.
///
/// `dst` and `src` are always exactly `block_size()` bytes long when called
/// from this crate.
pub trait CipherPrimitive: Send + Sync {
    fn block_size(&self) -> usize;
    fn encrypt(&self, dst: &mut [u8], src: &[u8]);
    fn decrypt(&self, dst: &mut [u8], src: &[u8]);

    /// Builds the GCM construction over this primitive.
    fn new_gcm(&self, nonce_size: usize) -> std::result::Result<Box<dyn AeadPrimitive>, PrimitiveError> {
        let _ = nonce_size;
        Err(PrimitiveError::new(
            "cipher: GCM is not supported by this block cipher",
        ))
    }
}

/// Authenticated encryption as handed out by [`CipherPrimitive::new_gcm`].
pub trait AeadPrimitive: Send + Sync {
    fn nonce_size(&self) -> usize;
    fn seal(&self, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> std::result::Result<Vec<u8>, PrimitiveError>;
    fn open(&self, nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> std::result::Result<Vec<u8>, PrimitiveError>;
}

/// Name and accepted key lengths of a block cipher algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySizePolicy {
    pub name: &'static str,
    pub sizes: &'static [usize],
}

impl KeySizePolicy {
    pub const AES: KeySizePolicy = KeySizePolicy::new("crypto/aes", &[16, 24, 32]);
    pub const DES: KeySizePolicy = KeySizePolicy::new("crypto/des", &[8]);
    pub const TRIPLE_DES: KeySizePolicy = KeySizePolicy::new("crypto/3des", &[24]);
    pub const SM4: KeySizePolicy = KeySizePolicy::new("crypto/sm4", &[16]);
    pub const XTEA: KeySizePolicy = KeySizePolicy::new("crypto/xtea", &[16]);
    pub const TWOFISH: KeySizePolicy = KeySizePolicy::new("crypto/twofish", &[16, 24, 32]);

    pub const fn new(name: &'static str, sizes: &'static [usize]) -> Self {
        Self { name, sizes }
    }

    pub fn check(&self, key: &[u8]) -> Result<()> {
        if self.sizes.contains(&key.len()) {
            return Ok(());
        }
        Err(CipherError::KeySize {
            algorithm: self.name,
            size: key.len(),
            expected: self.describe_sizes(),
        })
    }

    /// "16", "16 or 32", "16, 24, or 32".
    fn describe_sizes(&self) -> String {
        let sizes: Vec<String> = self.sizes.iter().map(|s| s.to_string()).collect();
        match sizes.as_slice() {
            [] => String::from("0"),
            [one] => one.clone(),
            [first, second] => format!("{first} or {second}"),
            [init @ .., last] => format!("{}, or {}", init.join(", "), last),
        }
    }
}

/// A block cipher algorithm: its key policy and how to build a primitive from a key.
pub trait Algorithm: Clone + Send + Sync + 'static {
    fn policy(&self) -> KeySizePolicy;

    fn new_primitive(&self, key: &[u8]) -> Result<Box<dyn CipherPrimitive>>;

    #[inline]
    fn name(&self) -> &'static str {
        self.policy().name
    }
}

type PrimitiveFactory = dyn Fn(&[u8]) -> Result<Box<dyn CipherPrimitive>> + Send + Sync;

/// Algorithm assembled from a key policy and a caller-supplied primitive factory.
#[derive(Clone)]
pub struct CustomAlgorithm {
    policy: KeySizePolicy,
    factory: Arc<PrimitiveFactory>,
}

impl CustomAlgorithm {
    pub fn new<F>(policy: KeySizePolicy, factory: F) -> Self
    where
        F: Fn(&[u8]) -> Result<Box<dyn CipherPrimitive>> + Send + Sync + 'static,
    {
        Self {
            policy,
            factory: Arc::new(factory),
        }
    }
}

impl fmt::Debug for CustomAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAlgorithm")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Algorithm for CustomAlgorithm {
    fn policy(&self) -> KeySizePolicy {
        self.policy
    }

    fn new_primitive(&self, key: &[u8]) -> Result<Box<dyn CipherPrimitive>> {
        self.policy.check(key)?;
        (self.factory)(key)
    }
}
