#![allow(dead_code)]

use cipher_modes::{CipherError, CipherPrimitive, CustomAlgorithm, KeySizePolicy};

pub const TOY_BLOCK_SIZE: usize = 8;

/// Invertible 8-byte block transform standing in for DES-sized ciphers.
pub struct ToyCipher {
    key: Vec<u8>,
}

impl ToyCipher {
    pub fn new(key: &[u8]) -> Self {
        Self { key: key.to_vec() }
    }
}

impl CipherPrimitive for ToyCipher {
    fn block_size(&self) -> usize {
        TOY_BLOCK_SIZE
    }

    fn encrypt(&self, dst: &mut [u8], src: &[u8]) {
        for (i, (d, &s)) in dst.iter_mut().zip(src).enumerate() {
            *d = s.rotate_left(3) ^ self.key[i % self.key.len()];
        }
    }

    fn decrypt(&self, dst: &mut [u8], src: &[u8]) {
        for (i, (d, &s)) in dst.iter_mut().zip(src).enumerate() {
            *d = (s ^ self.key[i % self.key.len()]).rotate_right(3);
        }
    }
}

pub fn toy_algorithm() -> CustomAlgorithm {
    CustomAlgorithm::new(KeySizePolicy::DES, |key| {
        Ok(Box::new(ToyCipher::new(key)) as Box<dyn CipherPrimitive>)
    })
}

/// Bytes in 1..=100: no zeros, no 0x80 markers, high bit clear.
pub fn sample_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 100) as u8 + 1).collect()
}

pub fn random_bytes(len: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    buf
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn is_create_cipher(err: &CipherError) -> bool {
    matches!(err, CipherError::CreateCipher { .. })
}

/// XOR-with-constant transform over an arbitrary block size.
pub struct SizedCipher {
    pub block_size: usize,
}

impl CipherPrimitive for SizedCipher {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn encrypt(&self, dst: &mut [u8], src: &[u8]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = s ^ 0x5A;
        }
    }

    fn decrypt(&self, dst: &mut [u8], src: &[u8]) {
        self.encrypt(dst, src);
    }
}
