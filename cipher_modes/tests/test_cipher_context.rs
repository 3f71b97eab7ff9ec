mod common;

#[cfg(test)]
mod tests {
    use super::common::{init_logger, sample_data, toy_algorithm};
    use cipher_modes::{
        Aes, BlockMode, Cipher, CipherConfig, CipherError, CustomAlgorithm, KeySizePolicy,
        PaddingMode,
    };
    use hex_literal::hex;
    use std::io::{Read, Write};

    const KEY: [u8; 16] = hex!("00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F");
    const IV: [u8; 16] = hex!("F0 E1 D2 C3 B4 A5 96 87 78 69 5A 4B 3C 2D 1E 0F");

    #[test]
    fn test_invalid_key_size_is_sticky() {
        init_logger();
        let config = CipherConfig::new(BlockMode::CBC)
            .with_key(b"1234567".to_vec())
            .with_iv(IV.to_vec());
        let cipher = Cipher::new(Aes, config);

        let expected = "crypto/aes: invalid key size 7, must be 16, 24, or 32 bytes";
        assert_eq!(cipher.error().map(|e| e.to_string()).as_deref(), Some(expected));
        assert_eq!(cipher.encrypt(b"hello").unwrap_err().to_string(), expected);
        assert_eq!(cipher.decrypt(b"hello").unwrap_err().to_string(), expected);
        // Even empty input reports the construction error.
        assert!(matches!(
            cipher.encrypt(b"").unwrap_err(),
            CipherError::KeySize { size: 7, .. }
        ));

        let mut encrypter = cipher.stream_encrypter(Vec::new());
        assert_eq!(encrypter.write_chunk(b"data").unwrap_err().to_string(), expected);
        assert_eq!(encrypter.close().unwrap_err().to_string(), expected);
        assert!(encrypter.get_ref().is_empty());

        let mut decrypter = cipher.stream_decrypter(&b"0123456789abcdef"[..]);
        let mut buf = [0u8; 16];
        assert_eq!(decrypter.read_plaintext(&mut buf).unwrap_err().to_string(), expected);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        for mode in BlockMode::ALL {
            let config = CipherConfig::new(mode)
                .with_key(KEY.to_vec())
                .with_iv(IV.to_vec())
                .with_nonce(vec![7u8; 12]);
            let cipher = Cipher::new(Aes, config);
            assert!(cipher.encrypt(b"").unwrap().is_empty(), "{mode}");
            assert!(cipher.decrypt(b"").unwrap().is_empty(), "{mode}");
        }
    }

    #[test]
    fn test_hello_world_roundtrip() {
        let config = CipherConfig::new(BlockMode::CBC)
            .with_key(KEY.to_vec())
            .with_iv(IV.to_vec())
            .with_padding(PaddingMode::PKCS7);
        let cipher = Cipher::new(Aes, config);

        let ciphertext = cipher.encrypt(b"hello world").unwrap();
        assert_eq!(ciphertext.len(), 16);
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), b"hello world");
    }

    #[test]
    fn test_aes_key_lengths() {
        for len in [16usize, 24, 32] {
            let config = CipherConfig::new(BlockMode::GCM)
                .with_key(vec![0x5A; len])
                .with_nonce(vec![1u8; 12]);
            let cipher = Cipher::new(Aes, config);
            assert!(cipher.error().is_none());
            let data = sample_data(40);
            let ciphertext = cipher.encrypt(&data).unwrap();
            assert_eq!(cipher.decrypt(&ciphertext).unwrap(), data, "key length {len}");
        }
    }

    #[test]
    fn test_custom_algorithm_key_policy() {
        let config = CipherConfig::new(BlockMode::ECB).with_key(vec![0u8; 16]);
        let cipher = Cipher::new(toy_algorithm(), config);
        assert_eq!(
            cipher.encrypt(b"x").unwrap_err().to_string(),
            "crypto/des: invalid key size 16, must be 8 bytes"
        );

        let pair = KeySizePolicy::new("crypto/blowfish", &[16, 32]);
        let err = pair.check(&[0u8; 3]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "crypto/blowfish: invalid key size 3, must be 16 or 32 bytes"
        );
        assert!(KeySizePolicy::TRIPLE_DES.check(&[0u8; 24]).is_ok());
    }

    #[test]
    fn test_primitive_factory_failure_is_wrapped() {
        let failing = CustomAlgorithm::new(KeySizePolicy::SM4, |_key| {
            Err(CipherError::NilPrimitive {
                mode: BlockMode::ECB,
            })
        });
        let config = CipherConfig::new(BlockMode::ECB).with_key(vec![0u8; 16]);
        let cipher = Cipher::new(failing, config);
        assert!(cipher.error().is_none());

        let err = cipher.encrypt(b"data").unwrap_err();
        assert!(matches!(err, CipherError::Encrypt { algorithm: "crypto/sm4", .. }));
        let err = cipher.decrypt(&[0u8; 16]).unwrap_err();
        assert!(matches!(err, CipherError::Decrypt { .. }));
        assert!(err.to_string().starts_with("crypto/sm4: failed to decrypt data: "));
    }

    #[test]
    fn test_setters_do_not_validate() {
        let mut config = CipherConfig::new(BlockMode::CBC);
        assert_eq!(config.padding(), PaddingMode::PKCS7);
        assert_eq!(CipherConfig::new(BlockMode::CTR).padding(), PaddingMode::No);

        config.set_key(b"short");
        config.set_iv(b"abc");
        config.set_nonce(b"n");
        config.set_aad(b"aad");
        config.set_padding(PaddingMode::ISO10126);
        config.set_block(BlockMode::OFB);
        assert_eq!(config.key(), b"short");
        assert_eq!(config.iv(), b"abc");
        assert_eq!(config.nonce(), b"n");
        assert_eq!(config.aad(), b"aad");
        assert_eq!(config.padding(), PaddingMode::ISO10126);
        assert_eq!(config.block(), BlockMode::OFB);

        // Validation happens once data is processed.
        config.set_key(&KEY);
        let cipher = Cipher::new(Aes, config);
        assert!(cipher.error().is_none());
        assert!(matches!(
            cipher.encrypt(b"data").unwrap_err(),
            CipherError::InvalidIv { mode: BlockMode::OFB, size: 3, .. }
        ));
    }

    #[test]
    fn test_toy_algorithm_modes() {
        for mode in [BlockMode::CBC, BlockMode::ECB, BlockMode::CTR, BlockMode::CFB, BlockMode::OFB] {
            let config = CipherConfig::new(mode)
                .with_key(b"deskey!!".to_vec())
                .with_iv(b"initvect".to_vec());
            let cipher = Cipher::new(toy_algorithm(), config);
            let data = sample_data(29);
            let ciphertext = cipher.encrypt(&data).unwrap();
            assert_ne!(ciphertext[..data.len()], data[..]);
            assert_eq!(cipher.decrypt(&ciphertext).unwrap(), data, "{mode}");
        }
    }

    #[test]
    fn test_stream_adapters_through_io_traits() {
        let config = CipherConfig::new(BlockMode::CFB)
            .with_key(KEY.to_vec())
            .with_iv(IV.to_vec());
        let cipher = Cipher::new(Aes, config);

        let mut encrypter = cipher.stream_encrypter(Vec::new());
        encrypter.write_all(b"streamed through std::io").unwrap();
        encrypter.flush().unwrap();
        encrypter.close().unwrap();
        let ciphertext = encrypter.into_inner();
        assert_eq!(ciphertext, cipher.encrypt(b"streamed through std::io").unwrap());

        let mut plaintext = String::new();
        cipher
            .stream_decrypter(ciphertext.as_slice())
            .read_to_string(&mut plaintext)
            .unwrap();
        assert_eq!(plaintext, "streamed through std::io");
    }
}
