mod common;

#[cfg(test)]
mod tests {
    use super::common::sample_data;
    use cipher_modes::crypto::padding::{pad, unpad, unpad_strict};
    use cipher_modes::{BlockMode, CipherError, PaddingMode};

    #[test]
    fn test_roundtrip_all_paddings() {
        for padding in PaddingMode::ALL {
            for block_size in [8usize, 16] {
                for len in 0..=3 * block_size {
                    let data = sample_data(len);
                    let padded = pad(&data, block_size, padding);
                    if padding != PaddingMode::No {
                        let unit = if padding == PaddingMode::PKCS5 { 8 } else { block_size };
                        assert_eq!(padded.len() % unit, 0, "{padding} len={len} bs={block_size}");
                    }
                    assert_eq!(
                        unpad(&padded, padding),
                        data,
                        "{padding} len={len} bs={block_size}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_aligned_input_gains_a_block() {
        let data = sample_data(16);
        for padding in PaddingMode::ALL {
            let padded = pad(&data, 16, padding);
            let grows = padded.len() > data.len();
            assert_eq!(grows, padding.always_pads(), "{padding}");
        }
    }

    #[test]
    fn test_pkcs7_partial_block() {
        let data = [1u8, 2, 3, 4, 5];
        let padded = pad(&data, 8, PaddingMode::PKCS7);
        assert_eq!(padded, vec![1, 2, 3, 4, 5, 3, 3, 3]);
        assert_eq!(unpad(&padded, PaddingMode::PKCS7), data.to_vec());
    }

    #[test]
    fn test_pkcs7_full_block_appended() {
        let data = sample_data(16);
        let padded = pad(&data, 16, PaddingMode::PKCS7);
        assert_eq!(padded.len(), 32);
        assert!(padded[16..].iter().all(|&b| b == 16));
    }

    #[test]
    fn test_pkcs5_ignores_block_size() {
        let padded = pad(&sample_data(5), 16, PaddingMode::PKCS5);
        assert_eq!(padded.len(), 8);
        assert_eq!(&padded[5..], &[3, 3, 3]);
    }

    #[test]
    fn test_ansi_x923_full_block() {
        let data = sample_data(8);
        let padded = pad(&data, 8, PaddingMode::AnsiX923);
        assert_eq!(&padded[..8], &data[..]);
        assert_eq!(&padded[8..], &[0, 0, 0, 0, 0, 0, 0, 8]);
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(pad(&[1, 2, 3], 8, PaddingMode::Zero), vec![1, 2, 3, 0, 0, 0, 0, 0]);
        assert_eq!(pad(&sample_data(8), 8, PaddingMode::Zero), sample_data(8));
        assert_eq!(pad(&[], 8, PaddingMode::Zero), vec![0u8; 8]);
        assert_eq!(unpad(&[1, 0, 2, 0, 0], PaddingMode::Zero), vec![1, 0, 2]);
    }

    #[test]
    fn test_iso_marker_paddings() {
        for padding in [PaddingMode::ISO9797_1, PaddingMode::ISO7816_4, PaddingMode::Bit] {
            let padded = pad(&[0xAA, 0xBB], 8, padding);
            assert_eq!(padded, vec![0xAA, 0xBB, 0x80, 0, 0, 0, 0, 0]);
            assert_eq!(unpad(&padded, padding), vec![0xAA, 0xBB]);

            let full = pad(&[0x80; 8], 8, padding);
            assert_eq!(&full[8..], &[0x80, 0, 0, 0, 0, 0, 0, 0]);
            assert_eq!(unpad(&full, padding), vec![0x80; 8]);
        }
    }

    #[test]
    fn test_iso10126_length_byte() {
        let data = sample_data(3);
        let padded = pad(&data, 8, PaddingMode::ISO10126);
        assert_eq!(padded.len(), 8);
        assert_eq!(padded[7], 5);
        assert_eq!(unpad(&padded, PaddingMode::ISO10126), data);
    }

    #[test]
    fn test_tbc_fill_follows_last_byte() {
        assert_eq!(pad(&[0x01], 4, PaddingMode::TBC), vec![0x01, 0x00, 0x00, 0x00]);
        assert_eq!(pad(&[0x81], 4, PaddingMode::TBC), vec![0x81, 0xFF, 0xFF, 0xFF]);
        assert_eq!(pad(&[], 4, PaddingMode::TBC), vec![0x00; 4]);
        assert_eq!(unpad(&[0x81, 0xFF, 0xFF, 0xFF], PaddingMode::TBC), vec![0x81]);
    }

    #[test]
    fn test_malformed_padding_returned_unchanged() {
        let cases: [(PaddingMode, Vec<u8>); 5] = [
            (PaddingMode::PKCS7, vec![1, 2, 3, 0]),
            (PaddingMode::PKCS7, vec![1, 2, 9]),
            (PaddingMode::PKCS5, vec![4, 0]),
            (PaddingMode::AnsiX923, vec![1, 7, 0, 3]),
            (PaddingMode::ISO7816_4, vec![0x80, 1, 0]),
        ];
        for (padding, data) in cases {
            assert_eq!(unpad(&data, padding), data, "{padding}");
        }
        assert!(unpad(&[], PaddingMode::PKCS7).is_empty());
    }

    #[test]
    fn test_strict_unpad_rejects_malformed() {
        assert!(matches!(
            unpad_strict(&[1, 2, 3, 0], 8, PaddingMode::PKCS7),
            Err(CipherError::InvalidPadding { padding: PaddingMode::PKCS7 })
        ));
        assert!(matches!(
            unpad_strict(&[1, 2, 2, 3, 3], 8, PaddingMode::PKCS7),
            Err(CipherError::InvalidPadding { .. })
        ));
        assert!(matches!(
            unpad_strict(&[1, 2, 3], 8, PaddingMode::Bit),
            Err(CipherError::InvalidPadding { .. })
        ));
        assert_eq!(
            unpad_strict(&[1, 2, 3, 3, 3], 8, PaddingMode::PKCS7).unwrap(),
            vec![1, 2]
        );
        assert!(unpad_strict(&[], 8, PaddingMode::AnsiX923).unwrap().is_empty());
    }

    #[test]
    fn test_strict_unpad_bounds_pad_to_one_block() {
        // A length byte larger than the block can never come out of `pad`.
        assert!(matches!(
            unpad_strict(&[0x20; 32], 16, PaddingMode::PKCS7),
            Err(CipherError::InvalidPadding { padding: PaddingMode::PKCS7 })
        ));
        assert!(unpad_strict(&[0x10; 32], 16, PaddingMode::PKCS7).is_ok());
        // PKCS5 is bounded by 8 whatever the primitive's block size.
        assert!(unpad_strict(&[0x09; 16], 16, PaddingMode::PKCS5).is_err());

        let mut ansi = vec![0u8; 24];
        ansi[23] = 12;
        assert!(unpad_strict(&ansi, 8, PaddingMode::AnsiX923).is_err());
        assert_eq!(unpad_strict(&ansi, 16, PaddingMode::AnsiX923).unwrap().len(), 12);

        let mut iso10126 = sample_data(24);
        iso10126[23] = 20;
        assert!(unpad_strict(&iso10126, 16, PaddingMode::ISO10126).is_err());

        let mut marker = vec![0u8; 24];
        marker[4] = 0x80;
        assert!(unpad_strict(&marker, 8, PaddingMode::ISO7816_4).is_err());
        assert_eq!(unpad_strict(&marker[4..12], 8, PaddingMode::ISO7816_4).unwrap(), vec![0u8; 0]);
        // The lenient path still strips whatever the length byte says.
        assert!(unpad(&[0x20; 32], PaddingMode::PKCS7).is_empty());
    }

    #[test]
    fn test_parse_mode_names() {
        assert_eq!("pkcs7".parse::<PaddingMode>().unwrap(), PaddingMode::PKCS7);
        assert_eq!("ANSI_X923".parse::<PaddingMode>().unwrap(), PaddingMode::AnsiX923);
        assert_eq!("ISO9797-1".parse::<PaddingMode>().unwrap(), PaddingMode::ISO9797_1);
        assert_eq!("cbc".parse::<BlockMode>().unwrap(), BlockMode::CBC);

        let err = "PKCS11".parse::<PaddingMode>().unwrap_err();
        assert!(matches!(err, CipherError::UnsupportedPaddingMode { .. }));
        let err = "XTS".parse::<BlockMode>().unwrap_err();
        assert_eq!(err.to_string(), "crypto/cipher: unsupported block mode \"XTS\"");
    }
}
