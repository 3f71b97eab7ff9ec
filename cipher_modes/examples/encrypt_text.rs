use cipher_modes::{
    Aes, BlockMode, Cipher, CipherConfig, CipherInput, CipherOutput, PaddingMode,
};
use rand::RngCore;

fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    buf
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let text = "The quick brown fox jumps over the lazy dog. Symmetric encryption test string!";
    let data = text.as_bytes().to_vec();
    let key = random_bytes(32);

    for mode in BlockMode::ALL {
        let config = CipherConfig::new(mode)
            .with_key(key.clone())
            .with_iv(random_bytes(16))
            .with_nonce(random_bytes(12))
            .with_padding(PaddingMode::PKCS7);
        let cipher = Cipher::new(Aes, config);

        let mut enc_out = CipherOutput::Buffer(Vec::new());
        cipher
            .encrypt_io(CipherInput::Bytes(data.clone()), &mut enc_out)
            .await?;
        let encrypted = enc_out.into_buffer().unwrap_or_default();

        let mut dec_out = CipherOutput::Buffer(Vec::new());
        cipher
            .decrypt_io(CipherInput::Bytes(encrypted.clone()), &mut dec_out)
            .await?;
        let decrypted = dec_out.into_buffer().unwrap_or_default();

        println!("=== AES-256 {mode} ===");
        println!("Encrypted ({} bytes): {:02x?}", encrypted.len(), &encrypted[..16usize.min(encrypted.len())]);
        println!("Decrypted: {}", String::from_utf8_lossy(&decrypted));
        assert_eq!(decrypted, data);
    }

    Ok(())
}
