use crate::crypto::cipher_context::Cipher;
use crate::crypto::cipher_traits::Algorithm;
use crate::crypto::errors::{CipherError, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherInput {
    Bytes(Vec<u8>),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherOutput {
    Buffer(Vec<u8>),
    File(PathBuf),
}

impl CipherOutput {
    pub fn as_buffer(&self) -> Option<&[u8]> {
        match self {
            CipherOutput::Buffer(buffer) => Some(buffer),
            CipherOutput::File(_) => None,
        }
    }

    pub fn into_buffer(self) -> Option<Vec<u8>> {
        match self {
            CipherOutput::Buffer(buffer) => Some(buffer),
            CipherOutput::File(_) => None,
        }
    }

    // Same destination, previous buffer contents dropped.
    fn fresh(&self) -> CipherOutput {
        match self {
            CipherOutput::Buffer(_) => CipherOutput::Buffer(Vec::new()),
            CipherOutput::File(path) => CipherOutput::File(path.clone()),
        }
    }
}

impl<A: Algorithm> Cipher<A> {
    /// Encrypts `input` into `output` on tokio's blocking pool.
    pub async fn encrypt_io(&self, input: CipherInput, output: &mut CipherOutput) -> Result<()> {
        let cipher = self.clone();
        let target = output.fresh();
        *output = run_file_task(move || encrypt_blocking(&cipher, input, target)).await?;
        Ok(())
    }

    /// Decrypts `input` into `output` on tokio's blocking pool.
    pub async fn decrypt_io(&self, input: CipherInput, output: &mut CipherOutput) -> Result<()> {
        let cipher = self.clone();
        let target = output.fresh();
        *output = run_file_task(move || decrypt_blocking(&cipher, input, target)).await?;
        Ok(())
    }
}

async fn run_file_task<F, T>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CipherError::from(io::Error::other(err)))?
}

fn open_input(input: CipherInput) -> Result<Box<dyn Read>> {
    match input {
        CipherInput::Bytes(data) => Ok(Box::new(io::Cursor::new(data))),
        CipherInput::File(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
    }
}

fn encrypt_blocking<A: Algorithm>(
    cipher: &Cipher<A>,
    input: CipherInput,
    output: CipherOutput,
) -> Result<CipherOutput> {
    let reader = open_input(input)?;
    match output {
        CipherOutput::Buffer(buffer) => {
            let buffer = encrypt_into(cipher, reader, buffer)?;
            Ok(CipherOutput::Buffer(buffer))
        }
        CipherOutput::File(path) => {
            let writer = BufWriter::new(File::create(&path)?);
            encrypt_into(cipher, reader, writer)?;
            Ok(CipherOutput::File(path))
        }
    }
}

fn encrypt_into<A: Algorithm, W: Write>(
    cipher: &Cipher<A>,
    mut reader: impl Read,
    writer: W,
) -> Result<W> {
    let mut encrypter = cipher.stream_encrypter(writer);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        encrypter.write_chunk(&chunk[..read])?;
    }
    encrypter.close()?;
    Ok(encrypter.into_inner())
}

fn decrypt_blocking<A: Algorithm>(
    cipher: &Cipher<A>,
    input: CipherInput,
    output: CipherOutput,
) -> Result<CipherOutput> {
    let reader = open_input(input)?;
    match output {
        CipherOutput::Buffer(mut buffer) => {
            decrypt_into(cipher, reader, &mut buffer)?;
            Ok(CipherOutput::Buffer(buffer))
        }
        CipherOutput::File(path) => {
            let mut writer = BufWriter::new(File::create(&path)?);
            decrypt_into(cipher, reader, &mut writer)?;
            writer.flush()?;
            Ok(CipherOutput::File(path))
        }
    }
}

fn decrypt_into<A: Algorithm, W: Write>(
    cipher: &Cipher<A>,
    reader: impl Read,
    writer: &mut W,
) -> Result<()> {
    let mut decrypter = cipher.stream_decrypter(reader);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        match decrypter.read_plaintext(&mut chunk) {
            Ok(0) => return Ok(()),
            Ok(read) => writer.write_all(&chunk[..read])?,
            Err(CipherError::Buffer { buffer_size, .. }) => writer.write_all(&chunk[..buffer_size])?,
            Err(err) => return Err(err),
        }
    }
}
