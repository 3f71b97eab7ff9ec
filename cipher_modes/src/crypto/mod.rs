pub mod aes_primitive;
pub mod block_modes;
pub mod cipher_config;
pub mod cipher_context;
pub mod cipher_io;
pub mod cipher_traits;
pub mod cipher_types;
pub mod errors;
pub mod padding;
pub mod stream;
