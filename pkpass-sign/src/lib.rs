#![doc = include_str!("../README.md")]

pub mod archive;
pub mod bundle;
pub mod cli;
mod error;
pub mod identity;
pub mod launcher;
pub mod manifest;
mod passphrase;
pub mod signature;
mod signer;

pub use error::Error;
pub use passphrase::Passphrase;
pub use signer::{PassSigner, Pkcs12Signer, SignRequest};
