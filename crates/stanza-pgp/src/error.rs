//! Error types for the pgp crate.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while decoding OpenPGP packet material.
#[derive(Error, Diagnostic, Debug)]
pub enum PgpError {
    #[error("Buffer does not start with an OpenPGP packet tag")]
    #[diagnostic(code(stanza_pgp::not_a_packet))]
    NotAPacket,

    #[error("Truncated packet while reading {field}")]
    #[diagnostic(code(stanza_pgp::truncated))]
    Truncated { field: &'static str },

    #[error("Unsupported packet length encoding")]
    #[diagnostic(code(stanza_pgp::length_encoding))]
    UnsupportedLength,

    #[error("Unsupported signature packet version {0}")]
    #[diagnostic(code(stanza_pgp::signature_version))]
    UnsupportedVersion(u8),

    #[error("Malformed signature packet: {0}")]
    #[diagnostic(code(stanza_pgp::malformed_signature))]
    MalformedSignature(&'static str),
}

/// A specialized Result type for packet decoding.
pub type Result<T> = std::result::Result<T, PgpError>;
