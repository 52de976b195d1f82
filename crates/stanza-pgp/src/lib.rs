//! OpenPGP packet primitives for the stanza metadata query tool.
//!
//! This crate covers the slice of OpenPGP that metadata display needs:
//! decoding packet framing, pulling the summary fields out of signature
//! packets, and wrapping binary material in ASCII armor. It performs no
//! cryptographic verification.
//!
//! # Example
//!
//! ```
//! use stanza_pgp::{PacketHeader, PacketTag, SignatureParams};
//!
//! fn summarize(pkt: &[u8]) -> Option<SignatureParams> {
//!     let header = PacketHeader::parse(pkt).ok()?;
//!     if header.tag != PacketTag::Signature {
//!         return None;
//!     }
//!     SignatureParams::parse(header.body(pkt).ok()?).ok()
//! }
//! # let _ = summarize(&[0x00]);
//! ```

pub mod algo;
pub mod armor;
pub mod error;
pub mod packet;

pub use algo::{HashAlgo, PubkeyAlgo};
pub use armor::{armor_wrap, ArmorKind};
pub use error::{PgpError, Result};
pub use packet::{PacketHeader, PacketTag, SignatureParams};
