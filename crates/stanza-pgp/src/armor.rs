//! ASCII armor for binary OpenPGP material.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// CRC-24 seed (RFC 4880 §6.1).
const CRC24_INIT: u32 = 0x00B7_04CE;
/// CRC-24 generator polynomial.
const CRC24_GENERATOR: u32 = 0x0186_4CFB;

/// Column width of the base64 body.
const ARMOR_COLUMNS: usize = 64;

/// The armor block type, selecting the BEGIN/END labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmorKind {
    Pubkey,
    Signature,
}

impl ArmorKind {
    fn block_label(&self) -> &'static str {
        match self {
            ArmorKind::Pubkey => "PGP PUBLIC KEY BLOCK",
            ArmorKind::Signature => "PGP SIGNATURE",
        }
    }
}

/// Wraps raw bytes in an ASCII armor block.
///
/// Emits the dashed BEGIN line, a blank separator, the base64 body wrapped
/// at 64 columns, the `=`-prefixed CRC-24 checksum line, and the dashed
/// END line, each newline-terminated.
pub fn armor_wrap(kind: ArmorKind, data: &[u8]) -> String {
    let label = kind.block_label();
    let encoded = STANDARD.encode(data);

    let mut out = String::with_capacity(encoded.len() + 2 * label.len() + 64);
    out.push_str("-----BEGIN ");
    out.push_str(label);
    out.push_str("-----\n\n");

    for chunk in encoded.as_bytes().chunks(ARMOR_COLUMNS) {
        // base64 output is ASCII, so any chunk boundary is a char boundary
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        out.push('\n');
    }

    let crc = crc24(data);
    out.push('=');
    out.push_str(&STANDARD.encode(&crc.to_be_bytes()[1..]));
    out.push('\n');

    out.push_str("-----END ");
    out.push_str(label);
    out.push_str("-----\n");
    out
}

fn crc24(data: &[u8]) -> u32 {
    let mut crc = CRC24_INIT;
    for &byte in data {
        crc ^= (byte as u32) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= CRC24_GENERATOR;
            }
        }
    }
    crc & 0x00FF_FFFF
}
