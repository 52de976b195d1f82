//! OpenPGP packet framing and signature field extraction.
//!
//! Covers the subset of RFC 4880 needed to summarize a detached signature:
//! both legacy header framings and the v3/v4 signature packet fields
//! (algorithms, creation time, issuer key id). Signature material itself
//! (MPIs) is never interpreted.

use tracing::debug;

use crate::error::{PgpError, Result};

/// Packet type ids (RFC 4880 §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketTag {
    PublicKeyEncryptedSession,
    Signature,
    SymmetricKeyEncryptedSession,
    OnePassSignature,
    SecretKey,
    PublicKey,
    SecretSubkey,
    CompressedData,
    SymmetricData,
    Marker,
    LiteralData,
    Trust,
    UserId,
    PublicSubkey,
    UserAttribute,
    Unknown(u8),
}

impl PacketTag {
    /// Maps a raw tag id to its variant.
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => PacketTag::PublicKeyEncryptedSession,
            2 => PacketTag::Signature,
            3 => PacketTag::SymmetricKeyEncryptedSession,
            4 => PacketTag::OnePassSignature,
            5 => PacketTag::SecretKey,
            6 => PacketTag::PublicKey,
            7 => PacketTag::SecretSubkey,
            8 => PacketTag::CompressedData,
            9 => PacketTag::SymmetricData,
            10 => PacketTag::Marker,
            11 => PacketTag::LiteralData,
            12 => PacketTag::Trust,
            13 => PacketTag::UserId,
            14 => PacketTag::PublicSubkey,
            17 => PacketTag::UserAttribute,
            other => PacketTag::Unknown(other),
        }
    }
}

/// Decoded framing of a single packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub tag: PacketTag,
    /// Bytes consumed by the tag octet plus the length field.
    pub header_len: usize,
    pub body_len: usize,
}

impl PacketHeader {
    /// Decodes the header at the start of `buf`.
    ///
    /// Handles both framing variants: new format (bit 6 of the tag octet)
    /// with one/two/five-octet lengths, and old format with a 2-bit
    /// length-type selecting a 1/2/4-byte big-endian length field.
    /// Partial body lengths and the old indeterminate length-type are
    /// rejected as unsupported.
    ///
    /// # Errors
    ///
    /// * [`PgpError::NotAPacket`] if bit 7 of the first octet is clear.
    /// * [`PgpError::Truncated`] if the buffer ends inside the header.
    /// * [`PgpError::UnsupportedLength`] for framings this decoder rejects.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let first = *buf.first().ok_or(PgpError::Truncated {
            field: "packet tag",
        })?;
        if first & 0x80 == 0 {
            return Err(PgpError::NotAPacket);
        }

        if first & 0x40 != 0 {
            let tag = PacketTag::from_id(first & 0x3f);
            let (body_len, len_size) = new_format_len(&buf[1..])?;
            Ok(PacketHeader {
                tag,
                header_len: 1 + len_size,
                body_len,
            })
        } else {
            let tag = PacketTag::from_id((first >> 2) & 0x0f);
            let len_size = match first & 0x03 {
                0 => 1,
                1 => 2,
                2 => 4,
                _ => return Err(PgpError::UnsupportedLength),
            };
            let field = buf.get(1..1 + len_size).ok_or(PgpError::Truncated {
                field: "length field",
            })?;
            Ok(PacketHeader {
                tag,
                header_len: 1 + len_size,
                body_len: be_uint(field),
            })
        }
    }

    /// Total consumed length: tag octet + length field + body.
    pub fn total_len(&self) -> usize {
        self.header_len + self.body_len
    }

    /// Borrows the packet body out of the buffer the header was parsed from.
    pub fn body<'a>(&self, buf: &'a [u8]) -> Result<&'a [u8]> {
        buf.get(self.header_len..self.total_len())
            .ok_or(PgpError::Truncated {
                field: "packet body",
            })
    }
}

/// Decodes a new-format length, returning (body length, field size).
fn new_format_len(buf: &[u8]) -> Result<(usize, usize)> {
    let first = *buf.first().ok_or(PgpError::Truncated {
        field: "length octet",
    })? as usize;
    match first {
        0..=191 => Ok((first, 1)),
        192..=223 => {
            let second = *buf.get(1).ok_or(PgpError::Truncated {
                field: "length octet",
            })? as usize;
            Ok((((first - 192) << 8) + second + 192, 2))
        }
        255 => {
            let field = buf.get(1..5).ok_or(PgpError::Truncated {
                field: "length field",
            })?;
            Ok((be_uint(field), 5))
        }
        // 224..=254 are partial body lengths
        _ => Err(PgpError::UnsupportedLength),
    }
}

fn be_uint(bytes: &[u8]) -> usize {
    bytes.iter().fold(0, |acc, &b| (acc << 8) | b as usize)
}

/// Fields extracted from a signature packet body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureParams {
    pub version: u8,
    pub pubkey_algo: u8,
    pub hash_algo: u8,
    /// Creation time, seconds since the epoch.
    pub created: u32,
    pub key_id: [u8; 8],
}

impl SignatureParams {
    /// Extracts algorithm ids, creation time, and issuer key id from a
    /// signature packet body (the bytes after the framing header).
    ///
    /// v3 packets carry the fields at fixed offsets; v4 packets carry the
    /// creation time in a hashed subpacket (type 2) and the issuer key id
    /// in either subpacket area (type 16). A v4 packet missing one of
    /// those subpackets yields a zero field, matching what key tooling
    /// prints for unstated values.
    ///
    /// # Errors
    ///
    /// * [`PgpError::Truncated`] if the body ends inside a fixed field.
    /// * [`PgpError::UnsupportedVersion`] for versions other than 3 or 4.
    /// * [`PgpError::MalformedSignature`] for inconsistent framing.
    pub fn parse(body: &[u8]) -> Result<Self> {
        match body.first() {
            Some(3) => Self::parse_v3(body),
            Some(4) => Self::parse_v4(body),
            Some(&version) => Err(PgpError::UnsupportedVersion(version)),
            None => Err(PgpError::Truncated {
                field: "signature version",
            }),
        }
    }

    /// v3 layout: version(1) hashed-len(1) sigtype(1) time(4) keyid(8)
    /// pubkey-algo(1) hash-algo(1), then the signature material.
    fn parse_v3(body: &[u8]) -> Result<Self> {
        if body.len() < 17 {
            return Err(PgpError::Truncated {
                field: "v3 signature fields",
            });
        }
        // the hashed-material length octet is fixed at 5 (sigtype + time)
        if body[1] != 5 {
            return Err(PgpError::MalformedSignature("bad v3 hashed length"));
        }

        let created = u32::from_be_bytes([body[3], body[4], body[5], body[6]]);
        let mut key_id = [0u8; 8];
        key_id.copy_from_slice(&body[7..15]);

        Ok(SignatureParams {
            version: 3,
            pubkey_algo: body[15],
            hash_algo: body[16],
            created,
            key_id,
        })
    }

    /// v4 layout: version(1) sigtype(1) pubkey-algo(1) hash-algo(1),
    /// then length-prefixed hashed and unhashed subpacket areas.
    fn parse_v4(body: &[u8]) -> Result<Self> {
        if body.len() < 6 {
            return Err(PgpError::Truncated {
                field: "v4 signature fields",
            });
        }
        let pubkey_algo = body[2];
        let hash_algo = body[3];

        let hashed_len = u16::from_be_bytes([body[4], body[5]]) as usize;
        let hashed_end = 6 + hashed_len;
        let hashed = body.get(6..hashed_end).ok_or(PgpError::Truncated {
            field: "hashed subpackets",
        })?;

        let unhashed_len = body
            .get(hashed_end..hashed_end + 2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]) as usize)
            .ok_or(PgpError::Truncated {
                field: "unhashed subpacket count",
            })?;
        let unhashed = body
            .get(hashed_end + 2..hashed_end + 2 + unhashed_len)
            .ok_or(PgpError::Truncated {
                field: "unhashed subpackets",
            })?;

        let mut created = None;
        let mut key_id = None;
        for area in [hashed, unhashed] {
            walk_subpackets(area, |ty, data| {
                match ty {
                    2 if data.len() >= 4 && created.is_none() => {
                        created = Some(u32::from_be_bytes([
                            data[0], data[1], data[2], data[3],
                        ]));
                    }
                    16 if data.len() >= 8 && key_id.is_none() => {
                        let mut id = [0u8; 8];
                        id.copy_from_slice(&data[..8]);
                        key_id = Some(id);
                    }
                    _ => {}
                }
            })?;
        }

        if created.is_none() || key_id.is_none() {
            debug!(
                has_created = created.is_some(),
                has_issuer = key_id.is_some(),
                "v4 signature is missing standard subpackets"
            );
        }

        Ok(SignatureParams {
            version: 4,
            pubkey_algo,
            hash_algo,
            created: created.unwrap_or(0),
            key_id: key_id.unwrap_or([0u8; 8]),
        })
    }
}

/// Walks one subpacket area, invoking `visit` with each type and payload.
///
/// Subpacket lengths use the one/two/five-octet scheme and include the
/// type octet (RFC 4880 §5.2.3.1).
fn walk_subpackets(mut area: &[u8], mut visit: impl FnMut(u8, &[u8])) -> Result<()> {
    while !area.is_empty() {
        let (len, len_size) = match area[0] as usize {
            n @ 0..=191 => (n, 1),
            n @ 192..=254 => {
                let second = *area.get(1).ok_or(PgpError::MalformedSignature(
                    "truncated subpacket length",
                ))? as usize;
                (((n - 192) << 8) + second + 192, 2)
            }
            _ => {
                let field = area.get(1..5).ok_or(PgpError::MalformedSignature(
                    "truncated subpacket length",
                ))?;
                (be_uint(field), 5)
            }
        };
        if len == 0 {
            return Err(PgpError::MalformedSignature("empty subpacket"));
        }

        let pkt = area
            .get(len_size..len_size + len)
            .ok_or(PgpError::MalformedSignature("truncated subpacket"))?;
        // high bit of the type octet is the criticality flag
        visit(pkt[0] & 0x7f, &pkt[1..]);

        area = &area[len_size + len..];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_old_format_header() {
        // tag 2 (signature), 1-byte length
        let buf = [0x88, 0x11, 0x00];
        let hdr = PacketHeader::parse(&buf).unwrap();
        assert_eq!(hdr.tag, PacketTag::Signature);
        assert_eq!(hdr.header_len, 2);
        assert_eq!(hdr.body_len, 0x11);
        assert_eq!(hdr.total_len(), 19);

        // 2-byte length
        let buf = [0x89, 0x01, 0x00];
        let hdr = PacketHeader::parse(&buf).unwrap();
        assert_eq!(hdr.header_len, 3);
        assert_eq!(hdr.body_len, 256);

        // 4-byte length
        let buf = [0x8a, 0x00, 0x00, 0x01, 0x00];
        let hdr = PacketHeader::parse(&buf).unwrap();
        assert_eq!(hdr.header_len, 5);
        assert_eq!(hdr.body_len, 256);
    }

    #[test]
    fn test_old_format_indeterminate_length_rejected() {
        assert!(matches!(
            PacketHeader::parse(&[0x8b]),
            Err(PgpError::UnsupportedLength)
        ));
    }

    #[test]
    fn test_new_format_header() {
        // one-octet length
        let hdr = PacketHeader::parse(&[0xc2, 100]).unwrap();
        assert_eq!(hdr.tag, PacketTag::Signature);
        assert_eq!(hdr.header_len, 2);
        assert_eq!(hdr.body_len, 100);

        // two-octet length
        let hdr = PacketHeader::parse(&[0xc2, 192, 0]).unwrap();
        assert_eq!(hdr.header_len, 3);
        assert_eq!(hdr.body_len, 192);

        let hdr = PacketHeader::parse(&[0xc2, 223, 255]).unwrap();
        assert_eq!(hdr.body_len, ((223 - 192) << 8) + 255 + 192);

        // five-octet length
        let hdr = PacketHeader::parse(&[0xc2, 255, 0, 0, 1, 0]).unwrap();
        assert_eq!(hdr.header_len, 6);
        assert_eq!(hdr.body_len, 256);
    }

    #[test]
    fn test_new_format_partial_length_rejected() {
        assert!(matches!(
            PacketHeader::parse(&[0xc2, 224]),
            Err(PgpError::UnsupportedLength)
        ));
    }

    #[test]
    fn test_invalid_headers() {
        assert!(matches!(PacketHeader::parse(&[]), Err(PgpError::Truncated { .. })));
        assert!(matches!(PacketHeader::parse(&[0x08]), Err(PgpError::NotAPacket)));
        assert!(matches!(
            PacketHeader::parse(&[0x89, 0x01]),
            Err(PgpError::Truncated { .. })
        ));
    }

    #[test]
    fn test_public_key_tag() {
        // old format tag 6
        let hdr = PacketHeader::parse(&[0x98, 0x10]).unwrap();
        assert_eq!(hdr.tag, PacketTag::PublicKey);
    }

    fn v3_body(pubkey_algo: u8, hash_algo: u8, created: u32, key_id: [u8; 8]) -> Vec<u8> {
        let mut body = vec![3, 5, 0x00];
        body.extend_from_slice(&created.to_be_bytes());
        body.extend_from_slice(&key_id);
        body.push(pubkey_algo);
        body.push(hash_algo);
        // hash prefix + truncated MPI material
        body.extend_from_slice(&[0xab, 0xcd, 0x00, 0x40]);
        body
    }

    #[test]
    fn test_v3_signature_params() {
        let key_id = [0xde, 0xad, 0xbe, 0xef, 0x01, 0x02, 0x03, 0x04];
        let params = SignatureParams::parse(&v3_body(17, 2, 1_000_000_000, key_id)).unwrap();
        assert_eq!(params.version, 3);
        assert_eq!(params.pubkey_algo, 17);
        assert_eq!(params.hash_algo, 2);
        assert_eq!(params.created, 1_000_000_000);
        assert_eq!(params.key_id, key_id);
    }

    #[test]
    fn test_v3_malformed() {
        assert!(SignatureParams::parse(&[3, 5, 0]).is_err());
        let body = v3_body(1, 1, 0, [0; 8]);
        // trailing signature material is not required
        assert!(SignatureParams::parse(&body[..17]).is_ok());
        let mut bad = v3_body(1, 1, 0, [0; 8]);
        bad[1] = 4;
        assert!(matches!(
            SignatureParams::parse(&bad),
            Err(PgpError::MalformedSignature(_))
        ));
    }

    fn v4_body(pubkey_algo: u8, hash_algo: u8, created: u32, key_id: [u8; 8]) -> Vec<u8> {
        let mut body = vec![4, 0x00, pubkey_algo, hash_algo];
        // hashed: creation time subpacket (len 5 = type + 4 data bytes)
        body.extend_from_slice(&[0, 6, 5, 2]);
        body.extend_from_slice(&created.to_be_bytes());
        // unhashed: issuer subpacket (len 9 = type + 8 data bytes)
        body.extend_from_slice(&[0, 10, 9, 16]);
        body.extend_from_slice(&key_id);
        body.extend_from_slice(&[0xab, 0xcd]);
        body
    }

    #[test]
    fn test_v4_signature_params() {
        let key_id = [1, 2, 3, 4, 5, 6, 7, 8];
        let params = SignatureParams::parse(&v4_body(1, 8, 1_600_000_000, key_id)).unwrap();
        assert_eq!(params.version, 4);
        assert_eq!(params.pubkey_algo, 1);
        assert_eq!(params.hash_algo, 8);
        assert_eq!(params.created, 1_600_000_000);
        assert_eq!(params.key_id, key_id);
    }

    #[test]
    fn test_v4_missing_subpackets_default_to_zero() {
        // empty hashed and unhashed areas
        let body = [4, 0x00, 17, 2, 0, 0, 0, 0];
        let params = SignatureParams::parse(&body).unwrap();
        assert_eq!(params.created, 0);
        assert_eq!(params.key_id, [0u8; 8]);
    }

    #[test]
    fn test_v4_truncated() {
        assert!(SignatureParams::parse(&[4, 0, 1]).is_err());
        // hashed area claims more bytes than present
        assert!(SignatureParams::parse(&[4, 0, 1, 2, 0, 9, 5, 2]).is_err());
    }

    #[test]
    fn test_unsupported_version() {
        assert!(matches!(
            SignatureParams::parse(&[5, 0, 0]),
            Err(PgpError::UnsupportedVersion(5))
        ));
        assert!(SignatureParams::parse(&[]).is_err());
    }

    #[test]
    fn test_v3_and_v4_agree() {
        let key_id = [9, 9, 9, 9, 8, 8, 8, 8];
        let v3 = SignatureParams::parse(&v3_body(17, 2, 123_456, key_id)).unwrap();
        let v4 = SignatureParams::parse(&v4_body(17, 2, 123_456, key_id)).unwrap();
        assert_eq!(v3.pubkey_algo, v4.pubkey_algo);
        assert_eq!(v3.hash_algo, v4.hash_algo);
        assert_eq!(v3.created, v4.created);
        assert_eq!(v3.key_id, v4.key_id);
    }
}
