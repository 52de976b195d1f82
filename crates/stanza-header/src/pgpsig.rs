//! One-line OpenPGP signature summaries.

use stanza_pgp::{HashAlgo, PacketHeader, PacketTag, PubkeyAlgo, SignatureParams};
use stanza_utils::time::strftime_local;
use tracing::debug;

use crate::tagdata::TagData;
use crate::template::FieldTemplate;

const NOT_A_SIGNATURE: &str = "(not an OpenPGP signature)";

/// Renders `ALGO/HASH, DATE, Key ID HEXID` for the signature packet at the
/// start of a binary tag. Anything that stops the packet from being read
/// as a signature (bad framing, a different packet type, a truncated or
/// malformed body) renders the same diagnostic string.
pub(crate) fn pgpsig_format(td: &TagData<'_>, _template: &FieldTemplate) -> String {
    let Some(pkt) = td.as_bytes() else {
        return "(not a blob)".to_string();
    };
    summarize(pkt).unwrap_or_else(|| NOT_A_SIGNATURE.to_string())
}

fn summarize(pkt: &[u8]) -> Option<String> {
    let header = match PacketHeader::parse(pkt) {
        Ok(header) => header,
        Err(err) => {
            debug!("cannot frame signature packet: {err}");
            return None;
        }
    };
    if header.tag != PacketTag::Signature {
        return None;
    }

    let params = match SignatureParams::parse(header.body(pkt).ok()?) {
        Ok(params) => params,
        Err(err) => {
            debug!("cannot read signature fields: {err}");
            return None;
        }
    };

    let mut out = String::with_capacity(100);
    out.push_str(&PubkeyAlgo::from_id(params.pubkey_algo).to_string());
    out.push('/');
    out.push_str(&HashAlgo::from_id(params.hash_algo).to_string());
    out.push_str(", ");
    out.push_str(&strftime_local(i64::from(params.created), "%c"));
    out.push_str(", Key ID ");
    out.push_str(&hex::encode(params.key_id));
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Old-format signature packet around a v3 body.
    fn v3_packet(pubkey_algo: u8, hash_algo: u8, created: u32, key_id: [u8; 8]) -> Vec<u8> {
        let mut body = vec![3, 5, 0x00];
        body.extend_from_slice(&created.to_be_bytes());
        body.extend_from_slice(&key_id);
        body.push(pubkey_algo);
        body.push(hash_algo);
        body.extend_from_slice(&[0xab, 0xcd]);

        let mut pkt = vec![0x88, body.len() as u8];
        pkt.extend_from_slice(&body);
        pkt
    }

    /// New-format signature packet around a v4 body.
    fn v4_packet(pubkey_algo: u8, hash_algo: u8, created: u32, key_id: [u8; 8]) -> Vec<u8> {
        let mut body = vec![4, 0x00, pubkey_algo, hash_algo];
        body.extend_from_slice(&[0, 6, 5, 2]);
        body.extend_from_slice(&created.to_be_bytes());
        body.extend_from_slice(&[0, 10, 9, 16]);
        body.extend_from_slice(&key_id);

        let mut pkt = vec![0xc2, body.len() as u8];
        pkt.extend_from_slice(&body);
        pkt
    }

    fn render(pkt: &[u8]) -> String {
        pgpsig_format(&TagData::binary(pkt), &FieldTemplate::new())
    }

    #[test]
    fn test_rejects_non_binary() {
        let td = TagData::string("sig");
        assert_eq!(pgpsig_format(&td, &FieldTemplate::new()), "(not a blob)");
    }

    #[test]
    fn test_first_byte_without_high_bit() {
        assert_eq!(render(&[0x00, 0x01, 0x02]), NOT_A_SIGNATURE);
        assert_eq!(render(&[]), NOT_A_SIGNATURE);
    }

    #[test]
    fn test_wrong_packet_type() {
        // valid old-format framing, but a public key packet
        assert_eq!(render(&[0x98, 0x01, 0x00]), NOT_A_SIGNATURE);
    }

    #[test]
    fn test_truncated_and_malformed_collapse() {
        // header claims more body than the buffer holds
        assert_eq!(render(&[0x88, 0x20, 0x03]), NOT_A_SIGNATURE);
        // framing fine, body version unsupported
        assert_eq!(render(&[0x88, 0x03, 0x09, 0x00, 0x00]), NOT_A_SIGNATURE);
    }

    #[test]
    fn test_v3_dsa_sha1_summary() {
        let key_id = [0xde, 0xad, 0xbe, 0xef, 0x01, 0x02, 0x03, 0x04];
        let summary = render(&v3_packet(17, 2, 1_000_000_000, key_id));
        assert!(summary.starts_with("DSA/SHA1, "), "got: {summary}");
        assert!(summary.ends_with(", Key ID deadbeef01020304"), "got: {summary}");
        // the date sits between the fixed pieces
        assert!(summary.len() > "DSA/SHA1, , Key ID deadbeef01020304".len());
    }

    #[test]
    fn test_v4_rsa_summary_with_numeric_hash() {
        let key_id = [1, 2, 3, 4, 5, 6, 7, 8];
        let summary = render(&v4_packet(1, 8, 1_600_000_000, key_id));
        assert!(summary.starts_with("RSA/8, "), "got: {summary}");
        assert!(summary.ends_with(", Key ID 0102030405060708"), "got: {summary}");
    }

    #[test]
    fn test_unknown_algorithms_render_decimal() {
        let summary = render(&v3_packet(22, 10, 1_500_000_000, [0; 8]));
        assert!(summary.starts_with("22/10, "), "got: {summary}");
    }

    #[test]
    fn test_trailing_garbage_after_packet_is_ignored() {
        let mut pkt = v3_packet(17, 2, 1_000_000_000, [9; 8]);
        pkt.extend_from_slice(b"trailing bytes the summarizer never reads");
        assert!(render(&pkt).starts_with("DSA/SHA1, "));
    }
}
