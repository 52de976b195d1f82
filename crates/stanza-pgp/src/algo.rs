//! Public-key and hash algorithm identifiers.
//!
//! Display renders the conventional short name where one exists and falls
//! back to the numeric identifier, which is exactly what signature
//! summaries print.

use std::fmt;

/// Public-key algorithm id from a signature packet (RFC 4880 §9.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PubkeyAlgo {
    Rsa,
    Dsa,
    /// Any id without a conventional short name.
    Unknown(u8),
}

impl PubkeyAlgo {
    /// Maps a raw algorithm id to its variant.
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => PubkeyAlgo::Rsa,
            17 => PubkeyAlgo::Dsa,
            other => PubkeyAlgo::Unknown(other),
        }
    }
}

impl fmt::Display for PubkeyAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PubkeyAlgo::Rsa => f.write_str("RSA"),
            PubkeyAlgo::Dsa => f.write_str("DSA"),
            PubkeyAlgo::Unknown(id) => write!(f, "{id}"),
        }
    }
}

/// Hash algorithm id from a signature packet (RFC 4880 §9.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgo {
    Md5,
    Sha1,
    /// Any id without a conventional short name.
    Unknown(u8),
}

impl HashAlgo {
    /// Maps a raw algorithm id to its variant.
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => HashAlgo::Md5,
            2 => HashAlgo::Sha1,
            other => HashAlgo::Unknown(other),
        }
    }
}

impl fmt::Display for HashAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgo::Md5 => f.write_str("MD5"),
            HashAlgo::Sha1 => f.write_str("SHA1"),
            HashAlgo::Unknown(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pubkey_algo_display() {
        assert_eq!(PubkeyAlgo::from_id(1).to_string(), "RSA");
        assert_eq!(PubkeyAlgo::from_id(17).to_string(), "DSA");
        assert_eq!(PubkeyAlgo::from_id(19).to_string(), "19");
    }

    #[test]
    fn test_hash_algo_display() {
        assert_eq!(HashAlgo::from_id(1).to_string(), "MD5");
        assert_eq!(HashAlgo::from_id(2).to_string(), "SHA1");
        assert_eq!(HashAlgo::from_id(8).to_string(), "8");
    }
}
