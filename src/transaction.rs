use anyhow::{anyhow, bail};

/// Serialization versions the combiner knows how to identify.
const SUPPORTED_VERSIONS: std::ops::RangeInclusive<u8> = 1..=2;

/// A finalized transaction as returned by the node, kept as raw bytes.
/// The combiner only needs enough structure to compute the canonical hash.
pub struct Transaction {
    bytes: Vec<u8>,
    version: u8,
}

impl Transaction {
    pub fn read(bytes: &[u8]) -> anyhow::Result<Self> {
        let version = *bytes
            .first()
            .ok_or_else(|| anyhow!("transaction payload is empty"))?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            bail!("unsupported transaction serialization version: {version}");
        }
        Ok(Transaction {
            bytes: bytes.to_vec(),
            version,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Canonical hash over the serialized transaction.
    pub fn hash(&self) -> [u8; 32] {
        *blake3::hash(&self.bytes).as_bytes()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }
}

#[cfg(test)]
mod tests {
    use crate::transaction::Transaction;

    #[test]
    fn empty_payload_is_rejected() {
        assert!(Transaction::read(&[]).is_err());
    }

    #[test]
    fn unknown_version_is_rejected() {
        assert!(Transaction::read(&[0, 1, 2]).is_err());
        assert!(Transaction::read(&[9, 1, 2]).is_err());
    }

    #[test]
    fn known_versions_parse() {
        assert_eq!(Transaction::read(&[1, 0xab]).unwrap().version(), 1);
        assert_eq!(Transaction::read(&[2, 0xab]).unwrap().version(), 2);
    }

    #[test]
    fn hash_is_lowercase_hex_and_stable() {
        let tx = Transaction::read(&[1, 0xde, 0xad, 0xbe, 0xef]).unwrap();
        let hash = tx.hash_hex();
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash.to_lowercase());
        assert_eq!(hash, tx.hash_hex());
        // a different payload hashes differently
        let other = Transaction::read(&[1, 0xde, 0xad, 0xbe, 0xee]).unwrap();
        assert_ne!(hash, other.hash_hex());
    }
}
