use serde::{Deserialize, Serialize};

/// Asset identifier of the chain's native asset. Only notes carrying this
/// asset are requested from the note source.
pub const NATIVE_ASSET_ID: &str =
    "51f33a2f14f92735e562dc658a5639279ddca3d5079a6d1242b2a588a9cbf44c";

/// One unspent note as reported by the wallet RPC.
///
/// Notes with `index: None` are not yet on a confirmed branch of the note
/// tree and cannot be spent.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub note_hash: String,
    #[serde(with = "string_u64")]
    pub value: u64,
    #[serde(default)]
    pub index: Option<u64>,
    pub asset_id: String,
}

impl NoteRecord {
    pub fn is_confirmed(&self) -> bool {
        self.index.is_some()
    }
}

/// Note values cross the wire as decimal strings to avoid JSON number
/// precision loss.
pub mod string_u64 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
