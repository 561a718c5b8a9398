use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Snapshot: one observation of a listing at a point in time
// ---------------------------------------------------------------------------

/// An immutable observation of a listing, as returned by the aggregation API.
///
/// The vertical-specific fields are flattened into `payload`; unknown fields
/// in the response are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<L> {
    #[serde(rename = "item", alias = "id", deserialize_with = "entity_key")]
    pub entity_key: String,
    #[serde(rename = "created")]
    pub captured_at: DateTime<Utc>,
    #[serde(rename = "checked", default)]
    pub checked_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub payload: L,
}

// ---------------------------------------------------------------------------
// SnapshotEnvelope: `{ "result": [...] }` response body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEnvelope<L> {
    pub result: Vec<Snapshot<L>>,
}

/// Scrapers emit listing ids either as strings or as bare integers.
fn entity_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match Key::deserialize(deserializer)? {
        Key::Text(s) => s,
        Key::Signed(n) => n.to_string(),
        Key::Unsigned(n) => n.to_string(),
    })
}
