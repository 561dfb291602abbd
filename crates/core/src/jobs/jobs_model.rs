use serde::{Deserialize, Deserializer, Serialize};

/// A job opening whose candidates form one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// The server sends numeric ids; string ids are accepted as-is.
    #[serde(deserialize_with = "deserialize_job_id")]
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JobId {
    Text(String),
    Number(i64),
}

fn deserialize_job_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JobId::deserialize(deserializer)? {
        JobId::Text(id) => id,
        JobId::Number(id) => id.to_string(),
    })
}
