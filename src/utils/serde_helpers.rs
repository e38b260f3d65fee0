use serde::{ Deserialize, Deserializer, Serializer };
use serde::de;
use tracing::Level;

/// Serialize `tracing::Level` as its lowercase name
pub fn serialize_level<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
{
    serializer.serialize_str(&level.as_str().to_lowercase())
}

/// Deserialize `tracing::Level` from a case-insensitive name (trace, debug, info, warn, error)
pub fn deserialize_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where D: Deserializer<'de>
{
    let text = String::deserialize(deserializer)?;
    text.parse::<Level>().map_err(|_| de::Error::custom(format!("unknown log level: {}", text)))
}
