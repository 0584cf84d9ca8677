use serde::{Deserialize, Deserializer};

/// Deserialize SGIS count fields, which arrive as numbers, numeric strings,
/// "N/A", or may be missing entirely. Anything unparseable becomes 0.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Float(f64),
        Str(String),
        Null,
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => n,
        Some(Raw::Float(f)) if f >= 0.0 => f as u64,
        Some(Raw::Str(s)) => s.trim().replace(',', "").parse().unwrap_or(0),
        _ => 0,
    })
}

/// Deserialize SGIS ratio fields with the same leniency as [`lenient_u64`]
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
        Null,
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => n,
        Some(Raw::Str(s)) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Deserialize fields the API sometimes returns as numbers (coordinates,
/// region codes) into strings
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
        Null,
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(f)) => f.to_string(),
        _ => String::new(),
    })
}
