//! JSON manifest loading with classified decode errors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

use crate::core::{BuildError, BuildResult, DecodeReason};

/// Read, normalize and decode a JSON file.
///
/// Empty documents and `null` are rejected like malformed ones, so a
/// manifest can never silently decode to nothing.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> BuildResult<T> {
    let bytes = fs::read(path).map_err(|e| BuildError::io(path, e))?;
    let decode_error = |reason| BuildError::ManifestDecode {
        path: path.to_path_buf(),
        reason,
    };

    let text = std::str::from_utf8(&bytes).map_err(|_| decode_error(DecodeReason::Encoding))?;
    let text = crate::utils::text::normalize_contents(text);
    if text.is_empty() || text == "null" {
        return Err(decode_error(DecodeReason::Empty));
    }

    serde_json::from_str(&text).map_err(|e| decode_error(DecodeReason::classify(&e)))
}

/// Accept either `"value"` or `["value", ...]`.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
