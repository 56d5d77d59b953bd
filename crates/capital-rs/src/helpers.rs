use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CapitalError;

/// Append a url-encoded query string to `path`, skipping the `?` when empty.
pub(crate) fn with_query<Q>(path: &str, params: &Q) -> Result<String, CapitalError>
where
    Q: Serialize + ?Sized,
{
    let query = serde_urlencoded::to_string(params)
        .map_err(|e| CapitalError::generic(format!("Failed to serialize params: {e}")))?;
    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{path}?{query}"))
    }
}

/// Percent-encode one path segment so ids holding `/`, `?` or spaces stay
/// inside their segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    // byte_serialize writes a space as `+`; a literal `+` comes out as `%2B`.
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Fill the `{}` placeholder of a path constant with an encoded segment.
pub(crate) fn with_segment(template: &str, segment: &str) -> String {
    template.replace("{}", &encode_segment(segment))
}

/// Parse a response body, keeping the raw body in the error for debugging.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, CapitalError> {
    // Some endpoints answer 200 with an empty body; treat it as an empty object.
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| {
        CapitalError::generic(format!("Parse error: {e}. Response: {body}")).with_source(e)
    })
}

/// Join values into the comma separated form the API expects for list params.
pub(crate) fn join_csv<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| v.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

/// Field deserializer that reads an explicit `null` as the type's default.
///
/// Container-level `#[serde(default)]` only covers absent keys.
pub(crate) fn deserialize_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Convert a millisecond epoch timestamp as sent on the stream.
pub fn ms_to_utc(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
