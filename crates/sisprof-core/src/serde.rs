use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

/// Deserializes an optional query-string value, treating an empty string as `None`.
///
/// Browsers submit untouched filter inputs as `?class_id=`, which should mean
/// "no filter" rather than a parse error.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}
