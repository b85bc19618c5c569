//! Integer fields as PostgreSQL would receive them from loosely typed clients.
//!
//! A JSON number with a fraction rounds half away from zero (numeric → integer
//! cast); a string must hold an integer, surrounding whitespace allowed
//! (text → integer input). Anything out of `i32` range is rejected.

use serde::de::{Deserializer, Error};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseInt {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseInt {
    fn into_i32(self) -> Result<i32, String> {
        let wide = match self {
            LooseInt::Int(n) => n,
            LooseInt::Float(f) => {
                let rounded = f.round();
                if !rounded.is_finite() || rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
                    return Err(format!("integer out of range: {}", f));
                }
                rounded as i64
            }
            LooseInt::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid input syntax for type integer: \"{}\"", s))?,
        };
        i32::try_from(wide).map_err(|_| format!("integer out of range: {}", wide))
    }
}

/// `deserialize_with` helper for `Option<i32>` fields; pair with `#[serde(default)]`
pub fn loose_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LooseInt>::deserialize(deserializer)? {
        Some(value) => value.into_i32().map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}
