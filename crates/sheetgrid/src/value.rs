//! Scalar cell values.
//!
//! Every cell in a [`RowStore`](crate::store::RowStore) holds a [`Value`]. Values
//! arrive from the processing backend as JSON scalars; anything that is not a
//! scalar is flattened to its compact JSON text on ingestion.
//!
//! All matching, duplicate detection and export operate on the *display string*
//! of a value (see [`Value::display`]), so `Number(100)` and `Text("100")` look
//! identical to the user even though they are stored differently.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or null. Displays as the empty string.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value, kept in the backend's JSON representation.
    Number(Number),
    /// Free text. Every committed cell edit produces this variant.
    Text(String),
}

impl Value {
    /// Creates a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string shown to the user for this value.
    ///
    /// Null renders as the empty string, integers render without a fractional
    /// part.
    #[must_use]
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Returns the numeric interpretation of this value, if it has one.
    ///
    /// Text that parses as a finite float counts as numeric so that columns
    /// whose cells were edited (and therefore became text) still sort by number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            Self::Null | Self::Bool(_) => None,
        }
    }

    /// Converts a JSON value into a cell value.
    ///
    /// Arrays and objects are not scalars; they are kept as their compact JSON
    /// text so nothing the backend sent is silently lost.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::Text(s),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::Text(other.to_string())
            }
        }
    }

    /// Converts this value back into JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::Number(n.into())
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64);

impl From<f64> for Value {
    /// Non-finite floats have no JSON representation and become null.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Self::Null, Self::Number)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
