//! Input model: people, unions, and the raw document that carries them.
//!
//! Documents usually come from a language model or from hand-authored JSON, so
//! parsing is lenient about *missing* optional fields (they default to falsy /
//! empty values) and about `null` where a default exists. It is strict about
//! shape: anything that is not an object with `members` and `marriages` arrays
//! of records is rejected as [`LayoutError::InvalidInput`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::layout::LayoutError;

/// Stable identifier of a person, referenced by unions.
pub type PersonId = String;

/// Display name used when a member record carries no name.
pub const UNKNOWN_NAME: &str = "Unknown";

// =============================================================================
// PERSON
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M", alias = "male", alias = "m")]
    Male,
    #[serde(rename = "F", alias = "female", alias = "f")]
    Female,
    #[default]
    #[serde(rename = "U", alias = "unknown", alias = "u")]
    Unknown,
}

/// A family member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    #[serde(default = "unknown_name", deserialize_with = "name_or_unknown")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_deceased: bool,
    /// The care recipient. At most one person should set this; not enforced.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_self: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_key_person: bool,
    /// Generation relative to the self person: 0 = self, -1 = parents, +1 = children.
    #[serde(default, deserialize_with = "null_as_default")]
    pub generation: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Person {
    /// Build a person with every optional attribute left at its default.
    #[must_use]
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>, gender: Gender, generation: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender,
            birth_year: None,
            death_year: None,
            is_deceased: false,
            is_self: false,
            is_key_person: false,
            generation,
            note: None,
        }
    }
}

// =============================================================================
// UNION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnionStatus {
    #[default]
    Married,
    Divorced,
    Separated,
    Cohabitation,
}

/// A relationship between one or two people plus their children.
///
/// Partner order is not semantically meaningful, but partner A is the anchor
/// whose band governs the union's placement. On the wire the partners keep the
/// historical `husband` / `wife` keys; `partnerA` / `partnerB` are accepted too.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Union {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "husband", alias = "partnerA", skip_serializing_if = "Option::is_none")]
    pub partner_a: Option<PersonId>,
    #[serde(default, rename = "wife", alias = "partnerB", skip_serializing_if = "Option::is_none")]
    pub partner_b: Option<PersonId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: UnionStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<PersonId>,
}

impl Union {
    /// The node id for this union: its declared id, or one derived from its
    /// position in the marriage list.
    #[must_use]
    pub fn node_id(&self, index: usize) -> String {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => format!("union-{index}"),
        }
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// A raw genogram description: the layout engine's input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenogramDocument {
    pub members: Vec<Person>,
    pub marriages: Vec<Union>,
}

impl GenogramDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidInput`] when the text is not JSON or the
    /// JSON is not shaped as a document.
    pub fn from_json_str(raw: &str) -> Result<Self, LayoutError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| LayoutError::InvalidInput(format!("not valid JSON: {e}")))?;
        Self::from_value(&value)
    }

    /// Interpret an already-parsed JSON value as a document.
    ///
    /// Each record is decoded on its own so the error names the offending
    /// entry instead of a byte offset.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidInput`] when the value is not an object,
    /// when `members` or `marriages` is missing or not an array, or when a
    /// record cannot be decoded.
    pub fn from_value(value: &Value) -> Result<Self, LayoutError> {
        let Some(root) = value.as_object() else {
            return Err(LayoutError::InvalidInput("document must be a JSON object".into()));
        };

        let members = array_field(root, "members")?
            .iter()
            .enumerate()
            .map(|(i, raw)| decode_record::<Person>(raw, "members", i))
            .collect::<Result<Vec<_>, _>>()?;
        let marriages = array_field(root, "marriages")?
            .iter()
            .enumerate()
            .map(|(i, raw)| decode_record::<Union>(raw, "marriages", i))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { members, marriages })
    }
}

fn array_field<'a>(root: &'a Map<String, Value>, key: &str) -> Result<&'a Vec<Value>, LayoutError> {
    match root.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(LayoutError::InvalidInput(format!("`{key}` must be an array"))),
        None => Err(LayoutError::InvalidInput(format!("missing `{key}`"))),
    }
}

fn decode_record<'a, T: Deserialize<'a>>(raw: &'a Value, field: &str, index: usize) -> Result<T, LayoutError> {
    if !raw.is_object() {
        return Err(LayoutError::InvalidInput(format!("{field}[{index}] must be an object")));
    }
    T::deserialize(raw).map_err(|e| LayoutError::InvalidInput(format!("{field}[{index}]: {e}")))
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

fn unknown_name() -> String {
    UNKNOWN_NAME.to_owned()
}

fn name_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(unknown_name))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
