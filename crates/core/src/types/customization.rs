//! Product customization option types.
//!
//! Printing products carry a loosely structured set of customization
//! options (sizes, finishes, quantities, ...) that varies per product, so
//! the schema is a generic ordered mapping from option name to the list of
//! allowed values rather than a fixed struct.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single customization value: either free text (e.g. "Matte") or a
/// number (e.g. 250).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        Self::Number(serde_json::Number::from(n))
    }
}

/// The user's selected value per option name for one cart or order line.
pub type Customization = BTreeMap<String, OptionValue>;

/// One named option set on a product (e.g. "sizes" -> ["A5", "A4", "A3"]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    pub name: String,
    pub values: Vec<OptionValue>,
}

/// The customization option sets a product offers, in the order the
/// catalog defines them.
///
/// On the wire this is a JSON object (`{"sizes": [...], "finishes":
/// [...]}`); the custom serde impls keep the document order, which is the
/// display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomizationOptions(Vec<OptionSet>);

impl CustomizationOptions {
    /// Create from an ordered list of option sets.
    #[must_use]
    pub fn new(sets: Vec<OptionSet>) -> Self {
        Self(sets)
    }

    /// The option sets in catalog order.
    #[must_use]
    pub fn sets(&self) -> &[OptionSet] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The default selection: the first allowed value of every option set.
    ///
    /// Option sets with an empty value list contribute no selection.
    #[must_use]
    pub fn default_selection(&self) -> Customization {
        self.0
            .iter()
            .filter_map(|set| {
                set.values
                    .first()
                    .map(|value| (set.name.clone(), value.clone()))
            })
            .collect()
    }
}

impl Serialize for CustomizationOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for set in &self.0 {
            map.serialize_entry(&set.name, &set.values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CustomizationOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OptionsVisitor;

        impl<'de> Visitor<'de> for OptionsVisitor {
            type Value = CustomizationOptions;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of option name to allowed values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut sets = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, values)) =
                    access.next_entry::<String, Vec<OptionValue>>()?
                {
                    sets.push(OptionSet { name, values });
                }
                Ok(CustomizationOptions(sets))
            }
        }

        deserializer.deserialize_map(OptionsVisitor)
    }
}
