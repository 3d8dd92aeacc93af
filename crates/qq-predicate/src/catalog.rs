//! Field catalog and semantic type resolution.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strsim::levenshtein;

/// Maximum Levenshtein distance to consider a field name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Logical type of a field, independent of its wire representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Free text. Also the fallback for unknown or missing types.
    #[default]
    Text,
    /// Floating point number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// ISO-8601 date string, compared lexically.
    Date,
}

impl SemanticType {
    /// Parses a type name. Unrecognized names resolve to [`SemanticType::Text`].
    pub fn parse(name: &str) -> Self {
        match name {
            "number" => SemanticType::Number,
            "boolean" => SemanticType::Boolean,
            "date" => SemanticType::Date,
            _ => SemanticType::Text,
        }
    }

    /// Returns the wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Text => "text",
            SemanticType::Number => "number",
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SemanticType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SemanticType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Editors may send arbitrary type tags (or none at all); anything that
        // is not a known string falls back to text.
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw
            .as_str()
            .map(SemanticType::parse)
            .unwrap_or(SemanticType::Text))
    }
}

/// Declares the semantic type of one record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Record key the descriptor applies to.
    pub name: String,

    /// Human readable label shown by the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Semantic type used for value coercion.
    #[serde(rename = "type", default)]
    pub semantic_type: SemanticType,

    /// Editor input hint (`date`, `number`, ...). Not used by the compiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
}

impl FieldDescriptor {
    /// Creates a descriptor without editor metadata.
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            label: None,
            semantic_type,
            input_type: None,
        }
    }

    /// Sets the editor label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the editor input hint.
    pub fn with_input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    /// Returns the label, or the field name when no label is set.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// The set of field descriptors a query is compiled against.
///
/// Immutable for the lifetime of a query. Lookups are by exact name; when a
/// name appears more than once the first descriptor wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    fields: Vec<FieldDescriptor>,
}

impl FieldCatalog {
    /// Creates a catalog from descriptors.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// Returns the descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns true if the catalog has no descriptors.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finds the descriptor for a field name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolves the semantic type of a field.
    ///
    /// Fields missing from the catalog resolve to [`SemanticType::Text`].
    pub fn resolve(&self, name: &str) -> SemanticType {
        match self.get(name) {
            Some(descriptor) => descriptor.semantic_type,
            None => {
                match self.suggest(name) {
                    Some(suggestion) => tracing::debug!(
                        field = name,
                        suggestion,
                        "field not in catalog, using text semantics"
                    ),
                    None => tracing::debug!(field = name, "field not in catalog, using text semantics"),
                }
                SemanticType::Text
            }
        }
    }

    /// Finds the closest catalog field name using Levenshtein distance.
    ///
    /// Returns `None` for exact matches and for names too far from any field.
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let (best, distance) = self
            .fields
            .iter()
            .map(|f| (f.name.as_str(), levenshtein(name, &f.name)))
            .min_by_key(|(_, d)| *d)?;

        if distance > 0 && distance <= MAX_SUGGESTION_DISTANCE {
            Some(best)
        } else {
            None
        }
    }
}

impl From<Vec<FieldDescriptor>> for FieldCatalog {
    fn from(fields: Vec<FieldDescriptor>) -> Self {
        Self::new(fields)
    }
}

/// Resolves the semantic type of `name` in `catalog`.
pub fn resolve(name: &str, catalog: &FieldCatalog) -> SemanticType {
    catalog.resolve(name)
}
