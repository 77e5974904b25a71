//! Extraction schema model
//!
//! A schema groups requested fields into priority tiers. Each field carries
//! its value type, the label aliases used to find it in free text, and the
//! minimum confidence a strategy must reach for its value to be accepted.
//!
//! ```json
//! {
//!   "extraction_schema": {
//!     "required": {
//!       "title": {"type": "string", "aliases": ["Job Title", "Position"], "min_confidence": 70}
//!     }
//!   },
//!   "extraction_settings": {"timeout": 30}
//! }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Priority tier, listed from highest to lowest priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Required,
    HighPriority,
    MediumPriority,
    Optional,
    CustomFields,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Required,
        Tier::HighPriority,
        Tier::MediumPriority,
        Tier::Optional,
        Tier::CustomFields,
    ];

    /// Key of this tier inside `extraction_schema`
    pub fn key(self) -> &'static str {
        match self {
            Tier::Required => "required",
            Tier::HighPriority => "high_priority",
            Tier::MediumPriority => "medium_priority",
            Tier::Optional => "optional",
            Tier::CustomFields => "custom_fields",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Tier::Required => "Required Fields",
            Tier::HighPriority => "High Priority",
            Tier::MediumPriority => "Medium Priority",
            Tier::Optional => "Optional Fields",
            Tier::CustomFields => "Custom Fields",
        }
    }
}

/// Declared value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Email,
    Phone,
    Date,
    Object,
    Array,
}

impl FieldType {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" => Some(FieldType::String),
            "email" => Some(FieldType::Email),
            "phone" => Some(FieldType::Phone),
            "date" => Some(FieldType::Date),
            "object" => Some(FieldType::Object),
            "array" => Some(FieldType::Array),
            _ => None,
        }
    }
}

/// Configuration of one requested field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Raw "type" entry; `None` when the schema omits it
    pub declared_type: Option<String>,
    pub aliases: Vec<String>,
    pub min_confidence: f64,
}

impl FieldConfig {
    /// Effective type used for extraction. Missing or unknown types fall back to string.
    pub fn field_type(&self) -> FieldType {
        self.declared_type
            .as_deref()
            .and_then(FieldType::parse)
            .unwrap_or(FieldType::String)
    }

    fn from_value(name: &str, value: &Value) -> Result<Self, SchemaError> {
        let obj = value.as_object().ok_or_else(|| {
            SchemaError::Malformed(format!("field '{}' must be an object", name))
        })?;

        let declared_type = match obj.get("type") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(SchemaError::Malformed(format!(
                    "field '{}' has non-string type: {}",
                    name, other
                )))
            }
        };

        let aliases = match obj.get("aliases") {
            None | Some(Value::Null) => vec![name.to_string()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(other) => {
                return Err(SchemaError::Malformed(format!(
                    "field '{}' aliases must be an array, got {}",
                    name, other
                )))
            }
        };

        let min_confidence = match obj.get("min_confidence") {
            None | Some(Value::Null) => 0.0,
            Some(v) => v.as_f64().ok_or_else(|| {
                SchemaError::Malformed(format!(
                    "field '{}' min_confidence must be a number, got {}",
                    name, v
                ))
            })?,
        };

        Ok(FieldConfig {
            declared_type,
            aliases,
            min_confidence,
        })
    }
}

/// One entry of the merged field list
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<'a> {
    pub name: &'a str,
    pub tier: Tier,
    pub config: &'a FieldConfig,
}

/// Non-fatal schema problem reported by [`Schema::validate`]
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaWarning {
    MissingRequiredTier,
    FewRequiredFields(usize),
    MissingType { field: String },
    UnknownType { field: String, declared: String },
    NoAliases { field: String },
    DuplicateField { field: String, kept: Tier, shadowed: Tier },
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaWarning::MissingRequiredTier => write!(f, "Missing 'required' section"),
            SchemaWarning::FewRequiredFields(n) => {
                write!(f, "Only {} required fields (recommended: 3+)", n)
            }
            SchemaWarning::MissingType { field } => write!(f, "Field '{}' missing 'type'", field),
            SchemaWarning::UnknownType { field, declared } => write!(
                f,
                "Field '{}' has unknown type '{}', treated as string",
                field, declared
            ),
            SchemaWarning::NoAliases { field } => {
                write!(f, "Field '{}' has no aliases (recommended)", field)
            }
            SchemaWarning::DuplicateField {
                field,
                kept,
                shadowed,
            } => write!(
                f,
                "Field '{}' appears in both '{}' and '{}', keeping '{}'",
                field,
                kept.key(),
                shadowed.key(),
                kept.key()
            ),
        }
    }
}

/// Parsed extraction schema
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Tiers present in the document, in priority order
    tiers: Vec<(Tier, Vec<(String, FieldConfig)>)>,
    settings: Map<String, Value>,
}

impl Schema {
    /// Read and parse a schema file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SchemaError::NotFound(path.to_path_buf())
            } else {
                SchemaError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        let schema = Self::from_json_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            fields = schema.field_count(),
            "loaded extraction schema"
        );
        // Out-of-range thresholds are reported by extraction, not here
        if let Ok(warnings) = schema.validate() {
            for warning in warnings {
                tracing::warn!(path = %path.display(), %warning, "schema warning");
            }
        }
        Ok(schema)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let root = value
            .as_object()
            .ok_or_else(|| SchemaError::Malformed("schema root must be an object".into()))?;

        let mut tiers = Vec::new();
        match root.get("extraction_schema") {
            None | Some(Value::Null) => {}
            Some(Value::Object(extraction)) => {
                for tier in Tier::ALL {
                    let Some(entries) = extraction.get(tier.key()) else {
                        continue;
                    };
                    let entries = entries.as_object().ok_or_else(|| {
                        SchemaError::Malformed(format!("tier '{}' must be an object", tier.key()))
                    })?;
                    let fields = entries
                        .iter()
                        .map(|(name, cfg)| Ok((name.clone(), FieldConfig::from_value(name, cfg)?)))
                        .collect::<Result<Vec<_>, SchemaError>>()?;
                    tiers.push((tier, fields));
                }
            }
            Some(_) => {
                return Err(SchemaError::Malformed(
                    "'extraction_schema' must be an object".into(),
                ))
            }
        }

        let settings = match root.get("extraction_settings") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        Ok(Schema { tiers, settings })
    }

    /// Check the schema, returning warnings. Out-of-range confidence thresholds are fatal.
    pub fn validate(&self) -> Result<Vec<SchemaWarning>, SchemaError> {
        let mut warnings = Vec::new();

        let required = self.tier(Tier::Required);
        if required.is_none() {
            warnings.push(SchemaWarning::MissingRequiredTier);
        }
        let required_count = required.map_or(0, |fields| fields.len());
        if required_count < 3 {
            warnings.push(SchemaWarning::FewRequiredFields(required_count));
        }

        let mut first_tier: Vec<(&str, Tier)> = Vec::new();
        for (tier, fields) in &self.tiers {
            for (name, config) in fields {
                if !(0.0..=100.0).contains(&config.min_confidence) {
                    return Err(SchemaError::ConfidenceOutOfRange {
                        field: name.clone(),
                        value: config.min_confidence,
                    });
                }
                if let Some(&(_, kept)) = first_tier.iter().find(|(n, _)| *n == name.as_str()) {
                    warnings.push(SchemaWarning::DuplicateField {
                        field: name.clone(),
                        kept,
                        shadowed: *tier,
                    });
                    continue;
                }
                first_tier.push((name.as_str(), *tier));

                match config.declared_type.as_deref() {
                    None => warnings.push(SchemaWarning::MissingType {
                        field: name.clone(),
                    }),
                    Some(declared) if FieldType::parse(declared).is_none() => {
                        warnings.push(SchemaWarning::UnknownType {
                            field: name.clone(),
                            declared: declared.to_string(),
                        })
                    }
                    Some(_) => {}
                }
                if config.aliases.is_empty() {
                    warnings.push(SchemaWarning::NoAliases {
                        field: name.clone(),
                    });
                }
            }
        }

        Ok(warnings)
    }

    /// Union of all tiers in priority order. A name listed in several tiers
    /// is reported once, under the highest tier.
    pub fn fields(&self) -> Vec<FieldSpec<'_>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (tier, fields) in &self.tiers {
            for (name, config) in fields {
                if seen.insert(name.as_str()) {
                    out.push(FieldSpec {
                        name,
                        tier: *tier,
                        config,
                    });
                }
            }
        }
        out
    }

    pub fn field(&self, name: &str) -> Option<FieldSpec<'_>> {
        self.fields().into_iter().find(|f| f.name == name)
    }

    pub fn field_count(&self) -> usize {
        self.fields().len()
    }

    pub fn required_fields(&self) -> Vec<&str> {
        self.tier(Tier::Required)
            .map(|fields| fields.iter().map(|(n, _)| n.as_str()).collect())
            .unwrap_or_default()
    }

    /// Aliases of a field, or the field name itself when unknown
    pub fn aliases(&self, name: &str) -> Vec<String> {
        self.field(name)
            .map(|f| f.config.aliases.clone())
            .unwrap_or_else(|| vec![name.to_string()])
    }

    /// The free-form `extraction_settings` object
    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    /// Human-readable listing of tiers and settings
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Extraction Schema Summary".to_string(),
            "=".repeat(50),
            String::new(),
        ];

        for (tier, fields) in &self.tiers {
            if fields.is_empty() && *tier != Tier::Required {
                continue;
            }
            lines.push(format!("{} ({}):", tier.label(), fields.len()));
            for (name, _) in fields {
                lines.push(format!("  - {}", name));
            }
            lines.push(String::new());
        }

        lines.push("Settings:".to_string());
        for (key, value) in &self.settings {
            lines.push(format!("  {}: {}", key, value));
        }

        lines.join("\n")
    }

    fn tier(&self, tier: Tier) -> Option<&[(String, FieldConfig)]> {
        self.tiers
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, fields)| fields.as_slice())
    }
}
