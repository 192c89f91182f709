use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Url,
}

impl FieldKind {
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Url => "TEXT",
            FieldKind::Integer => "INTEGER",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    pub kind: FieldKind,
    /// Inclusive lower bound for integer fields.
    #[serde(default)]
    pub min: Option<i64>,
    /// Inclusive upper bound for integer fields.
    #[serde(default)]
    pub max: Option<i64>,
    /// Treat an empty string as missing.
    #[serde(default)]
    pub non_empty: bool,
    /// Overrides the generated message for type and range violations.
    #[serde(default)]
    pub message: Option<String>,
}

impl FieldConfig {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            min: None,
            max: None,
            non_empty: false,
            message: None,
        }
    }

    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    pub path: String,
    /// SQL table name, defaults to the resource name.
    #[serde(default)]
    pub table: Option<String>,
    pub fields: Vec<FieldConfig>,
    #[serde(default = "ResourceConfig::default_updatable")]
    pub updatable: bool,
}

impl ResourceConfig {
    fn default_updatable() -> bool {
        true
    }

    pub fn table_one() -> Self {
        Self {
            path: String::from("/api/table_one"),
            table: None,
            fields: vec![
                FieldConfig::new("first_name", FieldKind::Text),
                FieldConfig::new("age", FieldKind::Integer),
            ],
            updatable: true,
        }
    }
}
