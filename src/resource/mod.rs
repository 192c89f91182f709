//! Resource definitions shared by every CRUD router.
//!
//! A [`ResourceDef`] names the SQL table, the mount path and the ordered list
//! of required fields. The validator and serializer are driven entirely by it,
//! so bookmarks and configured tables go through the same code.

mod escape;
mod serialize;
mod validate;

use std::collections::HashSet;

use crate::conf::{Config, FieldConfig, FieldKind, ResourceConfig};
use crate::core::RestplateError;

pub use escape::escape_markup;
pub use serialize::serialize;
pub use validate::{FieldError, validate_create, validate_update};

/// Mounted by the API itself, never by a resource.
pub const HEALTH_PATH: &str = "/health";

/// Response messages that differ between resources.
#[derive(Debug, Clone, PartialEq)]
pub struct Messages {
    pub not_found: String,
    /// `{field}` is replaced with the missing field name.
    pub missing_field: String,
    /// `{fields}` is replaced with the comma-joined field list.
    pub no_update_fields: String,
}

impl Messages {
    pub fn for_table(name: &str) -> Self {
        Self {
            not_found: format!("Table {name}: Item Not Found"),
            missing_field: String::from("'{field}' is required"),
            no_update_fields: String::from("Request body must contain either {fields}"),
        }
    }

    pub fn missing(&self, field: &str) -> String {
        self.missing_field.replace("{field}", field)
    }

    pub fn no_update(&self, fields: &[&str]) -> String {
        self.no_update_fields.replace("{fields}", &fields.join(","))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDef {
    pub name: String,
    pub table: String,
    pub path: String,
    pub fields: Vec<FieldConfig>,
    pub updatable: bool,
    pub messages: Messages,
}

impl ResourceDef {
    pub fn bookmarks() -> Self {
        Self {
            name: String::from("bookmarks"),
            table: String::from("bookmarks"),
            path: String::from("/bookmarks"),
            fields: vec![
                FieldConfig::new("title", FieldKind::Text).non_empty(),
                FieldConfig::new("url", FieldKind::Url).message("Invalid URL"),
                FieldConfig::new("rating", FieldKind::Integer)
                    .range(0, 5)
                    .message("Not a valid rating"),
                FieldConfig::new("description", FieldKind::Text),
            ],
            updatable: false,
            messages: Messages {
                not_found: String::from("Bookmark not found"),
                missing_field: String::from("Missing required {field} in bookmark"),
                no_update_fields: String::from("Request body must contain either {fields}"),
            },
        }
    }

    pub fn from_config(name: &str, config: &ResourceConfig) -> Result<Self, RestplateError> {
        let def = Self {
            name: name.to_string(),
            table: config.table.clone().unwrap_or_else(|| name.to_string()),
            path: config.path.trim_end_matches('/').to_string(),
            fields: config.fields.clone(),
            updatable: config.updatable,
            messages: Messages::for_table(name),
        };
        def.check()?;
        Ok(def)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Path of a single record, used for the `Location` header.
    pub fn location(&self, id: i64) -> String {
        format!("{}/{}", self.path, id)
    }

    fn check(&self) -> Result<(), RestplateError> {
        let fail = |msg: String| Err(RestplateError::ResourceError(self.name.clone(), msg));

        if !is_identifier(&self.table) {
            return fail(format!("table name '{}' is not a plain identifier", self.table));
        }
        if !self.path.starts_with('/') || self.path.len() < 2 {
            return fail(format!("path '{}' must start with '/'", self.path));
        }
        if !self.path[1..].split('/').all(is_path_segment) {
            return fail(format!(
                "path '{}' may only contain letters, digits, '_', '-' and '.' between slashes",
                self.path
            ));
        }
        if is_nested(&self.path, HEALTH_PATH) {
            return fail(format!("path '{}' is reserved", self.path));
        }
        if self.fields.is_empty() {
            return fail(String::from("at least one field is required"));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !is_identifier(&field.name) {
                return fail(format!("field name '{}' is not a plain identifier", field.name));
            }
            if field.name.eq_ignore_ascii_case("id") {
                return fail(String::from("'id' is assigned by the server"));
            }
            if !seen.insert(field.name.as_str()) {
                return fail(format!("duplicate field '{}'", field.name));
            }
            if field.kind != FieldKind::Integer && (field.min.is_some() || field.max.is_some()) {
                return fail(format!("field '{}': min/max only apply to integers", field.name));
            }
        }
        Ok(())
    }
}

/// Builds the bookmark resource plus every configured one.
pub fn load_resources(config: &Config) -> Result<Vec<ResourceDef>, RestplateError> {
    let mut defs = vec![ResourceDef::bookmarks()];
    for (name, res) in &config.resources {
        defs.push(ResourceDef::from_config(name, res)?);
    }

    let mut paths = HashSet::new();
    let mut tables = HashSet::new();
    for (i, def) in defs.iter().enumerate() {
        if !paths.insert(def.path.as_str()) {
            return Err(RestplateError::ResourceError(
                def.name.clone(),
                format!("path '{}' is already mounted", def.path),
            ));
        }
        if let Some(other) = defs[..i]
            .iter()
            .find(|d| is_nested(&def.path, &d.path) || is_nested(&d.path, &def.path))
        {
            return Err(RestplateError::ResourceError(
                def.name.clone(),
                format!("path '{}' overlaps '{}' of {}", def.path, other.path, other.name),
            ));
        }
        if !tables.insert(def.table.as_str()) {
            return Err(RestplateError::ResourceError(
                def.name.clone(),
                format!("table '{}' is already used", def.table),
            ));
        }
    }
    Ok(defs)
}

fn is_path_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// True when `path` equals `base` or lies under it.
fn is_nested(path: &str, base: &str) -> bool {
    path.strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
