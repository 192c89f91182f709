use serde_json::{Map, Number, Value};

use crate::conf::FieldKind;
use crate::store::Record;

use super::{ResourceDef, escape_markup};

static NULL: Value = Value::Null;

/// Maps a stored row to its JSON shape: `id` plus the declared fields.
///
/// Text is entity-encoded, URLs pass through, integers are coerced to JSON
/// numbers (a value that does not parse becomes `null`). Columns outside the
/// definition are not emitted.
pub fn serialize(def: &ResourceDef, row: &Record) -> Value {
    let mut out = Map::new();
    out.insert(
        String::from("id"),
        row.get("id").cloned().unwrap_or(Value::Null),
    );
    for field in &def.fields {
        let value = row.get(&field.name).unwrap_or(&NULL);
        let shaped = match field.kind {
            FieldKind::Text => escape_text(value),
            FieldKind::Url => value.clone(),
            FieldKind::Integer => to_number(value),
        };
        out.insert(field.name.clone(), shaped);
    }
    Value::Object(out)
}

fn escape_text(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(escape_markup(s).into_owned()),
        other => other.clone(),
    }
}

fn to_number(value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        Value::Bool(b) => Value::from(u8::from(*b)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                Value::from(n)
            } else {
                s.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        _ => Value::Null,
    }
}
