// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detected firing fields as produced by field detection

use crate::error::{Error, Result};
use crate::grid::{FieldMap, MaskedGrid};
use serde::Deserialize;

/// Serialized form of a field: `field_map` rows (`null` = missing sample),
/// an optional `mask`, and any other keys kept as opaque metadata
#[derive(Debug, Deserialize)]
struct FieldRecord {
    field_map: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    mask: Option<Vec<Vec<bool>>>,
    #[serde(flatten)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

/// One detected firing field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub field_map: FieldMap,
    /// Everything else the detector reported; not interpreted here
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Field {
    pub fn new(field_map: FieldMap) -> Self {
        Self {
            field_map,
            metadata: serde_json::Map::new(),
        }
    }

    /// Decode a field from a JSON object
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::invalid(format!("a field must be an object, got {}", json_type_name(value)))
        })?;
        if !object.contains_key("field_map") {
            return Err(Error::invalid("field record has no 'field_map'"));
        }
        let record: FieldRecord = serde_json::from_value(value.clone())?;
        let mut field_map = MaskedGrid::from_optional_rows(&record.field_map)?;
        if let Some(mask) = &record.mask {
            field_map = field_map.masked_by_rows(mask)?;
        }
        Ok(Self {
            field_map,
            metadata: record.metadata,
        })
    }
}

/// One field or an ordered collection of fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSet {
    Single(Field),
    Many(Vec<Field>),
}

impl FieldSet {
    /// Decode from JSON: an object is a single field, an array a list of fields
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(_) => Ok(FieldSet::Single(Field::from_json(value)?)),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Field::from_json)
                .collect::<Result<Vec<_>>>()
                .map(FieldSet::Many),
            other => Err(Error::invalid(format!(
                "fields must be a field object or a list of field objects, got {}",
                json_type_name(other)
            ))),
        }
    }

    pub fn as_slice(&self) -> &[Field] {
        match self {
            FieldSet::Single(field) => std::slice::from_ref(field),
            FieldSet::Many(fields) => fields,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<Field> for FieldSet {
    fn from(field: Field) -> Self {
        FieldSet::Single(field)
    }
}

impl From<Vec<Field>> for FieldSet {
    fn from(fields: Vec<Field>) -> Self {
        FieldSet::Many(fields)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_field_from_object() {
        let value = json!({
            "field_map": [[1, 0], [null, 1]],
            "peak_rate": 12.5
        });
        let set = FieldSet::from_json(&value).unwrap();
        assert_eq!(set.len(), 1);
        let field = &set.as_slice()[0];
        assert!(field.field_map.is_invalid(1, 0));
        assert_eq!(field.metadata["peak_rate"], json!(12.5));
    }

    #[test]
    fn test_field_list_with_mask() {
        let value = json!([
            {"field_map": [[1, 1]]},
            {"field_map": [[0, 1]], "mask": [[true, false]]}
        ]);
        let set = FieldSet::from_json(&value).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.as_slice()[1].field_map.is_invalid(0, 0));
    }

    #[test]
    fn test_rejects_scalar_fields() {
        let err = FieldSet::from_json(&json!(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_rejects_object_without_field_map() {
        assert!(matches!(
            FieldSet::from_json(&json!({"area": 3})),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            FieldSet::from_json(&json!([{"field_map": [[1]]}, 7])),
            Err(Error::InvalidArgument(_))
        ));
    }
}
