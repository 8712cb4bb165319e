//! Response schema descriptors: the output shape requested from the model.
//!
//! Descriptors only list fields the model is responsible for. Anything the host
//! can compute itself (the request timestamp) is never part of a descriptor.

use serde_json::{json, Map, Value};

/// Primitive type of a single output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    StringArray,
}

impl FieldType {
    /// Gemini `responseSchema` fragment for this type.
    fn to_schema(self) -> Value {
        match self {
            FieldType::String => json!({ "type": "STRING" }),
            FieldType::Integer => json!({ "type": "INTEGER" }),
            FieldType::StringArray => json!({
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub description: &'static str,
    pub required: bool,
}

/// Ordered, immutable set of field definitions for one task kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub fields: &'static [FieldDef],
}

impl SchemaDescriptor {
    pub const fn new(fields: &'static [FieldDef]) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    /// Names of required fields that are absent or `null` in `object`.
    pub fn missing_required(&self, object: &Map<String, Value>) -> Vec<&'static str> {
        self.required_fields()
            .filter(|name| object.get(*name).map_or(true, Value::is_null))
            .collect()
    }

    /// Renders the descriptor as a Gemini `responseSchema` object.
    pub fn to_response_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields {
            let mut schema = field.field_type.to_schema();
            if !field.description.is_empty() {
                schema["description"] = Value::String(field.description.to_string());
            }
            properties.insert(field.name.to_string(), schema);
        }

        let required: Vec<&str> = self.required_fields().collect();
        let ordering: Vec<&str> = self.fields.iter().map(|f| f.name).collect();

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": required,
            "propertyOrdering": ordering,
        })
    }
}
