//! Data-shape descriptor for structured output.
//!
//! The same `RecordSchema` is rendered into the provider's `responseSchema`
//! on the way out and drives field extraction on the way back in, so the
//! declared fields and the table columns cannot drift apart.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
}

impl FieldType {
    fn wire_name(self) -> &'static str {
        match self {
            FieldType::String => "STRING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

/// An array of flat objects whose fields are listed in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
}

pub const LESSON_PLAN_SCHEMA: RecordSchema = RecordSchema {
    description: "Lesson plan details",
    fields: &[
        FieldSpec {
            name: "Duration",
            description: "Estimated duration of the lesson",
            field_type: FieldType::String,
            required: true,
        },
        FieldSpec {
            name: "Guide",
            description: "Guidance or instructions for the lesson",
            field_type: FieldType::String,
            required: true,
        },
        FieldSpec {
            name: "Remarks",
            description: "Additional remarks or notes",
            field_type: FieldType::String,
            required: false,
        },
    ],
};

impl RecordSchema {
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Render as a Gemini `responseSchema` (OpenAPI subset, upper-case type names).
    pub fn to_response_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields {
            properties.insert(
                field.name.to_string(),
                json!({
                    "type": field.field_type.wire_name(),
                    "description": field.description,
                    "nullable": !field.required,
                }),
            );
        }

        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();

        json!({
            "description": self.description,
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": properties,
                "required": required,
            },
        })
    }

    /// Pull every declared field out of one array element, in declared order.
    ///
    /// Lenient: a missing field, `null`, or a non-object element yields `""`
    /// for that cell rather than an error.
    pub fn extract_cells(&self, element: &Value) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| cell_text(element.get(field.name)))
            .collect()
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Name of a JSON value's kind, for diagnostics.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
