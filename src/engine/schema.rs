use serde_json::{json, Value};

/// Type of a single field in a duty's output object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
}

/// Declarative description of the output shape required from the engine:
/// an object with a fixed set of typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    fields: Vec<(String, FieldKind)>,
}

impl SchemaDescriptor {
    pub fn object(fields: &[(&str, FieldKind)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(name, kind)| (name.to_string(), *kind))
                .collect(),
        }
    }

    /// Render as the JSON schema handed to the constrained decoder
    pub fn to_json_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for (name, kind) in &self.fields {
            let type_name = match kind {
                FieldKind::String => "string",
            };
            properties.insert(name.clone(), json!({ "type": type_name }));
        }
        json!({
            "type": "object",
            "properties": properties,
        })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}
