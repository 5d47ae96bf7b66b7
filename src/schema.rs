//! Declarative schema and resource state
//!
//! A data source declares its fields up front as a [`Schema`]. A read works
//! on a [`ResourceData`]: the caller's inputs go in, the read writes computed
//! attributes and an identifier, and the result renders as a flat JSON object.

use crate::error::{Error, Result, SetError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Scalar type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Int,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
        }
    }

    fn zero(self) -> Value {
        match self {
            FieldType::String => Value::String(String::new()),
            FieldType::Int => Value::from(0),
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Int => value.is_i64() || value.is_u64(),
        }
    }
}

/// Who supplies a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMode {
    /// Caller must supply it
    Required,
    /// Caller may supply it; otherwise the read fills it in
    OptionalComputed,
    /// Only the read sets it
    Computed,
}

impl FieldMode {
    pub fn is_input(self) -> bool {
        !matches!(self, FieldMode::Computed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: FieldType,
    pub mode: FieldMode,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        ty: FieldType,
        mode: FieldMode,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            ty,
            mode,
            description,
        }
    }
}

/// Field declarations of one data source
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub fields: &'static [FieldSpec],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Inputs, written attributes and identifier of one read
#[derive(Debug, Clone)]
pub struct ResourceData {
    schema: Schema,
    inputs: BTreeMap<String, Value>,
    attributes: BTreeMap<String, Value>,
    id: Option<String>,
}

impl ResourceData {
    /// Validate inputs against the schema
    /// Rejects unknown fields, computed-only fields, wrong types and missing required fields.
    pub fn new(schema: Schema, inputs: BTreeMap<String, Value>) -> Result<Self> {
        let mut problems = Vec::new();

        for (name, value) in &inputs {
            match schema.field(name) {
                None => problems.push(format!("unsupported argument {:?}", name)),
                Some(spec) if !spec.mode.is_input() => {
                    problems.push(format!("{:?} is computed and cannot be set", name))
                }
                Some(spec) if !value.is_null() && !spec.ty.accepts(value) => problems.push(
                    format!("{:?} must be of type {}", name, spec.ty.name()),
                ),
                Some(_) => {}
            }
        }

        for spec in schema.fields {
            let missing = inputs.get(spec.name).map_or(true, |v| match v {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                _ => false,
            });
            if spec.mode == FieldMode::Required && missing {
                problems.push(format!("missing required argument {:?}", spec.name));
            }
        }

        if !problems.is_empty() {
            return Err(Error::Input(problems.join("; ")));
        }

        Ok(Self {
            schema,
            inputs,
            attributes: BTreeMap::new(),
            id: None,
        })
    }

    /// Value of a field: written attribute first, then caller input
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes
            .get(name)
            .or_else(|| self.inputs.get(name))
            .filter(|v| !v.is_null())
    }

    /// String value of a field, if set and non-empty
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Write one attribute
    /// `null` stores the field's zero value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> std::result::Result<(), SetError> {
        let Some(spec) = self.schema.field(name) else {
            return Err(SetError::UnknownField {
                field: name.to_string(),
            });
        };

        let value = value.into();
        let value = if value.is_null() {
            spec.ty.zero()
        } else if spec.ty.accepts(&value) {
            value
        } else {
            return Err(SetError::TypeMismatch {
                field: name.to_string(),
                expected: spec.ty.name(),
                actual: json_type_name(&value).to_string(),
            });
        };

        self.attributes.insert(name.to_string(), value);
        Ok(())
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether any attribute or identifier has been written
    pub fn is_written(&self) -> bool {
        self.id.is_some() || !self.attributes.is_empty()
    }

    /// Render inputs, attributes and identifier as one JSON object
    pub fn to_state(&self) -> Value {
        let mut map = Map::new();
        if let Some(id) = &self.id {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        for (k, v) in self.inputs.iter().chain(self.attributes.iter()) {
            map.insert(k.clone(), v.clone());
        }
        Value::Object(map)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
