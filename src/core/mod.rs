mod math;

pub use math::*;

use std::fmt;

use glam::Vec3;
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Uint32,
    Float,
    Float3,
}

impl ValueType {
    pub const fn source_name(self) -> &'static str {
        match self {
            ValueType::Uint32 => "uint",
            ValueType::Float => "float",
            ValueType::Float3 => "float3",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_name())
    }
}

/// A constant of one of the expression value types.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Uint(u32),
    Float(f32),
    Float3(Vec3),
}

impl Value {
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Uint(_) => ValueType::Uint32,
            Value::Float(_) => ValueType::Float,
            Value::Float3(_) => ValueType::Float3,
        }
    }

    pub const fn one(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Uint32 => Value::Uint(1),
            ValueType::Float => Value::Float(1.0),
            ValueType::Float3 => Value::Float3(Vec3::ONE),
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match *self {
            Value::Uint(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Value::Float(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_float3(&self) -> Option<Vec3> {
        match *self {
            Value::Float3(x) => Some(x),
            _ => None,
        }
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Uint(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<Vec3> for Value {
    fn from(value: Vec3) -> Self {
        Value::Float3(value)
    }
}

impl From<[f32; 3]> for Value {
    fn from(value: [f32; 3]) -> Self {
        Value::Float3(Vec3::from(value))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uint(x) => write!(f, "{x}u"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Float3(v) => write!(f, "float3({:?}, {:?}, {:?})", v.x, v.y, v.z),
        }
    }
}

#[cfg(test)]
mod test {
    use glam::Vec3;

    use super::{Value, ValueType};

    #[test]
    fn test_display() {
        assert_eq!(Value::Uint(64).to_string(), "64u");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float3(Vec3::X).to_string(), "float3(1.0, 0.0, 0.0)");
    }

    #[test]
    fn test_serialized_form() {
        let value = serde_json::to_value(Value::Uint(8)).unwrap();
        assert_eq!(value, serde_json::json!({ "uint": 8 }));

        let vector: Value =
            serde_json::from_value(serde_json::json!({ "float3": [0.0, 1.0, 0.0] })).unwrap();
        assert_eq!(vector, Value::Float3(Vec3::Y));
        assert_eq!(vector.value_type(), ValueType::Float3);
    }
}
