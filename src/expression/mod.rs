mod evaluate;
mod operators;

pub use evaluate::*;
pub use operators::*;

use std::{fmt, sync::Arc};

use serde_derive::{Deserialize, Serialize};

use crate::{Attribute, Value, ValueType};

/// Shared node of an expression graph.
///
/// Handles are immutable; two handles are the same node when `Arc::ptr_eq` holds.
pub type ExpressionHandle = Arc<Expression>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
}

impl NumberOperation {
    pub const fn symbol(self) -> &'static str {
        match self {
            NumberOperation::Add => "+",
            NumberOperation::Subtract => "-",
            NumberOperation::Multiply => "*",
            NumberOperation::Divide => "/",
            NumberOperation::Modulus => "%",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Constant(Value),
    Attribute(Attribute),
    Parameter {
        name: String,
        value_type: ValueType,
    },
    Binary(NumberOperation, ExpressionHandle, ExpressionHandle),
    Normalize(ExpressionHandle),

    SequentialLine {
        start: ExpressionHandle,
        end: ExpressionHandle,
        index: ExpressionHandle,
        count: ExpressionHandle,
    },
    SequentialCircle {
        center: ExpressionHandle,
        radius: ExpressionHandle,
        normal: ExpressionHandle,
        up: ExpressionHandle,
        index: ExpressionHandle,
        count: ExpressionHandle,
    },
    #[serde(rename = "sequential_3d")]
    Sequential3D {
        origin: ExpressionHandle,
        axis_x: ExpressionHandle,
        axis_y: ExpressionHandle,
        axis_z: ExpressionHandle,
        index: ExpressionHandle,
        count_x: ExpressionHandle,
        count_y: ExpressionHandle,
        count_z: ExpressionHandle,
    },
}

impl Expression {
    pub fn constant(value: impl Into<Value>) -> ExpressionHandle {
        Arc::new(Self::Constant(value.into()))
    }

    pub fn one(value_type: ValueType) -> ExpressionHandle {
        Self::constant(Value::one(value_type))
    }

    pub fn attribute(attribute: Attribute) -> ExpressionHandle {
        Arc::new(Self::Attribute(attribute))
    }

    pub fn parameter(name: &str, value_type: ValueType) -> ExpressionHandle {
        Arc::new(Self::Parameter {
            name: name.to_owned(),
            value_type,
        })
    }

    pub fn binary(
        operation: NumberOperation,
        lhs: &ExpressionHandle,
        rhs: &ExpressionHandle,
    ) -> ExpressionHandle {
        Arc::new(Self::Binary(operation, Arc::clone(lhs), Arc::clone(rhs)))
    }

    pub fn normalize(expression: &ExpressionHandle) -> ExpressionHandle {
        Arc::new(Self::Normalize(Arc::clone(expression)))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Constant(value) => value.value_type(),
            Self::Attribute(attribute) => attribute.value_type(),
            Self::Parameter { value_type, .. } => *value_type,
            Self::Binary(_, lhs, rhs) => match (lhs.value_type(), rhs.value_type()) {
                (ValueType::Float3, _) | (_, ValueType::Float3) => ValueType::Float3,
                (ValueType::Float, _) | (_, ValueType::Float) => ValueType::Float,
                _ => ValueType::Uint32,
            },
            Self::Normalize(_) => ValueType::Float3,
            Self::SequentialLine { .. }
            | Self::SequentialCircle { .. }
            | Self::Sequential3D { .. } => ValueType::Float3,
        }
    }

    pub fn children(&self) -> Vec<&ExpressionHandle> {
        match self {
            Self::Constant(_) | Self::Attribute(_) | Self::Parameter { .. } => Vec::new(),
            Self::Binary(_, lhs, rhs) => vec![lhs, rhs],
            Self::Normalize(e) => vec![e],
            Self::SequentialLine {
                start,
                end,
                index,
                count,
            } => vec![start, end, index, count],
            Self::SequentialCircle {
                center,
                radius,
                normal,
                up,
                index,
                count,
            } => vec![center, radius, normal, up, index, count],
            Self::Sequential3D {
                origin,
                axis_x,
                axis_y,
                axis_z,
                index,
                count_x,
                count_y,
                count_z,
            } => vec![origin, axis_x, axis_y, axis_z, index, count_x, count_y, count_z],
        }
    }

    /// Visits this node and then every node below it, depth first.
    pub fn visit(&self, visitor: &mut impl FnMut(&Expression)) {
        visitor(self);
        for child in self.children() {
            child.visit(visitor);
        }
    }

    /// Attributes read anywhere in the expression, in first-visit order.
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut result = Vec::new();
        self.visit(&mut |e| {
            if let Expression::Attribute(attribute) = e {
                if !result.contains(attribute) {
                    result.push(*attribute);
                }
            }
        });
        result
    }
}

/// Arithmetic on expression handles.
pub trait NumberExpression {
    fn add(&self, other: &ExpressionHandle) -> ExpressionHandle;
    fn subtract(&self, other: &ExpressionHandle) -> ExpressionHandle;
    fn multiply(&self, other: &ExpressionHandle) -> ExpressionHandle;
    fn divide(&self, other: &ExpressionHandle) -> ExpressionHandle;
    fn modulus(&self, other: &ExpressionHandle) -> ExpressionHandle;
}

impl NumberExpression for ExpressionHandle {
    fn add(&self, other: &ExpressionHandle) -> ExpressionHandle {
        Expression::binary(NumberOperation::Add, self, other)
    }

    fn subtract(&self, other: &ExpressionHandle) -> ExpressionHandle {
        Expression::binary(NumberOperation::Subtract, self, other)
    }

    fn multiply(&self, other: &ExpressionHandle) -> ExpressionHandle {
        Expression::binary(NumberOperation::Multiply, self, other)
    }

    fn divide(&self, other: &ExpressionHandle) -> ExpressionHandle {
        Expression::binary(NumberOperation::Divide, self, other)
    }

    fn modulus(&self, other: &ExpressionHandle) -> ExpressionHandle {
        Expression::binary(NumberOperation::Modulus, self, other)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn call(f: &mut fmt::Formatter<'_>, name: &str, args: &[&ExpressionHandle]) -> fmt::Result {
            write!(f, "{name}(")?;
            for (index, arg) in args.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(")")
        }

        match self {
            Self::Constant(value) => write!(f, "{value}"),
            Self::Attribute(attribute) => write!(f, "{attribute}"),
            Self::Parameter { name, .. } => f.write_str(name),
            Self::Binary(operation, lhs, rhs) => {
                write!(f, "({lhs} {} {rhs})", operation.symbol())
            }
            Self::Normalize(e) => call(f, "normalize", &[e]),
            Self::SequentialLine { .. } => call(f, "sequentialLine", &self.children()),
            Self::SequentialCircle { .. } => call(f, "sequentialCircle", &self.children()),
            Self::Sequential3D { .. } => call(f, "sequential3D", &self.children()),
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use glam::Vec3;

    use super::*;

    #[test]
    fn test_display_increment() {
        let index = Expression::attribute(Attribute::ParticleId);
        let next = index.add(&Expression::one(ValueType::Uint32));
        assert_eq!(next.to_string(), "(particleId + 1u)");
        assert_eq!(next.value_type(), ValueType::Uint32);
    }

    #[test]
    fn test_value_type_promotion() {
        let scale = Expression::constant(2.0f32);
        let offset = Expression::constant(Vec3::X);
        assert_eq!(scale.multiply(&offset).value_type(), ValueType::Float3);
        assert_eq!(scale.add(&scale).value_type(), ValueType::Float);
    }

    #[test]
    fn test_shared_children() {
        let index = Expression::attribute(Attribute::ParticleId);
        let sum = index.add(&index);
        match sum.as_ref() {
            Expression::Binary(_, lhs, rhs) => {
                assert!(Arc::ptr_eq(lhs, &index));
                assert!(Arc::ptr_eq(rhs, &index));
            }
            _ => panic!("expected binary"),
        }
        assert_eq!(sum.attributes(), [Attribute::ParticleId]);
    }

    #[test]
    fn test_serialized_form() {
        let expr =
            Expression::attribute(Attribute::ParticleId).add(&Expression::one(ValueType::Uint32));
        let value = serde_json::to_value(&expr).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "binary": ["add", { "attribute": "particle_id" }, { "constant": { "uint": 1 } }]
            })
        );

        let back: ExpressionHandle = serde_json::from_value(value).unwrap();
        assert_eq!(back, expr);
    }
}
