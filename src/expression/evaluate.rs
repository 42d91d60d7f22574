use std::collections::HashMap;

use glam::Vec3;
use thiserror::Error;

use crate::{circle_position, lattice_position, line_position, Attribute, Value, ValueType};

use super::{Expression, NumberOperation};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("missing attribute: {0}")]
    MissingAttribute(Attribute),
    #[error("missing parameter: {0}")]
    MissingParameter(String),
    #[error("type mismatch in {operation}: expected {expected}, got {actual}")]
    TypeMismatch {
        operation: &'static str,
        expected: ValueType,
        actual: ValueType,
    },
    #[error("integer division by zero")]
    DivisionByZero,
}

/// Attribute and parameter values of a single particle.
#[derive(Debug, Default, Clone)]
pub struct EvaluationContext {
    pub attributes: HashMap<Attribute, Value>,
    pub parameters: HashMap<String, Value>,
}

impl EvaluationContext {
    pub fn with_attribute(mut self, attribute: Attribute, value: impl Into<Value>) -> Self {
        self.attributes.insert(attribute, value.into());
        self
    }

    pub fn with_parameter(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.to_owned(), value.into());
        self
    }
}

fn mismatch(value: Value, expected: ValueType, operation: &'static str) -> EvaluationError {
    EvaluationError::TypeMismatch {
        operation,
        expected,
        actual: value.value_type(),
    }
}

fn expect_type(
    value: Value,
    expected: ValueType,
    operation: &'static str,
) -> Result<Value, EvaluationError> {
    if value.value_type() == expected {
        Ok(value)
    } else {
        Err(mismatch(value, expected, operation))
    }
}

fn uint(value: Value, operation: &'static str) -> Result<u32, EvaluationError> {
    value
        .as_uint()
        .ok_or_else(|| mismatch(value, ValueType::Uint32, operation))
}

fn float(value: Value, operation: &'static str) -> Result<f32, EvaluationError> {
    value
        .as_float()
        .ok_or_else(|| mismatch(value, ValueType::Float, operation))
}

fn float3(value: Value, operation: &'static str) -> Result<Vec3, EvaluationError> {
    value
        .as_float3()
        .ok_or_else(|| mismatch(value, ValueType::Float3, operation))
}

fn binary_uint(operation: NumberOperation, a: u32, b: u32) -> Result<u32, EvaluationError> {
    use NumberOperation::*;
    match operation {
        Add => Ok(a.wrapping_add(b)),
        Subtract => Ok(a.wrapping_sub(b)),
        Multiply => Ok(a.wrapping_mul(b)),
        Divide => a.checked_div(b).ok_or(EvaluationError::DivisionByZero),
        Modulus => a.checked_rem(b).ok_or(EvaluationError::DivisionByZero),
    }
}

fn binary_float3(operation: NumberOperation, a: Vec3, b: Vec3) -> Vec3 {
    use NumberOperation::*;
    match operation {
        Add => a + b,
        Subtract => a - b,
        Multiply => a * b,
        Divide => a / b,
        Modulus => a % b,
    }
}

fn binary(operation: NumberOperation, lhs: Value, rhs: Value) -> Result<Value, EvaluationError> {
    match (lhs, rhs) {
        (Value::Uint(a), Value::Uint(b)) => Ok(Value::Uint(binary_uint(operation, a, b)?)),
        (Value::Float(a), Value::Float(b)) => {
            Ok(Value::Float(binary_float3(operation, Vec3::splat(a), Vec3::splat(b)).x))
        }
        (Value::Float3(a), Value::Float3(b)) => Ok(Value::Float3(binary_float3(operation, a, b))),
        (Value::Float3(a), Value::Float(b)) => {
            Ok(Value::Float3(binary_float3(operation, a, Vec3::splat(b))))
        }
        (Value::Float(a), Value::Float3(b)) => {
            Ok(Value::Float3(binary_float3(operation, Vec3::splat(a), b)))
        }
        (lhs, rhs) => Err(EvaluationError::TypeMismatch {
            operation: operation.symbol(),
            expected: lhs.value_type(),
            actual: rhs.value_type(),
        }),
    }
}

impl Expression {
    /// Evaluates the expression on the CPU for a single particle.
    pub fn evaluate(&self, context: &EvaluationContext) -> Result<Value, EvaluationError> {
        match self {
            Self::Constant(value) => Ok(*value),
            Self::Attribute(attribute) => {
                let value = context
                    .attributes
                    .get(attribute)
                    .copied()
                    .ok_or(EvaluationError::MissingAttribute(*attribute))?;
                expect_type(value, attribute.value_type(), "attribute")
            }
            Self::Parameter { name, value_type } => {
                let value = context
                    .parameters
                    .get(name)
                    .copied()
                    .ok_or_else(|| EvaluationError::MissingParameter(name.clone()))?;
                expect_type(value, *value_type, "parameter")
            }
            Self::Binary(operation, lhs, rhs) => {
                binary(*operation, lhs.evaluate(context)?, rhs.evaluate(context)?)
            }
            Self::Normalize(e) => Ok(Value::Float3(
                float3(e.evaluate(context)?, "normalize")?.normalize_or_zero(),
            )),
            Self::SequentialLine {
                start,
                end,
                index,
                count,
            } => {
                const OP: &str = "sequentialLine";
                Ok(Value::Float3(line_position(
                    float3(start.evaluate(context)?, OP)?,
                    float3(end.evaluate(context)?, OP)?,
                    uint(index.evaluate(context)?, OP)?,
                    uint(count.evaluate(context)?, OP)?,
                )))
            }
            Self::SequentialCircle {
                center,
                radius,
                normal,
                up,
                index,
                count,
            } => {
                const OP: &str = "sequentialCircle";
                Ok(Value::Float3(circle_position(
                    float3(center.evaluate(context)?, OP)?,
                    float(radius.evaluate(context)?, OP)?,
                    float3(normal.evaluate(context)?, OP)?,
                    float3(up.evaluate(context)?, OP)?,
                    uint(index.evaluate(context)?, OP)?,
                    uint(count.evaluate(context)?, OP)?,
                )))
            }
            Self::Sequential3D {
                origin,
                axis_x,
                axis_y,
                axis_z,
                index,
                count_x,
                count_y,
                count_z,
            } => {
                const OP: &str = "sequential3D";
                Ok(Value::Float3(lattice_position(
                    float3(origin.evaluate(context)?, OP)?,
                    float3(axis_x.evaluate(context)?, OP)?,
                    float3(axis_y.evaluate(context)?, OP)?,
                    float3(axis_z.evaluate(context)?, OP)?,
                    uint(index.evaluate(context)?, OP)?,
                    uint(count_x.evaluate(context)?, OP)?,
                    uint(count_y.evaluate(context)?, OP)?,
                    uint(count_z.evaluate(context)?, OP)?,
                )))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use glam::Vec3;

    use crate::{
        sequential_line, Attribute, EvaluationContext, EvaluationError, Expression,
        NumberExpression, Value, ValueType,
    };

    #[test]
    fn test_uint_arithmetic_wraps() {
        let max = Expression::constant(u32::MAX);
        let one = Expression::one(ValueType::Uint32);
        let value = max.add(&one).evaluate(&EvaluationContext::default());
        assert_eq!(value, Ok(Value::Uint(0)));
    }

    #[test]
    fn test_division_by_zero() {
        let zero = Expression::constant(0u32);
        let value = Expression::one(ValueType::Uint32)
            .modulus(&zero)
            .evaluate(&EvaluationContext::default());
        assert_eq!(value, Err(EvaluationError::DivisionByZero));
    }

    #[test]
    fn test_broadcast() {
        let value = Expression::constant(Vec3::new(1.0, 2.0, 3.0))
            .multiply(&Expression::constant(2.0f32))
            .evaluate(&EvaluationContext::default());
        assert_eq!(value, Ok(Value::Float3(Vec3::new(2.0, 4.0, 6.0))));
    }

    #[test]
    fn test_missing_attribute() {
        let value =
            Expression::attribute(Attribute::ParticleId).evaluate(&EvaluationContext::default());
        assert_eq!(value, Err(EvaluationError::MissingAttribute(Attribute::ParticleId)));
    }

    #[test]
    fn test_type_mismatch() {
        let value = Expression::constant(1u32)
            .add(&Expression::constant(1.0f32))
            .evaluate(&EvaluationContext::default());
        assert!(matches!(value, Err(EvaluationError::TypeMismatch { .. })));
    }

    #[test]
    fn test_sequential_line_with_parameter() {
        let line = sequential_line(
            &Expression::constant(Vec3::ZERO),
            &Expression::parameter("End", ValueType::Float3),
            &Expression::attribute(Attribute::ParticleId),
            &Expression::constant(3u32),
        );

        let context = EvaluationContext::default()
            .with_attribute(Attribute::ParticleId, 2u32)
            .with_parameter("End", Vec3::new(0.0, 4.0, 0.0));

        assert_eq!(line.evaluate(&context), Ok(Value::Float3(Vec3::new(0.0, 4.0, 0.0))));
    }
}
