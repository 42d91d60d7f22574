use serde_derive::{Deserialize, Serialize};

use crate::{Expression, ExpressionHandle, Value, ValueType};

/// Authoring type of a block input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Uint,
    Float,
    Vector,
    Position,
    Direction,
}

impl PropertyType {
    pub const fn value_type(self) -> ValueType {
        match self {
            PropertyType::Uint => ValueType::Uint32,
            PropertyType::Float => ValueType::Float,
            PropertyType::Vector | PropertyType::Position | PropertyType::Direction => {
                ValueType::Float3
            }
        }
    }
}

/// A named, typed and defaulted block input.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PropertyDeclaration {
    pub name: &'static str,
    pub property_type: PropertyType,
    pub default: Value,
    pub tooltip: &'static str,
}

impl PropertyDeclaration {
    pub const fn new(
        name: &'static str,
        property_type: PropertyType,
        default: Value,
        tooltip: &'static str,
    ) -> Self {
        Self {
            name,
            property_type,
            default,
            tooltip,
        }
    }

    pub const fn value_type(&self) -> ValueType {
        self.property_type.value_type()
    }

    /// Wraps the expression bound to this input the way its type requires.
    ///
    /// Directions are always normalized.
    pub fn bind(&self, expression: ExpressionHandle) -> ExpressionHandle {
        match self.property_type {
            PropertyType::Direction => Expression::normalize(&expression),
            _ => expression,
        }
    }

    pub fn bind_default(&self) -> ExpressionHandle {
        self.bind(Expression::constant(self.default))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedExpression {
    pub name: String,
    pub expression: ExpressionHandle,
}

impl NamedExpression {
    pub fn new(name: &str, expression: ExpressionHandle) -> Self {
        Self {
            name: name.to_owned(),
            expression,
        }
    }
}

/// Expressions bound to the declared inputs of a block, in declaration order.
///
/// Names are unique, inserting an existing name replaces its expression.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BoundInputs {
    expressions: Vec<NamedExpression>,
}

impl BoundInputs {
    /// Binds every declaration to its default value.
    pub fn from_defaults(declarations: &[PropertyDeclaration]) -> Self {
        let mut inputs = Self::default();
        for declaration in declarations {
            inputs.insert(declaration.name, declaration.bind_default());
        }
        inputs
    }

    pub fn insert(&mut self, name: &str, expression: ExpressionHandle) -> Option<ExpressionHandle> {
        if let Some(existing) = self.expressions.iter_mut().find(|x| x.name == name) {
            Some(std::mem::replace(&mut existing.expression, expression))
        } else {
            self.expressions.push(NamedExpression::new(name, expression));
            None
        }
    }

    pub fn get(&self, name: &str) -> Option<&ExpressionHandle> {
        self.expressions
            .iter()
            .find(|x| x.name == name)
            .map(|x| &x.expression)
    }

    /// Looks up an input the caller declared.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not bound, which means the declared inputs and their
    /// consumer are out of sync.
    pub fn required(&self, name: &str) -> &ExpressionHandle {
        self.get(name)
            .unwrap_or_else(|| panic!("missing bound input \"{name}\""))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.expressions.iter().map(|x| x.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedExpression> {
        self.expressions.iter()
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use glam::Vec3;

    use super::*;

    const DECLARATIONS: &[PropertyDeclaration] = &[
        PropertyDeclaration::new("Count", PropertyType::Uint, Value::Uint(4), ""),
        PropertyDeclaration::new("Up", PropertyType::Direction, Value::Float3(Vec3::Y), ""),
    ];

    #[test]
    fn test_defaults() {
        let inputs = BoundInputs::from_defaults(DECLARATIONS);
        assert_eq!(inputs.names().collect::<Vec<_>>(), ["Count", "Up"]);
        assert_eq!(**inputs.required("Count"), Expression::Constant(Value::Uint(4)));
        assert!(matches!(**inputs.required("Up"), Expression::Normalize(_)));
    }

    #[test]
    fn test_insert_replaces() {
        let mut inputs = BoundInputs::from_defaults(DECLARATIONS);
        let count = Expression::parameter("count", ValueType::Uint32);
        assert!(inputs.insert("Count", Arc::clone(&count)).is_some());
        assert_eq!(inputs.len(), 2);
        assert!(Arc::ptr_eq(inputs.required("Count"), &count));
    }

    #[test]
    #[should_panic(expected = "missing bound input \"Radius\"")]
    fn test_missing_input_panics() {
        BoundInputs::from_defaults(DECLARATIONS).required("Radius");
    }
}
