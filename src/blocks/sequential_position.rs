//! Places particles one after another along a line, a circle or a 3D lattice.
//!
//! The element index comes from the particle id or from a custom input. The block
//! can additionally compute the target position at the same or at the next index.

use std::{fmt, sync::Arc};

use glam::Vec3;
use serde_derive::{Deserialize, Serialize};

use crate::{
    sequential_3d, sequential_circle, sequential_line, Attribute, AttributeInfo, AttributeMode,
    BoundInputs, Expression, ExpressionHandle, NamedExpression, NumberExpression,
    PropertyDeclaration, PropertyType, Value, ValueType,
};

use super::{Block, ContextType, DataType, VariantProvider, Variants};

pub const COMPUTED_POSITION: &str = "computedPosition";
pub const COMPUTED_TARGET_POSITION: &str = "computedTargetPosition";

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequentialShape {
    #[default]
    Line,
    Circle,
    ThreeDimensional,
}

impl SequentialShape {
    /// Number of shapes, counted along [`SequentialShape::next`].
    pub const COUNT: usize = {
        let mut count = 1;
        let mut shape = SequentialShape::Line;
        while let Some(next) = shape.next() {
            shape = next;
            count += 1;
        }
        count
    };

    /// Every shape in declaration order.
    pub const ALL: [SequentialShape; SequentialShape::COUNT] = {
        let mut all = [SequentialShape::Line; SequentialShape::COUNT];
        let mut i = 1;
        while i < SequentialShape::COUNT {
            all[i] = match all[i - 1].next() {
                Some(next) => next,
                None => unreachable!(),
            };
            i += 1;
        }
        all
    };

    /// Shape declared after this one. Exhaustive so a new shape has to be
    /// placed in the sequence.
    pub const fn next(self) -> Option<SequentialShape> {
        match self {
            SequentialShape::Line => Some(SequentialShape::Circle),
            SequentialShape::Circle => Some(SequentialShape::ThreeDimensional),
            SequentialShape::ThreeDimensional => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SequentialShape::Line => "Line",
            SequentialShape::Circle => "Circle",
            SequentialShape::ThreeDimensional => "ThreeDimensional",
        }
    }
}

impl fmt::Display for SequentialShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index used for fetching progression in the sequence.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexSource {
    #[default]
    ParticleId,
    Custom,
}

/// Whether the target position attribute is computed, and at which index.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPositionMode {
    None,
    Same,
    #[default]
    Next,
}

impl TargetPositionMode {
    pub const fn has_target(self) -> bool {
        !matches!(self, TargetPositionMode::None)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SequentialPosition {
    pub shape: SequentialShape,
    pub index: IndexSource,
    pub target_position: TargetPositionMode,
}

const COUNT_TOOLTIP: &str = "Element count used to loop over the sequence";

const COMMON_PROPERTIES: &[PropertyDeclaration] = &[];

const CUSTOM_INDEX_PROPERTIES: &[PropertyDeclaration] = &[PropertyDeclaration::new(
    "Index",
    PropertyType::Uint,
    Value::Uint(0),
    "Index used to sample the sequential distribution",
)];

const LINE_PROPERTIES: &[PropertyDeclaration] = &[
    PropertyDeclaration::new("Count", PropertyType::Uint, Value::Uint(64), COUNT_TOOLTIP),
    PropertyDeclaration::new(
        "Start",
        PropertyType::Position,
        Value::Float3(Vec3::ZERO),
        "Start Position",
    ),
    PropertyDeclaration::new(
        "End",
        PropertyType::Position,
        Value::Float3(Vec3::X),
        "End Position",
    ),
];

const CIRCLE_PROPERTIES: &[PropertyDeclaration] = &[
    PropertyDeclaration::new("Count", PropertyType::Uint, Value::Uint(64), COUNT_TOOLTIP),
    PropertyDeclaration::new(
        "Center",
        PropertyType::Position,
        Value::Float3(Vec3::ZERO),
        "Center of the circle",
    ),
    PropertyDeclaration::new(
        "Normal",
        PropertyType::Direction,
        Value::Float3(Vec3::Z),
        "Rotation Axis",
    ),
    PropertyDeclaration::new(
        "Up",
        PropertyType::Direction,
        Value::Float3(Vec3::Y),
        "Start Angle (Midnight direction)",
    ),
    PropertyDeclaration::new(
        "Radius",
        PropertyType::Float,
        Value::Float(1.0),
        "Radius of the circle",
    ),
];

const THREE_DIMENSIONAL_PROPERTIES: &[PropertyDeclaration] = &[
    PropertyDeclaration::new("Origin", PropertyType::Position, Value::Float3(Vec3::ZERO), ""),
    PropertyDeclaration::new("AxisX", PropertyType::Vector, Value::Float3(Vec3::X), ""),
    PropertyDeclaration::new("AxisY", PropertyType::Vector, Value::Float3(Vec3::Y), ""),
    PropertyDeclaration::new("AxisZ", PropertyType::Vector, Value::Float3(Vec3::Z), ""),
    PropertyDeclaration::new(
        "CountX",
        PropertyType::Uint,
        Value::Uint(8),
        "Element X count used to loop over the sequence",
    ),
    PropertyDeclaration::new(
        "CountY",
        PropertyType::Uint,
        Value::Uint(8),
        "Element Y count used to loop over the sequence",
    ),
    PropertyDeclaration::new(
        "CountZ",
        PropertyType::Uint,
        Value::Uint(8),
        "Element Z count used to loop over the sequence",
    ),
];

pub const fn shape_properties(shape: SequentialShape) -> &'static [PropertyDeclaration] {
    match shape {
        SequentialShape::Line => LINE_PROPERTIES,
        SequentialShape::Circle => CIRCLE_PROPERTIES,
        SequentialShape::ThreeDimensional => THREE_DIMENSIONAL_PROPERTIES,
    }
}

pub fn input_properties(shape: SequentialShape, index: IndexSource) -> Vec<PropertyDeclaration> {
    let mut properties = COMMON_PROPERTIES.to_vec();
    properties.extend_from_slice(shape_properties(shape));

    if index == IndexSource::Custom {
        properties.extend_from_slice(CUSTOM_INDEX_PROPERTIES);
    }

    properties
}

pub fn attributes(index: IndexSource, target: TargetPositionMode) -> Vec<AttributeInfo> {
    let mut attributes = Vec::with_capacity(3);

    if index == IndexSource::ParticleId {
        attributes.push(AttributeInfo::new(Attribute::ParticleId, AttributeMode::Read));
    }

    attributes.push(AttributeInfo::new(Attribute::Position, AttributeMode::ReadWrite));

    if target.has_target() {
        attributes.push(AttributeInfo::new(Attribute::TargetPosition, AttributeMode::ReadWrite));
    }

    attributes
}

/// The bound inputs of one shape, looked up by name.
#[derive(Debug, Clone, PartialEq)]
pub enum SequentialShapeInputs {
    Line {
        count: ExpressionHandle,
        start: ExpressionHandle,
        end: ExpressionHandle,
    },
    Circle {
        count: ExpressionHandle,
        center: ExpressionHandle,
        normal: ExpressionHandle,
        up: ExpressionHandle,
        radius: ExpressionHandle,
    },
    ThreeDimensional {
        origin: ExpressionHandle,
        axis_x: ExpressionHandle,
        axis_y: ExpressionHandle,
        axis_z: ExpressionHandle,
        count_x: ExpressionHandle,
        count_y: ExpressionHandle,
        count_z: ExpressionHandle,
    },
}

impl SequentialShapeInputs {
    /// # Panics
    ///
    /// Panics when `inputs` lacks a name [`shape_properties`] declares for `shape`.
    pub fn resolve(shape: SequentialShape, inputs: &BoundInputs) -> Self {
        let get = |name: &str| Arc::clone(inputs.required(name));

        match shape {
            SequentialShape::Line => Self::Line {
                count: get("Count"),
                start: get("Start"),
                end: get("End"),
            },
            SequentialShape::Circle => Self::Circle {
                count: get("Count"),
                center: get("Center"),
                normal: get("Normal"),
                up: get("Up"),
                radius: get("Radius"),
            },
            SequentialShape::ThreeDimensional => Self::ThreeDimensional {
                origin: get("Origin"),
                axis_x: get("AxisX"),
                axis_y: get("AxisY"),
                axis_z: get("AxisZ"),
                count_x: get("CountX"),
                count_y: get("CountY"),
                count_z: get("CountZ"),
            },
        }
    }

    pub fn shape(&self) -> SequentialShape {
        match self {
            Self::Line { .. } => SequentialShape::Line,
            Self::Circle { .. } => SequentialShape::Circle,
            Self::ThreeDimensional { .. } => SequentialShape::ThreeDimensional,
        }
    }

    pub fn position_from_index(&self, index: &ExpressionHandle) -> ExpressionHandle {
        match self {
            Self::Line { count, start, end } => sequential_line(start, end, index, count),
            Self::Circle {
                count,
                center,
                normal,
                up,
                radius,
            } => sequential_circle(center, radius, normal, up, index, count),
            Self::ThreeDimensional {
                origin,
                axis_x,
                axis_y,
                axis_z,
                count_x,
                count_y,
                count_z,
            } => sequential_3d(
                origin, axis_x, axis_y, axis_z, index, count_x, count_y, count_z,
            ),
        }
    }
}

pub fn position_from_index(
    index: &ExpressionHandle,
    inputs: &BoundInputs,
    shape: SequentialShape,
) -> ExpressionHandle {
    SequentialShapeInputs::resolve(shape, inputs).position_from_index(index)
}

pub fn index_expression(index: IndexSource, inputs: &BoundInputs) -> ExpressionHandle {
    match index {
        IndexSource::ParticleId => Expression::attribute(Attribute::ParticleId),
        IndexSource::Custom => Arc::clone(inputs.required("Index")),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedPositions {
    pub position: ExpressionHandle,
    pub target_position: Option<ExpressionHandle>,
}

impl ComputedPositions {
    pub fn into_named_expressions(self) -> Vec<NamedExpression> {
        let mut result = vec![NamedExpression::new(COMPUTED_POSITION, self.position)];
        if let Some(target_position) = self.target_position {
            result.push(NamedExpression::new(COMPUTED_TARGET_POSITION, target_position));
        }
        result
    }
}

pub fn compute_positions(settings: &SequentialPosition, inputs: &BoundInputs) -> ComputedPositions {
    let shape = SequentialShapeInputs::resolve(settings.shape, inputs);
    let index = index_expression(settings.index, inputs);
    let position = shape.position_from_index(&index);

    let target_position = match settings.target_position {
        TargetPositionMode::None => None,
        TargetPositionMode::Same => Some(Arc::clone(&position)),
        TargetPositionMode::Next => {
            let next = index.add(&Expression::one(ValueType::Uint32));
            Some(shape.position_from_index(&next))
        }
    };

    ComputedPositions {
        position,
        target_position,
    }
}

pub fn source(has_target: bool) -> String {
    let mut source = format!("{} += {COMPUTED_POSITION};", Attribute::Position.name());
    if has_target {
        source.push_str(&format!(
            "\n{} += {COMPUTED_TARGET_POSITION};",
            Attribute::TargetPosition.name()
        ));
    }
    source
}

impl Block for SequentialPosition {
    fn name(&self) -> String {
        format!("Position : Sequential ({})", self.shape)
    }

    fn category(&self) -> &'static str {
        "Position"
    }

    fn compatible_contexts(&self) -> &'static [ContextType] {
        ContextType::INIT_AND_UPDATE_AND_OUTPUT
    }

    fn compatible_data(&self) -> DataType {
        DataType::Particle
    }

    fn input_properties(&self) -> Vec<PropertyDeclaration> {
        input_properties(self.shape, self.index)
    }

    fn attributes(&self) -> Vec<AttributeInfo> {
        attributes(self.index, self.target_position)
    }

    fn parameters(&self, inputs: &BoundInputs) -> Vec<NamedExpression> {
        compute_positions(self, inputs).into_named_expressions()
    }

    fn source(&self) -> String {
        source(self.target_position.has_target())
    }
}

pub struct SequentialPositionVariants;

impl VariantProvider for SequentialPositionVariants {
    fn variants() -> Variants {
        let shapes = SequentialShape::ALL
            .iter()
            .map(|shape| serde_json::Value::from(shape.name()))
            .collect();

        Variants::from([("shape", shapes)])
    }
}

#[cfg(feature = "compiler")]
pub mod compile {
    use crate::{
        blocks::Block,
        compiler::prelude::{BlockNode, BlockSettings, Slot},
    };

    pub use super::{
        IndexSource, SequentialPosition, SequentialPositionVariants, SequentialShape,
        TargetPositionMode,
    };

    impl BlockSettings for SequentialPosition {
        type Variants = SequentialPositionVariants;

        fn identity() -> &'static str {
            "position_sequential"
        }

        fn category() -> &'static str {
            "Position"
        }

        fn experimental() -> bool {
            true
        }

        fn build(self) -> anyhow::Result<Box<dyn Block>> {
            Ok(Box::new(self))
        }
    }

    pub fn sequential_position(
        shape: SequentialShape,
        index: IndexSource,
        target_position: TargetPositionMode,
        inputs: impl Into<Vec<Slot>>,
    ) -> BlockNode {
        let settings = SequentialPosition {
            shape,
            index,
            target_position,
        };
        BlockNode::new(settings, inputs).expect("Valid")
    }
}
