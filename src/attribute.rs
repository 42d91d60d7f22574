use std::fmt;

use serde_derive::{Deserialize, Serialize};

use crate::ValueType;

/// Per-particle state field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    ParticleId,
    Position,
    TargetPosition,
}

impl Attribute {
    /// Identifier of the attribute in generated source.
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::ParticleId => "particleId",
            Attribute::Position => "position",
            Attribute::TargetPosition => "targetPosition",
        }
    }

    pub const fn value_type(self) -> ValueType {
        match self {
            Attribute::ParticleId => ValueType::Uint32,
            Attribute::Position | Attribute::TargetPosition => ValueType::Float3,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    Read,
    Write,
    ReadWrite,
}

impl AttributeMode {
    pub const fn reads(self) -> bool {
        matches!(self, AttributeMode::Read | AttributeMode::ReadWrite)
    }

    pub const fn writes(self) -> bool {
        matches!(self, AttributeMode::Write | AttributeMode::ReadWrite)
    }

    pub const fn union(self, other: Self) -> Self {
        match (self.reads() || other.reads(), self.writes() || other.writes()) {
            (true, true) => AttributeMode::ReadWrite,
            (false, true) => AttributeMode::Write,
            _ => AttributeMode::Read,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub attribute: Attribute,
    pub mode: AttributeMode,
}

impl AttributeInfo {
    pub const fn new(attribute: Attribute, mode: AttributeMode) -> Self {
        Self { attribute, mode }
    }
}

/// Adds `attributes` to `list`, keeping first-appearance order and widening the
/// access mode of attributes already present.
pub fn merge_attributes(
    list: &mut Vec<AttributeInfo>,
    attributes: impl IntoIterator<Item = AttributeInfo>,
) {
    for info in attributes {
        if let Some(existing) = list.iter_mut().find(|x| x.attribute == info.attribute) {
            existing.mode = existing.mode.union(info.mode);
        } else {
            list.push(info);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mode_union() {
        use AttributeMode::*;
        assert_eq!(Read.union(Read), Read);
        assert_eq!(Read.union(Write), ReadWrite);
        assert_eq!(Write.union(Write), Write);
        assert_eq!(ReadWrite.union(Read), ReadWrite);
    }

    #[test]
    fn test_merge() {
        let mut list = vec![
            AttributeInfo::new(Attribute::ParticleId, AttributeMode::Read),
            AttributeInfo::new(Attribute::Position, AttributeMode::Write),
        ];

        merge_attributes(
            &mut list,
            [
                AttributeInfo::new(Attribute::Position, AttributeMode::Read),
                AttributeInfo::new(Attribute::TargetPosition, AttributeMode::ReadWrite),
            ],
        );

        assert_eq!(
            list,
            [
                AttributeInfo::new(Attribute::ParticleId, AttributeMode::Read),
                AttributeInfo::new(Attribute::Position, AttributeMode::ReadWrite),
                AttributeInfo::new(Attribute::TargetPosition, AttributeMode::ReadWrite),
            ]
        );
    }
}
