pub mod sequential_position;


use std::{collections::BTreeMap, fmt::Debug};

use serde_derive::{Deserialize, Serialize};

use crate::{AttributeInfo, BoundInputs, NamedExpression, PropertyDeclaration};

/// Stage of a particle system a block can run in.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextType {
    Spawner,
    Init,
    #[default]
    Update,
    Output,
}

impl ContextType {
    pub const INIT_AND_UPDATE_AND_OUTPUT: &'static [ContextType] =
        &[ContextType::Init, ContextType::Update, ContextType::Output];
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    SpawnEvent,
    #[default]
    Particle,
}

/// An authoring-time node of a particle context, compiled into update code.
///
/// Every method is a pure function of the block configuration (and of `inputs`
/// for [`Block::parameters`]).
pub trait Block: Debug + Send + Sync + 'static {
    fn name(&self) -> String;
    fn category(&self) -> &'static str;
    fn compatible_contexts(&self) -> &'static [ContextType];
    fn compatible_data(&self) -> DataType;

    /// Inputs the block requires for its current configuration.
    fn input_properties(&self) -> Vec<PropertyDeclaration>;

    /// Particle attributes the generated source reads or writes.
    fn attributes(&self) -> Vec<AttributeInfo>;

    /// Named expressions the generated source refers to. `inputs` must bind every
    /// declaration returned by [`Block::input_properties`].
    fn parameters(&self, inputs: &BoundInputs) -> Vec<NamedExpression>;

    fn source(&self) -> String;
}

/// Configuration axis name to its ordered values.
pub type Variants = BTreeMap<&'static str, Vec<serde_json::Value>>;

/// Pre-built configurations offered by the authoring tool.
pub trait VariantProvider {
    fn variants() -> Variants;
}

pub struct NoVariants;

impl VariantProvider for NoVariants {
    fn variants() -> Variants {
        Variants::new()
    }
}

/// Cross product of all variant axes. Axes without values are ignored.
pub fn variant_combinations(variants: &Variants) -> Vec<BTreeMap<&'static str, serde_json::Value>> {
    let mut result = vec![BTreeMap::new()];

    for (&axis, values) in variants.iter().filter(|(_, values)| !values.is_empty()) {
        result = result
            .into_iter()
            .flat_map(|combination| {
                values.iter().map(move |value| {
                    let mut combination = combination.clone();
                    combination.insert(axis, value.clone());
                    combination
                })
            })
            .collect();
    }

    result
}

#[cfg(feature = "compiler")]
pub mod compile {
    use crate::compiler::context::BlockRegistry;

    pub use super::sequential_position::compile::*;

    pub fn add_default_blocks(registry: &mut BlockRegistry) {
        registry.register::<SequentialPosition>();
    }

    pub fn default_block_registry() -> BlockRegistry {
        let mut registry = BlockRegistry::default();
        add_default_blocks(&mut registry);
        registry
    }
}
