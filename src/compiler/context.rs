use std::{
    collections::{HashMap, HashSet},
    marker::PhantomData,
    sync::Arc,
};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    blocks::{variant_combinations, Block, ContextType, DataType, VariantProvider, Variants},
    BoundInputs, Expression, PropertyDeclaration, ValueType,
};

use super::prelude::{BlockNode, Extras, Slot, SlotValue};

/// Authored configuration of a block type.
pub trait BlockSettings:
    Default + serde::Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Variants: VariantProvider;

    fn identity() -> &'static str;
    fn category() -> &'static str;
    fn experimental() -> bool {
        false
    }
    fn build(self) -> anyhow::Result<Box<dyn Block>>;
}

pub trait BlockCompilationMeta: Send + Sync {
    fn identity(&self) -> &'static str;
    fn category(&self) -> &'static str;
    fn experimental(&self) -> bool;
    fn variants(&self) -> Variants;
    fn instantiate_default(&self) -> BlockNode;
    fn build(&self, path: &str, settings: &Extras) -> Result<Box<dyn Block>, CompileError>;
}

struct BlockSettingsMeta<T: BlockSettings>(PhantomData<fn() -> T>);

impl<T: BlockSettings> BlockCompilationMeta for BlockSettingsMeta<T> {
    fn identity(&self) -> &'static str {
        T::identity()
    }

    fn category(&self) -> &'static str {
        T::category()
    }

    fn experimental(&self) -> bool {
        T::experimental()
    }

    fn variants(&self) -> Variants {
        T::Variants::variants()
    }

    fn instantiate_default(&self) -> BlockNode {
        BlockNode::new(T::default(), []).expect("Valid")
    }

    fn build(&self, path: &str, settings: &Extras) -> Result<Box<dyn Block>, CompileError> {
        let settings: T = if settings.is_null() {
            T::default()
        } else {
            serde_json::from_value(settings.clone())
                .map_err(|err| CompileError::SettingsSerializationError(path.to_owned(), err))?
        };

        settings
            .build()
            .map_err(|err| CompileError::BuildError(path.to_owned(), err))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("duplicate slot: \"{0}\"")]
    DuplicateSlot(String),
    #[error("unexpected value for slot {0} expected: {1} got {2}")]
    TypeMismatch(String, ValueType, ValueType),
}

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("missing block meta: {0}, \"{1}\"")]
    MissingBlockMetaError(String, String),
    #[error("serialization error for {0}: {1:?}")]
    SettingsSerializationError(String, serde_json::Error),
    #[error("build error for {0}: {1:?}")]
    BuildError(String, anyhow::Error),
    #[error("block {0} is not compatible with {1:?} contexts")]
    IncompatibleContextError(String, ContextType),
    #[error("block {0} is not compatible with {1:?} data")]
    IncompatibleDataError(String, DataType),
    #[error("binding error for {0}: {1}")]
    BindingError(String, BindError),
}

/// Qualified path of a block inside a context, `<context>/<index>#<block>`.
pub fn block_path(context: &str, index: usize, block: &str) -> String {
    format!("{context}/{index}#{block}")
}

/// Binds every declaration, in order, to its authored slot or to its default.
///
/// Slots naming no declaration are ignored, they are left over from an earlier
/// configuration of the block.
pub fn bind_inputs(
    declarations: &[PropertyDeclaration],
    slots: &[Slot],
) -> Result<BoundInputs, BindError> {
    let mut seen = HashSet::with_capacity(slots.len());
    for slot in slots {
        if !seen.insert(slot.name.as_str()) {
            return Err(BindError::DuplicateSlot(slot.name.clone()));
        }

        if !declarations.iter().any(|x| x.name == slot.name) {
            debug!(slot = %slot.name, "ignoring slot without declared input");
        }
    }

    let mut inputs = BoundInputs::default();
    for declaration in declarations {
        let slot = slots.iter().find(|x| x.name == declaration.name);

        let expression = match slot.map(|x| &x.value) {
            Some(SlotValue::Value(value)) => {
                if value.value_type() != declaration.value_type() {
                    return Err(BindError::TypeMismatch(
                        declaration.name.to_owned(),
                        declaration.value_type(),
                        value.value_type(),
                    ));
                }
                declaration.bind(Expression::constant(*value))
            }
            Some(SlotValue::Parameter(parameter)) => {
                declaration.bind(Expression::parameter(parameter, declaration.value_type()))
            }
            None => declaration.bind_default(),
        };

        inputs.insert(declaration.name, expression);
    }

    Ok(inputs)
}

/// Entry of the block palette offered by the authoring tool.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDescriptor {
    pub name: String,
    pub identity: &'static str,
    pub category: &'static str,
    pub experimental: bool,
    pub settings: Extras,
}

#[derive(Clone, Default)]
pub struct BlockRegistry {
    pub blocks: HashMap<String, Arc<dyn BlockCompilationMeta>>,
}

impl BlockRegistry {
    pub fn get(&self, identity: &str) -> Option<&dyn BlockCompilationMeta> {
        self.blocks.get(identity).map(|x| x.as_ref())
    }

    pub fn register<T: BlockSettings>(&mut self) {
        let previous = self.blocks.insert(
            T::identity().to_owned(),
            Arc::new(BlockSettingsMeta::<T>(PhantomData)),
        );

        if previous.is_some() {
            warn!(block = T::identity(), "block registered twice, replacing");
        }
    }

    /// Every registered block expanded by its variants, ordered by identity.
    pub fn palette(&self) -> Result<Vec<BlockDescriptor>, CompileError> {
        let mut identities: Vec<&String> = self.blocks.keys().collect();
        identities.sort();

        let mut result = Vec::new();
        for identity in identities {
            let meta = &self.blocks[identity];

            for combination in variant_combinations(&meta.variants()) {
                let settings = Extras::Object(
                    combination
                        .into_iter()
                        .map(|(axis, value)| (axis.to_owned(), value))
                        .collect(),
                );
                let block = meta.build(identity, &settings)?;

                result.push(BlockDescriptor {
                    name: block.name(),
                    identity: meta.identity(),
                    category: meta.category(),
                    experimental: meta.experimental(),
                    settings,
                });
            }
        }

        Ok(result)
    }
}
