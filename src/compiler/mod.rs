use tracing::debug;

use crate::{
    blocks::{Block, ContextType},
    merge_attributes, AttributeInfo, BoundInputs, NamedExpression,
};

use self::{
    context::{bind_inputs, block_path, BindError, BlockRegistry, CompileError},
    prelude::{ContextModel, Slot},
};

pub mod context;


pub mod prelude {
    pub use super::context::*;
    pub use crate::blocks::compile::*;
    pub use crate::blocks::*;
    pub use crate::*;

    pub use crate::data::model::*;

    pub use super::{BlockCompilation, ContextCompilation};
}

/// A block with its inputs bound and its generated source.
#[derive(Debug, Clone)]
pub struct BlockCompilation {
    pub name: String,
    pub attributes: Vec<AttributeInfo>,
    pub inputs: BoundInputs,
    pub parameters: Vec<NamedExpression>,
    pub source: String,
}

impl BlockCompilation {
    pub fn compile(block: &dyn Block, slots: &[Slot]) -> Result<Self, BindError> {
        let inputs = bind_inputs(&block.input_properties(), slots)?;
        let parameters = block.parameters(&inputs);
        let name = block.name();

        debug!(
            block = %name,
            inputs = inputs.len(),
            parameters = parameters.len(),
            "compiled block"
        );

        Ok(Self {
            attributes: block.attributes(),
            source: block.source(),
            name,
            inputs,
            parameters,
        })
    }

    pub fn parameter(&self, name: &str) -> Option<&NamedExpression> {
        self.parameters.iter().find(|x| x.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct ContextCompilation {
    pub name: String,
    pub context_type: ContextType,
    pub blocks: Vec<BlockCompilation>,
    pub attributes: Vec<AttributeInfo>,
}

impl ContextCompilation {
    pub fn compile(context: &ContextModel, registry: &BlockRegistry) -> Result<Self, CompileError> {
        use CompileError::*;

        let mut blocks = Vec::with_capacity(context.blocks.len());
        let mut attributes = Vec::new();

        for (index, node) in context.blocks.iter().enumerate() {
            let path = block_path(&context.name, index, &node.block);
            if node.disabled {
                debug!(path = %path, "skipping disabled block");
                continue;
            }

            let meta = registry
                .get(&node.block)
                .ok_or_else(|| MissingBlockMetaError(node.block.clone(), path.clone()))?;

            let block = meta.build(&path, &node.settings)?;

            if !block.compatible_contexts().contains(&context.context_type) {
                return Err(IncompatibleContextError(path, context.context_type));
            }

            if block.compatible_data() != context.data_type {
                return Err(IncompatibleDataError(path, context.data_type));
            }

            let compiled = BlockCompilation::compile(block.as_ref(), &node.inputs)
                .map_err(|err| BindingError(path, err))?;

            merge_attributes(&mut attributes, compiled.attributes.iter().copied());
            blocks.push(compiled);
        }

        debug!(
            context = %context.name,
            blocks = blocks.len(),
            attributes = attributes.len(),
            "compiled context"
        );

        Ok(Self {
            name: context.name.clone(),
            context_type: context.context_type,
            blocks,
            attributes,
        })
    }

    /// Sources of all compiled blocks, each preceded by a comment naming the block.
    pub fn source(&self) -> String {
        self.blocks
            .iter()
            .map(|x| format!("// {}\n{}", x.name, x.source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
