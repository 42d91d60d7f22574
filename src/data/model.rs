use anyhow::Context;
use serde_derive::{Deserialize, Serialize};

pub type Extras = serde_json::Value;

pub use serde_json;
pub use serde_json::to_value;
use uuid::Uuid;

use crate::{
    blocks::{ContextType, DataType},
    compiler::prelude::BlockSettings,
    Value,
};

/// Authored stage of a particle system: an ordered list of blocks.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct ContextModel {
    #[serde(skip_serializing_if = "Uuid::is_nil", default)]
    pub id: Uuid,
    #[serde(rename = "context")]
    pub name: String,
    #[serde(default)]
    pub context_type: ContextType,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub blocks: Vec<BlockNode>,
    #[serde(skip_serializing_if = "Extras::is_null", default)]
    pub extras: Extras,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct BlockNode {
    #[serde(skip_serializing_if = "Uuid::is_nil", default)]
    pub id: Uuid,
    pub block: String,
    #[serde(skip_serializing_if = "Extras::is_null", default)]
    pub settings: Extras,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub inputs: Vec<Slot>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub disabled: bool,
    #[serde(skip_serializing_if = "Extras::is_null", default)]
    pub extras: Extras,
}

/// An authored binding of one declared input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(skip_serializing_if = "Uuid::is_nil", default)]
    pub id: Uuid,
    pub name: String,
    pub value: SlotValue,
    #[serde(skip_serializing_if = "Extras::is_null", default)]
    pub extras: Extras,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotValue {
    Value(Value),
    Parameter(String),
}

impl ContextModel {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut context: ContextModel =
            serde_json::from_str(json).context("failed to parse context document")?;
        context.generate_id_for_nils();
        Ok(context)
    }

    pub fn generate_id_for_nils(&mut self) {
        fn check_id(id: &mut Uuid) {
            if id.is_nil() {
                *id = Uuid::new_v4();
            }
        }

        check_id(&mut self.id);
        for block in self.blocks.iter_mut() {
            check_id(&mut block.id);
            for slot in block.inputs.iter_mut() {
                check_id(&mut slot.id);
            }
        }
    }

    pub fn with_blocks(mut self, blocks: impl Into<Vec<BlockNode>>) -> Self {
        self.blocks = blocks.into();
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }
}

impl BlockNode {
    pub fn new<T: BlockSettings>(
        settings: T,
        inputs: impl Into<Vec<Slot>>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            block: T::identity().to_owned(),
            settings: serde_json::to_value(settings)
                .with_context(|| format!("failed to serialize settings of {}", T::identity()))?,
            inputs: inputs.into(),
            ..Default::default()
        })
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl Slot {
    pub fn new(name: &str, value: SlotValue) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.to_owned(),
            value,
            extras: Extras::Null,
        }
    }
}

pub fn context(
    name: &str,
    context_type: ContextType,
    blocks: impl Into<Vec<BlockNode>>,
) -> ContextModel {
    ContextModel {
        name: name.to_owned(),
        context_type,
        blocks: blocks.into(),
        ..Default::default()
    }
}

pub fn slot_value(name: &str, value: impl Into<Value>) -> Slot {
    Slot::new(name, SlotValue::Value(value.into()))
}

pub fn bind_parameter(name: &str, parameter: &str) -> Slot {
    Slot::new(name, SlotValue::Parameter(parameter.to_owned()))
}

#[cfg(test)]
mod test {
    use glam::Vec3;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_context_from_json() {
        let document = json!({
            "context": "update",
            "context_type": "update",
            "blocks": [{
                "block": "position_sequential",
                "settings": { "shape": "Circle" },
                "inputs": [
                    { "name": "Radius", "value": { "value": { "float": 2.0 } } },
                    { "name": "Count", "value": { "parameter": "ring_count" } }
                ]
            }]
        });

        let context = ContextModel::from_json(&document.to_string()).unwrap();
        assert!(!context.id.is_nil());
        assert_eq!(context.name, "update");
        assert_eq!(context.data_type, DataType::Particle);

        let block = &context.blocks[0];
        assert!(!block.id.is_nil());
        assert!(!block.disabled);
        assert_eq!(block.inputs[0], {
            let mut slot = slot_value("Radius", 2.0f32);
            slot.id = block.inputs[0].id;
            slot
        });
        assert_eq!(
            block.inputs[1].value,
            SlotValue::Parameter("ring_count".to_owned())
        );
    }

    #[test]
    fn test_invalid_document() {
        let err = ContextModel::from_json("{ \"blocks\": 1 }").unwrap_err();
        assert_eq!(err.to_string(), "failed to parse context document");
    }

    #[test]
    fn test_nil_ids_are_skipped() {
        let slot = slot_value("End", Vec3::Y);
        assert_eq!(
            serde_json::to_value(&slot).unwrap(),
            json!({ "name": "End", "value": { "value": { "float3": [0.0, 1.0, 0.0] } } })
        );
    }
}
