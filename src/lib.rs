#[cfg(feature = "compiler")]
pub mod compiler;

mod attribute;
mod core;
mod data;
mod expression;
mod property;

pub mod blocks;

pub use crate::attribute::*;
pub use crate::core::*;
pub use crate::data::*;
pub use crate::expression::*;
pub use crate::property::*;

pub use anyhow;
pub use serde;
pub use serde_derive;
pub use serde_json;
pub use glam;
pub use tracing;
#[cfg(feature = "compiler")]
pub use uuid;
