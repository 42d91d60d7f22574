mod post_process;

#[cfg(feature = "compiler")]
pub mod model;

pub use post_process::*;
