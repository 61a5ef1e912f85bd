#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "async-tokio")]
mod futures;
mod generator;
mod id;
mod time;

#[cfg(feature = "async-tokio")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
