mod error;
mod snowflake;
mod status;
mod wait;

pub use error::*;
pub use snowflake::*;
pub use status::*;
pub use wait::*;

#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{Mutex, MutexGuard};
