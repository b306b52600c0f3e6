//! Testing utilities and harness for Patchwork

pub mod harness;
pub mod recording;

pub use harness::PatchHarness;
pub use recording::{Mutation, RecordingHost};

pub mod prelude {
    pub use crate::harness::*;
    pub use crate::recording::*;
}
