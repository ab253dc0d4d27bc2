//! Klingt synthdef - named control parameters for synthesis-server graphs
//!
//! Design principles:
//! - Controls are declared en bloc per rate, one `Control` node per block
//! - Every output of a control node has a descriptor (name, rate, default, lag)
//! - Nodes are immutable once built; a graph only ever appends
//! - Name lookups return `Option`, contract violations return [`Error`]

mod control;
mod error;
mod graph;
mod rate;
mod ugen;

pub use control::{ControlBuilder, ControlDesc, ControlNode, CONTROL_NAME};
pub use error::{Error, Result};
pub use graph::{GraphNode, Parameters, SynthGraph, Wire};
pub use rate::{ControlRate, Rate};
pub use ugen::{NodeId, OutputRef, UGen, UGenChannel, UGenInput};
