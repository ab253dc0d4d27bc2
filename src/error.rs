//! Error type shared by node construction and graph building.

use thiserror::Error;

use crate::ugen::NodeId;

/// Everything that can go wrong while declaring controls or wiring a graph.
///
/// All variants are contract violations by the caller; none of them are
/// transient.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A named control list was given a different number of default values.
    #[error("control declaration has {names} names but {values} values")]
    ArityMismatch { names: usize, values: usize },

    /// A single-name control bank was given no values at all.
    #[error("control {name:?} declared with no values")]
    EmptyValues { name: String },

    /// An output index past the end of a node's outputs.
    #[error("output index {index} out of range for node with {len} outputs")]
    OutputIndexOutOfRange { index: usize, len: usize },

    /// A descriptor index past the end of a control node's table.
    #[error("control descriptor index {index} out of range for {len} descriptors")]
    DescIndexOutOfRange { index: usize, len: usize },

    /// A node id that doesn't belong to this graph.
    #[error("no node {0:?} in this graph")]
    UnknownNode(NodeId),
}

pub type Result<T> = core::result::Result<T, Error>;
