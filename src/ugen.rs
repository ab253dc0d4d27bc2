//! Core node type and output handles.

use core::fmt;
use core::ptr;

use crate::error::{Error, Result};
use crate::rate::Rate;

/// Unique identifier for a node within a [`SynthGraph`](crate::SynthGraph).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in its graph, in insertion order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A checked reference to one output of a node already in a graph.
///
/// Obtained from [`SynthGraph::output`](crate::SynthGraph::output) or
/// [`SynthGraph::control`](crate::SynthGraph::control), and passed as a
/// [`UGenInput`] when building downstream nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OutputRef {
    pub(crate) node: NodeId,
    pub(crate) index: usize,
}

impl OutputRef {
    pub fn node(self) -> NodeId {
        self.node
    }

    pub fn index(self) -> usize {
        self.index
    }
}

/// An input slot of a unit generator.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum UGenInput {
    /// A constant folded into the definition's constant table.
    Constant(f32),
    /// An output of another node in the same graph.
    Output(OutputRef),
}

impl From<f32> for UGenInput {
    fn from(value: f32) -> Self {
        UGenInput::Constant(value)
    }
}

impl From<OutputRef> for UGenInput {
    fn from(output: OutputRef) -> Self {
        UGenInput::Output(output)
    }
}

/// A unit generator as it appears in a graph definition.
///
/// This carries only what the definition needs: a class name, a rate, one
/// rate per output, the input list and the special index some classes use to
/// select an operator.
#[derive(Clone, PartialEq, Debug)]
pub struct UGen {
    name: String,
    rate: Rate,
    output_rates: Vec<Rate>,
    inputs: Vec<UGenInput>,
    special_index: i16,
}

impl UGen {
    /// Create a node with an explicit rate for each output.
    pub fn new(
        name: impl Into<String>,
        rate: Rate,
        output_rates: Vec<Rate>,
        inputs: Vec<UGenInput>,
        special_index: i16,
    ) -> Self {
        Self {
            name: name.into(),
            rate,
            output_rates,
            inputs,
            special_index,
        }
    }

    /// Create a node whose `num_outputs` outputs all run at `rate`.
    pub fn uniform(
        name: impl Into<String>,
        rate: Rate,
        num_outputs: usize,
        inputs: Vec<UGenInput>,
        special_index: i16,
    ) -> Self {
        Self::new(name, rate, vec![rate; num_outputs], inputs, special_index)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn rate(&self) -> Rate {
        self.rate
    }

    #[inline]
    pub fn num_outputs(&self) -> usize {
        self.output_rates.len()
    }

    #[inline]
    pub fn output_rates(&self) -> &[Rate] {
        &self.output_rates
    }

    #[inline]
    pub fn inputs(&self) -> &[UGenInput] {
        &self.inputs
    }

    #[inline]
    pub fn special_index(&self) -> i16 {
        self.special_index
    }

    /// Handle to output `index`.
    ///
    /// Fails with [`Error::OutputIndexOutOfRange`] past the last output.
    pub fn output_channel(&self, index: usize) -> Result<UGenChannel<'_>> {
        if index < self.num_outputs() {
            Ok(UGenChannel { ugen: self, index })
        } else {
            Err(Error::OutputIndexOutOfRange {
                index,
                len: self.num_outputs(),
            })
        }
    }
}

/// A borrowed handle to one output of a [`UGen`].
///
/// Two channels are equal when they point at the same node instance and the
/// same output; structurally identical nodes don't compare equal.
#[derive(Clone, Copy)]
pub struct UGenChannel<'a> {
    ugen: &'a UGen,
    index: usize,
}

impl<'a> UGenChannel<'a> {
    pub fn ugen(&self) -> &'a UGen {
        self.ugen
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Rate of this particular output.
    pub fn rate(&self) -> Rate {
        // index was checked when the channel was handed out
        self.ugen.output_rates[self.index]
    }

    /// Turn this channel into a graph reference, given the id its node was
    /// added under.
    pub fn at(&self, node: NodeId) -> OutputRef {
        OutputRef {
            node,
            index: self.index,
        }
    }
}

impl PartialEq for UGenChannel<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.ugen, other.ugen) && self.index == other.index
    }
}

impl Eq for UGenChannel<'_> {}

impl fmt::Debug for UGenChannel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}].{}", self.ugen.name, self.index, self.rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sin_osc() -> UGen {
        UGen::uniform("SinOsc", Rate::Audio, 1, vec![UGenInput::Constant(440.0), UGenInput::Constant(0.0)], 0)
    }

    #[test]
    fn uniform_replicates_rate() {
        let pan = UGen::uniform("Pan2", Rate::Audio, 2, vec![], 0);
        assert_eq!(pan.output_rates(), &[Rate::Audio, Rate::Audio]);
        assert_eq!(pan.num_outputs(), 2);
    }

    #[test]
    fn output_channel_bounds() {
        let osc = sin_osc();
        assert_eq!(osc.output_channel(0).map(|c| c.index()), Ok(0));
        assert_eq!(
            osc.output_channel(1).unwrap_err(),
            Error::OutputIndexOutOfRange { index: 1, len: 1 }
        );
    }

    #[test]
    fn channels_compare_by_identity() {
        let a = sin_osc();
        let b = sin_osc();
        assert_eq!(a, b);
        assert_eq!(a.output_channel(0).unwrap(), a.output_channel(0).unwrap());
        assert_ne!(a.output_channel(0).unwrap(), b.output_channel(0).unwrap());
    }

    #[test]
    fn channel_debug_names_node_and_rate() {
        let osc = sin_osc();
        assert_eq!(format!("{:?}", osc.output_channel(0).unwrap()), "SinOsc[0].ar");
    }
}
