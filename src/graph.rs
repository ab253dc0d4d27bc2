//! Synth graph - owns nodes and the wiring between them

use hashbrown::HashMap;
use itertools::Itertools;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::control::ControlNode;
use crate::error::{Error, Result};
use crate::ugen::{NodeId, OutputRef, UGen, UGenInput};

/// Anything that can be added to a [`SynthGraph`].
#[derive(Clone, PartialEq, Debug)]
pub enum GraphNode {
    UGen(UGen),
    Control(ControlNode),
}

impl GraphNode {
    pub fn ugen(&self) -> &UGen {
        match self {
            GraphNode::UGen(u) => u,
            GraphNode::Control(c) => c.ugen(),
        }
    }

    pub fn as_control(&self) -> Option<&ControlNode> {
        match self {
            GraphNode::Control(c) => Some(c),
            GraphNode::UGen(_) => None,
        }
    }
}

impl From<UGen> for GraphNode {
    fn from(ugen: UGen) -> Self {
        GraphNode::UGen(ugen)
    }
}

impl From<ControlNode> for GraphNode {
    fn from(control: ControlNode) -> Self {
        GraphNode::Control(control)
    }
}

/// Edge weight: output `output` of the source feeds input slot `input` of the
/// target.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Wire {
    pub output: usize,
    pub input: usize,
}

type InnerGraph = petgraph::graph::Graph<GraphNode, Wire>;

/// A graph definition under construction.
///
/// Nodes can only refer to outputs of nodes added before them, so insertion
/// order is always a valid evaluation order.
///
/// ```
/// use klingt_synthdef::{ControlNode, Rate, SynthGraph, UGen, UGenInput};
///
/// let mut graph = SynthGraph::new("sine");
/// graph.add(ControlNode::kr_named(["freq", "amp"], &[440.0, 0.1]).unwrap()).unwrap();
///
/// let freq = graph.control("freq").unwrap();
/// let osc = graph
///     .add(UGen::uniform("SinOsc", Rate::Audio, 1, vec![freq.into(), UGenInput::Constant(0.0)], 0))
///     .unwrap();
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.parameters().initial_values(), &[440.0, 0.1]);
/// assert_eq!(graph.sources_of(osc).len(), 1);
/// ```
pub struct SynthGraph {
    name: String,
    graph: InnerGraph,
}

impl SynthGraph {
    /// Create an empty graph for a definition called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, 64, 64)
    }

    /// Create an empty graph with room for `nodes` nodes and `wires` wires.
    pub fn with_capacity(name: impl Into<String>, nodes: usize, wires: usize) -> Self {
        Self {
            name: name.into(),
            graph: InnerGraph::with_capacity(nodes, wires),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Add a node, returns its id.
    ///
    /// Every [`UGenInput::Output`] of the node has to point at a node already
    /// in this graph and at one of its outputs. On failure the graph is left
    /// untouched.
    pub fn add(&mut self, node: impl Into<GraphNode>) -> Result<NodeId> {
        let node = node.into();

        let mut wires = Vec::new();
        for (slot, input) in node.ugen().inputs().iter().enumerate() {
            if let UGenInput::Output(source) = input {
                if let Err(err) = self.check_output(*source) {
                    tracing::warn!(graph = %self.name, node = node.ugen().name(), slot, %err, "rejected input");
                    return Err(err);
                }
                wires.push((source.node, Wire { output: source.index, input: slot }));
            }
        }

        let ix = self.graph.add_node(node);
        for (source, wire) in wires {
            self.graph.add_edge(Self::ix(source), ix, wire);
        }

        let id = NodeId(ix.index() as u32);
        let ugen = self.graph[ix].ugen();
        tracing::debug!(
            graph = %self.name,
            id = id.0,
            name = ugen.name(),
            rate = %ugen.rate(),
            outputs = ugen.num_outputs(),
            "node added"
        );
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.graph.node_weight(Self::ix(id))
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> + '_ {
        self.graph
            .node_indices()
            .map(move |ix| (NodeId(ix.index() as u32), &self.graph[ix]))
    }

    /// All control nodes in insertion order.
    pub fn controls(&self) -> impl Iterator<Item = (NodeId, &ControlNode)> + '_ {
        self.nodes()
            .filter_map(|(id, node)| node.as_control().map(|c| (id, c)))
    }

    /// Checked reference to output `index` of node `id`.
    pub fn output(&self, id: NodeId, index: usize) -> Result<OutputRef> {
        let output = OutputRef { node: id, index };
        self.check_output(output)?;
        Ok(output)
    }

    /// The first control output named `name`, searching control nodes in the
    /// order they were added.
    pub fn control(&self, name: &str) -> Option<OutputRef> {
        self.controls().find_map(|(node, control)| {
            control
                .index_of(name)
                .map(|index| OutputRef { node, index })
        })
    }

    /// Nodes feeding `id`, ordered by the input slot they feed.
    pub fn sources_of(&self, id: NodeId) -> Vec<(NodeId, Wire)> {
        if self.node(id).is_none() {
            return Vec::new();
        }
        self.graph
            .edges_directed(Self::ix(id), Direction::Incoming)
            .map(|edge| (NodeId(edge.source().index() as u32), *edge.weight()))
            .sorted_by_key(|(_, wire)| wire.input)
            .collect()
    }

    /// Flatten every control node into the definition's parameter table.
    pub fn parameters(&self) -> Parameters {
        let descs = self
            .controls()
            .flat_map(|(_, control)| control.descs())
            .collect::<Vec<_>>();

        let initial_values = descs.iter().map(|desc| desc.default_value()).collect();
        let names = descs
            .iter()
            .enumerate()
            .filter_map(|(offset, desc)| desc.name().map(|name| (name.to_owned(), offset)))
            .unique_by(|(name, _)| name.clone())
            .collect::<Vec<_>>();
        let offsets = names.iter().cloned().collect();

        Parameters {
            initial_values,
            names,
            offsets,
        }
    }

    fn check_output(&self, output: OutputRef) -> Result<()> {
        let node = self
            .node(output.node)
            .ok_or(Error::UnknownNode(output.node))?;
        node.ugen().output_channel(output.index).map(|_| ())
    }

    fn ix(id: NodeId) -> NodeIndex {
        NodeIndex::new(id.index())
    }
}

/// The parameter table of a finished graph: one initial value per control
/// output, and the offset of each named parameter into that list.
#[derive(Clone, Debug, Default)]
pub struct Parameters {
    initial_values: Vec<f32>,
    names: Vec<(String, usize)>,
    offsets: HashMap<String, usize>,
}

impl Parameters {
    pub fn initial_values(&self) -> &[f32] {
        &self.initial_values
    }

    /// Named parameters with their offsets, in declaration order. Only the
    /// first parameter of a given name is listed.
    pub fn names(&self) -> &[(String, usize)] {
        &self.names
    }

    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.offsets.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.initial_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initial_values.is_empty()
    }
}
