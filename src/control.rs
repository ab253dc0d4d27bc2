//! Named control parameters.
//!
//! A [`ControlNode`] declares a block of parameters that all run at the same
//! rate. It is a single `"Control"` node with one output per parameter, plus a
//! table of [`ControlDesc`]s recording each parameter's name and default value.
//! Graph code wires the outputs into other nodes by name or by index.
//!
//! Controls should be declared en bloc per rate:
//!
//! ```
//! use klingt_synthdef::ControlNode;
//!
//! let init = ControlNode::ir_value("i_out", 0.0);
//! let ctl = ControlNode::kr_named(["freq", "amp", "pan"], &[440.0, 0.5, 0.0]).unwrap();
//!
//! assert_eq!(ctl.num_outputs(), 3);
//! assert_eq!(ctl.channel_named("amp"), ctl.channel(1).ok());
//! assert_eq!(init.desc(0).unwrap().name(), Some("i_out"));
//! ```
//!
//! Scalar-rate parameters can't be changed once the synth is running. By
//! convention their names start with `i_` so the graph reads that way, but
//! nothing here checks it. Duplicate names aren't checked either; lookups
//! return the first match.

use delegate::delegate;

use crate::error::{Error, Result};
use crate::rate::{ControlRate, Rate};
use crate::ugen::{UGen, UGenChannel, UGenInput};

/// Class name every control node is emitted under.
pub const CONTROL_NAME: &str = "Control";

/// Metadata for one control parameter (one output of a [`ControlNode`]).
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlDesc {
    name: Option<String>,
    rate: Rate,
    default_value: f32,
    lag: f32,
}

impl ControlDesc {
    pub fn new(name: Option<String>, rate: Rate, default_value: f32, lag: f32) -> Self {
        Self {
            name,
            rate,
            default_value,
            lag,
        }
    }

    /// Parameter name, or `None` for the unnamed tail of a control bank.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn rate(&self) -> Rate {
        self.rate
    }

    #[inline]
    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    /// Ramp time applied when the value is changed at runtime.
    #[inline]
    pub fn lag(&self) -> f32 {
        self.lag
    }

    /// `true` if this descriptor carries exactly `name`. Unnamed descriptors
    /// never match.
    #[inline]
    pub fn is_named(&self, name: &str) -> bool {
        self.name() == Some(name)
    }
}

/// A block of same-rate control parameters, one output per parameter.
///
/// Built once through one of the `ir*`/`kr*` factories or a
/// [`ControlBuilder`], then read-only.
#[derive(Clone, PartialEq, Debug)]
pub struct ControlNode {
    ugen: UGen,
    descs: Box<[ControlDesc]>,
}

impl ControlNode {
    /// Allocates the node and its descriptor table together. Callers have
    /// already validated the parameter list.
    fn assemble(rate: ControlRate, params: Vec<(Option<String>, f32)>) -> Self {
        let rate = Rate::from(rate);
        let num_outputs = params.len();

        if cfg!(feature = "warn_on_empty") && num_outputs == 0 {
            tracing::warn!(%rate, "declaring a control node without parameters");
        }

        let descs = params
            .into_iter()
            .map(|(name, value)| ControlDesc::new(name, rate, value, 0.0))
            .collect::<Box<[_]>>();

        tracing::trace!(%rate, num_outputs, "control node declared");

        Self {
            ugen: UGen::uniform(CONTROL_NAME, rate, num_outputs, Vec::new(), 0),
            descs,
        }
    }

    /// One named parameter per value.
    ///
    /// Fails with [`Error::ArityMismatch`] unless there are exactly as many
    /// names as values. Empty lists are fine and give a node without outputs.
    pub fn named<I, S>(rate: ControlRate, names: I, values: &[f32]) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect::<Vec<String>>();
        if names.len() != values.len() {
            return Err(Error::ArityMismatch {
                names: names.len(),
                values: values.len(),
            });
        }

        let params = names
            .into_iter()
            .map(Some)
            .zip(values.iter().copied())
            .collect();
        Ok(Self::assemble(rate, params))
    }

    /// A bank of channels under a single name.
    ///
    /// The first output is named `name`; the rest are unnamed and only
    /// reachable by index. Fails with [`Error::EmptyValues`] if `values` is
    /// empty, since the name would have nowhere to go.
    pub fn bank(rate: ControlRate, name: impl Into<String>, values: &[f32]) -> Result<Self> {
        let name = name.into();
        let (&first, rest) = match values.split_first() {
            Some(split) => split,
            None => return Err(Error::EmptyValues { name }),
        };

        let mut params = Vec::with_capacity(values.len());
        params.push((Some(name), first));
        params.extend(rest.iter().map(|&value| (None, value)));
        Ok(Self::assemble(rate, params))
    }

    /// A single named parameter.
    pub fn single(rate: ControlRate, name: impl Into<String>, default_value: f32) -> Self {
        Self::assemble(rate, vec![(Some(name.into()), default_value)])
    }

    /// Start declaring a block of parameters at `rate`.
    pub fn builder(rate: ControlRate) -> ControlBuilder {
        ControlBuilder::new(rate)
    }

    /// Scalar-rate parameter defaulting to `0.0`.
    pub fn ir(name: impl Into<String>) -> Self {
        Self::ir_value(name, 0.0)
    }

    /// Scalar-rate parameter with a default value.
    pub fn ir_value(name: impl Into<String>, default_value: f32) -> Self {
        Self::single(ControlRate::Scalar, name, default_value)
    }

    /// Scalar-rate parameters, one per name. See [`named`](Self::named).
    pub fn ir_named<I, S>(names: I, values: &[f32]) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::named(ControlRate::Scalar, names, values)
    }

    /// Scalar-rate bank under one name. See [`bank`](Self::bank).
    pub fn ir_values(name: impl Into<String>, values: &[f32]) -> Result<Self> {
        Self::bank(ControlRate::Scalar, name, values)
    }

    /// Control-rate parameter defaulting to `0.0`.
    pub fn kr(name: impl Into<String>) -> Self {
        Self::kr_value(name, 0.0)
    }

    /// Control-rate parameter with a default value.
    pub fn kr_value(name: impl Into<String>, default_value: f32) -> Self {
        Self::single(ControlRate::Control, name, default_value)
    }

    /// Control-rate parameters, one per name. See [`named`](Self::named).
    pub fn kr_named<I, S>(names: I, values: &[f32]) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::named(ControlRate::Control, names, values)
    }

    /// Control-rate bank under one name. See [`bank`](Self::bank).
    pub fn kr_values(name: impl Into<String>, values: &[f32]) -> Result<Self> {
        Self::bank(ControlRate::Control, name, values)
    }

    delegate! {
        to self.ugen {
            pub fn name(&self) -> &str;
            pub fn rate(&self) -> Rate;
            pub fn num_outputs(&self) -> usize;
            pub fn output_rates(&self) -> &[Rate];
            pub fn inputs(&self) -> &[UGenInput];
            pub fn special_index(&self) -> i16;
        }
    }

    /// The underlying graph node.
    pub fn ugen(&self) -> &UGen {
        &self.ugen
    }

    pub fn into_ugen(self) -> UGen {
        self.ugen
    }

    /// Output for parameter `index`.
    pub fn channel(&self, index: usize) -> Result<UGenChannel<'_>> {
        self.ugen.output_channel(index)
    }

    /// Output for the first parameter called `name`, if any.
    pub fn channel_named(&self, name: &str) -> Option<UGenChannel<'_>> {
        self.index_of(name)
            .and_then(|index| self.ugen.output_channel(index).ok())
    }

    /// Index of the first parameter called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.descs.iter().position(|desc| desc.is_named(name))
    }

    pub fn desc(&self, index: usize) -> Result<&ControlDesc> {
        self.descs.get(index).ok_or(Error::DescIndexOutOfRange {
            index,
            len: self.descs.len(),
        })
    }

    /// Always equal to [`num_outputs`](Self::num_outputs).
    #[inline]
    pub fn num_descs(&self) -> usize {
        self.num_outputs()
    }

    #[inline]
    pub fn descs(&self) -> &[ControlDesc] {
        &self.descs
    }
}

impl AsRef<UGen> for ControlNode {
    fn as_ref(&self) -> &UGen {
        &self.ugen
    }
}

/// Declares a block of parameters one at a time.
///
/// ```
/// use klingt_synthdef::{ControlNode, ControlRate};
///
/// let ctl = ControlNode::builder(ControlRate::Control)
///     .param("freq", 440.0)
///     .bank("harmonics", &[1.0, 0.5, 0.25])
///     .build()
///     .unwrap();
///
/// assert_eq!(ctl.num_descs(), 4);
/// assert_eq!(ctl.index_of("harmonics"), Some(1));
/// assert_eq!(ctl.desc(3).unwrap().name(), None);
/// ```
#[derive(Clone, Debug)]
pub struct ControlBuilder {
    rate: ControlRate,
    params: Vec<(Option<String>, f32)>,
    empty_bank: Option<String>,
}

impl ControlBuilder {
    pub fn new(rate: ControlRate) -> Self {
        Self {
            rate,
            params: Vec::new(),
            empty_bank: None,
        }
    }

    /// Add one named parameter.
    pub fn param(mut self, name: impl Into<String>, default_value: f32) -> Self {
        self.params.push((Some(name.into()), default_value));
        self
    }

    /// Add a named channel followed by `values.len() - 1` unnamed ones.
    pub fn bank(mut self, name: impl Into<String>, values: &[f32]) -> Self {
        let name = name.into();
        match values.split_first() {
            Some((&first, rest)) => {
                self.params.push((Some(name), first));
                self.params.extend(rest.iter().map(|&value| (None, value)));
            }
            None => {
                // reported by build(); keep the first offender
                self.empty_bank.get_or_insert(name);
            }
        }
        self
    }

    /// Number of outputs the node will have.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn build(self) -> Result<ControlNode> {
        if let Some(name) = self.empty_bank {
            return Err(Error::EmptyValues { name });
        }
        Ok(ControlNode::assemble(self.rate, self.params))
    }
}
