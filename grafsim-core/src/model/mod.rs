//! Random-graph models and the registry that maps identifiers to them.
//!
//! Every model is driven by the same two parameters taken from a target
//! network: the node count `N` and the mean degree `k`. Generators only
//! approximate `k`; Barabási–Albert, for instance, attaches `floor(k / 2)`
//! edges per new node.

mod barabasi_albert;
mod erdos_renyi;
mod watts_strogatz;

use std::{fmt, str::FromStr, sync::Arc};

use rand::rngs::SmallRng;
use thiserror::Error;

use crate::{error::ModelError, graph::Graph};

pub use self::{
    barabasi_albert::BarabasiAlbert, erdos_renyi::ErdosRenyi, watts_strogatz::WattsStrogatz,
};

/// Closed set of model identifiers accepted on the command line.
///
/// # Examples
/// ```
/// use grafsim_core::ModelId;
///
/// let id: ModelId = "WS_P05".parse()?;
/// assert_eq!(id, ModelId::WsP05);
/// assert_eq!(id.to_string(), "WS_P05");
/// # Ok::<(), grafsim_core::UnknownModelId>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelId {
    /// Erdős–Rényi `G(N, p)` with `p = k / (N - 1)`.
    Er,
    /// Barabási–Albert preferential attachment with `m = floor(k / 2)`.
    Ba,
    /// Watts–Strogatz with rewiring probability 0.10.
    WsP10,
    /// Watts–Strogatz with rewiring probability 0.05.
    WsP05,
    /// Watts–Strogatz with rewiring probability 0.01.
    WsP01,
}

impl ModelId {
    /// Every identifier, in the order the standard registry runs them.
    pub const ALL: [Self; 5] = [Self::Er, Self::Ba, Self::WsP10, Self::WsP05, Self::WsP01];

    /// Returns the identifier as written on the command line and in file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Er => "ER",
            Self::Ba => "BA",
            Self::WsP10 => "WS_P10",
            Self::WsP05 => "WS_P05",
            Self::WsP01 => "WS_P01",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised model identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown model `{provided}`; expected one of ER, BA, WS_P10, WS_P05, WS_P01 or ALL")]
pub struct UnknownModelId {
    /// Rejected input.
    pub provided: String,
}

impl FromStr for ModelId {
    type Err = UnknownModelId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == raw)
            .ok_or_else(|| UnknownModelId {
                provided: raw.to_owned(),
            })
    }
}

/// Either one model or every registered model, run one after another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSelection {
    /// Run a single model.
    Single(ModelId),
    /// Run every registered model sequentially.
    All,
}

impl ModelSelection {
    /// Keyword selecting every model.
    pub const ALL_KEYWORD: &'static str = "ALL";
}

impl FromStr for ModelSelection {
    type Err = UnknownModelId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw == Self::ALL_KEYWORD {
            return Ok(Self::All);
        }
        raw.parse().map(Self::Single)
    }
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(id) => id.fmt(f),
            Self::All => f.write_str(Self::ALL_KEYWORD),
        }
    }
}

/// Target parameters handed to a generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    /// Requested node count `N`.
    pub nodes: usize,
    /// Requested mean degree `k`.
    pub mean_degree: f64,
}

/// A random-graph generator.
///
/// Implementations must be pure apart from consuming randomness from `rng`;
/// the same parameters and RNG state must produce the same graph.
///
/// Closures with the matching signature implement the trait, which keeps
/// test doubles short:
///
/// ```
/// use grafsim_core::{Graph, GraphModel, ModelError, ModelParams};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let ring = |params: ModelParams, _: &mut SmallRng| {
///     Graph::from_edges(params.nodes, (0..params.nodes).map(|v| (v, (v + 1) % params.nodes)))
///         .map_err(ModelError::from)
/// };
/// let graph = ring.generate(
///     ModelParams { nodes: 4, mean_degree: 2.0 },
///     &mut SmallRng::seed_from_u64(1),
/// )?;
/// assert_eq!(graph.edge_count(), 4);
/// # Ok::<(), grafsim_core::ModelError>(())
/// ```
pub trait GraphModel: Send + Sync {
    /// Generates one graph for `params`.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidParameters`] when the model cannot realise
    /// the requested parameters.
    fn generate(&self, params: ModelParams, rng: &mut SmallRng) -> Result<Graph, ModelError>;
}

impl<F> GraphModel for F
where
    F: Fn(ModelParams, &mut SmallRng) -> Result<Graph, ModelError> + Send + Sync,
{
    fn generate(&self, params: ModelParams, rng: &mut SmallRng) -> Result<Graph, ModelError> {
        self(params, rng)
    }
}

/// Maps model identifiers to generators. Read-only once handed to the
/// orchestrator, and cheap to share across worker threads.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    entries: Vec<(ModelId, Arc<dyn GraphModel>)>,
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in models.
    ///
    /// # Examples
    /// ```
    /// use grafsim_core::{ModelId, ModelRegistry};
    ///
    /// let registry = ModelRegistry::standard();
    /// assert_eq!(registry.ids().collect::<Vec<_>>(), ModelId::ALL);
    /// ```
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_model(ModelId::Er, ErdosRenyi)
            .with_model(ModelId::Ba, BarabasiAlbert)
            .with_model(ModelId::WsP10, WattsStrogatz::new(ModelId::WsP10, 0.10))
            .with_model(ModelId::WsP05, WattsStrogatz::new(ModelId::WsP05, 0.05))
            .with_model(ModelId::WsP01, WattsStrogatz::new(ModelId::WsP01, 0.01))
    }

    /// Registers `model` under `id`, replacing any previous entry.
    #[must_use]
    pub fn with_model(mut self, id: ModelId, model: impl GraphModel + 'static) -> Self {
        let model: Arc<dyn GraphModel> = Arc::new(model);
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = model,
            None => self.entries.push((id, model)),
        }
        self
    }

    /// Returns the generator registered under `id`.
    #[must_use]
    pub fn get(&self, id: ModelId) -> Option<Arc<dyn GraphModel>> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, model)| Arc::clone(model))
    }

    /// Registered identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no model is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn invalid(model: ModelId, reason: impl Into<Arc<str>>) -> ModelError {
    ModelError::InvalidParameters {
        model,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rstest::rstest;

    #[rstest]
    #[case("ER", ModelId::Er)]
    #[case("BA", ModelId::Ba)]
    #[case("WS_P10", ModelId::WsP10)]
    #[case("WS_P05", ModelId::WsP05)]
    #[case("WS_P01", ModelId::WsP01)]
    fn model_ids_round_trip_through_strings(#[case] raw: &str, #[case] expected: ModelId) {
        let parsed: ModelId = raw.parse().expect("identifier is valid");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }

    #[rstest]
    #[case("er")]
    #[case("erdos-renyi")]
    #[case("")]
    #[case("WS_P20")]
    fn unknown_model_ids_are_rejected(#[case] raw: &str) {
        let err = raw.parse::<ModelId>().expect_err("identifier is invalid");
        assert_eq!(err.provided, raw);
    }

    #[test]
    fn selection_accepts_all_keyword() {
        assert_eq!("ALL".parse::<ModelSelection>(), Ok(ModelSelection::All));
        assert_eq!(
            "BA".parse::<ModelSelection>(),
            Ok(ModelSelection::Single(ModelId::Ba))
        );
        assert!("all".parse::<ModelSelection>().is_err());
    }

    #[test]
    fn with_model_replaces_existing_entry() {
        let empty =
            |params: ModelParams, _: &mut SmallRng| Ok::<_, ModelError>(Graph::empty(params.nodes));
        let registry = ModelRegistry::standard().with_model(ModelId::Er, empty);
        assert_eq!(registry.len(), 5);
        let model = registry.get(ModelId::Er).expect("ER is registered");
        let graph = model
            .generate(
                ModelParams {
                    nodes: 10,
                    mean_degree: 4.0,
                },
                &mut SmallRng::seed_from_u64(3),
            )
            .expect("empty model never fails");
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn empty_registry_has_no_models() {
        let registry = ModelRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(ModelId::Ba).is_none());
    }
}
