//! Pre-allocated results matrix keyed by [`TrialKey`].

use std::{collections::HashMap, num::NonZeroUsize, sync::Arc};

use crate::{
    error::TableError,
    evaluator::{MetricEvaluation, MetricValue},
    metric::MetricId,
    trial::TrialKey,
};

/// Header of the network key column.
pub const NETWORK_COLUMN: &str = "Rede Social";
/// Header of the iteration key column.
pub const ITERATION_COLUMN: &str = "Iteracao";

/// One row of the results table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    key: TrialKey,
    values: Vec<MetricValue>,
}

impl ResultRow {
    /// Key columns.
    #[must_use]
    pub fn key(&self) -> &TrialKey {
        &self.key
    }

    /// Metric cells in column order.
    #[must_use]
    pub fn values(&self) -> &[MetricValue] {
        &self.values
    }

    /// Returns `true` when every metric cell is undefined.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.values.iter().all(|value| !value.is_defined())
    }
}

/// Results for one model run: one row per (network, iteration), one column per
/// metric.
///
/// Rows are allocated up front in network-major, iteration-minor order and
/// every cell starts undefined. Writes overwrite a row located by key; the row
/// set never changes after allocation.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use grafsim_core::{MetricEvaluation, MetricId, MetricValue, ResultsTable, TrialKey};
///
/// let iterations = NonZeroUsize::new(2).expect("non-zero");
/// let mut table = ResultsTable::allocate(["a", "b"], iterations, [MetricId::DENSITY])?;
/// assert_eq!(table.len(), 4);
///
/// let key = TrialKey::new("b", NonZeroUsize::MIN);
/// let evaluation: MetricEvaluation = [(MetricId::DENSITY, MetricValue::Defined(0.5))]
///     .into_iter()
///     .collect();
/// table.write_row(&key, &evaluation)?;
/// assert_eq!(table.value(&key, MetricId::DENSITY), Some(MetricValue::Defined(0.5)));
/// # Ok::<(), grafsim_core::TableError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    metric_ids: Vec<MetricId>,
    iterations: NonZeroUsize,
    rows: Vec<ResultRow>,
    index: HashMap<TrialKey, usize>,
}

impl ResultsTable {
    /// Allocates `iterations` undefined rows for each network.
    ///
    /// # Errors
    /// Returns [`TableError::DuplicateNetwork`] when a network is listed twice.
    pub fn allocate<N, S, M>(
        networks: N,
        iterations: NonZeroUsize,
        metric_ids: M,
    ) -> Result<Self, TableError>
    where
        N: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
        M: IntoIterator<Item = MetricId>,
    {
        let metric_ids: Vec<MetricId> = metric_ids.into_iter().collect();
        let mut rows = Vec::new();
        let mut index = HashMap::new();
        for network in networks {
            let network: Arc<str> = network.into();
            let first = TrialKey::new(Arc::clone(&network), NonZeroUsize::MIN);
            if index.contains_key(&first) {
                return Err(TableError::DuplicateNetwork { network });
            }
            for iteration in (1..=iterations.get()).filter_map(NonZeroUsize::new) {
                let key = TrialKey::new(Arc::clone(&network), iteration);
                index.insert(key.clone(), rows.len());
                rows.push(ResultRow {
                    key,
                    values: vec![MetricValue::Undefined; metric_ids.len()],
                });
            }
        }
        Ok(Self {
            metric_ids,
            iterations,
            rows,
            index,
        })
    }

    /// Overwrites the metric cells of the row for `key`. Metrics missing from
    /// `evaluation` become undefined; entries for unknown metrics are ignored.
    ///
    /// # Errors
    /// Returns [`TableError::UnknownKey`] when no row exists for `key`.
    pub fn write_row(
        &mut self,
        key: &TrialKey,
        evaluation: &MetricEvaluation,
    ) -> Result<(), TableError> {
        let slot = *self.index.get(key).ok_or_else(|| TableError::UnknownKey {
            network: Arc::from(key.network()),
            iteration: key.iteration().get(),
        })?;
        let row = &mut self.rows[slot];
        for (cell, id) in row.values.iter_mut().zip(&self.metric_ids) {
            *cell = evaluation.get(*id).unwrap_or_default();
        }
        Ok(())
    }

    /// Row for `key`.
    #[must_use]
    pub fn get(&self, key: &TrialKey) -> Option<&ResultRow> {
        self.index.get(key).map(|&slot| &self.rows[slot])
    }

    /// Single cell lookup.
    #[must_use]
    pub fn value(&self, key: &TrialKey, metric: MetricId) -> Option<MetricValue> {
        let column = self.metric_ids.iter().position(|id| *id == metric)?;
        self.get(key).map(|row| row.values[column])
    }

    /// Rows in allocation order.
    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Metric columns in order.
    #[must_use]
    pub fn metric_ids(&self) -> &[MetricId] {
        &self.metric_ids
    }

    /// Iterations allocated per network.
    #[must_use]
    pub fn iterations(&self) -> NonZeroUsize {
        self.iterations
    }

    /// Column headers: the two key columns followed by the metric ids.
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        [NETWORK_COLUMN, ITERATION_COLUMN]
            .into_iter()
            .chain(self.metric_ids.iter().map(|id| id.as_str()))
            .map(str::to_owned)
            .collect()
    }

    /// Rows rendered as text cells, matching [`Self::header`].
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(|row| {
            let mut record = Vec::with_capacity(2 + row.values.len());
            record.push(row.key.network().to_owned());
            record.push(row.key.iteration().to_string());
            record.extend(row.values.iter().map(ToString::to_string));
            record
        })
    }
}
