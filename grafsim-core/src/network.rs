//! Target networks and the trait that resolves their summary parameters.

use std::{convert::Infallible, num::NonZeroUsize, sync::Arc};

use crate::{error::DescriptorError, model::ModelParams};

/// Summary parameters of a target network.
///
/// # Examples
/// ```
/// use grafsim_core::NetworkDescriptor;
///
/// let karate = NetworkDescriptor::new("karate", 34, 78.0 * 2.0 / 34.0)?;
/// assert_eq!(karate.name(), "karate");
/// assert_eq!(karate.nodes().get(), 34);
/// # Ok::<(), grafsim_core::DescriptorError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkDescriptor {
    name: Arc<str>,
    nodes: NonZeroUsize,
    mean_degree: f64,
}

impl NetworkDescriptor {
    /// Validates and builds a descriptor.
    ///
    /// # Errors
    /// Returns [`DescriptorError::ZeroNodes`] when `nodes` is zero and
    /// [`DescriptorError::InvalidMeanDegree`] when `mean_degree` is negative
    /// or not finite.
    pub fn new(
        name: impl Into<Arc<str>>,
        nodes: usize,
        mean_degree: f64,
    ) -> Result<Self, DescriptorError> {
        let name = name.into();
        let Some(nodes) = NonZeroUsize::new(nodes) else {
            return Err(DescriptorError::ZeroNodes { network: name });
        };
        if !mean_degree.is_finite() || mean_degree < 0.0 {
            return Err(DescriptorError::InvalidMeanDegree {
                network: name,
                value: mean_degree,
            });
        }
        Ok(Self {
            name,
            nodes,
            mean_degree,
        })
    }

    /// Network identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node count `N`.
    #[must_use]
    pub fn nodes(&self) -> NonZeroUsize {
        self.nodes
    }

    /// Mean degree `⟨k⟩`.
    #[must_use]
    pub fn mean_degree(&self) -> f64 {
        self.mean_degree
    }

    /// Generator parameters matching this network.
    #[must_use]
    pub fn params(&self) -> ModelParams {
        ModelParams {
            nodes: self.nodes.get(),
            mean_degree: self.mean_degree,
        }
    }
}

/// Something that can produce a [`NetworkDescriptor`], typically by loading a
/// dataset.
///
/// Resolution happens once per network per model run, on the orchestrating
/// thread.
pub trait NetworkSource {
    /// Failure raised while resolving.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Identifier used for table keys and logs. Must be available without
    /// resolving.
    fn name(&self) -> &str;

    /// Computes the network's summary parameters.
    ///
    /// # Errors
    /// Returns the source-specific error when the dataset cannot be read or
    /// yields no usable parameters.
    fn resolve(&self) -> Result<NetworkDescriptor, Self::Error>;
}

/// A descriptor is its own, always-successful, source.
impl NetworkSource for NetworkDescriptor {
    type Error = Infallible;

    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self) -> Result<NetworkDescriptor, Self::Error> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn zero_nodes_are_rejected() {
        let err = NetworkDescriptor::new("empty", 0, 1.0).expect_err("zero nodes");
        assert_eq!(
            err,
            DescriptorError::ZeroNodes {
                network: Arc::from("empty")
            }
        );
        assert_eq!(err.code().as_str(), "GRAFSIM_DESCRIPTOR_ZERO_NODES");
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn invalid_mean_degree_is_rejected(#[case] value: f64) {
        let err = NetworkDescriptor::new("bad", 10, value).expect_err("invalid degree");
        assert!(matches!(err, DescriptorError::InvalidMeanDegree { .. }));
    }

    #[test]
    fn zero_mean_degree_is_accepted() {
        let descriptor = NetworkDescriptor::new("sparse", 3, 0.0).expect("zero degree is valid");
        assert_eq!(
            descriptor.params(),
            ModelParams {
                nodes: 3,
                mean_degree: 0.0
            }
        );
    }

    #[test]
    fn descriptor_resolves_to_itself() {
        let descriptor = NetworkDescriptor::new("ring", 10, 2.0).expect("valid descriptor");
        assert_eq!(NetworkSource::name(&descriptor), "ring");
        assert_eq!(descriptor.resolve(), Ok(descriptor.clone()));
    }
}
