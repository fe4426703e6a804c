//! Simulation runner for single and batch requests
//!
//! Holds the product catalog and the provider chosen at composition time,
//! resolves product ids and dispatches each request to the provider.

use log::{debug, info};
use rayon::prelude::*;

use crate::product::ProductRegistry;
use crate::simulation::{
    LocalSimulationEngine, ProviderError, SimulationProvider, SimulationRequest, SimulationResult,
};

/// Catalog plus provider, ready to serve simulation requests
///
/// # Example
/// ```ignore
/// let runner = SimulationRunner::new(ProductRegistry::with_defaults(), config.build_provider()?);
///
/// let requests: Vec<_> = [12, 24, 36]
///     .iter()
///     .map(|&prazo| SimulationRequest::new("3", 20_000.0, prazo))
///     .collect();
/// let results = runner.run_batch(&requests);
/// ```
pub struct SimulationRunner {
    registry: ProductRegistry,
    provider: Box<dyn SimulationProvider>,
}

impl SimulationRunner {
    pub fn new(registry: ProductRegistry, provider: Box<dyn SimulationProvider>) -> Self {
        info!("Simulation runner using the {} provider", provider.name());
        Self { registry, provider }
    }

    /// Runner over the default catalog with the in-process engine
    pub fn local() -> Self {
        Self::new(ProductRegistry::with_defaults(), Box::new(LocalSimulationEngine::default()))
    }

    /// Run a single simulation request
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationResult, ProviderError> {
        let product = self
            .registry
            .get(&request.product_id)
            .ok_or_else(|| ProviderError::ProductNotFound(request.product_id.clone()))?;

        let term = request.term_months()?;
        debug!("Running {:?} against product {}", request, product.name);
        self.provider.simulate(request.valor, term, product)
    }

    /// Run many requests in parallel; results keep the input order
    pub fn run_batch(&self, requests: &[SimulationRequest]) -> Vec<Result<SimulationResult, ProviderError>> {
        requests.par_iter().map(|request| self.run(request)).collect()
    }

    pub fn registry(&self) -> &ProductRegistry {
        &self.registry
    }

    /// Mutable catalog access for registration and deletion
    pub fn registry_mut(&mut self) -> &mut ProductRegistry {
        &mut self.registry
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}
