//! Simulation providers: in-process engine or remote endpoint
//!
//! The provider is chosen once when the application is composed (see
//! [`AppConfig::build_provider`](crate::config::AppConfig::build_provider));
//! callers only ever see `dyn SimulationProvider`.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{StatusCode, Url};

use crate::product::{NewProduct, Product, RegistryError};
use super::engine::{validate, SimulationEngine};
use super::error::ProviderError;
use super::request::{ErrorPayload, SimulationRequest};
use super::result::SimulationResult;

/// Something that can turn (principal, term, product) into a simulation result
pub trait SimulationProvider: Send + Sync {
    fn simulate(
        &self,
        principal: f64,
        term_months: i64,
        product: &Product,
    ) -> Result<SimulationResult, ProviderError>;

    /// Short label for logs and CLI output
    fn name(&self) -> &'static str;
}

/// Computes simulations in-process
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSimulationEngine {
    engine: SimulationEngine,
}

impl LocalSimulationEngine {
    pub fn new(engine: SimulationEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }
}

impl SimulationProvider for LocalSimulationEngine {
    fn simulate(
        &self,
        principal: f64,
        term_months: i64,
        product: &Product,
    ) -> Result<SimulationResult, ProviderError> {
        Ok(self.engine.simulate(principal, term_months, product)?)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Settings for [`RemoteSimulationProvider`]
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// API root, e.g. `https://api.example.com/api`
    pub base_url: String,
    pub timeout: Duration,
}

/// Delegates simulations to a server that runs the same engine.
///
/// Also speaks the server's catalog routes under `/produtos`.
#[derive(Debug, Clone)]
pub struct RemoteSimulationProvider {
    http: Client,
    base: Url,
    endpoint: Url,
}

impl RemoteSimulationProvider {
    pub fn new(config: RemoteConfig) -> Result<Self, ProviderError> {
        let base = api_base(&config.base_url)?;
        let endpoint = api_route(&base, &config.base_url, "simulacoes")?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, base, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn products_url(&self, id: Option<&str>) -> Result<Url, ProviderError> {
        let route = match id {
            Some(id) => format!("produtos/{}", id),
            None => "produtos".to_string(),
        };
        api_route(&self.base, self.base.as_str(), &route)
    }

    /// Whether the server answers `GET /produtos` successfully
    pub fn check_connection(&self) -> bool {
        let url = match self.products_url(None) {
            Ok(url) => url,
            Err(_) => return false,
        };
        match self.http.get(url).send() {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Simulation service at {} is not reachable: {}", self.base, e);
                false
            }
        }
    }

    /// `GET /produtos`
    pub fn list_products(&self) -> Result<Vec<Product>, ProviderError> {
        let response = self.http.get(self.products_url(None)?).send()?;
        if !response.status().is_success() {
            return Err(remote_error(response));
        }
        Ok(response.json::<Vec<Product>>()?)
    }

    /// `POST /produtos`; a 409 answer means the name is already taken
    pub fn register_product(&self, product: &NewProduct) -> Result<Product, ProviderError> {
        product.validate()?;

        let response = self.http.post(self.products_url(None)?).json(product).send()?;
        match response.status() {
            s if s.is_success() => Ok(response.json::<Product>()?),
            StatusCode::CONFLICT => Err(RegistryError::DuplicateName(product.name.trim().to_string()).into()),
            _ => Err(remote_error(response)),
        }
    }

    /// `DELETE /produtos/{id}`; returns whether the server had the product
    pub fn delete_product(&self, id: &str) -> Result<bool, ProviderError> {
        let response = self.http.delete(self.products_url(Some(id))?).send()?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(remote_error(response)),
        }
    }
}

fn remote_error(response: reqwest::blocking::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorPayload>(&body)
        .map(|payload| payload.message)
        .unwrap_or(body);
    ProviderError::Remote { status, message }
}

impl SimulationProvider for RemoteSimulationProvider {
    fn simulate(
        &self,
        principal: f64,
        term_months: i64,
        product: &Product,
    ) -> Result<SimulationResult, ProviderError> {
        // Same rules the server applies; saves a round trip for obvious mistakes
        validate(principal, term_months, product)?;

        let request = SimulationRequest::new(product.id.clone(), principal, term_months);
        debug!("POST {} for product {}", self.endpoint, product.id);

        let response = self.http.post(self.endpoint.clone()).json(&request).send()?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<SimulationResult>()?);
        }

        let body = response.text().unwrap_or_default();
        warn!("Simulation service answered {} for product {}", status, product.id);

        match serde_json::from_str::<ErrorPayload>(&body) {
            Ok(payload) => Err(payload.into_provider_error(status.as_u16(), product, term_months)),
            Err(_) => Err(ProviderError::Remote {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// API root with a trailing slash, so routes join under it
fn api_base(base_url: &str) -> Result<Url, ProviderError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }

    let url = Url::parse(&base).map_err(|_| ProviderError::InvalidEndpoint(base_url.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ProviderError::InvalidEndpoint(base_url.to_string())),
    }
}

fn api_route(base: &Url, base_url: &str, route: &str) -> Result<Url, ProviderError> {
    base.join(route)
        .map_err(|_| ProviderError::InvalidEndpoint(base_url.to_string()))
}

/// `{base_url}/simulacoes`, tolerating a trailing slash on the base
fn simulation_endpoint(base_url: &str) -> Result<Url, ProviderError> {
    api_route(&api_base(base_url)?, base_url, "simulacoes")
}
