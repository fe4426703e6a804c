//! Transport-agnostic request handling for the simulation endpoint
//!
//! Routes:
//! - `GET    /produtos`      list the catalog
//! - `POST   /produtos`      register a product (409 on a duplicate name)
//! - `DELETE /produtos/{id}` remove a product
//! - `POST   /simulacoes`    run a simulation (`/simulations` is accepted too)
//! - `OPTIONS *`             CORS preflight

use log::{debug, warn};
use serde::Serialize;

use crate::product::{NewProduct, ProductRegistry, RegistryError};
use crate::simulation::{
    ErrorKind, ErrorPayload, SimulationEngine, SimulationError, SimulationRequest,
};

/// Status code and JSON body of a handled request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self {
                status: 500,
                body: serde_json::json!({ "error": format!("failed to encode response: {}", e) }).to_string(),
            },
        }
    }

    fn error(status: u16, kind: ErrorKind, message: impl Into<String>) -> Self {
        let payload = ErrorPayload::new(kind, message);
        // ErrorPayload holds only strings and enums, so encoding cannot fail
        let body = serde_json::to_string(&payload).unwrap_or_default();
        Self { status, body }
    }

    fn not_found(path: &str) -> Self {
        Self {
            status: 404,
            body: serde_json::json!({ "error": format!("no route for {}", path) }).to_string(),
        }
    }

    fn empty(status: u16) -> Self {
        Self { status, body: String::new() }
    }
}

/// HTTP status for a simulation validation failure
fn status_for(err: &SimulationError) -> u16 {
    match err {
        SimulationError::InvalidInput(_) => 400,
        SimulationError::TermOutOfRange { .. } | SimulationError::InvalidRate(_) => 422,
    }
}

/// HTTP status for a rejected registration
fn registry_status(err: &RegistryError) -> u16 {
    match err {
        RegistryError::DuplicateName(_) | RegistryError::DuplicateId(_) => 409,
        RegistryError::InvalidProduct(_) => 400,
        RegistryError::Csv(_) | RegistryError::Io(_) => 500,
    }
}

/// Dispatch one request against the catalog
pub fn handle(
    registry: &mut ProductRegistry,
    engine: &SimulationEngine,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> ApiResponse {
    let route = path.trim_end_matches('/');
    debug!("{} {}", method, route);

    match (method.to_ascii_uppercase().as_str(), route) {
        ("OPTIONS", _) => ApiResponse::empty(204),
        ("GET", r) if r.ends_with("/produtos") => ApiResponse::json(200, &registry.list()),
        ("POST", r) if r.ends_with("/produtos") => register(registry, body.unwrap_or_default()),
        ("DELETE", r) => match r.rsplit_once("/produtos/") {
            Some((_, id)) if !id.is_empty() && !id.contains('/') => delete(registry, id),
            _ => ApiResponse::not_found(route),
        },
        ("POST", r) if r.ends_with("/simulacoes") || r.ends_with("/simulations") => {
            simulate(registry, engine, body.unwrap_or_default())
        }
        _ => ApiResponse::not_found(route),
    }
}

fn register(registry: &mut ProductRegistry, body: &str) -> ApiResponse {
    let new: NewProduct = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(e) => {
            return ApiResponse::error(400, ErrorKind::InvalidProduct, format!("invalid JSON: {}", e));
        }
    };

    match registry.register(new) {
        Ok(product) => ApiResponse::json(201, &product),
        Err(e) => {
            warn!("Rejected product registration: {}", e);
            match ErrorPayload::from_registry_error(&e) {
                Some(payload) => ApiResponse::json(registry_status(&e), &payload),
                None => ApiResponse {
                    status: registry_status(&e),
                    body: serde_json::json!({ "error": e.to_string() }).to_string(),
                },
            }
        }
    }
}

fn delete(registry: &mut ProductRegistry, id: &str) -> ApiResponse {
    if registry.delete(id) {
        ApiResponse::empty(204)
    } else {
        ApiResponse::error(404, ErrorKind::ProductNotFound, format!("product '{}' not found", id))
    }
}

fn simulate(registry: &ProductRegistry, engine: &SimulationEngine, body: &str) -> ApiResponse {
    let request: SimulationRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            return ApiResponse::error(400, ErrorKind::InvalidInput, format!("invalid JSON: {}", e));
        }
    };

    let product = match registry.get(&request.product_id) {
        Some(p) => p,
        None => {
            return ApiResponse::error(
                404,
                ErrorKind::ProductNotFound,
                format!("product '{}' not found", request.product_id),
            );
        }
    };

    let result = request
        .term_months()
        .and_then(|term| engine.simulate(request.valor, term, product));

    match result {
        Ok(result) => ApiResponse::json(200, &result),
        Err(e) => {
            warn!("Rejected simulation for product {}: {}", product.id, e);
            ApiResponse::json(status_for(&e), &ErrorPayload::from(&e))
        }
    }
}
