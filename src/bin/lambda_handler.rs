//! AWS Lambda handler for the remote simulation endpoint
//!
//! Serves the catalog routes and `POST /simulacoes` through a Lambda Function
//! URL (API Gateway v2 payload). The catalog is loaded once per cold start from
//! `LOAN_SIM_CATALOG` (default `data/products.csv`); registrations and
//! deletions live in that instance's memory only.

use std::sync::Mutex;

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

use loan_simulator::{api, AppConfig, ProductRegistry, SimulationEngine};

fn into_lambda_response(response: api::ApiResponse) -> Result<ApiGatewayV2httpResponse, Error> {
    let mut out = ApiGatewayV2httpResponse {
        status_code: response.status as i64,
        ..Default::default()
    };

    out.headers.insert("content-type", "application/json".parse()?);
    out.headers.insert("access-control-allow-origin", "*".parse()?);
    out.headers.insert("access-control-allow-methods", "GET, POST, DELETE, OPTIONS".parse()?);
    out.headers.insert("access-control-allow-headers", "Content-Type".parse()?);

    if !response.body.is_empty() {
        out.body = Some(Body::Text(response.body));
    }
    Ok(out)
}

/// Run one request with the catalog locked; the guard never crosses an await
fn dispatch(
    registry: &Mutex<ProductRegistry>,
    engine: &SimulationEngine,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> Result<api::ApiResponse, Error> {
    let mut registry = registry
        .lock()
        .map_err(|_| Error::from("product catalog lock poisoned"))?;
    Ok(api::handle(&mut registry, engine, method, path, body))
}

async fn handler(
    registry: &Mutex<ProductRegistry>,
    engine: &SimulationEngine,
    event: LambdaEvent<ApiGatewayV2httpRequest>,
) -> Result<ApiGatewayV2httpResponse, Error> {
    let request = event.payload;

    if request.is_base64_encoded {
        return into_lambda_response(api::ApiResponse {
            status: 415,
            body: r#"{"error":"send the request body as application/json"}"#.to_string(),
        });
    }

    let method = request.request_context.http.method.as_str().to_string();
    let path = request
        .raw_path
        .or(request.request_context.http.path)
        .unwrap_or_else(|| "/".to_string());

    let response = dispatch(registry, engine, &method, &path, request.body.as_deref())?;
    log::info!("{} {} -> {}", method, path, response.status);
    into_lambda_response(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = AppConfig::load(None)?;
    let registry = Mutex::new(ProductRegistry::load(&config.catalog_path)?);
    let engine = SimulationEngine::new(config.rate_convention);

    let registry = &registry;
    let engine = &engine;
    run(service_fn(move |event| async move { handler(registry, engine, event).await })).await
}
