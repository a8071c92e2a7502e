//! AWS Lambda handler serving every calculator endpoint
//!
//! The request path picks the calculator (`POST /calculate-sip`, ...) and the
//! JSON body is its input. Supports Lambda Function URLs for direct HTTP access.

use fincalc::{CalculatorService, RuntimeConfig};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::info;
use serde_json::{json, Value};

fn json_response(status: u16, body: &Value) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

/// Lambda handler function
async fn handler(service: &CalculatorService, event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    // Parse request body
    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let body: Value = match serde_json::from_str(&body_str) {
        Ok(v) => v,
        Err(e) => {
            let error = json!({"status": "error", "error": format!("Invalid JSON: {}", e)});
            return json_response(400, &error);
        }
    };

    let path = event.uri().path().to_string();
    let (status, response) = service.respond(&path, body);
    info!("{} -> {} in {:?}", path, status, start.elapsed());

    json_response(status, &response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let service = RuntimeConfig::from_env().service()?;
    let service = &service;
    run(service_fn(move |event: Request| async move { handler(service, event).await })).await
}
