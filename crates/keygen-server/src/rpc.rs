//! JSON-RPC request handling

use crate::config::ServerConfig;
use jose_keypair::{
    Algorithm, KeyGenerator, KeyRequest, KeypairError, KeypairOutput, PemPolicy,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const GENERATION_ERROR: i32 = -32000;

#[derive(Deserialize, Debug)]
pub struct RpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Serialize, Debug)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Serialize, Debug)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Parameters of `keypair/generate`
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct GenerateParams {
    #[serde(rename = "use", default)]
    pub key_use: Option<String>,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default)]
    pub size: Option<usize>,
    #[serde(default)]
    pub pem_policy: Option<PemPolicy>,
}

#[derive(Serialize)]
struct GenerateResult {
    #[serde(flatten)]
    output: KeypairOutput,
    generated_at: String,
}

pub fn create_error_response(id: Value, code: i32, message: String) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(RpcError {
            code,
            message,
            data: None,
        }),
    }
}

pub fn create_success_response(id: Value, result: Value) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: Some(result),
        error: None,
    }
}

/// Map a library error onto a JSON-RPC error, keeping the hint as `data`
fn keypair_error_response(id: Value, err: &KeypairError) -> RpcResponse {
    let code = if err.is_validation_error() {
        INVALID_PARAMS
    } else {
        GENERATION_ERROR
    };
    let mut response = create_error_response(id, code, err.to_string());
    if let Some(error) = response.error.as_mut() {
        error.data = Some(json!({
            "retryable": err.is_retryable(),
            "suggestion": err.suggestion(),
        }));
    }
    response
}

fn generate_input_schema() -> Value {
    let algorithms: Vec<&str> = Algorithm::ALL.iter().map(|alg| alg.as_str()).collect();
    json!({
        "type": "object",
        "properties": {
            "use": {
                "type": "string",
                "enum": ["sig", "enc"],
                "default": "sig",
                "description": "Intended key use"
            },
            "alg": {
                "type": "string",
                "enum": algorithms,
                "default": "RS256",
                "description": "JOSE algorithm identifier"
            },
            "size": {
                "type": "integer",
                "description": "RSA modulus length, or 256/384/521 to pick the ECDH-ES curve"
            },
            "pem_policy": {
                "type": "string",
                "enum": ["rsa-family", "rs256-only"],
                "description": "Which RSA algorithms also get PKCS#1 PEM output"
            }
        }
    })
}

fn algorithms_list() -> Value {
    let algorithms: Vec<Value> = Algorithm::ALL
        .iter()
        .map(|alg| {
            json!({
                "alg": alg.as_str(),
                "use": alg.required_use(),
                "kty": alg.family().kty(),
                "crv": alg.mandated_curve().map(|curve| curve.jwk_name()),
            })
        })
        .collect();
    json!({ "algorithms": algorithms })
}

pub async fn process_request(req: RpcRequest, config: &ServerConfig) -> RpcResponse {
    info!("Received request: method={}, id={:?}", req.method, req.id);
    match req.method.as_str() {
        "help" => create_success_response(
            req.id,
            json!({
                "methods": {
                    "help": "Show this help",
                    "initialize": "Server capabilities",
                    "tools/list": "List tools and their input schemas",
                    "algorithms/list": "Supported algorithms with their use and key type",
                    "keypair/generate": "Generate a JOSE keypair (params: use, alg, size, pem_policy)"
                }
            }),
        ),
        "initialize" => create_success_response(
            req.id,
            json!({
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": {
                    "tools": {
                        "keypair/generate": {
                            "description": "Generate a JOSE keypair as public and private JWKs",
                            "schema": generate_input_schema()
                        }
                    }
                }
            }),
        ),
        "listTools" | "tools/list" => create_success_response(
            req.id,
            json!({
                "tools": [{
                    "name": "keypair/generate",
                    "description": "Generate a JOSE keypair as public and private JWKs",
                    "inputSchema": generate_input_schema(),
                }]
            }),
        ),
        "algorithms/list" => create_success_response(req.id, algorithms_list()),
        "keypair/generate" => keypair_generate(req.id, req.params, config).await,
        _ => {
            warn!("Unknown method: {}", req.method);
            create_error_response(
                req.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", req.method),
            )
        }
    }
}

/// Handle one input line; `None` means nothing is written back
///
/// Blank lines and notifications (an object without `id`, or with a null
/// `id`) get no response. Anything else gets exactly one.
pub async fn handle_line(line: &str, config: &ServerConfig) -> Option<RpcResponse> {
    let trimmed_line = line.trim();
    if trimmed_line.is_empty() {
        return None;
    }
    debug!("<<< Received line ({} bytes)", trimmed_line.len());

    let parsed_json: Value = match serde_json::from_str(trimmed_line) {
        Ok(v) => v,
        Err(e) => {
            warn!("JSON parse error: {}", e);
            return Some(create_error_response(
                Value::Null,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            ));
        }
    };

    if !parsed_json.is_object() {
        warn!("Received non-object JSON-RPC message");
        return Some(create_error_response(
            Value::Null,
            INVALID_REQUEST,
            "Invalid request: expected a JSON object".to_string(),
        ));
    }

    // Notifications get no response
    if parsed_json.get("id").map_or(true, Value::is_null) {
        match parsed_json.get("method").and_then(Value::as_str) {
            Some(method) => info!("Received notification: {}", method),
            None => warn!("Received notification without method field"),
        }
        return None;
    }

    let id = parsed_json.get("id").cloned().unwrap_or(Value::Null);
    let req: RpcRequest = match serde_json::from_value(parsed_json) {
        Ok(r) => r,
        Err(e) => {
            warn!("Invalid JSON-RPC request: {}", e);
            return Some(create_error_response(
                id,
                INVALID_REQUEST,
                format!("Invalid request: {}", e),
            ));
        }
    };

    Some(process_request(req, config).await)
}

async fn keypair_generate(id: Value, params: Value, config: &ServerConfig) -> RpcResponse {
    let params: GenerateParams = if params.is_null() {
        GenerateParams::default()
    } else {
        match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return create_error_response(id, INVALID_PARAMS, format!("Invalid params: {}", e))
            }
        }
    };

    let request = match KeyRequest::parse(
        params.key_use.as_deref().unwrap_or("sig"),
        params.alg.as_deref().unwrap_or("RS256"),
        params.size,
    ) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected keypair request: {}", e);
            return keypair_error_response(id, &e);
        }
    };

    let mut keygen = config.keygen;
    if let Some(policy) = params.pem_policy {
        keygen = keygen.with_pem_policy(policy);
    }
    let generator = KeyGenerator::new(keygen);

    debug!(alg = %request.alg, size = ?request.size, "spawning keypair generation");
    let task = tokio::task::spawn_blocking(move || generator.generate_output(&request));

    // A timed-out task keeps running on the blocking pool; its result is dropped
    let output = match tokio::time::timeout(config.timeout, task).await {
        Ok(Ok(Ok(output))) => output,
        Ok(Ok(Err(e))) => {
            warn!(alg = %request.alg, "Keypair generation failed: {}", e);
            return keypair_error_response(id, &e);
        }
        Ok(Err(join_error)) => {
            error!("Keypair generation task failed: {}", join_error);
            return create_error_response(
                id,
                GENERATION_ERROR,
                format!("Keypair generation task failed: {}", join_error),
            );
        }
        Err(_) => {
            error!(
                alg = %request.alg,
                "Keypair generation timed out after {:?}", config.timeout
            );
            return create_error_response(
                id,
                GENERATION_ERROR,
                format!("Keypair generation timed out after {:?}", config.timeout),
            );
        }
    };

    info!(alg = %request.alg, kid = %output.id, "Generated keypair");
    let result = GenerateResult {
        output,
        generated_at: chrono::Utc::now().to_rfc3339(),
    };
    match serde_json::to_value(&result) {
        Ok(value) => create_success_response(id, value),
        Err(e) => create_error_response(
            id,
            GENERATION_ERROR,
            format!("Failed to serialize keypair: {}", e),
        ),
    }
}
