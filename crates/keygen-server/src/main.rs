mod config;
mod rpc;

use config::ServerConfig;
use rpc::{handle_line, RpcResponse};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const FALLBACK_ERROR: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32000,"message":"Internal Server Error"}}"#;

/// Write one response line; responses carry private keys, so they are never logged
async fn write_response(stdout: &mut Stdout, response: &RpcResponse) {
    let resp_str = match serde_json::to_string(response) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to serialize response for ID {:?}: {}", response.id, e);
            FALLBACK_ERROR.to_string()
        }
    };
    if let Err(e) = stdout.write_all(format!("{}\r\n", resp_str).as_bytes()).await {
        error!("Failed to write response for ID {:?}: {}", response.id, e);
    } else if let Err(e) = stdout.flush().await {
        error!("Failed to flush stdout for ID {:?}: {}", response.id, e);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Fatal: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        timeout = ?config.timeout,
        default_rsa_bits = config.keygen.default_rsa_bits,
        pem_policy = ?config.keygen.pem_policy,
        "Starting JOSE keypair server on stdio..."
    );

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut line_buffer = String::new();

    let ready = json!({"jsonrpc": "2.0", "method": "server/ready", "params": {"status": "ready"}});
    if let Err(e) = stdout.write_all(format!("{}\r\n", ready).as_bytes()).await {
        error!("Fatal: Failed to write ready message: {}", e);
        return;
    }
    if let Err(e) = stdout.flush().await {
        error!("Fatal: Failed to flush after ready message: {}", e);
        return;
    }

    loop {
        line_buffer.clear();
        match reader.read_line(&mut line_buffer).await {
            Ok(0) => {
                info!("Stdin closed (EOF). Exiting server.");
                break;
            }
            Ok(_) => {
                if let Some(response) = handle_line(&line_buffer, &config).await {
                    write_response(&mut stdout, &response).await;
                }
            }
            Err(e) => {
                error!("Error reading from stdin: {}. Exiting.", e);
                break;
            }
        }
    }
    info!("JOSE keypair server shutting down.");
}
