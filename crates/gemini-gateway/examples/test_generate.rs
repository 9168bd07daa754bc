//! Simple test for GeminiGateway completions.
//!
//! Run with: cargo run -p gemini-gateway --example test_generate
//! Or with a custom prompt: cargo run -p gemini-gateway --example test_generate -- "Your prompt here"
//!
//! Make sure to set environment variables in .env:
//!   GEMINI_API_KEY - Gemini API key for authentication

use gemini_gateway::{GeminiGateway, ModelGateway, ModelRequest, Operation};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let prompt = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Write one sentence describing a story about a dragon in exile.".to_string()
    };

    println!("Initializing GeminiGateway...");
    let gateway = GeminiGateway::from_env()?;

    println!("Gateway initialized: {}", gateway.name());
    println!("API URL: {}", gateway.config().api_url);
    println!("Model: {}", gateway.config().model);
    println!("Timeout: {:?}", gateway.config().timeout);
    println!();

    let request = ModelRequest::text(Operation::Synopsis, prompt);
    println!("Sending: \"{}\"", request.prompt);
    println!("Waiting for response...\n");

    let text = gateway.generate(&request).await?;

    println!("=== Response ===");
    println!("{}", text);
    println!("================");

    Ok(())
}
