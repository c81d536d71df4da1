//! Test client for exercising a running HAL server
//!
//! Thin wrapper over reqwest: `send` posts a two-message chat-completion
//! request with a fake bearer token and pretty-prints the JSON response;
//! `daemon --kill` asks a daemon-mode server to shut down.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

/// HAL test client - API call testing
#[derive(Parser, Debug)]
#[command(name = "hal-client")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (request payload and status code)
    #[arg(short, long)]
    verbose: bool,

    /// HAL server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// HAL server port
    #[arg(long, default_value_t = 8000)]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a chat-completion request
    Send {
        /// Model name to claim
        #[arg(long, default_value = "gpt-4")]
        model: String,

        /// System prompt
        #[arg(long, default_value = "You are a helpful assistant.")]
        system: String,

        /// User message (required)
        #[arg(long)]
        user: String,

        /// Maximum tokens
        #[arg(long, default_value_t = 1000)]
        max_tokens: u32,

        /// Temperature parameter
        #[arg(long, default_value_t = 0.7)]
        temperature: f32,
    },

    /// Manage a daemon-mode server
    Daemon {
        /// Ask the running daemon to shut down
        #[arg(long)]
        kill: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let base = format!("http://{}:{}", cli.host, cli.port);
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Send {
            model,
            system,
            user,
            max_tokens,
            temperature,
        } => {
            let payload = json!({
                "model": model,
                "messages": [
                    {"role": "system", "content": system},
                    {"role": "user", "content": user}
                ],
                "max_tokens": max_tokens,
                "temperature": temperature
            });

            let url = format!("{base}/v1/chat/completions");
            if cli.verbose {
                eprintln!("POST {url}");
                eprintln!("{}", serde_json::to_string_pretty(&payload)?);
            }

            let response = client
                .post(&url)
                .header("Authorization", "Bearer fake-token")
                .json(&payload)
                .send()
                .await
                .with_context(|| format!("request to {url} failed"))?;

            if cli.verbose {
                eprintln!("status: {}", response.status());
            }

            let body: serde_json::Value = response
                .json()
                .await
                .context("response was not valid JSON")?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Daemon { kill } => {
            if kill {
                let url = format!("{base}/api/you");
                let response = client
                    .delete(&url)
                    .send()
                    .await
                    .with_context(|| format!("request to {url} failed"))?;

                println!("shutdown request: {}", response.status());
                let body: serde_json::Value = response
                    .json()
                    .await
                    .context("response was not valid JSON")?;
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("to stop a running daemon:");
                println!("  hal-client daemon --kill");
                println!();
                println!("to start one:");
                println!("  hal --fix-reply-daemon \"fixed reply text\"");
            }
        }
    }

    Ok(())
}
