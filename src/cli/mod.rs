//! CLI argument parsing using clap 4.x derive macros

use clap::Parser;
use std::path::PathBuf;

/// HAL - Humans Are Listening
///
/// Serves an OpenAI-compatible chat-completion endpoint where each request
/// is answered by a human operator in a terminal session, or by a fixed
/// string in daemon mode.
#[derive(Parser, Debug)]
#[command(name = "hal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Verbose log output (DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Return this fixed reply for every request (daemon mode)
    #[arg(long, value_name = "TEXT")]
    pub fix_reply_daemon: Option<String>,

    /// Append leveled log lines to this file
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Append raw request/response JSON records to this file (ndjson)
    #[arg(long, value_name = "PATH")]
    pub json_dump_log: Option<PathBuf>,
}
