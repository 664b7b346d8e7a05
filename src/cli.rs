//! Command-line arguments
//!
//! Every flag is optional; anything left unset falls back to the config
//! file, the environment, and finally the built-in defaults.

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "rust_filestore")]
#[command(about = "Minimal HTTP file storage server (upload, fetch and delete files)")]
pub struct Cli {
    /// TCP port to listen on [default: 8222]
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to listen on [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Maximum accepted multipart form size in bytes [default: 65536]
    #[arg(long)]
    pub max: Option<u64>,

    /// Storage root directory, must already exist [default: /tmp]
    #[arg(long)]
    pub path: Option<String>,

    /// Log served, uploaded and removed paths to stderr
    #[arg(long)]
    pub debug: bool,

    /// Optional configuration file (toml, yaml or json)
    #[arg(short, long)]
    pub config: Option<String>,
}
