use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Timetable generation service.
#[derive(Debug, Clone, Parser)]
#[command(name = "timetable_engine", version, about)]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "TIMETABLE_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// JSON snapshot served by `GET /v1/timetable`.
    #[arg(long, env = "TIMETABLE_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, env = "TIMETABLE_LOG", default_value = "info")]
    pub log_level: String,
}
