//! Command-line surface, matching the reference CLI shape exactly:
//! `--host`, `--port`, `--secure-port`, `--password`,
//! `--secure-channels`, `--unsecure-channels`, `--enable-channels`,
//! `--disable-channels`, `--full-screen[=auto-conf]`, `--canvas-type`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "snake_case")]
pub enum CanvasType {
    Cairo,
    Gdi,
    GlFbo,
    GlPbuff,
}

/// SPICE remote-desktop client.
#[derive(Parser, Debug)]
#[command(name = "spice-client", version, about)]
pub struct Cli {
    /// Server hostname or address.
    #[arg(long)]
    pub host: Option<String>,

    /// Unencrypted connection port.
    #[arg(long)]
    pub port: Option<u16>,

    /// TLS connection port.
    #[arg(long = "secure-port")]
    pub secure_port: Option<u16>,

    /// Session password.
    #[arg(long)]
    pub password: Option<String>,

    /// Channels that must use TLS, e.g. `main,display` or `all`.
    #[arg(long = "secure-channels", value_delimiter = ',')]
    pub secure_channels: Vec<String>,

    /// Channels that must not use TLS, e.g. `main,display` or `all`.
    #[arg(long = "unsecure-channels", value_delimiter = ',')]
    pub unsecure_channels: Vec<String>,

    /// Channel types the client connects; defaults to every
    /// advertised channel.
    #[arg(long = "enable-channels", value_delimiter = ',')]
    pub enable_channels: Vec<String>,

    /// Channel types the client never connects even if advertised.
    #[arg(long = "disable-channels", value_delimiter = ',')]
    pub disable_channels: Vec<String>,

    /// Start full-screen. With no value, uses the display's native
    /// resolution; `auto-conf` asks the guest to match the client's
    /// monitor configuration.
    #[arg(long = "full-screen", num_args = 0..=1, default_missing_value = "on")]
    pub full_screen: Option<String>,

    /// Preferred canvas back-end, tried in the order given on the
    /// command line then falling back through the rest.
    #[arg(long = "canvas-type", value_enum)]
    pub canvas_type: Option<CanvasType>,

    /// Path to a TOML configuration file, merged under these flags.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_secure_channels() {
        let cli = Cli::parse_from([
            "spice-client",
            "--host",
            "spice.example",
            "--secure-channels",
            "main,display",
        ]);
        assert_eq!(cli.host.as_deref(), Some("spice.example"));
        assert_eq!(cli.secure_channels, vec!["main", "display"]);
    }

    #[test]
    fn full_screen_without_a_value_defaults_on() {
        let cli = Cli::parse_from(["spice-client", "--full-screen"]);
        assert_eq!(cli.full_screen.as_deref(), Some("on"));
    }
}
