//! Client configuration loaded from TOML, overridable by CLI flags.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub connection: ConnectionConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub secure_port: Option<u16>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub full_screen: bool,
    /// Canvas back-ends tried in order; the first that initializes
    /// wins (§4.M failure semantics).
    pub canvas_type_order: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            display: DisplayConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { host: None, port: None, secure_port: None, password: None }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            full_screen: false,
            canvas_type_order: vec!["cairo".into(), "gdi".into(), "gl_fbo".into(), "gl_pbuff".into()],
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

impl ClientConfig {
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_full_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.display.canvas_type_order.len(), 4);
    }

    #[test]
    fn partial_toml_only_overrides_what_it_names() {
        let config: ClientConfig = toml::from_str(
            r#"
            [connection]
            host = "spice.example"
            "#,
        )
        .unwrap();
        assert_eq!(config.connection.host.as_deref(), Some("spice.example"));
        assert_eq!(config.display.full_screen, false);
    }
}
