//! Settings of the `finboard` binary.
//!
//! Values come from an optional `settings.toml` next to the binary, then
//! from `FINBOARD__<SECTION>__<KEY>` environment variables:
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [server]
//! database = { sqlite = "finboard.db" }
//! bind = "127.0.0.1"
//! port = 3000
//! session_ttl_hours = 168
//! ```
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: String,
    pub port: u16,
    pub session_ttl_hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::build(
            defaults()?
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::with_prefix("FINBOARD").separator("__")),
        )
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("app.level", "info")?
        .set_default("server.database", "memory")?
        .set_default("server.bind", "127.0.0.1")?
        .set_default("server.port", 3000)?
        .set_default("server.session_ttl_hours", engine::DEFAULT_SESSION_TTL_HOURS)
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = Settings::build(defaults().unwrap()).unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.database, Database::Memory);
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.session_ttl_hours, 168);
    }

    #[test]
    fn file_values_override_defaults() {
        let toml = r#"
            [app]
            level = "debug"

            [server]
            database = { sqlite = "data/finboard.db" }
            port = 8080
        "#;
        let settings = Settings::build(
            defaults()
                .unwrap()
                .add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap();

        assert_eq!(settings.app.level, "debug");
        assert_eq!(
            settings.server.database,
            Database::Sqlite("data/finboard.db".to_string())
        );
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
    }
}
