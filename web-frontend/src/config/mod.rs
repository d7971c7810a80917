use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub provider: ProviderSettings,
    #[serde(default)]
    pub tester: Option<TesterSettings>,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the product REST API (links, microsites, auth, users).
    pub api_url: String,
    /// Public URL of this site, used when composing short links for display.
    pub public_site_url: String,
}

#[derive(Deserialize, Clone)]
pub struct ProviderSettings {
    /// Hosted sign-in page of the identity provider. The browser is sent
    /// there and comes back with a provider token to exchange.
    pub sign_in_url: String,
}

/// Test-account login. The credentials live in deployment configuration and
/// never reach the browser; leaving this section out disables the feature.
#[derive(Deserialize, Clone)]
pub struct TesterSettings {
    #[serde(default)]
    pub enabled: bool,
    pub identifier: String,
    pub password: Secret<String>,
}

#[derive(Deserialize, Clone, Default)]
pub struct TelemetrySettings {
    /// OTLP collector endpoint; traces are exported only when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    // Check if we're already in web-frontend directory or need to navigate to it
    let configuration_directory = if base_path.ends_with("web-frontend") {
        base_path.join("config")
    } else {
        base_path.join("web-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
server:
  host: 127.0.0.1
  port: 9020
backend:
  api_url: http://localhost:1337/api
  public_site_url: http://localhost:9020
provider:
  sign_in_url: https://id.example.com/signin
"#;

    #[test]
    fn minimal_configuration_parses_without_tester_or_telemetry() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(MINIMAL, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9020);
        assert!(settings.tester.is_none());
        assert!(settings.telemetry.otlp_endpoint.is_none());
    }

    #[test]
    fn tester_section_defaults_to_disabled() {
        let yaml = format!(
            "{}\ntester:\n  identifier: t@example.com\n  password: pw\n",
            MINIMAL
        );
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(&yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let tester = settings.tester.expect("tester section present");
        assert!(!tester.enabled);
    }
}
