use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Whether the first `X-Forwarded-For` hop is taken as the caller
    /// address. Only safe behind a proxy that overwrites the header.
    #[serde(default = "default_trust_forwarded")]
    pub trust_forwarded: bool,

    /// Client-side widget key. Presence makes the captcha mandatory in the
    /// submission controller.
    #[serde(default)]
    pub turnstile_site_key: Option<String>,

    /// Server-side verification secret. Presence toggles enforcement at the
    /// endpoint; absent means no verification call is made.
    #[serde(default)]
    pub turnstile_secret: Option<String>,

    #[serde(default)]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_user: String,

    #[serde(default)]
    pub smtp_password: String,

    #[serde(default = "default_recipient")]
    pub contact_recipient: String,

    /// Deadline applied to the Turnstile verification call and the SMTP
    /// dispatch, in seconds.
    #[serde(default = "default_outbound_timeout")]
    pub outbound_timeout_secs: u64,

    #[serde(default = "default_locale")]
    pub default_locale: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Contact-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_trust_forwarded() -> bool {
    true
}
fn default_smtp_port() -> u16 {
    587
}
fn default_recipient() -> String {
    "hello@itsmichal.dev".to_string()
}
fn default_outbound_timeout() -> u64 {
    10
}
fn default_locale() -> String {
    "en".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name.to_string().to_lowercase())).required(false))
            .add_source(Environment::with_prefix("APP").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Secrets usually arrive through the environment rather than files
        if config.turnstile_secret.is_none() {
            config.turnstile_secret = env::var("APP_TURNSTILE_SECRET").ok();
        }
        if config.turnstile_site_key.is_none() {
            config.turnstile_site_key = env::var("APP_TURNSTILE_SITE_KEY").ok();
        }
        if config.smtp_password.trim().is_empty() {
            config.smtp_password = env::var("APP_SMTP_PASSWORD").unwrap_or_default();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !self.contact_recipient.contains('@') {
            errors.push("CONTACT_RECIPIENT must be an email address");
        }
        if self.outbound_timeout_secs == 0 {
            errors.push("OUTBOUND_TIMEOUT_SECS must be at least 1");
        }
        if self.is_production() {
            if self.smtp_host.trim().is_empty() {
                errors.push("SMTP_HOST must be set in production");
            }
            if self.smtp_user.trim().is_empty() {
                errors.push("SMTP_USER must be set in production");
            }
            if self.smtp_password.trim().is_empty() {
                errors.push("SMTP_PASSWORD must be set in production");
            }
            if self.cors_origins().iter().any(|o| o == "*") {
                errors.push("Wildcard CORS (*) is not allowed in production");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    /// Whether bot verification is enforced at the endpoint.
    pub fn turnstile_enabled(&self) -> bool {
        self.turnstile_secret
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self {
            Some(s) => s.as_str().redact(),
            None => "[UNSET]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trust_forwarded", &self.trust_forwarded)
            .field("turnstile_site_key", &self.turnstile_site_key)
            .field("turnstile_secret", &self.turnstile_secret.redact())
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_password", &self.smtp_password.redact())
            .field("contact_recipient", &self.contact_recipient)
            .field("outbound_timeout_secs", &self.outbound_timeout_secs)
            .field("default_locale", &self.default_locale)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            cors_allowed_origins: vec!["*".into()],
            trust_forwarded: true,
            turnstile_site_key: None,
            turnstile_secret: None,
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            smtp_user: "mailer@example.com".into(),
            smtp_password: "hunter2".into(),
            contact_recipient: "hello@itsmichal.dev".into(),
            outbound_timeout_secs: 10,
            default_locale: "en".into(),
        }
    }

    #[test]
    fn turnstile_enabled_requires_non_empty_secret() {
        let mut config = base_config();
        assert!(!config.turnstile_enabled());

        config.turnstile_secret = Some("  ".into());
        assert!(!config.turnstile_enabled());

        config.turnstile_secret = Some("0x4AAA".into());
        assert!(config.turnstile_enabled());
    }

    #[test]
    fn production_rejects_wildcard_cors_and_missing_smtp() {
        let mut config = base_config();
        config.env = AppEnvironment::Production;
        config.smtp_host = String::new();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("SMTP_HOST"));
        assert!(err.contains("Wildcard CORS"));
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let mut config = base_config();
        config.turnstile_secret = Some("super-secret".into());
        let dump = format!("{:?}", config);
        assert!(!dump.contains("super-secret"));
        assert!(!dump.contains("hunter2"));
    }

    #[test]
    fn cors_origins_splits_comma_separated_entries() {
        let mut config = base_config();
        config.cors_allowed_origins =
            vec!["https://a.dev, https://b.dev".into(), "".into()];
        assert_eq!(config.cors_origins(), vec!["https://a.dev", "https://b.dev"]);
    }
}
