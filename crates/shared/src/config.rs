//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Outbound mail configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Dashboard client configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seed the in-memory store with demo records on startup.
    #[serde(default)]
    pub seed_demo_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seed_demo_data: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// JWT configuration as read from files or the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Expected `iss` claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_issuer() -> String {
    crate::jwt::DEFAULT_ISSUER.to_string()
}

fn default_access_token_expiry() -> u64 {
    86400 // 1 day
}

/// SMTP and sender identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP server host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP server port. Port 465 uses implicit TLS.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username; empty disables authentication.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "noreply@bazaar.local".to_string()
}

fn default_from_name() -> String {
    "Bazaar".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

impl EmailConfig {
    /// Reads the plain `SMTP_*` / `FROM_*` variables, keeping defaults for unset ones.
    ///
    /// An unparseable `SMTP_PORT` keeps the default port.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies the plain `SMTP_*` / `FROM_*` variables on top of `self`.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        if let Some(host) = var("SMTP_HOST") {
            self.smtp_host = host;
        }
        if let Some(port) = var("SMTP_PORT").and_then(|p| p.parse().ok()) {
            self.smtp_port = port;
        }
        if let Some(user) = var("SMTP_EMAIL") {
            self.smtp_username = user;
        }
        if let Some(password) = var("SMTP_PASSWORD") {
            self.smtp_password = password;
        }
        if let Some(name) = var("FROM_NAME") {
            self.from_name = name;
        }
        if let Some(email) = var("FROM_EMAIL") {
            self.from_email = email;
        }
        self
    }

    /// Returns the `Name <address>` sender identity.
    #[must_use]
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Whether the transport should use implicit TLS.
    #[must_use]
    pub const fn implicit_tls(&self) -> bool {
        self.smtp_port == 465
    }
}

/// Dashboard client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the API, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds between automatic refreshes.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Plain `SMTP_*` / `FROM_*` variables override the mail section.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BAZAAR").separator("__"))
            .build()?;

        let mut app: Self = config.try_deserialize()?;
        app.email = app.email.with_env_overrides();
        Ok(app)
    }
}
