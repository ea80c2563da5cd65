use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub notifications: NotifyConfig,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            notifications: NotifyConfig::default(),
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { secret: String::new(), token_ttl_days: default_token_ttl_days() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { admin_email: default_admin_email(), smtp: None }
    }
}

/// Outbound mail relay settings. Delivery happens in an external
/// collaborator; absence of this section disables it.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub from: Option<String>,
}

fn default_token_ttl_days() -> i64 { 7 }
fn default_admin_email() -> String { "admin@company.com".into() }
fn default_smtp_port() -> u16 { 587 }
fn default_data_dir() -> String { "data".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), apply environment overrides,
    /// and validate. A missing config file is fine; environment variables
    /// alone can configure the process.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Environment variables win over the TOML file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.secret = secret;
        }
        if let Some(days) = std::env::var("JWT_TTL_DAYS").ok().and_then(|d| d.parse().ok()) {
            self.auth.token_ttl_days = days;
        }
        if let Ok(admin) = std::env::var("ADMIN_EMAIL") {
            self.notifications.admin_email = admin;
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            self.data_dir = dir;
        }
        // SMTP is configured all-or-nothing: user and pass must both be set.
        if let (Ok(user), Ok(pass)) = (std::env::var("SMTP_USER"), std::env::var("SMTP_PASS")) {
            let host =
                std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
            let port = std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_smtp_port);
            let from = std::env::var("SMTP_FROM").ok();
            self.notifications.smtp =
                Some(SmtpConfig { host, port, username: user, password: pass, from });
        }
    }

    /// An absent or empty signing secret is a startup error, never a
    /// per-request one.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(anyhow!("server.host must not be empty"));
        }
        if self.server.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.auth.secret.trim().is_empty() {
            return Err(anyhow!(
                "auth.secret is empty; set it in config.toml or the JWT_SECRET env var"
            ));
        }
        if self.auth.token_ttl_days < 1 {
            return Err(anyhow!("auth.token_ttl_days must be >= 1"));
        }
        if self.notifications.admin_email.trim().is_empty() {
            return Err(anyhow!("notifications.admin_email must not be empty"));
        }
        if let Some(smtp) = &self.notifications.smtp {
            if smtp.host.trim().is_empty() {
                return Err(anyhow!("notifications.smtp.host must not be empty"));
            }
        }
        Ok(())
    }
}
