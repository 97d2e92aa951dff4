//! Runtime configuration from environment variables (and `.env`)

use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;

use crate::auth::decode_secret_key;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Transport security for the SMTP relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    StartTls,
    Tls,
    None,
}

impl FromStr for SmtpTls {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starttls" => Ok(SmtpTls::StartTls),
            "tls" | "ssl" => Ok(SmtpTls::Tls),
            "none" | "plain" => Ok(SmtpTls::None),
            other => Err(format!("unknown SMTP TLS mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub tls: SmtpTls,
}

/// Public links rendered into email templates
#[derive(Debug, Clone, Default)]
pub struct PublicLinks {
    pub website: String,
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
    pub unsubscribe: String,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,

    pub jwt_secret: Vec<u8>,
    pub jwt_expiration: Duration,
    pub refresh_expiration: Duration,
    pub reset_url_base: String,
    pub reset_ttl_minutes: i64,
    pub otp_ttl_minutes: i64,
    pub otp_max_attempts: i32,
    pub otp_lockout_minutes: i64,

    pub smtp: Option<SmtpConfig>,
    pub mail_from_address: String,
    pub mail_from_name: String,
    pub mail_images_dir: PathBuf,
    pub templates_dir: PathBuf,

    pub site_url: String,
    pub public_links: PublicLinks,

    pub scheduler_enabled: bool,
    pub scheduler_tick: Duration,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = var_or(name, default);
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", name, raw, e))
}

fn parse_bool(name: &str, default: bool) -> anyhow::Result<bool> {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => anyhow::bail!("Invalid {}={:?}: expected a boolean", name, raw),
        },
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr = parse_var("APP_LISTEN_ADDR", "0.0.0.0:8080")?;
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let cors_allow = var_or("APP_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_var("APP_REQUEST_TIMEOUT_MS", "30000")?;
        let log_format = match var_or("LOG_FORMAT", "text").to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let jwt_secret = decode_secret_key(
            &std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
        )
        .context("Invalid JWT_SECRET")?;
        let jwt_expiration_ms: u64 = parse_var("JWT_EXPIRATION_MS", "3600000")?;
        let refresh_expiration_ms: u64 = parse_var("JWT_REFRESH_EXPIRATION_MS", "2592000000")?;

        let smtp = match std::env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => Some(SmtpConfig {
                host: host.trim().to_string(),
                port: parse_var("SMTP_PORT", "587")?,
                username: std::env::var("SMTP_USERNAME").ok().filter(|s| !s.is_empty()),
                password: std::env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty()),
                tls: parse_var("SMTP_TLS", "starttls")?,
            }),
            _ => None,
        };

        let public_website = var_or("PUBLIC_WEBSITE_URL", "https://actiunepentrusanatate.ro");

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", "10")?,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            log_format,

            jwt_secret,
            jwt_expiration: Duration::from_millis(jwt_expiration_ms),
            refresh_expiration: Duration::from_millis(refresh_expiration_ms),
            reset_url_base: var_or(
                "APP_RESET_FRONTEND_URL",
                "http://localhost:8080/api/v1/auth/reset?token=",
            ),
            reset_ttl_minutes: parse_var("APP_RESET_TTL_MINUTES", "60")?,
            otp_ttl_minutes: parse_var("APP_OTP_TTL_MINUTES", "15")?,
            otp_max_attempts: parse_var("APP_OTP_MAX_ATTEMPTS", "5")?,
            otp_lockout_minutes: parse_var("APP_OTP_LOCKOUT_MINUTES", "15")?,

            smtp,
            mail_from_address: var_or("MAIL_FROM_ADDRESS", "no-reply@actiunepentrusanatate.ro"),
            mail_from_name: var_or("MAIL_FROM_NAME", "Asociația Acțiune pentru Sănătate"),
            mail_images_dir: PathBuf::from(var_or("MAIL_IMAGES_DIR", "assets/images")),
            templates_dir: PathBuf::from(var_or("MAIL_TEMPLATES_DIR", "templates")),

            site_url: var_or("WORDPRESS_SITE_URL", &public_website),
            public_links: PublicLinks {
                facebook: var_or("PUBLIC_FACEBOOK_URL", "https://www.facebook.com/actiunepentrusanatate"),
                instagram: var_or("PUBLIC_INSTAGRAM_URL", "https://www.instagram.com/actiunepentrusanatate"),
                linkedin: var_or("PUBLIC_LINKEDIN_URL", "https://www.linkedin.com/company/actiunepentrusanatate"),
                unsubscribe: var_or("PUBLIC_UNSUBSCRIBE_URL", &format!("{}/dezabonare", public_website)),
                website: public_website,
            },

            scheduler_enabled: parse_bool("MAIL_SCHEDULER_ENABLED", true)?,
            scheduler_tick: Duration::from_secs(parse_var("MAIL_SCHEDULER_TICK_SECS", "60")?),
        })
    }
}
