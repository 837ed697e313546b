use std::env;

/// Deployment mode. Development logs ticket emails instead of sending them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub app_env: AppEnv,
    pub seed_data: bool,
    pub smtp: SmtpConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("PORT must be a number"),
            app_env: AppEnv::parse(
                &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            ),
            seed_data: env::var("SEED_DATA")
                .map(|v| !matches!(v.trim(), "false" | "0" | "no"))
                .unwrap_or(true),
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST")
                    .unwrap_or_else(|_| "smtp.ethereal.email".to_string()),
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse()
                    .expect("SMTP_PORT must be a number"),
                username: env::var("EMAIL_USER")
                    .unwrap_or_else(|_| "ethereal.user@ethereal.email".to_string()),
                password: env::var("EMAIL_PASS")
                    .unwrap_or_else(|_| "ethereal.pass".to_string()),
                from_email: env::var("FROM_EMAIL")
                    .unwrap_or_else(|_| "noreply@ethiopianairlines.com".to_string()),
            },
        }
    }

    /// Configuration used by tests: development mode, no seed data.
    pub fn for_tests() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            app_env: AppEnv::Development,
            seed_data: false,
            smtp: SmtpConfig {
                host: "localhost".to_string(),
                port: 2525,
                username: String::new(),
                password: String::new(),
                from_email: "noreply@ethiopianairlines.com".to_string(),
            },
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_defaults_to_development() {
        assert_eq!(AppEnv::parse("production"), AppEnv::Production);
        assert_eq!(AppEnv::parse(" PROD "), AppEnv::Production);
        assert_eq!(AppEnv::parse("development"), AppEnv::Development);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
    }

    #[test]
    fn server_addr_joins_host_and_port() {
        let mut config = Config::for_tests();
        config.server_port = 5000;
        assert_eq!(config.server_addr(), "127.0.0.1:5000");
    }
}
