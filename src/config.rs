use clap::Parser;
use once_cell::sync::Lazy;

pub const JWT_EXPIRED_TIME: i64 = 86400i64;

pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Matches kept per transfer course on each analysis run
pub const MATCH_TOP_N: usize = 5;

pub static APP_CONFIG: Lazy<Config> = Lazy::new(Config::parse);

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env)]
    pub jwt_secret: String,

    #[clap(long, env)]
    pub admin_email: String,

    #[clap(long, env)]
    pub admin_password: String,

    #[clap(long, env, default_value = "./uploads")]
    pub upload_dir: String,

    /// Empty key switches matching to the deterministic lexical fallback
    #[clap(long, env, default_value = "")]
    pub gemini_api_key: String,

    #[clap(
        long,
        env,
        default_value = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
    )]
    pub gemini_api_url: String,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,
}
