use std::{fmt, str::FromStr};

use esports_lib::{DbEnv, LibEnv};
use mkenv::{error::ConfigInitError, prelude::*};
use once_cell::sync::OnceCell;

/// The environment the API is deployed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    /// Local development: any origin is allowed and the cookies aren't secure.
    #[default]
    Development,
    /// Production: only the configured origins are allowed.
    Production,
}

impl AppEnv {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid app environment `{0}`, expected `development` or `production`")]
pub struct AppEnvParseError(String);

impl FromStr for AppEnv {
    type Err = AppEnvParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(AppEnvParseError(s.to_owned())),
        }
    }
}

#[cfg(not(debug_assertions))]
mkenv::make_config! {
    pub struct DynamicApiEnv {
        pub sess_key: {
            var_name: "SITE_API_SESSION_KEY_FILE",
            layers: [file_read()],
            description: "The path to the file containing the session key used by the API (at least 64 bytes)",
        },
    }
}

#[cfg(debug_assertions)]
mkenv::make_config! {
    pub struct DynamicApiEnv {
        pub sess_key: {
            var_name: "SITE_API_SESSION_KEY",
            layers: [or_default()],
            description: "The session key used by the API (at least 64 bytes, generated if empty)",
            default_val_fmt: "empty",
        },
    }
}

mkenv::make_config! {
    pub struct ApiEnv {
        pub db_env: { DbEnv },

        pub dynamic: { DynamicApiEnv },

        pub app_env: {
            var_name: "APP_ENV",
            layers: [
                parsed_from_str<AppEnv>(),
                or_default(),
            ],
            description: "The environment of the API (`development` or `production`)",
            default_val_fmt: "development",
        },

        pub port: {
            var_name: "SITE_API_PORT",
            layers: [
                parsed_from_str<u16>(),
                or_default_val(|| 3000),
            ],
            description: "The port used to expose the API",
            default_val_fmt: "3000",
        },

        pub session_ttl: {
            var_name: "SITE_API_SESSION_TTL",
            layers: [
                parsed_from_str<u32>(),
                or_default_val(|| 7 * 24 * 3600),
            ],
            description: "The TTL (time-to-live) of an admin session (in seconds)",
            default_val_fmt: "7 days",
        },

        pub cors_allowed_origins: {
            var_name: "CORS_ALLOWED_ORIGINS",
            layers: [or_default()],
            description: "The comma-separated list of the origins allowed in production",
            default_val_fmt: "empty",
        },

        pub upload_dir: {
            var_name: "UPLOAD_DIR",
            layers: [
                or_default_val(|| "uploads".to_owned()),
            ],
            description: "The directory where the uploaded images are saved",
            default_val_fmt: "uploads",
        },

        pub upload_max_bytes: {
            var_name: "UPLOAD_MAX_BYTES",
            layers: [
                parsed_from_str<usize>(),
                or_default_val(|| 5 * 1024 * 1024),
            ],
            description: "The maximum size of an uploaded image (in bytes)",
            default_val_fmt: "5 MiB",
        },
    }
}

/// Splits the comma-separated list of allowed origins.
pub fn parse_origins(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_owned)
        .collect()
}

static ENV: OnceCell<ApiEnv> = OnceCell::new();

pub fn env() -> &'static ApiEnv {
    ENV.get().unwrap()
}

pub fn init_env() -> anyhow::Result<&'static ApiEnv> {
    fn map_err(err: ConfigInitError<'_>) -> anyhow::Error {
        anyhow::anyhow!("{err}")
    }

    let env = ApiEnv::define();
    let lib_env = LibEnv::define();
    env.try_init().map_err(map_err)?;
    lib_env.try_init().map_err(map_err)?;
    esports_lib::init_env(lib_env);
    let _ = ENV.set(env);

    Ok(self::env())
}
