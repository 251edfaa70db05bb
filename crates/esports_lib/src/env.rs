use once_cell::sync::OnceCell;

#[cfg(debug_assertions)]
mkenv::make_config! {
    /// The environment used to set up a connection to the SQL database.
    pub struct DbUrlEnv {
        /// The database URL.
        pub db_url: {
            var_name: "DATABASE_URL",
            description: "The URL to the MySQL or PostgreSQL database",
        }
    }
}
#[cfg(not(debug_assertions))]
mkenv::make_config! {
    /// The environment used to set up a connection to the SQL database.
    pub struct DbUrlEnv {
        /// The path to the file containing the database URL.
        pub db_url: {
            var_name: "DATABASE_URL",
            layers: [
                file_read(),
            ],
            description: "The path to the file containing the URL to the MySQL or PostgreSQL database",
        }
    }
}

mkenv::make_config! {
    /// The environment used to set up a connection with the Redis database.
    pub struct RedisUrlEnv {
        /// The URL to the Redis database.
        pub redis_url: {
            var_name: "REDIS_URL",
            description: "The URL to the Redis database",
        }
    }
}

mkenv::make_config! {
    /// The environment used to set up a connection to the databases of the website.
    pub struct DbEnv {
        /// The environment for the SQL database.
        pub db_url: { DbUrlEnv },
        /// The environment for the Redis database.
        pub redis_url: { RedisUrlEnv },
    }
}

mkenv::make_config! {
    /// The environment used by this crate.
    pub struct LibEnv {
        /// The amount of rows returned by a list when the client doesn't provide a limit.
        pub list_default_limit: {
            var_name: "LIST_DEFAULT_LIMIT",
            layers: [
                parsed_from_str<u64>(),
                or_default_val(|| 50),
            ],
            description: "The default amount of rows returned by a list endpoint",
            default_val_fmt: "50",
        },

        /// The maximum amount of rows returned by a list.
        pub list_max_limit: {
            var_name: "LIST_MAX_LIMIT",
            layers: [
                parsed_from_str<u64>(),
                or_default_val(|| 200),
            ],
            description: "The maximum amount of rows a list endpoint can return",
            default_val_fmt: "200",
        },
    }
}

static ENV: OnceCell<LibEnv> = OnceCell::new();

/// Initializes the provided library environment as global.
///
/// If this function has already been called, the provided environment will be ignored.
pub fn init_env(env: LibEnv) {
    let _ = ENV.set(env);
}

/// Returns a static reference to the global library environment.
///
/// **Caution**: To use this function, the [`init_env()`] function must have been called at the start
/// of the program.
pub fn env() -> &'static LibEnv {
    ENV.get().unwrap()
}

/// Returns the global library environment if it has been initialized.
pub fn try_env() -> Option<&'static LibEnv> {
    ENV.get()
}
