pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        #[serde(default = "default_host")]
        pub host: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Requests taking longer than this are answered with 408.
        #[serde(default = "default_request_timeout_secs")]
        pub request_timeout_secs: u64,
        /// Whether the store starts with the three demo tasks.
        #[serde(default = "default_seed_tasks")]
        pub seed_tasks: bool,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default().try_parsing(true))
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        pub fn bind_address(&self) -> String {
            format!("{}:{}", self.host, self.port)
        }
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout_secs(),
                seed_tasks: default_seed_tasks(),
            }
        }
    }

    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_secs() -> u64 {
        30
    }

    fn default_seed_tasks() -> bool {
        true
    }

}

pub mod auth;
pub mod task;
pub mod web;
