use af3cli::core::models::document::{DEFAULT_DIALECT, DEFAULT_NAME, DEFAULT_SEED, DEFAULT_VERSION};

pub struct DefaultsConfig {
    pub name: String,
    pub version: u32,
    pub dialect: String,
    pub seeds: Vec<u32>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            version: DEFAULT_VERSION,
            dialect: DEFAULT_DIALECT.to_string(),
            seeds: vec![DEFAULT_SEED],
        }
    }
}
