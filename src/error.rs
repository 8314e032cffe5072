#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("key-value backend failed: {0}")]
    Backend(#[from] sled::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
