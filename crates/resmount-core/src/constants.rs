//! Routing and configuration defaults.

/// Delegation hops allowed per operation before routing fails with a cycle error.
pub const DEFAULT_MAX_DELEGATION_DEPTH: usize = 16;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "mounts.ron";

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "RESMOUNT_CONFIG";

/// Name prefix for ephemeral store directories when none is configured.
pub const DEFAULT_TEMP_PREFIX: &str = "resmount-";
