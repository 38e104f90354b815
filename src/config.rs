//! Configuration for the command buffer pool.
//!
//! The defaults suit typical request/response traffic. Applications that
//! pipeline very large batches can raise the pool capacity before building
//! their first command:
//!
//! ```rust,ignore
//! use valkey_cmds::config::{PoolConfig, init_global_pool};
//!
//! init_global_pool(PoolConfig::default().with_capacity(4096))?;
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::cmds::buffer::{self, BufferPool};

/// Errors raised while configuring the pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid pool configuration: {0}")]
    Invalid(String),

    #[error("The global buffer pool is already initialized")]
    AlreadyInitialized,
}

/// Sizing of a [`BufferPool`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoolConfig {
    /// Maximum number of idle buffers kept for reuse.
    pub capacity: usize,
    /// Token capacity of freshly allocated buffers.
    pub initial_tokens: usize,
    /// Buffers that grew beyond this many tokens are dropped instead of pooled.
    pub max_retained_tokens: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            initial_tokens: 8,
            max_retained_tokens: 256,
        }
    }
}

impl PoolConfig {
    /// Set the number of idle buffers kept.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the token capacity of fresh buffers.
    pub fn with_initial_tokens(mut self, initial_tokens: usize) -> Self {
        self.initial_tokens = initial_tokens;
        self
    }

    /// Set the largest buffer worth keeping.
    pub fn with_max_retained_tokens(mut self, max_retained_tokens: usize) -> Self {
        self.max_retained_tokens = max_retained_tokens;
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.max_retained_tokens < self.initial_tokens {
            return Err(ConfigError::Invalid(format!(
                "maxRetainedTokens ({}) must be >= initialTokens ({})",
                self.max_retained_tokens, self.initial_tokens
            )));
        }
        Ok(())
    }
}

/// Configure the process-wide pool.
///
/// Must run before the first command is built; afterwards the default pool is
/// already in place and this returns [`ConfigError::AlreadyInitialized`].
pub fn init_global_pool(config: PoolConfig) -> Result<&'static BufferPool, ConfigError> {
    let pool = BufferPool::new(&config)?;
    let installed = buffer::install_global_pool(pool)?;
    debug!(
        capacity = config.capacity,
        initial_tokens = config.initial_tokens,
        max_retained_tokens = config.max_retained_tokens,
        "Configured command buffer pool"
    );
    Ok(installed)
}
