//! Pooled token buffers.
//!
//! Every command under construction writes its tokens into an
//! [`ArgumentBuffer`] drawn from a [`BufferPool`]. The pool is a bounded
//! lock-free queue of cleared `Vec<String>`s: acquiring pops one (or
//! allocates a fresh one on a miss) and dropping the buffer pushes it back.
//! Nothing ever waits on the pool.
//!
//! ## Thread safety
//!
//! `BufferPool` is `Sync`. Any number of threads may acquire and release
//! concurrently; both operations are O(1) and lock-free. The process-wide
//! pool lives for the whole process and has no teardown.
//!
//! ## Lifecycle
//!
//! A buffer returns to its pool when it is dropped, whichever way that
//! happens: the builder holding it is abandoned, or the last clone of the
//! frozen artifact owning it goes away.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use crossbeam::queue::ArrayQueue;
use prometheus_client::metrics::counter::Counter;
use tracing::{debug, trace};

use crate::config::{ConfigError, PoolConfig};

static GLOBAL_POOL: OnceLock<BufferPool> = OnceLock::new();

/// The process-wide pool, created with [`PoolConfig::default`] on first use
/// unless [`crate::config::init_global_pool`] ran earlier.
pub fn global_pool() -> &'static BufferPool {
    GLOBAL_POOL.get_or_init(|| {
        debug!("Initializing default command buffer pool");
        BufferPool::with_defaults()
    })
}

/// Install `pool` as the process-wide pool.
pub(crate) fn install_global_pool(pool: BufferPool) -> Result<&'static BufferPool, ConfigError> {
    GLOBAL_POOL
        .set(pool)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(global_pool())
}

/// Counters describing pool behaviour.
///
/// The counters are shared handles: clones observe the same values, and they
/// can be registered in a Prometheus registry as-is.
#[derive(Debug, Clone, Default)]
pub struct PoolCounters {
    /// Acquisitions served from the pool.
    pub reused: Counter,
    /// Acquisitions that had to allocate.
    pub allocated: Counter,
    /// Releases that went back into the pool.
    pub retained: Counter,
    /// Releases dropped because the pool was full or the buffer oversized.
    pub discarded: Counter,
}

/// Point-in-time copy of [`PoolCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub reused: u64,
    pub allocated: u64,
    pub retained: u64,
    pub discarded: u64,
}

/// A bounded, lock-free pool of token vectors.
pub struct BufferPool {
    free: ArrayQueue<Vec<String>>,
    initial_tokens: usize,
    max_retained_tokens: usize,
    counters: PoolCounters,
}

impl BufferPool {
    /// Create a pool from a validated configuration.
    pub fn new(config: &PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn with_defaults() -> Self {
        Self::from_config(&PoolConfig::default())
    }

    fn from_config(config: &PoolConfig) -> Self {
        Self {
            free: ArrayQueue::new(config.capacity),
            initial_tokens: config.initial_tokens,
            max_retained_tokens: config.max_retained_tokens,
            counters: PoolCounters::default(),
        }
    }

    /// Take an empty buffer, reusing a pooled one when available.
    pub fn acquire(&'static self) -> ArgumentBuffer {
        let tokens = match self.free.pop() {
            Some(tokens) => {
                self.counters.reused.inc();
                tokens
            }
            None => {
                self.counters.allocated.inc();
                trace!(
                    initial_tokens = self.initial_tokens,
                    "Command buffer pool miss, allocating"
                );
                Vec::with_capacity(self.initial_tokens)
            }
        };
        ArgumentBuffer {
            tokens,
            pool: Some(self),
        }
    }

    fn release(&self, mut tokens: Vec<String>) {
        if tokens.capacity() > self.max_retained_tokens {
            self.counters.discarded.inc();
            return;
        }
        tokens.clear();
        match self.free.push(tokens) {
            Ok(()) => {
                self.counters.retained.inc();
            }
            Err(_) => {
                self.counters.discarded.inc();
            }
        }
    }

    /// Number of buffers currently parked in the pool.
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    /// Maximum number of parked buffers.
    pub fn capacity(&self) -> usize {
        self.free.capacity()
    }

    /// Shared handles to the pool counters.
    pub fn counters(&self) -> &PoolCounters {
        &self.counters
    }

    /// Snapshot the pool counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            reused: self.counters.reused.get(),
            allocated: self.counters.allocated.get(),
            retained: self.counters.retained.get(),
            discarded: self.counters.discarded.get(),
        }
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle", &self.idle())
            .field("capacity", &self.capacity())
            .field("stats", &self.stats())
            .finish()
    }
}

/// An append-only token sequence for one command under construction.
pub struct ArgumentBuffer {
    tokens: Vec<String>,
    pool: Option<&'static BufferPool>,
}

impl ArgumentBuffer {
    /// Acquire a buffer from the process-wide pool.
    pub fn acquire() -> Self {
        global_pool().acquire()
    }

    /// Create a buffer that is never returned to any pool.
    pub fn unpooled(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
            pool: None,
        }
    }

    /// Append one token.
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Append a run of tokens in order.
    pub fn extend<I, T>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tokens.extend(tokens.into_iter().map(Into::into));
    }

    /// The tokens written so far.
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Seal the buffer. No token can be appended afterwards.
    pub fn freeze(self) -> FrozenArgs {
        FrozenArgs(Arc::new(self))
    }
}

impl Drop for ArgumentBuffer {
    fn drop(&mut self) {
        if let Some(pool) = self.pool {
            pool.release(std::mem::take(&mut self.tokens));
        }
    }
}

impl fmt::Debug for ArgumentBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.tokens).finish()
    }
}

/// An immutable, shared token sequence.
///
/// Cloning is cheap and shares the tokens. The underlying buffer goes back to
/// its pool once the last clone is dropped.
#[derive(Clone)]
pub struct FrozenArgs(Arc<ArgumentBuffer>);

impl FrozenArgs {
    pub fn as_slice(&self) -> &[String] {
        self.0.as_slice()
    }

    /// Check if both handles share one buffer.
    pub fn ptr_eq(&self, other: &FrozenArgs) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for FrozenArgs {
    type Target = [String];

    fn deref(&self) -> &[String] {
        self.as_slice()
    }
}

impl fmt::Debug for FrozenArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl PartialEq for FrozenArgs {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for FrozenArgs {}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn leaked_pool(capacity: usize) -> &'static BufferPool {
        let config = PoolConfig::default().with_capacity(capacity);
        Box::leak(Box::new(BufferPool::new(&config).unwrap()))
    }

    #[test]
    fn test_acquire_miss_then_reuse() {
        let pool = leaked_pool(4);
        let mut buf = pool.acquire();
        buf.push("GET");
        buf.push("foo");
        assert_eq!(buf.len(), 2);
        drop(buf);

        assert_eq!(pool.idle(), 1);
        let buf = pool.acquire();
        assert!(buf.is_empty(), "reused buffers come back cleared");
        assert!(buf.tokens.capacity() >= 2, "capacity is retained");
        assert_eq!(
            pool.stats(),
            PoolStats {
                reused: 1,
                allocated: 1,
                retained: 1,
                discarded: 0
            }
        );
    }

    #[test]
    fn test_release_into_full_pool_discards() {
        let pool = leaked_pool(1);
        let a = pool.acquire();
        let b = pool.acquire();
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.stats().discarded, 1);
    }

    #[test]
    fn test_oversized_buffer_is_not_retained() {
        let config = PoolConfig::default()
            .with_capacity(4)
            .with_max_retained_tokens(8);
        let pool: &'static BufferPool = Box::leak(Box::new(BufferPool::new(&config).unwrap()));
        let mut buf = pool.acquire();
        buf.extend((0..100).map(|i| i.to_string()));
        drop(buf);
        assert_eq!(pool.idle(), 0);
        assert_eq!(pool.stats().discarded, 1);
    }

    #[test]
    fn test_frozen_returns_after_last_clone() {
        let pool = leaked_pool(4);
        let mut buf = pool.acquire();
        buf.extend(["SET", "k", "v"]);
        let frozen = buf.freeze();
        let copy = frozen.clone();
        assert!(frozen.ptr_eq(&copy));
        assert_eq!(&copy[..], &["SET", "k", "v"]);

        drop(frozen);
        assert_eq!(pool.idle(), 0, "still referenced by a clone");
        drop(copy);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_unpooled_buffer_never_returns() {
        let pool = leaked_pool(4);
        let buf = ArgumentBuffer::unpooled(2);
        drop(buf);
        assert_eq!(pool.idle(), 0);
    }
}
