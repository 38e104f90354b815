//! Entry point for every command family.

use std::ptr;

use crate::cmds::buffer::{ArgumentBuffer, BufferPool};
use crate::cmds::flags::CommandFlags;
use crate::cmds::state::Incomplete;

/// Whether keys are hashed into slots while building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlotMode {
    /// Hash every key and track the command's slot.
    #[default]
    Cluster,
    /// Single-node deployments: keys are not hashed and every command is
    /// routable anywhere.
    Standalone,
}

/// Creates commands.
///
/// Each family method (`get`, `set`, `xread`, ...) starts a command and returns
/// its first grammar shape. Shapes only offer the arguments that may legally
/// come next, and only terminal shapes offer `build()`.
///
/// # Examples
///
/// ```
/// use valkey_cmds::{Builder, slots::SlotState};
///
/// let b = Builder::cluster();
/// let cmd = b.set().key("{user1}.profile").value("...").nx().ex_seconds(60).build();
/// assert_eq!(cmd.commands(), &["SET", "{user1}.profile", "...", "NX", "EX", "60"]);
/// assert!(matches!(cmd.slot_state(), SlotState::Single(_)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Builder {
    pub(crate) mode: SlotMode,
    pool: Option<&'static BufferPool>,
}

impl Builder {
    pub fn new(mode: SlotMode) -> Self {
        Self { mode, pool: None }
    }

    /// A builder for cluster clients.
    pub fn cluster() -> Self {
        Self::new(SlotMode::Cluster)
    }

    /// A builder for single-node clients.
    pub fn standalone() -> Self {
        Self::new(SlotMode::Standalone)
    }

    /// Draw command buffers from `pool` instead of the process-wide pool.
    ///
    /// Buffers of commands built or abandoned through this builder go back
    /// to `pool`.
    pub fn with_pool(mut self, pool: &'static BufferPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn mode(&self) -> SlotMode {
        self.mode
    }

    /// The dedicated pool, if one was set with [`Builder::with_pool`].
    pub fn pool(&self) -> Option<&'static BufferPool> {
        self.pool
    }

    /// Acquire a buffer and write the command name.
    pub(crate) fn start(&self, flags: CommandFlags, name: &[&str]) -> Incomplete {
        let buf = match self.pool {
            Some(pool) => pool.acquire(),
            None => ArgumentBuffer::acquire(),
        };
        Incomplete::new(buf, self.mode, flags, name)
    }
}

impl PartialEq for Builder {
    fn eq(&self, other: &Self) -> bool {
        let same_pool = match (self.pool, other.pool) {
            (Some(a), Some(b)) => ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.mode == other.mode && same_pool
    }
}

impl Eq for Builder {}
