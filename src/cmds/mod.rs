//! Type-state command construction.
//!
//! Every command family is a small graph of shape types. A shape is a thin
//! wrapper around the shared [`Incomplete`] carrier and exposes only the
//! arguments allowed at its position in the command's grammar; each method
//! consumes the shape, appends tokens, folds key slots and flags, and returns
//! the next shape. Terminal shapes expose `build()`, and shapes of
//! deterministic read-only commands also expose `cache()`.
//!
//! ## Architecture
//!
//! - `buffer`: pooled token buffers and the process-wide pool
//! - `flags`: execution classification (`READ_ONLY`, `BLOCKING`, ...)
//! - `state`: the `Incomplete` carrier
//! - `completed`: `Completed` and `Cacheable` artifacts
//! - `builder`: the `Builder` entry point
//! - `arbitrary`: commands without a generated grammar
//! - `well_known`: shared protocol commands (`PING`, `MULTI`, `ASKING`, ...)
//! - `string`, `generic`, `sorted_set`, `stream`, `server`, `pubsub`: command families
//!
//! Misuse is a compile error rather than a runtime one. A write command has
//! no `cache()`:
//!
//! ```compile_fail
//! use valkey_cmds::Builder;
//!
//! let _ = Builder::cluster().set().key("k").value("v").cache();
//! ```
//!
//! and a value cannot come before its key:
//!
//! ```compile_fail
//! use valkey_cmds::Builder;
//!
//! let _ = Builder::cluster().set().value("v");
//! ```
//!
//! A variadic command starts from one key, so its key list is never empty:
//!
//! ```compile_fail
//! use valkey_cmds::Builder;
//!
//! let _ = Builder::cluster().del().keys(Vec::<String>::new()).build();
//! ```
//!
//! ```compile_fail
//! use valkey_cmds::Builder;
//!
//! let _ = Builder::cluster().xread().streams().key("s").ids(["0"]).build();
//! ```
//!
//! A multi-key `EXISTS` has no single cache key, so it cannot be cached:
//!
//! ```compile_fail
//! use valkey_cmds::Builder;
//!
//! let _ = Builder::cluster().exists().key("k").cache();
//! ```

/// Declare grammar shapes: each one a newtype over [`Incomplete`].
macro_rules! shapes {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug)]
            #[must_use = "a command does nothing until it is built"]
            pub struct $name(pub(crate) $crate::cmds::state::Incomplete);

            impl $name {
                /// Slot state of the keys appended so far.
                pub fn slot_state(&self) -> $crate::slots::SlotState {
                    self.0.slot_state()
                }
            }
        )*
    };
}

/// Give shapes a `build()` finalizer.
macro_rules! terminal {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                /// Freeze the command into an immutable artifact.
                pub fn build(self) -> $crate::cmds::completed::Completed {
                    self.0.build()
                }
            }
        )*
    };
}

/// Give shapes a `cache()` finalizer. Only for commands whose reply is a pure
/// function of the request.
macro_rules! cacheable {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                /// Freeze the command into an artifact eligible for client-side caching.
                pub fn cache(self) -> $crate::cmds::completed::Cacheable {
                    self.0.cache()
                }
            }
        )*
    };
}

pub mod arbitrary;
pub mod buffer;
pub mod builder;
pub mod completed;
pub mod flags;
pub mod generic;
pub mod pubsub;
pub mod server;
pub mod sorted_set;
pub mod state;
pub mod stream;
pub mod string;
pub mod well_known;

pub use arbitrary::{Arbitrary, BuildError};
pub use buffer::{ArgumentBuffer, BufferPool, FrozenArgs, PoolCounters, PoolStats, global_pool};
pub use builder::{Builder, SlotMode};
pub use completed::{CacheKey, Cacheable, Completed};
pub use flags::CommandFlags;
pub use state::Incomplete;
