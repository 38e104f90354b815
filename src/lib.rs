//! valkey-cmds library crate
//!
//! Type-state command builders for Valkey cluster clients. A [`Builder`]
//! turns a chain of method calls into an immutable [`Completed`] command:
//! the grammar is enforced by the types, every key is hashed into its cluster
//! slot as it is appended, and the artifact carries the execution flags a
//! dispatcher needs (read-only, blocking, multi-get, opt-in).
//!
//! ## Module Structure
//!
//! - [`slots`]: CRC16 slot hashing, the slot accumulator and slot tables
//! - [`cmds`]: token buffers, the command builders and finalized artifacts
//! - [`routing`]: turning slot state into a dispatch decision
//! - [`metrics`]: Prometheus metrics for the pool and for routing
//! - [`config`]: buffer pool configuration
//!
//! # Examples
//!
//! ```
//! use valkey_cmds::Builder;
//! use valkey_cmds::routing::{Router, RoutingError};
//! use valkey_cmds::slots::{SlotState, SlotTable};
//!
//! let b = Builder::cluster();
//!
//! let read = b.mget().key("{user1}.name").key("{user1}.email").cache();
//! assert!(read.is_multi_get());
//! assert!(matches!(read.slot_state(), SlotState::Single(_)));
//!
//! let split = b.mget().key("a").key("b").build();
//! assert_eq!(split.slot_state(), SlotState::Conflict);
//!
//! let router = Router::new(SlotTable::even(3));
//! assert_eq!(router.plan(&split), Err(RoutingError::CrossSlot));
//! ```

pub mod cmds;
pub mod config;
pub mod metrics;
pub mod routing;
pub mod slots;

pub use cmds::{Arbitrary, BuildError, Builder, CacheKey, Cacheable, CommandFlags, Completed, SlotMode};
pub use config::{ConfigError, PoolConfig};
pub use routing::{DispatchPlan, RouteTarget, Router, RoutingError};
pub use slots::SlotState;
