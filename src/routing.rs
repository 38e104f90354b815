//! Turning a command's slot state into a dispatch decision.
//!
//! Building a command never fails because of its keys. A command whose keys
//! span several slots carries [`SlotState::Conflict`], and this module is where
//! that becomes an error: routing it yields [`RoutingError::CrossSlot`] before
//! any byte is written to a connection.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{trace, warn};

use crate::cmds::completed::Completed;
use crate::metrics::{Metrics, RouteOutcome};
use crate::slots::{SlotState, SlotTable};

/// Errors raised while routing a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// Keys of one command, or of one pipeline, map to different slots
    #[error("CROSSSLOT Keys in request don't hash to the same slot")]
    CrossSlot,

    /// No node owns the slot in the current topology
    #[error("No node owns slot {0}")]
    NoSlotOwner(u16),

    /// No topology has been loaded
    #[error("Cluster topology is empty")]
    EmptyTopology,
}

impl RoutingError {
    fn outcome(&self) -> RouteOutcome {
        match self {
            RoutingError::CrossSlot => RouteOutcome::CrossSlot,
            RoutingError::NoSlotOwner(_) => RouteOutcome::NoSlotOwner,
            RoutingError::EmptyTopology => RouteOutcome::EmptyTopology,
        }
    }
}

/// Where a command may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// The command has no keys and may run on any node.
    Any,
    /// The command must run on the owner of this slot.
    Slot(u16),
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTarget::Any => write!(f, "any"),
            RouteTarget::Slot(slot) => write!(f, "slot {}", slot),
        }
    }
}

/// Resolve a slot state to a target.
///
/// # Examples
///
/// ```
/// use valkey_cmds::routing::{RouteTarget, RoutingError, route};
/// use valkey_cmds::slots::SlotState;
///
/// assert_eq!(route(SlotState::Unset), Ok(RouteTarget::Any));
/// assert_eq!(route(SlotState::Single(42)), Ok(RouteTarget::Slot(42)));
/// assert_eq!(route(SlotState::Conflict), Err(RoutingError::CrossSlot));
/// ```
pub fn route(state: SlotState) -> Result<RouteTarget, RoutingError> {
    match state {
        SlotState::Unset => Ok(RouteTarget::Any),
        SlotState::Single(slot) => Ok(RouteTarget::Slot(slot)),
        SlotState::Conflict => Err(RoutingError::CrossSlot),
    }
}

/// Resolve the target of a pipeline that must run on one node.
///
/// Keyless commands do not constrain the target. Every keyed command must
/// share one slot.
pub fn route_pipeline<'a, I>(cmds: I) -> Result<RouteTarget, RoutingError>
where
    I: IntoIterator<Item = &'a Completed>,
{
    let state = cmds
        .into_iter()
        .fold(SlotState::Unset, |acc, cmd| acc.merge(cmd.slot_state()));
    route(state)
}

/// A resolved dispatch decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPlan {
    /// Index of the node to send to.
    pub node: usize,
    /// The slot the command targets, or `None` for keyless commands.
    pub slot: Option<u16>,
    /// The command may be served by a replica of `node`.
    pub to_replica: bool,
    /// The command may hold its connection until the server replies.
    pub blocking: bool,
}

/// Routes commands against a slot ownership table.
pub struct Router {
    table: SlotTable,
    replica_reads: bool,
    metrics: Option<Arc<Metrics>>,
}

impl Router {
    pub fn new(table: SlotTable) -> Self {
        Self {
            table,
            replica_reads: false,
            metrics: None,
        }
    }

    /// Allow read-only commands to be served by replicas.
    pub fn with_replica_reads(mut self, enabled: bool) -> Self {
        self.replica_reads = enabled;
        self
    }

    /// Record every routing decision in `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn table(&self) -> &SlotTable {
        &self.table
    }

    /// Replace the ownership table after a topology refresh.
    pub fn set_table(&mut self, table: SlotTable) {
        self.table = table;
    }

    /// Decide where `cmd` goes.
    ///
    /// # Examples
    ///
    /// ```
    /// use valkey_cmds::Builder;
    /// use valkey_cmds::routing::{Router, RoutingError};
    /// use valkey_cmds::slots::SlotTable;
    ///
    /// let router = Router::new(SlotTable::even(3));
    /// let b = Builder::cluster();
    ///
    /// let plan = router.plan(&b.get().key("foo").build()).unwrap();
    /// assert_eq!(plan.slot, Some(12182));
    /// assert_eq!(plan.node, 2);
    ///
    /// let err = router.plan(&b.mget().key("a").key("b").build()).unwrap_err();
    /// assert_eq!(err, RoutingError::CrossSlot);
    /// ```
    pub fn plan(&self, cmd: &Completed) -> Result<DispatchPlan, RoutingError> {
        match self.resolve(cmd) {
            Ok((node, slot)) => {
                let outcome = if slot.is_some() {
                    RouteOutcome::Slot
                } else {
                    RouteOutcome::Any
                };
                self.record(outcome, cmd);
                trace!(node, ?slot, command = %cmd, "Routed command");
                Ok(DispatchPlan {
                    node,
                    slot,
                    to_replica: self.replica_reads && cmd.is_read_only(),
                    blocking: cmd.is_blocking(),
                })
            }
            Err(e) => {
                self.record(e.outcome(), cmd);
                if e == RoutingError::CrossSlot {
                    warn!(command = %cmd, "Rejected cross-slot command");
                }
                Err(e)
            }
        }
    }

    fn resolve(&self, cmd: &Completed) -> Result<(usize, Option<u16>), RoutingError> {
        let target = route(cmd.slot_state())?;
        if self.table.is_empty() {
            return Err(RoutingError::EmptyTopology);
        }
        match target {
            RouteTarget::Slot(slot) => self
                .table
                .owner(slot)
                .map(|node| (node, Some(slot)))
                .ok_or(RoutingError::NoSlotOwner(slot)),
            RouteTarget::Any => self
                .table
                .first_owner()
                .map(|node| (node, None))
                .ok_or(RoutingError::EmptyTopology),
        }
    }

    fn record(&self, outcome: RouteOutcome, cmd: &Completed) {
        if let Some(metrics) = &self.metrics {
            metrics.record_route(outcome, cmd);
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("nodes", &self.table.node_count())
            .field("replica_reads", &self.replica_reads)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
