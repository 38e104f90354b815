//! Prometheus metrics for command construction and routing.
//!
//! Provides:
//! - `valkey_cmds_routed` - routing decisions by outcome and command kind
//! - `valkey_cmds_pool_*` - buffer pool reuse, allocation and release counters
//! - `valkey_cmds_pool_idle_buffers` - buffers parked in the pool at scrape time

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabel, EncodeLabelSet, LabelSetEncoder};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

use crate::cmds::buffer::BufferPool;
use crate::cmds::completed::Completed;

/// How a routing decision ended.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Sent to the owner of the command's slot.
    Slot,
    /// Keyless; sent to any node.
    Any,
    /// Rejected: keys span several slots.
    CrossSlot,
    /// Rejected: the slot has no owner.
    NoSlotOwner,
    /// Rejected: no topology known yet.
    EmptyTopology,
}

impl RouteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteOutcome::Slot => "slot",
            RouteOutcome::Any => "any",
            RouteOutcome::CrossSlot => "cross_slot",
            RouteOutcome::NoSlotOwner => "no_slot_owner",
            RouteOutcome::EmptyTopology => "empty_topology",
        }
    }
}

/// Labels for routing metrics (outcome + command kind)
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct RouteLabels {
    pub outcome: RouteOutcome,
    pub kind: &'static str,
}

impl RouteLabels {
    fn new(outcome: RouteOutcome, cmd: &Completed) -> Self {
        let kind = if cmd.is_blocking() {
            "blocking"
        } else if cmd.is_read_only() {
            "read"
        } else {
            "write"
        };
        Self { outcome, kind }
    }
}

impl EncodeLabelSet for RouteLabels {
    fn encode(&self, encoder: &mut LabelSetEncoder<'_>) -> Result<(), std::fmt::Error> {
        ("outcome", self.outcome.as_str()).encode(encoder.encode_label())?;
        ("kind", self.kind).encode(encoder.encode_label())?;
        Ok(())
    }
}

/// Shared metrics for a client.
pub struct Metrics {
    /// Routing decisions
    pub routed_total: Family<RouteLabels, Counter>,
    /// Idle pool buffers, refreshed on every encode
    pool_idle: Gauge,
    pool: Option<&'static BufferPool>,
    registry: Registry,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a metrics instance with the routing metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let routed_total = Family::<RouteLabels, Counter>::default();
        registry.register(
            "valkey_cmds_routed",
            "Total number of routing decisions",
            routed_total.clone(),
        );

        Self {
            routed_total,
            pool_idle: Gauge::default(),
            pool: None,
            registry,
        }
    }

    /// Also export the counters of `pool`.
    ///
    /// The pool's counters are shared handles, so the registry reads the live
    /// values without any copying on the hot path.
    pub fn with_pool(mut self, pool: &'static BufferPool) -> Self {
        let counters = pool.counters();
        self.registry.register(
            "valkey_cmds_pool_reused",
            "Buffer acquisitions served from the pool",
            counters.reused.clone(),
        );
        self.registry.register(
            "valkey_cmds_pool_allocated",
            "Buffer acquisitions that allocated a fresh buffer",
            counters.allocated.clone(),
        );
        self.registry.register(
            "valkey_cmds_pool_retained",
            "Buffers returned to the pool",
            counters.retained.clone(),
        );
        self.registry.register(
            "valkey_cmds_pool_discarded",
            "Buffers dropped instead of pooled",
            counters.discarded.clone(),
        );
        self.registry.register(
            "valkey_cmds_pool_idle_buffers",
            "Buffers parked in the pool",
            self.pool_idle.clone(),
        );
        self.pool = Some(pool);
        self
    }

    /// Record one routing decision for `cmd`.
    pub fn record_route(&self, outcome: RouteOutcome, cmd: &Completed) {
        self.routed_total
            .get_or_create(&RouteLabels::new(outcome, cmd))
            .inc();
    }

    /// Encode metrics to Prometheus text format
    pub fn encode(&self) -> String {
        if let Some(pool) = self.pool {
            self.pool_idle
                .set(i64::try_from(pool.idle()).unwrap_or(i64::MAX));
        }
        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry).is_err() {
            tracing::error!("Failed to encode metrics");
            return "# Error encoding metrics".to_string();
        }
        buffer
    }
}
