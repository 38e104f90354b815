//! Prebuilt commands shared by the whole process.
//!
//! Connection plumbing sends these constantly. Each one is built once, on
//! first use, outside the pool; callers get a clone that shares its tokens.

use std::sync::LazyLock;

use crate::cmds::completed::Completed;
use crate::cmds::flags::CommandFlags;

static ASKING: LazyLock<Completed> =
    LazyLock::new(|| Completed::unpooled(&["ASKING"], CommandFlags::empty()));
static PING: LazyLock<Completed> = LazyLock::new(|| Completed::unpooled(&["PING"], CommandFlags::empty()));
static MULTI: LazyLock<Completed> = LazyLock::new(|| Completed::unpooled(&["MULTI"], CommandFlags::empty()));
static EXEC: LazyLock<Completed> = LazyLock::new(|| Completed::unpooled(&["EXEC"], CommandFlags::empty()));
static DISCARD: LazyLock<Completed> =
    LazyLock::new(|| Completed::unpooled(&["DISCARD"], CommandFlags::empty()));
static CLUSTER_SLOTS: LazyLock<Completed> =
    LazyLock::new(|| Completed::unpooled(&["CLUSTER", "SLOTS"], CommandFlags::READ_ONLY));
static OPT_IN: LazyLock<Completed> =
    LazyLock::new(|| Completed::unpooled(&["CLIENT", "CACHING", "YES"], CommandFlags::OPT_IN));

/// Sent ahead of a command redirected by an `ASK` reply, on the same
/// connection to the importing node.
pub fn asking() -> Completed {
    ASKING.clone()
}

pub fn ping() -> Completed {
    PING.clone()
}

pub fn multi() -> Completed {
    MULTI.clone()
}

pub fn exec() -> Completed {
    EXEC.clone()
}

pub fn discard() -> Completed {
    DISCARD.clone()
}

/// Topology discovery.
pub fn cluster_slots() -> Completed {
    CLUSTER_SLOTS.clone()
}

/// `CLIENT CACHING YES`, sent ahead of a cacheable read in opt-in tracking mode.
pub fn opt_in() -> Completed {
    OPT_IN.clone()
}
