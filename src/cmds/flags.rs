//! Execution classification attached to every command.

use std::fmt;

bitflags::bitflags! {
    /// How a dispatcher should treat a command.
    ///
    /// Entry points seed these from what is statically known about the
    /// command; grammar transitions may OR in more (an optional `BLOCK`
    /// modifier sets [`CommandFlags::BLOCKING`]).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct CommandFlags: u16 {
        /// The command never writes; it may be served by a replica.
        const READ_ONLY = 1 << 13;
        /// The command may park the connection waiting for data.
        const BLOCKING = 1 << 14;
        /// `CLIENT CACHING YES`, sent ahead of cached reads in opt-in tracking.
        const OPT_IN = 1 << 15;
        /// A multi-key read whose reply holds one entry per key, so cached
        /// replies can be split and stored per key.
        const MULTI_GET = (1 << 11) | Self::READ_ONLY.bits();
        /// Pub/sub commands confirmed by push messages instead of a regular
        /// reply.
        const NO_REPLY = 1 << 12;
        /// `UNSUBSCRIBE`, `PUNSUBSCRIBE` and `SUNSUBSCRIBE`. With no subscriptions
        /// left the server may answer these with an ordinary reply, so a reader
        /// must accept either form.
        const UNSUBSCRIBE = (1 << 9) | Self::NO_REPLY.bits();
    }
}

impl CommandFlags {
    /// Check if the command may run on a replica.
    pub fn is_read_only(&self) -> bool {
        self.contains(CommandFlags::READ_ONLY)
    }

    /// Check if the command may block its connection.
    pub fn is_blocking(&self) -> bool {
        self.contains(CommandFlags::BLOCKING)
    }

    /// Check if the command has a per-key multi-get reply.
    pub fn is_multi_get(&self) -> bool {
        self.contains(CommandFlags::MULTI_GET)
    }

    /// Check if the command is the tracking opt-in marker.
    pub fn is_opt_in(&self) -> bool {
        self.contains(CommandFlags::OPT_IN)
    }

    /// Check if the command's replies arrive as push messages.
    pub fn is_no_reply(&self) -> bool {
        self.contains(CommandFlags::NO_REPLY)
    }

    /// Check if the command drops pub/sub subscriptions.
    pub fn is_unsubscribe(&self) -> bool {
        self.contains(CommandFlags::UNSUBSCRIBE)
    }
}

impl fmt::Display for CommandFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::with_capacity(4);
        if self.is_multi_get() {
            names.push("multi-get");
        } else if self.is_read_only() {
            names.push("read-only");
        } else {
            names.push("write");
        }
        if self.is_blocking() {
            names.push("blocking");
        }
        if self.is_opt_in() {
            names.push("opt-in");
        }
        if self.is_unsubscribe() {
            names.push("unsubscribe");
        } else if self.is_no_reply() {
            names.push("no-reply");
        }
        write!(f, "{}", names.join(","))
    }
}
