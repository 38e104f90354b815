//! Finalized command artifacts.
//!
//! [`Completed`] is what every terminal shape's `build()` returns: the frozen
//! tokens, the final flags and the final slot state. [`Cacheable`] is the same
//! artifact, produced by `cache()` on shapes of commands whose reply depends
//! only on the request, and may be answered from a client-side cache.
//!
//! Neither rejects cross-slot commands. The slot state is carried as data and
//! checked once, when the artifact is routed (see [`crate::routing`]).

use std::fmt;

use crate::cmds::buffer::{ArgumentBuffer, FrozenArgs};
use crate::cmds::flags::CommandFlags;
use crate::slots::{SlotState, hash};

/// An immutable command ready for dispatch.
///
/// Cloning shares the frozen tokens, so retrying a command sends exactly the
/// same artifact.
#[derive(Clone, PartialEq, Eq)]
pub struct Completed {
    args: FrozenArgs,
    flags: CommandFlags,
    slots: SlotState,
}

impl Completed {
    pub(crate) fn from_parts(args: FrozenArgs, flags: CommandFlags, slots: SlotState) -> Self {
        Self { args, flags, slots }
    }

    /// Build an artifact whose buffer never returns to the pool.
    pub(crate) fn unpooled(tokens: &[&str], flags: CommandFlags) -> Self {
        let mut buf = ArgumentBuffer::unpooled(tokens.len());
        buf.extend(tokens.iter().copied());
        Self::from_parts(buf.freeze(), flags, SlotState::Unset)
    }

    /// The tokens in wire order, command name first.
    pub fn commands(&self) -> &[String] {
        self.args.as_slice()
    }

    /// Check if the artifact carries no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The slot knowledge accumulated from the command's keys.
    pub fn slot_state(&self) -> SlotState {
        self.slots
    }

    /// The slot all keys map to, if there is exactly one.
    pub fn slot(&self) -> Option<u16> {
        self.slots.slot()
    }

    pub fn flags(&self) -> CommandFlags {
        self.flags
    }

    pub fn is_read_only(&self) -> bool {
        self.flags.is_read_only()
    }

    pub fn is_write(&self) -> bool {
        !self.flags.is_read_only()
    }

    pub fn is_blocking(&self) -> bool {
        self.flags.is_blocking()
    }

    pub fn is_multi_get(&self) -> bool {
        self.flags.is_multi_get()
    }

    pub fn is_opt_in(&self) -> bool {
        self.flags.is_opt_in()
    }

    pub fn is_no_reply(&self) -> bool {
        self.flags.is_no_reply()
    }

    pub fn is_unsubscribe(&self) -> bool {
        self.flags.is_unsubscribe()
    }

    /// Return the same command routed to the slot of `key`.
    ///
    /// The tokens are shared, not copied. This is meant for keyless commands
    /// that must run on the node owning some key (script loading, for example).
    pub fn with_slot_of(&self, key: &str) -> Completed {
        Completed {
            args: self.args.clone(),
            flags: self.flags,
            slots: SlotState::Single(hash::slot(key)),
        }
    }

    /// Check if both artifacts share one frozen buffer.
    pub fn shares_tokens_with(&self, other: &Completed) -> bool {
        self.args.ptr_eq(&other.args)
    }
}

impl fmt::Debug for Completed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completed")
            .field("commands", &self.args)
            .field("flags", &self.flags)
            .field("slots", &self.slots)
            .finish()
    }
}

impl fmt::Display for Completed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.commands().join(" "))
    }
}

/// Identity of a cached reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// The key the reply is attached to; invalidations arrive per key.
    pub key: String,
    /// Every other token, each written as `<len>:<token>` so that distinct
    /// token sequences never encode to the same string.
    pub command: String,
}

impl CacheKey {
    fn from_tokens<'a, I>(key: &str, others: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut command = String::new();
        for token in others {
            command.push_str(&token.len().to_string());
            command.push(':');
            command.push_str(token);
        }
        Self {
            key: key.to_string(),
            command,
        }
    }
}

/// A read-only command whose reply may be served from a client-side cache.
#[derive(Clone, PartialEq, Eq)]
pub struct Cacheable {
    inner: Completed,
}

impl Cacheable {
    pub(crate) fn from_completed(inner: Completed) -> Self {
        Self { inner }
    }

    pub fn commands(&self) -> &[String] {
        self.inner.commands()
    }

    pub fn slot_state(&self) -> SlotState {
        self.inner.slot_state()
    }

    pub fn slot(&self) -> Option<u16> {
        self.inner.slot()
    }

    pub fn flags(&self) -> CommandFlags {
        self.inner.flags()
    }

    pub fn is_multi_get(&self) -> bool {
        self.inner.is_multi_get()
    }

    /// View as a plain command, for sending without consulting the cache.
    pub fn as_completed(&self) -> &Completed {
        &self.inner
    }

    pub fn into_completed(self) -> Completed {
        self.inner
    }

    /// The cache entry this command reads.
    ///
    /// Cacheable commands carry their key right after the command name.
    ///
    /// # Examples
    ///
    /// ```
    /// use valkey_cmds::Builder;
    ///
    /// let cmd = Builder::cluster().get().key("user:1").cache();
    /// let key = cmd.cache_key();
    /// assert_eq!(key.key, "user:1");
    /// assert_eq!(key.command, "3:GET");
    /// ```
    pub fn cache_key(&self) -> CacheKey {
        let tokens = self.commands();
        let key = tokens.get(1).map(String::as_str).unwrap_or_default();
        let others = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 1)
            .map(|(_, t)| t.as_str());
        CacheKey::from_tokens(key, others)
    }

    /// Split a multi-get into the per-key command tokens and its keys.
    ///
    /// `MGET k1 k2` caches each key as `GET k`; `JSON.MGET k1 k2 path` caches
    /// each key as `JSON.GET k path`.
    fn multi_get_parts(&self) -> Option<(Vec<&str>, &[String])> {
        if !self.is_multi_get() {
            return None;
        }
        let tokens = self.commands();
        let (name, rest) = tokens.split_first()?;
        if name.eq_ignore_ascii_case("MGET") && !rest.is_empty() {
            return Some((vec!["GET"], rest));
        }
        if name.eq_ignore_ascii_case("JSON.MGET") && rest.len() >= 2 {
            let (path, keys) = rest.split_last()?;
            return Some((vec!["JSON.GET", path.as_str()], keys));
        }
        None
    }

    /// The single-key command a multi-get is equivalent to, per key, without
    /// the key itself.
    ///
    /// Returns `None` unless this is a multi-get.
    pub fn multi_get_command(&self) -> Option<Vec<&str>> {
        self.multi_get_parts().map(|(command, _)| command)
    }

    /// The keys of a multi-get, in request order.
    pub fn multi_get_keys(&self) -> Option<&[String]> {
        self.multi_get_parts().map(|(_, keys)| keys)
    }

    /// One cache entry per key of a multi-get.
    ///
    /// Each entry equals the [`Cacheable::cache_key`] of the matching single-key
    /// read, so `MGET a b` and `GET a` share cached replies.
    pub fn multi_get_cache_keys(&self) -> Option<Vec<CacheKey>> {
        let (command, keys) = self.multi_get_parts()?;
        Some(
            keys.iter()
                .map(|key| CacheKey::from_tokens(key, command.iter().copied()))
                .collect(),
        )
    }
}

impl From<Cacheable> for Completed {
    fn from(cmd: Cacheable) -> Self {
        cmd.into_completed()
    }
}

impl fmt::Debug for Cacheable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cacheable")
            .field("commands", &self.inner.args)
            .field("flags", &self.inner.flags)
            .field("slots", &self.inner.slots)
            .finish()
    }
}

impl fmt::Display for Cacheable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
