//! Commands built from raw tokens.
//!
//! [`Arbitrary`] covers commands that have no generated grammar: module
//! commands, new server commands, or anything assembled at runtime. Keys are
//! still hashed and folded exactly like keys of generated commands, but the
//! caller is responsible for token order.

use thiserror::Error;

use crate::cmds::builder::Builder;
use crate::cmds::completed::{Cacheable, Completed};
use crate::cmds::flags::CommandFlags;
use crate::cmds::state::Incomplete;
use crate::slots::SlotState;

/// Errors from finalizing an arbitrary command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// `multi_get()` was called on something other than `MGET` or `JSON.MGET`
    #[error("Not a multi-get command: {0}")]
    NotMultiGet(String),
}

impl Builder {
    /// Start a command from its name tokens, e.g. `["CLIENT", "ID"]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use valkey_cmds::Builder;
    ///
    /// let cmd = Builder::cluster()
    ///     .arbitrary(["OBJECT", "ENCODING"])
    ///     .keys(["k"])
    ///     .read_only();
    /// assert_eq!(cmd.commands(), &["OBJECT", "ENCODING", "k"]);
    /// assert!(cmd.is_read_only());
    /// ```
    pub fn arbitrary<I, T>(&self, name: I) -> Arbitrary
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut inner = self.start(CommandFlags::empty(), &[]);
        inner.args(name);
        let name_len = inner.tokens().len();
        Arbitrary { inner, name_len }
    }
}

/// A command assembled from raw tokens.
#[derive(Debug)]
#[must_use = "a command does nothing until it is built"]
pub struct Arbitrary {
    inner: Incomplete,
    name_len: usize,
}

impl Arbitrary {
    /// Append key tokens, hashing each one.
    pub fn keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.inner.keys(keys);
        self
    }

    /// Append non-key tokens.
    pub fn args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.inner.args(args);
        self
    }

    /// Check if nothing but the name has been written.
    pub fn is_zero(&self) -> bool {
        self.inner.tokens().len() == self.name_len
    }

    pub fn slot_state(&self) -> SlotState {
        self.inner.slot_state()
    }

    /// Finalize as a write command.
    pub fn build(self) -> Completed {
        self.inner.build()
    }

    /// Finalize as a blocking command.
    pub fn blocking(mut self) -> Completed {
        self.inner.flag(CommandFlags::BLOCKING);
        self.inner.build()
    }

    /// Finalize as a read-only command.
    pub fn read_only(mut self) -> Completed {
        self.inner.flag(CommandFlags::READ_ONLY);
        self.inner.build()
    }

    /// Finalize as a cacheable multi-get.
    ///
    /// Only `MGET key...` and `JSON.MGET key... path` qualify; the name is
    /// matched case-insensitively.
    pub fn multi_get(mut self) -> Result<Cacheable, BuildError> {
        let tokens = self.inner.tokens();
        let name = tokens.first().map(String::as_str).unwrap_or_default();
        let shaped = (name.eq_ignore_ascii_case("MGET") && tokens.len() >= 2)
            || (name.eq_ignore_ascii_case("JSON.MGET") && tokens.len() >= 3);
        if !shaped {
            return Err(BuildError::NotMultiGet(tokens.join(" ")));
        }
        self.inner.flag(CommandFlags::MULTI_GET);
        Ok(self.inner.cache())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::slots::hash;

    #[test]
    fn test_keys_fold_slots() {
        let cmd = Builder::cluster()
            .arbitrary(["UNLINK"])
            .keys(["{g}1", "{g}2"])
            .build();
        assert_eq!(cmd.slot(), Some(hash::slot("g")));
        assert!(cmd.is_write());

        let split = Builder::cluster().arbitrary(["UNLINK"]).keys(["a", "b"]).build();
        assert_eq!(split.slot_state(), SlotState::Conflict);
    }

    #[test]
    fn test_args_are_not_hashed() {
        let cmd = Builder::cluster().arbitrary(["CONFIG", "GET"]).args(["maxmemory"]).build();
        assert_eq!(cmd.slot_state(), SlotState::Unset);
        assert_eq!(cmd.commands(), &["CONFIG", "GET", "maxmemory"]);
    }

    #[test]
    fn test_is_zero() {
        let cmd = Builder::cluster().arbitrary(["CLIENT", "ID"]);
        assert!(cmd.is_zero());
        let cmd = cmd.args(["x"]);
        assert!(!cmd.is_zero());
    }

    #[test]
    fn test_blocking_finalizer() {
        let cmd = Builder::cluster()
            .arbitrary(["BLMOVE"])
            .keys(["{l}src", "{l}dst"])
            .args(["LEFT", "RIGHT", "0"])
            .blocking();
        assert!(cmd.is_blocking());
        assert!(cmd.is_write());
    }

    #[test]
    fn test_multi_get_accepts_mget_any_case() {
        let cmd = Builder::cluster()
            .arbitrary(["mget"])
            .keys(["{m}a", "{m}b"])
            .multi_get()
            .unwrap();
        assert!(cmd.is_multi_get());
        assert!(cmd.flags().is_read_only());
        assert_eq!(cmd.multi_get_keys().unwrap(), &["{m}a", "{m}b"]);
    }

    #[test]
    fn test_multi_get_rejects_other_commands() {
        let err = Builder::cluster()
            .arbitrary(["GET"])
            .keys(["a"])
            .multi_get()
            .unwrap_err();
        assert_eq!(err, BuildError::NotMultiGet("GET a".to_string()));
        assert_eq!(err.to_string(), "Not a multi-get command: GET a");
    }

    #[test]
    fn test_multi_get_requires_keys() {
        assert!(Builder::cluster().arbitrary(["MGET"]).multi_get().is_err());
        let no_path = Builder::cluster().arbitrary(["JSON.MGET"]).keys(["a"]).multi_get();
        assert!(no_path.is_err());
    }
}
