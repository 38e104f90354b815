//! Pub/sub subscription commands.
//!
//! Subscriptions are confirmed by push messages rather than a regular reply,
//! so every command here carries [`CommandFlags::NO_REPLY`]. Shard channels
//! (`SSUBSCRIBE`, `SUNSUBSCRIBE`) live on the node owning their slot and are
//! hashed like keys; plain channels and patterns are not.

use crate::cmds::builder::Builder;
use crate::cmds::flags::CommandFlags;

impl Builder {
    /// `SUBSCRIBE channel [channel ...]`
    pub fn subscribe(&self) -> Subscribe {
        Subscribe(self.start(CommandFlags::NO_REPLY, &["SUBSCRIBE"]))
    }

    /// `PSUBSCRIBE pattern [pattern ...]`
    pub fn psubscribe(&self) -> Psubscribe {
        Psubscribe(self.start(CommandFlags::NO_REPLY, &["PSUBSCRIBE"]))
    }

    /// `SSUBSCRIBE shardchannel [shardchannel ...]`
    pub fn ssubscribe(&self) -> Ssubscribe {
        Ssubscribe(self.start(CommandFlags::NO_REPLY, &["SSUBSCRIBE"]))
    }

    /// `UNSUBSCRIBE [channel ...]`; without channels, drops them all.
    pub fn unsubscribe(&self) -> Unsubscribe {
        Unsubscribe(self.start(CommandFlags::UNSUBSCRIBE, &["UNSUBSCRIBE"]))
    }

    /// `PUNSUBSCRIBE [pattern ...]`
    pub fn punsubscribe(&self) -> Punsubscribe {
        Punsubscribe(self.start(CommandFlags::UNSUBSCRIBE, &["PUNSUBSCRIBE"]))
    }

    /// `SUNSUBSCRIBE [shardchannel ...]`
    pub fn sunsubscribe(&self) -> Sunsubscribe {
        Sunsubscribe(self.start(CommandFlags::UNSUBSCRIBE, &["SUNSUBSCRIBE"]))
    }
}

shapes!(
    Subscribe,
    SubscribeChannel,
    Psubscribe,
    PsubscribePattern,
    Ssubscribe,
    SsubscribeChannel,
    Unsubscribe,
    UnsubscribeChannel,
    Punsubscribe,
    PunsubscribePattern,
    Sunsubscribe,
    SunsubscribeChannel,
);

terminal!(
    SubscribeChannel,
    PsubscribePattern,
    SsubscribeChannel,
    Unsubscribe,
    UnsubscribeChannel,
    Punsubscribe,
    PunsubscribePattern,
    Sunsubscribe,
    SunsubscribeChannel,
);

/// `channel(c)` then any number of `channel(c)`/`channels(iter)` on `$next`.
/// `$append` is `arg` for plain names or `key` for shard channels.
macro_rules! channel_list {
    ($first:ident, $next:ident, $single:ident, $many:ident, $append:ident, $append_many:ident) => {
        impl $first {
            pub fn $single(mut self, name: impl Into<String>) -> $next {
                self.0.$append(name);
                $next(self.0)
            }
        }

        impl $next {
            pub fn $single(mut self, name: impl Into<String>) -> $next {
                self.0.$append(name);
                self
            }

            pub fn $many<I, T>(mut self, names: I) -> $next
            where
                I: IntoIterator<Item = T>,
                T: Into<String>,
            {
                self.0.$append_many(names);
                self
            }
        }
    };
}

channel_list!(Subscribe, SubscribeChannel, channel, channels, arg, args);
channel_list!(Psubscribe, PsubscribePattern, pattern, patterns, arg, args);
channel_list!(Ssubscribe, SsubscribeChannel, channel, channels, key, keys);
channel_list!(Unsubscribe, UnsubscribeChannel, channel, channels, arg, args);
channel_list!(Punsubscribe, PunsubscribePattern, pattern, patterns, arg, args);
channel_list!(Sunsubscribe, SunsubscribeChannel, channel, channels, key, keys);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::slots::{SlotState, hash};

    #[test]
    fn test_subscribe_is_no_reply() {
        let cmd = Builder::cluster()
            .subscribe()
            .channel("news")
            .channels(["sports"])
            .build();
        assert_eq!(cmd.commands(), &["SUBSCRIBE", "news", "sports"]);
        assert!(cmd.is_no_reply());
        assert!(!cmd.is_unsubscribe());
        assert_eq!(cmd.slot_state(), SlotState::Unset);
    }

    #[test]
    fn test_unsubscribe_without_channels_drops_all() {
        let b = Builder::cluster();
        for (cmd, name) in [
            (b.unsubscribe().build(), "UNSUBSCRIBE"),
            (b.punsubscribe().build(), "PUNSUBSCRIBE"),
            (b.sunsubscribe().build(), "SUNSUBSCRIBE"),
        ] {
            assert_eq!(cmd.commands(), &[name]);
            assert!(cmd.is_unsubscribe(), "{cmd}");
            assert!(cmd.is_no_reply(), "{cmd}");
            assert_eq!(cmd.slot_state(), SlotState::Unset);
        }
    }

    #[test]
    fn test_plain_channels_and_patterns_are_not_hashed() {
        let b = Builder::cluster();
        let unsub = b.unsubscribe().channel("a").channel("b").build();
        assert_eq!(unsub.slot_state(), SlotState::Unset);
        assert_eq!(unsub.commands(), &["UNSUBSCRIBE", "a", "b"]);

        let punsub = b.punsubscribe().pattern("news.*").patterns(["x*", "y*"]).build();
        assert_eq!(punsub.commands(), &["PUNSUBSCRIBE", "news.*", "x*", "y*"]);
        assert_eq!(punsub.slot_state(), SlotState::Unset);

        let psub = b.psubscribe().pattern("a*").build();
        assert!(psub.is_no_reply());
        assert!(!psub.is_unsubscribe());
    }

    #[test]
    fn test_shard_channels_are_hashed() {
        let b = Builder::cluster();
        let sub = b.ssubscribe().channel("{orders}.eu").channel("{orders}.us").build();
        assert_eq!(sub.slot(), Some(hash::slot("orders")));

        let unsub = b.sunsubscribe().channel("a").channels(["b"]).build();
        assert_eq!(unsub.slot_state(), SlotState::Conflict);
        assert!(unsub.is_unsubscribe());
    }
}
