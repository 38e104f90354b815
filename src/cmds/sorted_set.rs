//! Sorted set commands.

use crate::cmds::builder::Builder;
use crate::cmds::flags::CommandFlags;

impl Builder {
    /// `BZPOPMIN key [key ...] timeout`
    pub fn bzpopmin(&self) -> Bzpopmin {
        Bzpopmin(self.start(CommandFlags::BLOCKING, &["BZPOPMIN"]))
    }

    /// `ZADD key [NX | XX] [GT | LT] [CH] [INCR] score member [score member ...]`
    pub fn zadd(&self) -> Zadd {
        Zadd(self.start(CommandFlags::empty(), &["ZADD"]))
    }

    /// `ZSCORE key member`
    pub fn zscore(&self) -> Zscore {
        Zscore(self.start(CommandFlags::READ_ONLY, &["ZSCORE"]))
    }
}

shapes!(
    Bzpopmin,
    BzpopminKey,
    BzpopminTimeout,
    Zadd,
    ZaddKey,
    /// `ZADD` after `NX`; `GT` and `LT` are not allowed with it.
    ZaddNx,
    ZaddXx,
    ZaddComparison,
    ZaddCh,
    ZaddIncr,
    ZaddScoreMember,
    Zscore,
    ZscoreKey,
    ZscoreMember,
);

terminal!(BzpopminTimeout, ZaddScoreMember, ZscoreMember);

cacheable!(ZscoreMember);

impl Bzpopmin {
    pub fn key(mut self, key: impl Into<String>) -> BzpopminKey {
        self.0.key(key);
        BzpopminKey(self.0)
    }
}

impl BzpopminKey {
    pub fn key(mut self, key: impl Into<String>) -> BzpopminKey {
        self.0.key(key);
        self
    }

    pub fn keys<I, K>(mut self, keys: I) -> BzpopminKey
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.0.keys(keys);
        self
    }

    /// Seconds to block; `0` blocks indefinitely.
    pub fn timeout(mut self, timeout: f64) -> BzpopminTimeout {
        self.0.arg(timeout.to_string());
        BzpopminTimeout(self.0)
    }
}

impl Zadd {
    pub fn key(mut self, key: impl Into<String>) -> ZaddKey {
        self.0.key(key);
        ZaddKey(self.0)
    }
}

/// Options legal at every position before the first score-member pair.
macro_rules! zadd_tail {
    (ch) => {
        pub fn ch(mut self) -> ZaddCh {
            self.0.arg("CH");
            ZaddCh(self.0)
        }
    };
    (incr) => {
        pub fn incr(mut self) -> ZaddIncr {
            self.0.arg("INCR");
            ZaddIncr(self.0)
        }
    };
    (score_member) => {
        pub fn score_member(mut self, score: f64, member: impl Into<String>) -> ZaddScoreMember {
            self.0.arg(score.to_string());
            self.0.arg(member);
            ZaddScoreMember(self.0)
        }
    };
}

/// `GT` and `LT`, legal right after the key or after `XX`.
macro_rules! zadd_comparison {
    () => {
        /// Only update existing members when the new score is greater.
        pub fn gt(mut self) -> ZaddComparison {
            self.0.arg("GT");
            ZaddComparison(self.0)
        }

        /// Only update existing members when the new score is less.
        pub fn lt(mut self) -> ZaddComparison {
            self.0.arg("LT");
            ZaddComparison(self.0)
        }
    };
}

impl ZaddKey {
    /// Only add new members.
    pub fn nx(mut self) -> ZaddNx {
        self.0.arg("NX");
        ZaddNx(self.0)
    }

    /// Only update existing members.
    pub fn xx(mut self) -> ZaddXx {
        self.0.arg("XX");
        ZaddXx(self.0)
    }

    zadd_comparison!();
    zadd_tail!(ch);
    zadd_tail!(incr);
    zadd_tail!(score_member);
}

impl ZaddNx {
    zadd_tail!(ch);
    zadd_tail!(incr);
    zadd_tail!(score_member);
}

impl ZaddXx {
    zadd_comparison!();
    zadd_tail!(ch);
    zadd_tail!(incr);
    zadd_tail!(score_member);
}

impl ZaddComparison {
    zadd_tail!(ch);
    zadd_tail!(incr);
    zadd_tail!(score_member);
}

impl ZaddCh {
    zadd_tail!(incr);
    zadd_tail!(score_member);
}

impl ZaddIncr {
    zadd_tail!(score_member);
}

impl ZaddScoreMember {
    pub fn score_member(mut self, score: f64, member: impl Into<String>) -> ZaddScoreMember {
        self.0.arg(score.to_string());
        self.0.arg(member);
        self
    }
}

impl Zscore {
    pub fn key(mut self, key: impl Into<String>) -> ZscoreKey {
        self.0.key(key);
        ZscoreKey(self.0)
    }
}

impl ZscoreKey {
    pub fn member(mut self, member: impl Into<String>) -> ZscoreMember {
        self.0.arg(member);
        ZscoreMember(self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::slots::{SlotState, hash};

    #[test]
    fn test_zadd_option_order() {
        let cmd = Builder::cluster()
            .zadd()
            .key("board")
            .xx()
            .gt()
            .ch()
            .score_member(1.5, "alice")
            .score_member(2.0, "bob")
            .build();
        assert_eq!(
            cmd.commands(),
            &["ZADD", "board", "XX", "GT", "CH", "1.5", "alice", "2", "bob"]
        );
        assert!(cmd.is_write());
    }

    #[test]
    fn test_zadd_incr() {
        let cmd = Builder::cluster()
            .zadd()
            .key("board")
            .nx()
            .incr()
            .score_member(-3.25, "carol")
            .build();
        assert_eq!(cmd.commands(), &["ZADD", "board", "NX", "INCR", "-3.25", "carol"]);
    }

    #[test]
    fn test_zscore_member_is_not_hashed() {
        let cmd = Builder::cluster().zscore().key("board").member("a").cache();
        assert_eq!(cmd.slot(), Some(hash::slot("board")));
        assert_eq!(cmd.cache_key().command, "6:ZSCORE1:a");
    }

    #[test]
    fn test_bzpopmin_blocking_and_slot() {
        let cmd = Builder::cluster()
            .bzpopmin()
            .key("{q}low")
            .keys(["{q}high"])
            .timeout(0.5)
            .build();
        assert_eq!(cmd.commands(), &["BZPOPMIN", "{q}low", "{q}high", "0.5"]);
        assert!(cmd.is_blocking());
        assert_eq!(cmd.slot_state(), SlotState::Single(hash::slot("q")));
    }
}
