//! String commands.

use std::time::Duration;

use crate::cmds::builder::Builder;
use crate::cmds::flags::CommandFlags;

impl Builder {
    /// `APPEND key value`
    pub fn append(&self) -> Append {
        Append(self.start(CommandFlags::empty(), &["APPEND"]))
    }

    /// `GET key`
    pub fn get(&self) -> Get {
        Get(self.start(CommandFlags::READ_ONLY, &["GET"]))
    }

    /// `GETRANGE key start end`
    pub fn getrange(&self) -> Getrange {
        Getrange(self.start(CommandFlags::READ_ONLY, &["GETRANGE"]))
    }

    /// `INCRBY key increment`
    pub fn incrby(&self) -> Incrby {
        Incrby(self.start(CommandFlags::empty(), &["INCRBY"]))
    }

    /// `MGET key [key ...]`
    pub fn mget(&self) -> Mget {
        Mget(self.start(CommandFlags::MULTI_GET, &["MGET"]))
    }

    /// `MSET key value [key value ...]`
    pub fn mset(&self) -> Mset {
        Mset(self.start(CommandFlags::empty(), &["MSET"]))
    }

    /// `SET key value [NX | XX | IFEQ value] [GET] [EX | PX | EXAT | PXAT | KEEPTTL]`
    pub fn set(&self) -> Set {
        Set(self.start(CommandFlags::empty(), &["SET"]))
    }
}

shapes!(
    Append,
    AppendKey,
    AppendValue,
    Get,
    GetKey,
    Getrange,
    GetrangeKey,
    GetrangeStart,
    GetrangeEnd,
    Incrby,
    IncrbyKey,
    IncrbyIncrement,
    Mget,
    MgetKey,
    Mset,
    MsetKeyValue,
    Set,
    SetKey,
    SetValue,
    /// `SET` after `NX`, `XX` or `IFEQ`.
    SetCondition,
    /// `SET` after `GET`.
    SetGet,
    /// `SET` after its expiration option; nothing may follow.
    SetExpiration,
);

terminal!(
    AppendValue,
    GetKey,
    GetrangeEnd,
    IncrbyIncrement,
    MgetKey,
    MsetKeyValue,
    SetValue,
    SetCondition,
    SetGet,
    SetExpiration,
);

cacheable!(GetKey, GetrangeEnd, MgetKey);

impl Append {
    pub fn key(mut self, key: impl Into<String>) -> AppendKey {
        self.0.key(key);
        AppendKey(self.0)
    }
}

impl AppendKey {
    pub fn value(mut self, value: impl Into<String>) -> AppendValue {
        self.0.arg(value);
        AppendValue(self.0)
    }
}

impl Get {
    pub fn key(mut self, key: impl Into<String>) -> GetKey {
        self.0.key(key);
        GetKey(self.0)
    }
}

impl Getrange {
    pub fn key(mut self, key: impl Into<String>) -> GetrangeKey {
        self.0.key(key);
        GetrangeKey(self.0)
    }
}

impl GetrangeKey {
    pub fn start(mut self, start: i64) -> GetrangeStart {
        self.0.arg(start.to_string());
        GetrangeStart(self.0)
    }
}

impl GetrangeStart {
    pub fn end(mut self, end: i64) -> GetrangeEnd {
        self.0.arg(end.to_string());
        GetrangeEnd(self.0)
    }
}

impl Incrby {
    pub fn key(mut self, key: impl Into<String>) -> IncrbyKey {
        self.0.key(key);
        IncrbyKey(self.0)
    }
}

impl IncrbyKey {
    pub fn increment(mut self, increment: i64) -> IncrbyIncrement {
        self.0.arg(increment.to_string());
        IncrbyIncrement(self.0)
    }
}

impl Mget {
    /// The first key. More may follow with [`MgetKey::key`] or [`MgetKey::keys`].
    pub fn key(mut self, key: impl Into<String>) -> MgetKey {
        self.0.key(key);
        MgetKey(self.0)
    }
}

impl MgetKey {
    pub fn key(mut self, key: impl Into<String>) -> MgetKey {
        self.0.key(key);
        self
    }

    pub fn keys<I, K>(mut self, keys: I) -> MgetKey
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.0.keys(keys);
        self
    }
}

impl Mset {
    pub fn key_value(mut self, key: impl Into<String>, value: impl Into<String>) -> MsetKeyValue {
        self.0.key(key);
        self.0.arg(value);
        MsetKeyValue(self.0)
    }
}

impl MsetKeyValue {
    pub fn key_value(mut self, key: impl Into<String>, value: impl Into<String>) -> MsetKeyValue {
        self.0.key(key);
        self.0.arg(value);
        self
    }
}

impl Set {
    pub fn key(mut self, key: impl Into<String>) -> SetKey {
        self.0.key(key);
        SetKey(self.0)
    }
}

impl SetKey {
    pub fn value(mut self, value: impl Into<String>) -> SetValue {
        self.0.arg(value);
        SetValue(self.0)
    }
}

fn ceil_millis(ttl: Duration) -> u128 {
    let millis = ttl.as_millis();
    let partial = ttl.subsec_nanos() % 1_000_000 != 0;
    millis.saturating_add(u128::from(partial)).max(1)
}

/// Expiration options, legal after the value, the condition or `GET`.
macro_rules! set_expiration {
    () => {
        pub fn ex_seconds(mut self, seconds: i64) -> SetExpiration {
            self.0.option_int("EX", seconds);
            SetExpiration(self.0)
        }

        pub fn px_milliseconds(mut self, milliseconds: i64) -> SetExpiration {
            self.0.option_int("PX", milliseconds);
            SetExpiration(self.0)
        }

        pub fn exat_timestamp(mut self, timestamp: i64) -> SetExpiration {
            self.0.option_int("EXAT", timestamp);
            SetExpiration(self.0)
        }

        pub fn pxat_milliseconds_timestamp(mut self, timestamp: i64) -> SetExpiration {
            self.0.option_int("PXAT", timestamp);
            SetExpiration(self.0)
        }

        pub fn keepttl(mut self) -> SetExpiration {
            self.0.arg("KEEPTTL");
            SetExpiration(self.0)
        }

        /// `EX` with whole seconds of `ttl`.
        ///
        /// A `ttl` under one second is sent as `PX` instead, since `EX 0` is
        /// rejected by the server.
        pub fn ex(mut self, ttl: Duration) -> SetExpiration {
            if ttl < Duration::from_secs(1) {
                return self.px(ttl);
            }
            self.0.arg("EX");
            self.0.arg(ttl.as_secs().to_string());
            SetExpiration(self.0)
        }

        /// `PX` with the milliseconds of `ttl`, rounded up and at least 1.
        pub fn px(mut self, ttl: Duration) -> SetExpiration {
            self.0.arg("PX");
            self.0.arg(ceil_millis(ttl).to_string());
            SetExpiration(self.0)
        }
    };
}

impl SetValue {
    /// Only set the key if it does not exist.
    pub fn nx(mut self) -> SetCondition {
        self.0.arg("NX");
        SetCondition(self.0)
    }

    /// Only set the key if it already exists.
    pub fn xx(mut self) -> SetCondition {
        self.0.arg("XX");
        SetCondition(self.0)
    }

    /// Only set the key if its current value equals `value`.
    pub fn ifeq(mut self, value: impl Into<String>) -> SetCondition {
        self.0.arg("IFEQ");
        self.0.arg(value);
        SetCondition(self.0)
    }

    /// Return the previous value.
    pub fn get(mut self) -> SetGet {
        self.0.arg("GET");
        SetGet(self.0)
    }

    set_expiration!();
}

impl SetCondition {
    pub fn get(mut self) -> SetGet {
        self.0.arg("GET");
        SetGet(self.0)
    }

    set_expiration!();
}

impl SetGet {
    set_expiration!();
}
