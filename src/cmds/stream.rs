//! Stream commands.

use crate::cmds::builder::Builder;
use crate::cmds::flags::CommandFlags;

impl Builder {
    /// `XADD key [NOMKSTREAM] <* | id> field value [field value ...]`
    pub fn xadd(&self) -> Xadd {
        Xadd(self.start(CommandFlags::empty(), &["XADD"]))
    }

    /// `XREAD [COUNT count] [BLOCK milliseconds] STREAMS key [key ...] id [id ...]`
    ///
    /// Read-only; `block` additionally marks the command as blocking.
    pub fn xread(&self) -> Xread {
        Xread(self.start(CommandFlags::READ_ONLY, &["XREAD"]))
    }
}

shapes!(
    Xadd,
    XaddKey,
    XaddNomkstream,
    XaddId,
    XaddFieldValue,
    Xread,
    XreadCount,
    XreadBlock,
    XreadStreams,
    XreadKey,
    XreadId,
);

terminal!(XaddFieldValue, XreadId);

impl Xadd {
    pub fn key(mut self, key: impl Into<String>) -> XaddKey {
        self.0.key(key);
        XaddKey(self.0)
    }
}

macro_rules! xadd_id {
    () => {
        pub fn id(mut self, id: impl Into<String>) -> XaddId {
            self.0.arg(id);
            XaddId(self.0)
        }

        /// Let the server assign the entry id (`*`).
        pub fn auto_id(mut self) -> XaddId {
            self.0.arg("*");
            XaddId(self.0)
        }
    };
}

impl XaddKey {
    /// Do not create the stream if it is missing.
    pub fn nomkstream(mut self) -> XaddNomkstream {
        self.0.arg("NOMKSTREAM");
        XaddNomkstream(self.0)
    }

    xadd_id!();
}

impl XaddNomkstream {
    xadd_id!();
}

impl XaddId {
    pub fn field_value(mut self, field: impl Into<String>, value: impl Into<String>) -> XaddFieldValue {
        self.0.arg(field);
        self.0.arg(value);
        XaddFieldValue(self.0)
    }
}

impl XaddFieldValue {
    pub fn field_value(mut self, field: impl Into<String>, value: impl Into<String>) -> XaddFieldValue {
        self.0.arg(field);
        self.0.arg(value);
        self
    }
}

macro_rules! xread_block {
    () => {
        /// Wait up to `milliseconds` for new entries; `0` waits forever.
        pub fn block(mut self, milliseconds: i64) -> XreadBlock {
            self.0.option_int("BLOCK", milliseconds);
            self.0.flag(CommandFlags::BLOCKING);
            XreadBlock(self.0)
        }
    };
}

macro_rules! xread_streams {
    () => {
        pub fn streams(mut self) -> XreadStreams {
            self.0.arg("STREAMS");
            XreadStreams(self.0)
        }
    };
}

impl Xread {
    pub fn count(mut self, count: i64) -> XreadCount {
        self.0.option_int("COUNT", count);
        XreadCount(self.0)
    }

    xread_block!();
    xread_streams!();
}

impl XreadCount {
    xread_block!();
    xread_streams!();
}

impl XreadBlock {
    xread_streams!();
}

impl XreadStreams {
    pub fn key(mut self, key: impl Into<String>) -> XreadKey {
        self.0.key(key);
        XreadKey(self.0)
    }
}

impl XreadKey {
    pub fn key(mut self, key: impl Into<String>) -> XreadKey {
        self.0.key(key);
        self
    }

    pub fn keys<I, K>(mut self, keys: I) -> XreadKey
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.0.keys(keys);
        self
    }

    /// The first id; ids pair with keys positionally.
    pub fn id(mut self, id: impl Into<String>) -> XreadId {
        self.0.arg(id);
        XreadId(self.0)
    }
}

impl XreadId {
    pub fn id(mut self, id: impl Into<String>) -> XreadId {
        self.0.arg(id);
        self
    }

    pub fn ids<I, T>(mut self, ids: I) -> XreadId
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.0.args(ids);
        self
    }
}
