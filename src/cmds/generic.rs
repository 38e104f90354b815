//! Keyspace commands.

use crate::cmds::builder::Builder;
use crate::cmds::flags::CommandFlags;

impl Builder {
    /// `COPY source destination [DB destination-db] [REPLACE]`
    pub fn copy(&self) -> CopyCmd {
        CopyCmd(self.start(CommandFlags::empty(), &["COPY"]))
    }

    /// `DEL key [key ...]`
    pub fn del(&self) -> Del {
        Del(self.start(CommandFlags::empty(), &["DEL"]))
    }

    /// `EXISTS key [key ...]`
    pub fn exists(&self) -> Exists {
        Exists(self.start(CommandFlags::READ_ONLY, &["EXISTS"]))
    }

    /// `EXPIRE key seconds [NX | XX | GT | LT]`
    pub fn expire(&self) -> Expire {
        Expire(self.start(CommandFlags::empty(), &["EXPIRE"]))
    }

    /// `RANDOMKEY`
    pub fn randomkey(&self) -> Randomkey {
        Randomkey(self.start(CommandFlags::READ_ONLY, &["RANDOMKEY"]))
    }

    /// `TTL key`
    pub fn ttl(&self) -> Ttl {
        Ttl(self.start(CommandFlags::READ_ONLY, &["TTL"]))
    }

    /// `WAIT numreplicas timeout`
    pub fn wait(&self) -> Wait {
        Wait(self.start(CommandFlags::BLOCKING, &["WAIT"]))
    }
}

shapes!(
    CopyCmd,
    CopySource,
    CopyDestination,
    CopyDb,
    CopyReplace,
    Del,
    DelKey,
    Exists,
    ExistsKey,
    Expire,
    ExpireKey,
    ExpireSeconds,
    ExpireCondition,
    Randomkey,
    Ttl,
    TtlKey,
    Wait,
    WaitNumreplicas,
    WaitTimeout,
);

terminal!(
    CopyDestination,
    CopyDb,
    CopyReplace,
    DelKey,
    ExistsKey,
    ExpireSeconds,
    ExpireCondition,
    Randomkey,
    TtlKey,
    WaitTimeout,
);

impl CopyCmd {
    pub fn source(mut self, source: impl Into<String>) -> CopySource {
        self.0.key(source);
        CopySource(self.0)
    }
}

impl CopySource {
    pub fn destination(mut self, destination: impl Into<String>) -> CopyDestination {
        self.0.key(destination);
        CopyDestination(self.0)
    }
}

impl CopyDestination {
    pub fn db(mut self, db: i64) -> CopyDb {
        self.0.option_int("DB", db);
        CopyDb(self.0)
    }

    pub fn replace(mut self) -> CopyReplace {
        self.0.arg("REPLACE");
        CopyReplace(self.0)
    }
}

impl CopyDb {
    pub fn replace(mut self) -> CopyReplace {
        self.0.arg("REPLACE");
        CopyReplace(self.0)
    }
}

impl Del {
    pub fn key(mut self, key: impl Into<String>) -> DelKey {
        self.0.key(key);
        DelKey(self.0)
    }
}

impl DelKey {
    pub fn key(mut self, key: impl Into<String>) -> DelKey {
        self.0.key(key);
        self
    }

    pub fn keys<I, K>(mut self, keys: I) -> DelKey
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.0.keys(keys);
        self
    }
}

impl Exists {
    pub fn key(mut self, key: impl Into<String>) -> ExistsKey {
        self.0.key(key);
        ExistsKey(self.0)
    }
}

impl ExistsKey {
    pub fn key(mut self, key: impl Into<String>) -> ExistsKey {
        self.0.key(key);
        self
    }

    pub fn keys<I, K>(mut self, keys: I) -> ExistsKey
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.0.keys(keys);
        self
    }
}

impl Expire {
    pub fn key(mut self, key: impl Into<String>) -> ExpireKey {
        self.0.key(key);
        ExpireKey(self.0)
    }
}

impl ExpireKey {
    pub fn seconds(mut self, seconds: i64) -> ExpireSeconds {
        self.0.arg(seconds.to_string());
        ExpireSeconds(self.0)
    }
}

impl ExpireSeconds {
    /// Set the expiry only when the key has none.
    pub fn nx(mut self) -> ExpireCondition {
        self.0.arg("NX");
        ExpireCondition(self.0)
    }

    /// Set the expiry only when the key already has one.
    pub fn xx(mut self) -> ExpireCondition {
        self.0.arg("XX");
        ExpireCondition(self.0)
    }

    /// Set the expiry only when it is later than the current one.
    pub fn gt(mut self) -> ExpireCondition {
        self.0.arg("GT");
        ExpireCondition(self.0)
    }

    /// Set the expiry only when it is earlier than the current one.
    pub fn lt(mut self) -> ExpireCondition {
        self.0.arg("LT");
        ExpireCondition(self.0)
    }
}

impl Ttl {
    pub fn key(mut self, key: impl Into<String>) -> TtlKey {
        self.0.key(key);
        TtlKey(self.0)
    }
}

impl Wait {
    pub fn numreplicas(mut self, numreplicas: i64) -> WaitNumreplicas {
        self.0.arg(numreplicas.to_string());
        WaitNumreplicas(self.0)
    }
}

impl WaitNumreplicas {
    /// Milliseconds to wait; `0` blocks until enough replicas acknowledge.
    pub fn timeout(mut self, timeout: i64) -> WaitTimeout {
        self.0.arg(timeout.to_string());
        WaitTimeout(self.0)
    }
}
