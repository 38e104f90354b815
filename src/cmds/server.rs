//! Connection and server commands. None of them carry keys.

use crate::cmds::builder::Builder;
use crate::cmds::flags::CommandFlags;

impl Builder {
    /// `CLIENT CACHING YES | NO`
    pub fn client_caching(&self) -> ClientCaching {
        ClientCaching(self.start(CommandFlags::empty(), &["CLIENT", "CACHING"]))
    }

    /// `CLUSTER SLOTS`
    pub fn cluster_slots(&self) -> ClusterSlots {
        ClusterSlots(self.start(CommandFlags::READ_ONLY, &["CLUSTER", "SLOTS"]))
    }

    /// `ECHO message`
    pub fn echo(&self) -> Echo {
        Echo(self.start(CommandFlags::empty(), &["ECHO"]))
    }

    /// `INFO [section ...]`
    pub fn info(&self) -> Info {
        Info(self.start(CommandFlags::READ_ONLY, &["INFO"]))
    }

    /// `PING [message]`
    pub fn ping(&self) -> Ping {
        Ping(self.start(CommandFlags::empty(), &["PING"]))
    }
}

shapes!(
    ClientCaching,
    ClientCachingMode,
    ClusterSlots,
    Echo,
    EchoMessage,
    Info,
    InfoSection,
    Ping,
    PingMessage,
);

terminal!(ClientCachingMode, ClusterSlots, EchoMessage, Info, InfoSection, Ping, PingMessage);

impl ClientCaching {
    /// Opt the next command into client-side caching tracking.
    pub fn yes(mut self) -> ClientCachingMode {
        self.0.arg("YES");
        self.0.flag(CommandFlags::OPT_IN);
        ClientCachingMode(self.0)
    }

    pub fn no(mut self) -> ClientCachingMode {
        self.0.arg("NO");
        ClientCachingMode(self.0)
    }
}

impl Echo {
    pub fn message(mut self, message: impl Into<String>) -> EchoMessage {
        self.0.arg(message);
        EchoMessage(self.0)
    }
}

impl Info {
    pub fn section(mut self, section: impl Into<String>) -> InfoSection {
        self.0.arg(section);
        InfoSection(self.0)
    }
}

impl InfoSection {
    pub fn section(mut self, section: impl Into<String>) -> InfoSection {
        self.0.arg(section);
        self
    }
}

impl Ping {
    pub fn message(mut self, message: impl Into<String>) -> PingMessage {
        self.0.arg(message);
        PingMessage(self.0)
    }
}
