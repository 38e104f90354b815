//! Unit tests for valkey-cmds.
//!
//! These tests exercise the public API end to end: building commands,
//! pooling their buffers and routing the finished artifacts.

// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod slot_tests {
    use valkey_cmds::slots::{SlotState, hash};

    #[test]
    fn test_known_slots() {
        assert_eq!(hash::slot("foo"), 12182);
        assert_eq!(hash::slot("bar"), 5061);
        assert_eq!(hash::slot(""), 0);
    }

    #[test]
    fn test_hashtag_colocates_keys() {
        let slot = hash::slot("user1");
        assert_eq!(hash::slot("{user1}.profile"), slot);
        assert_eq!(hash::slot("{user1}.settings"), slot);
        assert_eq!(hash::slot("cache:{user1}"), slot);
    }

    #[test]
    fn test_empty_hashtag_hashes_whole_key() {
        assert_eq!(hash::slot("{}foo"), hash::key_slot(b"{}foo"));
        assert_ne!(hash::slot("{}foo"), hash::slot("foo"));
    }

    #[test]
    fn test_empty_pair_before_hashtag_is_skipped() {
        assert_eq!(hash::slot("{}{x}"), hash::slot("{x}"));
        assert_eq!(hash::slot("a{}b{}{user1}.c"), hash::slot("user1"));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SlotState::Unset.to_string(), "unset");
        assert_eq!(SlotState::Single(42).to_string(), "42");
        assert_eq!(SlotState::Conflict.to_string(), "cross-slot");
    }
}

mod builder_tests {
    use valkey_cmds::slots::{SlotState, hash};
    use valkey_cmds::{Builder, CommandFlags};

    #[test]
    fn test_multi_key_read_across_slots() {
        assert_ne!(hash::slot("a"), hash::slot("b"));
        let cmd = Builder::cluster().mget().key("a").key("b").build();
        assert_eq!(cmd.slot_state(), SlotState::Conflict);
        assert_eq!(cmd.slot(), None);
    }

    #[test]
    fn test_hashtagged_keys_share_slot() {
        let cmd = Builder::cluster()
            .mget()
            .key("{user1}.profile")
            .key("{user1}.settings")
            .build();
        assert_eq!(cmd.slot_state(), SlotState::Single(hash::slot("user1")));
    }

    #[test]
    fn test_zero_key_command() {
        let cmd = Builder::cluster().ping().build();
        assert_eq!(cmd.slot_state(), SlotState::Unset);
        assert_eq!(cmd.commands(), &["PING"]);
    }

    #[test]
    fn test_protocol_token_order() {
        let cmd = Builder::cluster()
            .set()
            .key("k")
            .value("v")
            .nx()
            .ex_seconds(10)
            .build();
        assert_eq!(cmd.commands(), &["SET", "k", "v", "NX", "EX", "10"]);
        assert_eq!(cmd.to_string(), "SET k v NX EX 10");
    }

    #[test]
    fn test_blocking_modifier_ors_flag() {
        let plain = Builder::cluster().xread().streams().key("s").id("0").build();
        let blocking = Builder::cluster()
            .xread()
            .block(100)
            .streams()
            .key("s")
            .id("0")
            .build();
        assert_eq!(plain.flags(), CommandFlags::READ_ONLY);
        assert_eq!(blocking.flags(), CommandFlags::READ_ONLY | CommandFlags::BLOCKING);
    }

    #[test]
    fn test_flags_seeded_by_entry_point() {
        let b = Builder::cluster();
        assert!(b.get().key("k").build().is_read_only());
        assert!(b.del().key("k").build().is_write());
        assert!(b.wait().numreplicas(1).timeout(10).build().is_blocking());
        assert!(b.mget().key("k").build().is_multi_get());
    }

    #[test]
    fn test_retry_clone_is_identical() {
        let cmd = Builder::cluster().incrby().key("counter").increment(1).build();
        let retry = cmd.clone();
        assert_eq!(retry, cmd);
        assert!(retry.shares_tokens_with(&cmd));
    }

    #[test]
    fn test_standalone_mode() {
        let cmd = Builder::standalone().del().key("a").keys(["b", "c"]).build();
        assert_eq!(cmd.slot_state(), SlotState::Unset);
        assert_eq!(cmd.commands(), &["DEL", "a", "b", "c"]);
    }

    #[test]
    fn test_cacheable_reads() {
        let b = Builder::cluster();
        let get = b.get().key("user:1").cache();
        let key = get.cache_key();
        assert_eq!(key.key, "user:1");
        assert_eq!(key.command, "3:GET");

        let mget = b.mget().key("user:1").key("user:2").cache();
        assert_eq!(mget.multi_get_cache_keys().unwrap()[0], key);
    }
}

mod pool_tests {
    use std::sync::Barrier;
    use std::thread;

    use valkey_cmds::Builder;
    use valkey_cmds::cmds::{BufferPool, global_pool};
    use valkey_cmds::config::PoolConfig;

    fn leaked_pool(capacity: usize) -> &'static BufferPool {
        let config = PoolConfig::default().with_capacity(capacity);
        Box::leak(Box::new(BufferPool::new(&config).unwrap()))
    }

    #[test]
    fn test_abandoned_builder_returns_buffer() {
        let pool = leaked_pool(4);
        let b = Builder::cluster().with_pool(pool);

        let abandoned = b.set().key("k").value("v");
        assert_eq!(pool.idle(), 0);
        drop(abandoned);

        let stats = pool.stats();
        assert_eq!(pool.idle(), 1, "dropping a builder must release its buffer");
        assert_eq!(stats.allocated, 1);
        assert_eq!(stats.retained, 1);

        // The parked buffer serves the next command
        let cmd = b.get().key("k").build();
        assert_eq!(pool.idle(), 0);
        assert_eq!(pool.stats().reused, 1);
        drop(cmd);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_default_builder_uses_global_pool() {
        assert!(Builder::cluster().pool().is_none());
        let pool = global_pool();
        assert!(pool.capacity() > 0);
    }

    #[test]
    fn test_second_round_reuses_every_buffer() {
        let pool = leaked_pool(16);
        let n = 10;

        let first: Vec<_> = (0..n).map(|_| pool.acquire()).collect();
        drop(first);
        assert_eq!(pool.idle(), n);

        let second: Vec<_> = (0..n).map(|_| pool.acquire()).collect();
        let stats = pool.stats();
        assert_eq!(stats.allocated, n as u64);
        assert_eq!(stats.retained, n as u64);
        assert_eq!(stats.reused, n as u64);
        drop(second);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let pool = leaked_pool(64);
        let threads = 8;
        let rounds = 500;
        let barrier = Barrier::new(threads);

        thread::scope(|s| {
            for t in 0..threads {
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    for i in 0..rounds {
                        let mut buf = pool.acquire();
                        buf.push(format!("T{}", t));
                        buf.push(i.to_string());
                        assert_eq!(buf.len(), 2);
                    }
                });
            }
        });

        let stats = pool.stats();
        let total = (threads * rounds) as u64;
        // At most one buffer per thread is ever outstanding
        assert!(stats.allocated <= threads as u64);
        assert_eq!(stats.allocated + stats.reused, total);
        assert_eq!(stats.retained, total);
        assert_eq!(stats.discarded, 0);
    }

    #[test]
    fn test_artifacts_cross_threads() {
        let cmd = Builder::cluster().get().key("shared").build();
        thread::scope(|s| {
            for _ in 0..4 {
                let cmd = cmd.clone();
                s.spawn(move || {
                    assert_eq!(cmd.commands(), &["GET", "shared"]);
                });
            }
        });
    }
}

mod routing_tests {
    use valkey_cmds::routing::route_pipeline;
    use valkey_cmds::slots::{SlotTable, hash};
    use valkey_cmds::{Builder, RouteTarget, Router, RoutingError};

    /// Initialize tracing so rejected commands show up in test output
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn,valkey_cmds=trace")
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_conflict_rejected_at_dispatch() {
        init_tracing();
        let router = Router::new(SlotTable::even(3));
        let cmd = Builder::cluster().mget().key("a").key("b").build();
        let err = router.plan(&cmd).unwrap_err();
        assert_eq!(err, RoutingError::CrossSlot);
        assert!(err.to_string().starts_with("CROSSSLOT"));
    }

    #[test]
    fn test_single_slot_routes_to_owner() {
        init_tracing();
        let table = SlotTable::even(3);
        let router = Router::new(table.clone());
        let cmd = Builder::cluster()
            .mget()
            .key("{user1}.profile")
            .key("{user1}.settings")
            .build();
        let plan = router.plan(&cmd).unwrap();
        let slot = hash::slot("user1");
        assert_eq!(plan.slot, Some(slot));
        assert_eq!(Some(plan.node), table.owner(slot));
    }

    #[test]
    fn test_transaction_pipeline() {
        let b = Builder::cluster();
        let cmds = [
            valkey_cmds::cmds::well_known::multi(),
            b.incrby().key("{acct}balance").increment(-10).build(),
            b.incrby().key("{acct}spent").increment(10).build(),
            valkey_cmds::cmds::well_known::exec(),
        ];
        assert_eq!(
            route_pipeline(&cmds),
            Ok(RouteTarget::Slot(hash::slot("acct")))
        );
    }

    #[test]
    fn test_ask_redirect_pair_keeps_slot() {
        let b = Builder::cluster();
        let cmds = [
            valkey_cmds::cmds::well_known::asking(),
            b.get().key("{moving}k").build(),
        ];
        assert_eq!(
            route_pipeline(&cmds),
            Ok(RouteTarget::Slot(hash::slot("moving")))
        );
    }

    #[test]
    fn test_unsubscribe_is_routable_anywhere() {
        init_tracing();
        let router = Router::new(SlotTable::even(3));
        let cmd = Builder::cluster().unsubscribe().build();
        assert!(cmd.is_unsubscribe());
        let plan = router.plan(&cmd).unwrap();
        assert_eq!(plan.slot, None);
        assert!(!plan.blocking);
    }
}

mod arbitrary_tests {
    use valkey_cmds::slots::SlotState;
    use valkey_cmds::{BuildError, Builder};

    #[test]
    fn test_arbitrary_keys_are_hashed() {
        let cmd = Builder::cluster().arbitrary(["UNLINK"]).keys(["a", "b"]).build();
        assert_eq!(cmd.slot_state(), SlotState::Conflict);
    }

    #[test]
    fn test_arbitrary_multi_get_validation() {
        let ok = Builder::cluster()
            .arbitrary(["MGET"])
            .keys(["{t}1", "{t}2"])
            .multi_get();
        assert!(ok.is_ok());

        let err = Builder::cluster()
            .arbitrary(["HGETALL"])
            .keys(["h"])
            .multi_get()
            .unwrap_err();
        assert!(matches!(err, BuildError::NotMultiGet(_)));
    }
}
