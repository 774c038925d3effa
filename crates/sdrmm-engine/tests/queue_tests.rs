#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{ctx, entry, setup_db};
use sdrmm_core::{Command, ExErrorKind, InMemoryQueue, Limits, QueueEntry, RemoteCall, RemoteOp};
use sdrmm_core::logging_facility::test_capture::init_test_capture;
use sdrmm_core_types::schema::FIELD_QUEUE_LEN;
use sdrmm_engine::{apply_engine_command, EngineCommandResult, QueueSummary};
use sdrmm_store::StateRepo;
use tempfile::TempDir;

fn undo_fixture() -> InMemoryQueue {
    InMemoryQueue::new().with_entries(vec![
        entry("A", "user1"),
        entry("B", "user2"),
        entry("C", "user1"),
    ])
}

#[test]
fn test_oops_rebuilds_queue_without_last_request() {
    let conn = setup_db();
    let remote = undo_fixture();
    let limits = Limits::default();

    let result = apply_engine_command(
        Command::Oops {
            username: "user1".to_string(),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap();

    assert_eq!(
        result,
        EngineCommandResult::Removed {
            entry: entry("C", "user1")
        }
    );
    assert_eq!(
        remote.mutations(),
        vec![
            RemoteCall::Clear,
            RemoteCall::Enqueue {
                id: "A".to_string(),
                requester: Some("user1".to_string())
            },
            RemoteCall::Enqueue {
                id: "B".to_string(),
                requester: Some("user2".to_string())
            },
        ]
    );
    assert_eq!(
        remote.entries(),
        vec![entry("A", "user1"), entry("B", "user2")]
    );
}

#[test]
fn test_oops_logs_rebuilt_queue_length() {
    let capture = init_test_capture();
    let conn = setup_db();
    let remote = InMemoryQueue::new().with_entries(vec![
        entry("qlen1", "qlen_user"),
        entry("qlen2", "other"),
        entry("qlen3", "qlen_user"),
    ]);
    let limits = Limits::default();

    apply_engine_command(
        Command::Oops {
            username: "qlen_user".to_string(),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap();

    let rebuilt = capture.count_events(|e| {
        e.field("removed") == Some("qlen3") && e.field(FIELD_QUEUE_LEN) == Some("2")
    });
    assert_eq!(rebuilt, 1);
}

#[test]
fn test_oops_preserves_anonymous_entries() {
    let conn = setup_db();
    let anonymous = QueueEntry::new(common::map("G", 60), None);
    let remote = InMemoryQueue::new().with_entries(vec![
        anonymous.clone(),
        entry("A", "user1"),
        entry("B", "user2"),
    ]);
    let limits = Limits::default();

    apply_engine_command(
        Command::Oops {
            username: "user1".to_string(),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap();

    assert_eq!(remote.entries(), vec![anonymous, entry("B", "user2")]);
}

#[test]
fn test_oops_refunds_after_rebuild() {
    let conn = setup_db();
    let remote = undo_fixture();
    let limits = Limits {
        request_limit: 5,
        queue_request_limit: 2,
        ..Limits::default()
    };
    StateRepo::set_user_requests(&conn, "user1", 2).unwrap();
    StateRepo::set_user_requests_in_queue(&conn, "user1", 2).unwrap();

    apply_engine_command(
        Command::Oops {
            username: "user1".to_string(),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap();

    let counters = StateRepo::get_counters(&conn, "user1").unwrap();
    assert_eq!(
        (counters.successful_requests, counters.requests_in_queue),
        (1, 1)
    );
}

#[test]
fn test_oops_without_requests() {
    let conn = setup_db();
    let remote = undo_fixture();
    let limits = Limits::default();

    let err = apply_engine_command(
        Command::Oops {
            username: "nobody".to_string(),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NoRequestsInQueue);
    assert!(remote.mutations().is_empty());
}

#[test]
fn test_oops_partial_rebuild_is_not_rolled_back() {
    let conn = setup_db();
    let remote = undo_fixture();
    remote.fail_on(RemoteOp::Enqueue);
    let limits = Limits {
        request_limit: 5,
        ..Limits::default()
    };
    StateRepo::set_user_requests(&conn, "user1", 2).unwrap();

    let err = apply_engine_command(
        Command::Oops {
            username: "user1".to_string(),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ExternalService);
    assert!(remote.entries().is_empty());
    assert_eq!(StateRepo::get_user_requests(&conn, "user1").unwrap(), 2);
}

#[test]
fn test_move_to_top_uses_last_position() {
    let conn = setup_db();
    let remote = undo_fixture();
    let limits = Limits::default();

    let result = apply_engine_command(
        Command::MoveToTop {
            username: "user1".to_string(),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap();

    assert_eq!(result, EngineCommandResult::MovedToTop { from: 2 });
    assert_eq!(
        remote.mutations(),
        vec![RemoteCall::MovePosition { from: 2, to: 1 }]
    );
}

#[test]
fn test_move_to_top_without_requests() {
    let conn = setup_db();
    let remote = InMemoryQueue::new();
    let limits = Limits::default();

    let err = apply_engine_command(
        Command::MoveToTop {
            username: "user1".to_string(),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NoRequestsInQueue);
}

#[test]
fn test_get_queue_with_user() {
    let conn = setup_db();
    let remote = undo_fixture();
    let limits = Limits::default();

    let result = apply_engine_command(
        Command::GetQueue {
            username: Some("user1".to_string()),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap();

    assert_eq!(
        result,
        EngineCommandResult::Queue(QueueSummary {
            total: 3,
            total_duration_secs: 360,
            positions: Some(vec![0, 2]),
        })
    );
    assert!(remote.mutations().is_empty());
}

#[test]
fn test_get_queue_sorts_positions_ascending() {
    let conn = setup_db();
    let remote = undo_fixture().with_positions("user1", vec![2, 0]);
    let limits = Limits::default();

    let result = apply_engine_command(
        Command::GetQueue {
            username: Some("user1".to_string()),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap();

    assert_eq!(
        result,
        EngineCommandResult::Queue(QueueSummary {
            total: 3,
            total_duration_secs: 360,
            positions: Some(vec![0, 2]),
        })
    );
    assert!(result
        .to_string()
        .ends_with("Your maps are in positions 0 and 2."));
}

#[test]
fn test_get_queue_without_user_skips_position_lookup() {
    let conn = setup_db();
    let remote = undo_fixture();
    let limits = Limits::default();

    apply_engine_command(
        Command::GetQueue { username: None },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap();

    assert_eq!(remote.calls(), vec![RemoteCall::Snapshot]);
}

#[test]
fn test_get_queue_empty() {
    let conn = setup_db();
    let remote = InMemoryQueue::new();
    let limits = Limits::default();

    let result = apply_engine_command(
        Command::GetQueue {
            username: Some("user1".to_string()),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap();

    assert_eq!(result.to_string(), "Queue is empty!");
}

#[test]
fn test_clear_saves_snapshot_and_zeroes_counters() {
    let conn = setup_db();
    StateRepo::set_queue_open(&conn, true).unwrap();
    StateRepo::set_user_requests(&conn, "user1", 4).unwrap();
    let remote = undo_fixture();
    let limits = Limits::default();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("queue.json");

    let result = apply_engine_command(
        Command::Clear {
            save_to: Some(path.clone()),
        },
        &ctx(&conn, &remote, &limits),
    )
    .unwrap();

    assert_eq!(
        result,
        EngineCommandResult::Cleared {
            saved: Some((path.clone(), 3))
        }
    );
    assert!(remote.entries().is_empty());
    assert_eq!(StateRepo::get_user_requests(&conn, "user1").unwrap(), 0);
    assert!(StateRepo::is_queue_open(&conn).unwrap());

    let saved: Vec<QueueEntry> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[2], entry("C", "user1"));
}
