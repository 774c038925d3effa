#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{ctx, map, open_db, setup_db};
use sdrmm_core::logging_facility::test_capture::init_test_capture;
use sdrmm_core::{Command, ExErrorKind, InMemoryQueue, Limits, RemoteCall, RemoteOp, Rejection};
use sdrmm_core_types::schema::{FIELD_MAP_ID, FIELD_REJECTION_CODE};
use sdrmm_engine::{apply_engine_command, EngineCommandResult};
use sdrmm_store::StateRepo;

fn add(user: &str, id: &str) -> Command {
    Command::Add {
        id: id.to_string(),
        username: user.to_string(),
        modadd: false,
    }
}

#[test]
fn test_add_accepted_enqueues_and_counts() {
    let conn = open_db();
    let remote = InMemoryQueue::new().with_map(map("25f", 120));
    let limits = Limits {
        request_limit: 3,
        queue_request_limit: 2,
        ..Limits::default()
    };

    let result = apply_engine_command(add("viewer", "25f"), &ctx(&conn, &remote, &limits)).unwrap();

    assert_eq!(
        result,
        EngineCommandResult::Added {
            id: "25f".to_string(),
            title: "Song 25f".to_string(),
            remaining: Some(2),
        }
    );
    assert_eq!(remote.queued_ids(), vec!["25f"]);
    let counters = StateRepo::get_counters(&conn, "viewer").unwrap();
    assert_eq!(
        (counters.successful_requests, counters.requests_in_queue),
        (1, 1)
    );
}

#[test]
fn test_add_without_limits_leaves_counters_alone() {
    let conn = open_db();
    let remote = InMemoryQueue::new().with_map(map("25f", 120));
    let limits = Limits::default();

    let result = apply_engine_command(add("viewer", "25f"), &ctx(&conn, &remote, &limits)).unwrap();

    assert!(matches!(result, EngineCommandResult::Added { remaining: None, .. }));
    assert_eq!(
        StateRepo::get_counters(&conn, "viewer").unwrap(),
        sdrmm_core::UserCounters::new(0, 0)
    );
}

#[test]
fn test_add_rejected_when_queue_closed_has_no_side_effects() {
    let conn = setup_db();
    let remote = InMemoryQueue::new().with_map(map("25f", 120));
    let limits = Limits {
        request_limit: 3,
        ..Limits::default()
    };

    let result = apply_engine_command(add("viewer", "25f"), &ctx(&conn, &remote, &limits)).unwrap();

    assert_eq!(result, EngineCommandResult::Rejected(Rejection::QueueClosed));
    assert!(remote.mutations().is_empty());
    assert_eq!(StateRepo::get_user_requests(&conn, "viewer").unwrap(), 0);
}

#[test]
fn test_rejection_is_logged_with_its_code() {
    let capture = init_test_capture();
    let conn = setup_db();
    let remote = InMemoryQueue::new().with_map(map("rejlog7", 120));
    let limits = Limits::default();

    apply_engine_command(add("viewer", "rejlog7"), &ctx(&conn, &remote, &limits)).unwrap();

    let logged = capture.count_events(|e| {
        e.field(FIELD_MAP_ID) == Some("rejlog7")
            && e.field(FIELD_REJECTION_CODE) == Some("REJ_QUEUE_CLOSED")
    });
    assert_eq!(logged, 1);
}

#[test]
fn test_request_limit_boundary() {
    let conn = open_db();
    let remote = InMemoryQueue::new().with_map(map("25f", 120));
    let limits = Limits {
        request_limit: 3,
        ..Limits::default()
    };

    StateRepo::set_user_requests(&conn, "viewer", 3).unwrap();
    let result = apply_engine_command(add("viewer", "25f"), &ctx(&conn, &remote, &limits)).unwrap();
    assert_eq!(
        result,
        EngineCommandResult::Rejected(Rejection::UserRequestLimitReached { limit: 3 })
    );

    StateRepo::set_user_requests(&conn, "viewer", 2).unwrap();
    let result = apply_engine_command(add("viewer", "25f"), &ctx(&conn, &remote, &limits)).unwrap();
    assert!(matches!(result, EngineCommandResult::Added { remaining: Some(0), .. }));
}

#[test]
fn test_counter_above_limit_passes_strict_equality() {
    let conn = open_db();
    let remote = InMemoryQueue::new().with_map(map("25f", 120));
    let limits = Limits {
        request_limit: 3,
        ..Limits::default()
    };
    StateRepo::set_user_requests(&conn, "viewer", 5).unwrap();

    let result = apply_engine_command(add("viewer", "25f"), &ctx(&conn, &remote, &limits)).unwrap();

    assert!(matches!(result, EngineCommandResult::Added { remaining: Some(-3), .. }));
}

#[test]
fn test_banned_map_is_rejected() {
    let conn = open_db();
    let remote = InMemoryQueue::new().with_map(map("25f", 120));
    let limits = Limits::default();
    StateRepo::ban_map(&conn, "25f", "hash-25f").unwrap();

    let result = apply_engine_command(add("viewer", "25f"), &ctx(&conn, &remote, &limits)).unwrap();

    assert_eq!(
        result,
        EngineCommandResult::Rejected(Rejection::Banned {
            id: "25f".to_string()
        })
    );
}

#[test]
fn test_modadd_bypasses_filter() {
    let conn = setup_db();
    let remote = InMemoryQueue::new().with_map(map("25f", 9_999));
    let limits = Limits {
        max_duration: 600,
        ..Limits::default()
    };
    StateRepo::ban_map(&conn, "25f", "hash-25f").unwrap();

    let cmd = Command::Add {
        id: "25f".to_string(),
        username: "moderator".to_string(),
        modadd: true,
    };
    let result = apply_engine_command(cmd, &ctx(&conn, &remote, &limits)).unwrap();

    assert!(matches!(result, EngineCommandResult::Added { .. }));
    assert_eq!(remote.queued_ids(), vec!["25f"]);
}

#[test]
fn test_fetch_failure_is_fatal() {
    let conn = open_db();
    let remote = InMemoryQueue::new();
    let limits = Limits::default();

    let err = apply_engine_command(add("viewer", "missing"), &ctx(&conn, &remote, &limits))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ExternalService);
}

#[test]
fn test_enqueue_failure_leaves_counters_untouched() {
    let conn = open_db();
    let remote = InMemoryQueue::new().with_map(map("25f", 120));
    remote.fail_on(RemoteOp::Enqueue);
    let limits = Limits {
        request_limit: 3,
        ..Limits::default()
    };

    let err = apply_engine_command(add("viewer", "25f"), &ctx(&conn, &remote, &limits))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ExternalService);
    assert_eq!(StateRepo::get_user_requests(&conn, "viewer").unwrap(), 0);
}

#[test]
fn test_wip_skips_filter() {
    let conn = setup_db();
    let remote = InMemoryQueue::new();
    let limits = Limits::default();

    let cmd = Command::Wip {
        id: "abc123".to_string(),
        username: "viewer".to_string(),
    };
    let result = apply_engine_command(cmd, &ctx(&conn, &remote, &limits)).unwrap();

    assert_eq!(result.to_string(), "Added WIP abc123.");
    assert_eq!(
        remote.calls(),
        vec![RemoteCall::AddWip {
            id: "abc123".to_string(),
            requester: "viewer".to_string()
        }]
    );
}
