use confab_core::{ConnectionId, ServerSignal};

use crate::utils::{SIGNAL_TIMEOUT_MS, join};
use crate::{init_tracing, spawn_test_relay};

#[tokio::test]
async fn test_each_joiner_sees_prior_members_in_join_order() {
    init_tracing();

    let (relay_tx, output) = spawn_test_relay();

    let a = ConnectionId::new();
    let b = ConnectionId::new();
    let c = ConnectionId::new();

    join(&relay_tx, &a, "r1", "ana").await;
    assert!(output.wait_for_count(&a, 1, SIGNAL_TIMEOUT_MS).await);
    let to_a = output.sent_to(&a).await;
    let ServerSignal::ExistingUsers(existing) = &to_a[0] else {
        panic!("first signal to a joiner must be existing-users");
    };
    assert!(existing.is_empty(), "first joiner sees an empty room");

    join(&relay_tx, &b, "r1", "bo").await;
    assert!(output.wait_for_count(&b, 1, SIGNAL_TIMEOUT_MS).await);
    let to_b = output.sent_to(&b).await;
    let ServerSignal::ExistingUsers(existing) = &to_b[0] else {
        panic!("first signal to a joiner must be existing-users");
    };
    assert_eq!(existing.len(), 1);
    assert_eq!(existing[0].id, a);
    assert_eq!(existing[0].username, "ana");

    join(&relay_tx, &c, "r1", "cy").await;
    assert!(output.wait_for_count(&c, 1, SIGNAL_TIMEOUT_MS).await);
    let to_c = output.sent_to(&c).await;
    let ServerSignal::ExistingUsers(existing) = &to_c[0] else {
        panic!("first signal to a joiner must be existing-users");
    };
    assert_eq!(
        existing.iter().map(|p| p.id.clone()).collect::<Vec<_>>(),
        vec![a.clone(), b.clone()],
        "existing users arrive in join order, without the joiner",
    );

    // The members that were already present heard about each newcomer.
    assert!(output.wait_for_count(&a, 3, SIGNAL_TIMEOUT_MS).await);
    let to_a = output.sent_to(&a).await;
    assert!(matches!(&to_a[1], ServerSignal::UserJoined(p) if p.id == b));
    assert!(matches!(&to_a[2], ServerSignal::UserJoined(p) if p.id == c));

    // The joiner itself never receives its own user-joined.
    let to_c = output.sent_to(&c).await;
    assert!(
        !to_c
            .iter()
            .any(|s| matches!(s, ServerSignal::UserJoined(p) if p.id == c))
    );
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    init_tracing();

    let (relay_tx, output) = spawn_test_relay();

    let a = ConnectionId::new();
    let d = ConnectionId::new();

    join(&relay_tx, &a, "r1", "ana").await;
    join(&relay_tx, &d, "r2", "dee").await;

    assert!(output.wait_for_count(&d, 1, SIGNAL_TIMEOUT_MS).await);
    let to_d = output.sent_to(&d).await;
    let ServerSignal::ExistingUsers(existing) = &to_d[0] else {
        panic!("first signal to a joiner must be existing-users");
    };
    assert!(existing.is_empty(), "a different room starts empty");

    // No cross-room join announcement.
    let to_a = output.sent_to(&a).await;
    assert_eq!(to_a.len(), 1, "a only has its own existing-users");
}
