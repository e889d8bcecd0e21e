//! Namespace Tests
//!
//! Tests verify:
//! - Creation and name validation
//! - Attach/detach/destroy refcounting
//! - Corruption detection through the raw state word
//! - Auto-destroy on the last detach
//! - Concurrent attach/detach

use databroker::config::MAX_KEY_LEN;
use databroker::namespace::{Namespace, RawState};
use databroker::BrokerError;

// =============================================================================
// Creation Tests
// =============================================================================

#[test]
fn test_create_sets_refcount_and_name() {
    let ns = Namespace::create("Test").unwrap();

    assert_eq!(ns.refcount(), 1);
    assert_eq!(ns.name_len(), 4);
    assert_eq!(ns.name(), "Test");
    assert!(ns.is_live());
}

#[test]
fn test_create_empty_name_fails() {
    let result = Namespace::create("");
    assert!(matches!(result, Err(BrokerError::InvalidArgument(_))));
}

#[test]
fn test_create_name_too_long_fails() {
    let toolong = "x".repeat(MAX_KEY_LEN + 1);
    let result = Namespace::create(&toolong);
    assert_eq!(
        result.unwrap_err(),
        BrokerError::NameTooLong {
            len: MAX_KEY_LEN + 1,
            max: MAX_KEY_LEN
        }
    );
}

#[test]
fn test_create_name_at_limit_succeeds() {
    let name = "y".repeat(MAX_KEY_LEN);
    let ns = Namespace::create(&name).unwrap();
    assert_eq!(ns.name_len(), MAX_KEY_LEN);
    assert_eq!(ns.name(), name);
}

#[test]
fn test_create_with_custom_limit() {
    assert!(Namespace::create_with_limit("abcd", 4).is_ok());
    assert!(matches!(
        Namespace::create_with_limit("abcde", 4),
        Err(BrokerError::NameTooLong { len: 5, max: 4 })
    ));
}

#[test]
fn test_every_create_has_distinct_identity() {
    let a = Namespace::create("same").unwrap();
    let b = Namespace::create("same").unwrap();

    assert_ne!(a.id(), b.id());
    assert!(!a.same_as(&b));
    assert!(a.same_as(&a.clone()));
}

// =============================================================================
// Refcount Tests
// =============================================================================

#[test]
fn test_attach_detach_roundtrip() {
    let ns = Namespace::create("Test").unwrap();

    assert_eq!(ns.attach().unwrap(), 2);
    assert_eq!(ns.refcount(), 2);
    assert_eq!(ns.detach().unwrap(), 1);
    assert_eq!(ns.refcount(), 1);
}

#[test]
fn test_many_attaches() {
    let ns = Namespace::create("many").unwrap();

    for expected in 2..=50 {
        assert_eq!(ns.attach().unwrap(), expected);
    }
    for expected in (1..50).rev() {
        assert_eq!(ns.detach().unwrap(), expected);
    }
    assert!(ns.is_live());
}

#[test]
fn test_clone_does_not_change_refcount() {
    let ns = Namespace::create("clone").unwrap();
    let other = ns.clone();

    assert_eq!(ns.refcount(), 1);
    other.attach().unwrap();
    assert_eq!(ns.refcount(), 2);
}

#[test]
fn test_destroy_busy_leaves_refcount() {
    let ns = Namespace::create("Test").unwrap();
    ns.attach().unwrap();

    let result = ns.destroy();
    assert_eq!(
        result.unwrap_err(),
        BrokerError::Busy {
            name: "Test".to_string(),
            refcount: 2
        }
    );
    assert_eq!(ns.refcount(), 2);
    assert!(ns.is_live());
}

#[test]
fn test_destroy_sole_holder() {
    let ns = Namespace::create("Test").unwrap();

    assert_eq!(ns.destroy().unwrap(), 0);
    assert!(!ns.is_live());
    assert_eq!(ns.refcount(), 0);
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_tampered_refcount_is_detected() {
    let ns = Namespace::create("Test").unwrap();
    let original = ns.raw_state();

    ns.restore_raw_state(RawState {
        refcount: original.refcount + 1,
        token: original.token,
    });
    assert_eq!(ns.refcount(), 2);

    assert!(matches!(ns.attach(), Err(BrokerError::Corrupted { .. })));
    assert!(matches!(ns.destroy(), Err(BrokerError::Corrupted { .. })));
    assert!(matches!(ns.detach(), Err(BrokerError::Corrupted { .. })));
    assert_eq!(ns.refcount(), 2);

    ns.restore_raw_state(original);
    assert_eq!(ns.refcount(), 1);
    assert_eq!(ns.attach().unwrap(), 2);
    assert_eq!(ns.detach().unwrap(), 1);
}

#[test]
fn test_tampered_token_is_detected() {
    let ns = Namespace::create("token").unwrap();
    let original = ns.raw_state();

    ns.restore_raw_state(RawState {
        refcount: original.refcount,
        token: original.token ^ 1,
    });
    assert!(!ns.is_live());
    assert!(matches!(ns.attach(), Err(BrokerError::Corrupted { .. })));

    ns.restore_raw_state(original);
    assert!(ns.is_live());
}

#[test]
fn test_state_does_not_transfer_between_names() {
    let a = Namespace::create("alpha").unwrap();
    let b = Namespace::create("beta").unwrap();

    b.restore_raw_state(a.raw_state());
    assert!(matches!(b.attach(), Err(BrokerError::Corrupted { .. })));
}

#[test]
fn test_corrupted_error_is_fatal() {
    let ns = Namespace::create("fatal").unwrap();
    ns.destroy().unwrap();
    assert!(ns.attach().unwrap_err().is_fatal());
}

// =============================================================================
// Auto-destroy Tests
// =============================================================================

#[test]
fn test_detach_to_zero_autodestroys() {
    let ns = Namespace::create("Test").unwrap();

    assert_eq!(ns.detach().unwrap(), 0);
    assert!(!ns.is_live());

    assert!(matches!(ns.attach(), Err(BrokerError::Corrupted { .. })));
    assert!(matches!(ns.destroy(), Err(BrokerError::Corrupted { .. })));
    assert!(matches!(ns.detach(), Err(BrokerError::Corrupted { .. })));
}

#[test]
fn test_accessors_work_after_release() {
    let ns = Namespace::create("diag").unwrap();
    ns.detach().unwrap();

    assert_eq!(ns.name(), "diag");
    assert_eq!(ns.name_len(), 4);
    assert_eq!(ns.refcount(), 0);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_attach_detach_balances() {
    let ns = Namespace::create("shared").unwrap();

    crossbeam::scope(|s| {
        for _ in 0..8 {
            s.spawn(|_| {
                for _ in 0..1000 {
                    ns.attach().unwrap();
                    ns.detach().unwrap();
                }
            });
        }
    })
    .unwrap();

    assert_eq!(ns.refcount(), 1);
    assert!(ns.is_live());
}

#[test]
fn test_concurrent_attaches_are_counted() {
    let ns = Namespace::create("counted").unwrap();

    crossbeam::scope(|s| {
        for _ in 0..4 {
            s.spawn(|_| {
                for _ in 0..250 {
                    ns.attach().unwrap();
                }
            });
        }
    })
    .unwrap();

    assert_eq!(ns.refcount(), 1001);
}

#[test]
fn test_release_races_with_attach() {
    // Either the attach wins (and the detach leaves 1 holder) or the detach
    // releases first and the attach fails; never both succeed on a released
    // namespace.
    for round in 0..200 {
        let ns = Namespace::create(&format!("race{}", round)).unwrap();

        let (attached, detached) = crossbeam::scope(|s| {
            let a = s.spawn(|_| ns.attach());
            let d = s.spawn(|_| ns.detach());
            (a.join().unwrap(), d.join().unwrap())
        })
        .unwrap();

        match (attached, detached) {
            (Ok(_), Ok(_)) => {
                assert_eq!(ns.refcount(), 1);
                assert!(ns.is_live());
            }
            (Err(BrokerError::Corrupted { .. }), Ok(0)) => {
                assert!(!ns.is_live());
            }
            other => panic!("unexpected interleaving: {:?}", other),
        }
    }
}
