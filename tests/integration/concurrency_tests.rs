// =====================================
// tests/integration/concurrency_tests.rs
// =====================================
//! Concurrent registrations against one flat-file store
use std::sync::Arc;

use credvault_backend_lib::{auth::AuthService, error::CredentialError};

use crate::test_utils::{file_service, stored_records};

const CONTENDERS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_username_registers_exactly_once() {
    let (service, temp_dir) = file_service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move { service.register("racer", &format!("password-{i}")).await })
        })
        .collect();

    let mut successes = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(account) => {
                assert_eq!(account.username, "racer");
                successes += 1;
            },
            Err(CredentialError::DuplicateUser) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(duplicates, CONTENDERS - 1);

    let records = stored_records(&temp_dir);
    assert_eq!(records.iter().filter(|r| r.username == "racer").count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_usernames_are_never_lost() {
    let (service, temp_dir) = file_service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .register(&format!("user{i:02}"), "hunter22")
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut names: Vec<_> = stored_records(&temp_dir)
        .into_iter()
        .map(|r| r.username)
        .collect();
    names.sort();
    let expected: Vec<_> = (0..CONTENDERS).map(|i| format!("user{i:02}")).collect();
    assert_eq!(names, expected);

    for name in &expected {
        assert!(service.authenticate(name, "hunter22").await.is_ok());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_logins_during_signups_never_see_torn_store() {
    let (service, _temp_dir) = file_service();
    let service = Arc::new(service);
    service.register("steady", "hunter22").await.unwrap();

    let writers: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move { service.register(&format!("writer{i}"), "hunter22").await })
        })
        .collect();
    let readers: Vec<_> = (0..CONTENDERS)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.authenticate("steady", "hunter22").await })
        })
        .collect();

    for handle in writers {
        handle.await.unwrap().unwrap();
    }
    for handle in readers {
        let account = handle.await.unwrap().unwrap();
        assert_eq!(account.username, "steady");
    }
}
