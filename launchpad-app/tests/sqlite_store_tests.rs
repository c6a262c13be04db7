#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `SqliteStore` - covers `DomainRepository`,
//! `DeploymentRepository`, and `LandingPageRepository` trait implementations.

use std::sync::Arc;

use chrono::{Duration, Utc};
use launchpad_app::adapters::SqliteStore;
use launchpad_core::error::CoreError;
use launchpad_core::traits::{DeploymentRepository, DomainRepository, LandingPageRepository};
use launchpad_core::types::{
    AttemptStatus, DeploymentLogEntry, DeploymentStatus, DnsManagement, Domain, DomainDeployment,
    LandingPage, LogLevel, VerificationStatus,
};

// ===== Helpers =====

async fn create_test_store() -> (SqliteStore, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = tmp.path().join("nested").join("test.db");
    let store = SqliteStore::new(&db_path)
        .await
        .expect("failed to create SqliteStore");
    (store, tmp)
}

async fn seed_domain(store: &SqliteStore, name: &str) -> Domain {
    let domain = Domain::new(name, DnsManagement::ProviderManaged).unwrap();
    DomainRepository::save(store, &domain).await.unwrap();
    domain
}

fn attempt_at(domain: &Domain, status: AttemptStatus, minutes_ago: i64) -> DomainDeployment {
    let mut attempt = DomainDeployment::queued(domain);
    attempt.status = status;
    attempt.created_at = Utc::now() - Duration::minutes(minutes_ago);
    if status.is_terminal() {
        attempt.completed_at = Some(attempt.created_at);
    }
    attempt
}

// ===== DomainRepository Tests =====

#[tokio::test]
async fn domain_round_trip_preserves_every_field() {
    let (store, _tmp) = create_test_store().await;
    let mut domain = Domain::new("Example.COM", DnsManagement::ExternallyManaged).unwrap();
    domain.zone_id = Some("zone-1".to_string());
    domain.verification_status = VerificationStatus::Other("misconfigured".to_string());
    domain.deployment_status = DeploymentStatus::Deployed;
    domain.deployment_url = Some("https://example.com".to_string());
    domain.hosting_project_id = Some("prj_1".to_string());
    domain.last_deployed_at = Some(Utc::now());
    DomainRepository::save(&store, &domain).await.unwrap();

    let loaded = DomainRepository::find_by_id(&store, &domain.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.name, "example.com");
    assert_eq!(loaded.dns_management, DnsManagement::ExternallyManaged);
    assert_eq!(loaded.zone_id.as_deref(), Some("zone-1"));
    assert_eq!(loaded.verification_status, domain.verification_status);
    assert_eq!(loaded.deployment_status, DeploymentStatus::Deployed);
    assert_eq!(loaded.hosting_project_id.as_deref(), Some("prj_1"));
    assert_eq!(
        loaded.last_deployed_at.map(|t| t.timestamp_micros()),
        domain.last_deployed_at.map(|t| t.timestamp_micros())
    );

    let by_name = store.find_by_name("example.com").await.unwrap().unwrap();
    assert_eq!(by_name.id, domain.id);
}

#[tokio::test]
async fn domain_save_updates_existing_row() {
    let (store, _tmp) = create_test_store().await;
    let mut domain = seed_domain(&store, "example.com").await;

    domain.zone_id = Some("zone-9".to_string());
    DomainRepository::save(&store, &domain).await.unwrap();

    let all = DomainRepository::find_all(&store).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].zone_id.as_deref(), Some("zone-9"));
}

#[tokio::test]
async fn domain_delete_reports_whether_a_row_existed() {
    let (store, _tmp) = create_test_store().await;
    let domain = seed_domain(&store, "example.com").await;

    assert!(DomainRepository::delete(&store, &domain.id).await.unwrap());
    assert!(!DomainRepository::delete(&store, &domain.id).await.unwrap());
    assert!(DomainRepository::find_by_id(&store, &domain.id)
        .await
        .unwrap()
        .is_none());
}

// ===== DeploymentRepository Tests =====

#[tokio::test]
async fn begin_deployment_claims_the_domain_once() {
    let (store, _tmp) = create_test_store().await;
    let domain = seed_domain(&store, "example.com").await;

    let first = DomainDeployment::queued(&domain);
    let second = DomainDeployment::queued(&domain);
    assert!(store.begin_deployment(&first).await.unwrap());
    assert!(!store.begin_deployment(&second).await.unwrap());

    let loaded = DomainRepository::find_by_id(&store, &domain.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.deployment_status, DeploymentStatus::Deploying);
    let attempts = DeploymentRepository::find_by_domain(&store, &domain.id).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].id, first.id);
}

#[tokio::test]
async fn concurrent_begin_deployment_has_one_winner() {
    let (store, _tmp) = create_test_store().await;
    let store = Arc::new(store);
    let domain = seed_domain(&store, "example.com").await;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let attempt = DomainDeployment::queued(&domain);
            tokio::spawn(async move { store.begin_deployment(&attempt).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        // SQLite may report a busy database to a loser; that still means it lost.
        if let Ok(true) = handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(
        DeploymentRepository::find_by_domain(store.as_ref(), &domain.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn begin_deployment_requires_the_domain() {
    let (store, _tmp) = create_test_store().await;
    let domain = Domain::new("ghost.example", DnsManagement::ProviderManaged).unwrap();

    let err = store
        .begin_deployment(&DomainDeployment::queued(&domain))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::DomainNotFound(_)));
}

#[tokio::test]
async fn logs_append_in_order() {
    let (store, _tmp) = create_test_store().await;
    let domain = seed_domain(&store, "example.com").await;
    let attempt = DomainDeployment::queued(&domain);
    store.begin_deployment(&attempt).await.unwrap();

    store
        .append_log(&attempt.id, &DeploymentLogEntry::info("Deployment started"))
        .await
        .unwrap();
    store
        .append_log(&attempt.id, &DeploymentLogEntry::warning("DNS www: retrying"))
        .await
        .unwrap();

    let loaded = DeploymentRepository::find_by_id(&store, &attempt.id)
        .await
        .unwrap()
        .unwrap();
    let messages: Vec<_> = loaded.logs.iter().map(|l| l.message.as_str()).collect();
    assert_eq!(
        messages,
        ["Deployment queued", "Deployment started", "DNS www: retrying"]
    );
    assert_eq!(loaded.logs[2].level, LogLevel::Warning);

    let err = store
        .append_log("missing", &DeploymentLogEntry::info("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::DeploymentNotFound(_)));
}

#[tokio::test]
async fn set_status_records_completion() {
    let (store, _tmp) = create_test_store().await;
    let domain = seed_domain(&store, "example.com").await;
    let attempt = DomainDeployment::queued(&domain);
    store.begin_deployment(&attempt).await.unwrap();

    store
        .set_status(&attempt.id, AttemptStatus::Deploying, None)
        .await
        .unwrap();
    let done = Utc::now();
    store
        .set_status(&attempt.id, AttemptStatus::Deployed, Some(done))
        .await
        .unwrap();

    let loaded = store.find_latest(&domain.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, AttemptStatus::Deployed);
    assert_eq!(
        loaded.completed_at.map(|t| t.timestamp_micros()),
        Some(done.timestamp_micros())
    );
    assert!(matches!(
        store.set_status("missing", AttemptStatus::Failed, None).await,
        Err(CoreError::DeploymentNotFound(_))
    ));
}

#[tokio::test]
async fn in_flight_lists_oldest_first() {
    let (store, _tmp) = create_test_store().await;
    let a = seed_domain(&store, "a.example").await;
    let b = seed_domain(&store, "b.example").await;
    DeploymentRepository::save(&store, &attempt_at(&a, AttemptStatus::Deploying, 1))
        .await
        .unwrap();
    DeploymentRepository::save(&store, &attempt_at(&b, AttemptStatus::Pending, 5))
        .await
        .unwrap();
    DeploymentRepository::save(&store, &attempt_at(&b, AttemptStatus::Failed, 10))
        .await
        .unwrap();

    let in_flight = store.find_in_flight().await.unwrap();
    let domains: Vec<_> = in_flight.iter().map(|d| d.domain_name.as_str()).collect();
    assert_eq!(domains, ["b.example", "a.example"]);
}

#[tokio::test]
async fn prune_keeps_newest_terminal_attempts() {
    let (store, _tmp) = create_test_store().await;
    let domain = seed_domain(&store, "example.com").await;
    for minutes_ago in [40, 30, 20, 10] {
        DeploymentRepository::save(&store, &attempt_at(&domain, AttemptStatus::Failed, minutes_ago))
            .await
            .unwrap();
    }
    let running = attempt_at(&domain, AttemptStatus::Deploying, 50);
    DeploymentRepository::save(&store, &running).await.unwrap();

    assert_eq!(store.prune_history(&domain.id, 2).await.unwrap(), 2);

    let left = DeploymentRepository::find_by_domain(&store, &domain.id).await.unwrap();
    assert_eq!(left.len(), 3);
    assert!(left.iter().any(|d| d.id == running.id));
    assert_eq!(store.prune_history(&domain.id, 2).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_by_domain_leaves_other_domains() {
    let (store, _tmp) = create_test_store().await;
    let a = seed_domain(&store, "a.example").await;
    let b = seed_domain(&store, "b.example").await;
    DeploymentRepository::save(&store, &attempt_at(&a, AttemptStatus::Failed, 2))
        .await
        .unwrap();
    DeploymentRepository::save(&store, &attempt_at(&a, AttemptStatus::Deployed, 1))
        .await
        .unwrap();
    DeploymentRepository::save(&store, &attempt_at(&b, AttemptStatus::Deployed, 1))
        .await
        .unwrap();

    assert_eq!(store.delete_by_domain(&a.id).await.unwrap(), 2);
    assert!(store.find_latest(&a.id).await.unwrap().is_none());
    assert!(store.find_latest(&b.id).await.unwrap().is_some());
}

// ===== LandingPageRepository Tests =====

#[tokio::test]
async fn landing_pages_round_trip_by_domain() {
    let (store, _tmp) = create_test_store().await;
    let domain = seed_domain(&store, "example.com").await;
    let page = LandingPage {
        id: "lp-1".to_string(),
        domain_id: domain.id.clone(),
        subdomain: Some("promo".to_string()),
        hosting_project_id: Some("prj_lp".to_string()),
        screenshot_key: Some("shots/lp-1.png".to_string()),
        worker_script: Some("lp-1-worker".to_string()),
        created_at: Utc::now(),
    };
    LandingPageRepository::save(&store, &page).await.unwrap();

    let pages = LandingPageRepository::find_by_domain(&store, &domain.id)
        .await
        .unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].hostname(&domain.name), "promo.example.com");
    assert_eq!(pages[0].worker_script.as_deref(), Some("lp-1-worker"));

    assert!(LandingPageRepository::delete(&store, "lp-1").await.unwrap());
    assert!(LandingPageRepository::find_by_id(&store, "lp-1")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn data_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("test.db");
    {
        let store = SqliteStore::new(&db_path).await.unwrap();
        seed_domain(&store, "example.com").await;
    }

    let store = SqliteStore::new(&db_path).await.unwrap();
    assert!(store.find_by_name("example.com").await.unwrap().is_some());
}
