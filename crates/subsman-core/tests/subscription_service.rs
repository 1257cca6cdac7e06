//! Subscription service tests over the in-memory store

mod common;

use std::sync::Arc;

use chrono::{Duration, Months, Utc};
use common::{FailingSubscriptionRepository, TestServices};
use subsman_core::{ServiceError, SubscriptionService};
use subsman_db::{DbError, SubscriptionRepository};
use subsman_types::{ProductId, SubscriptionId, SubscriptionStatus, UserId};

#[tokio::test]
async fn test_create_subscription_snapshots_price() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let mut netflix = svc.product("Netflix", 15.99).await;

    let start = Utc::now() - Duration::days(3);
    let sub = svc
        .subscriptions
        .create_subscription(john.id, netflix.id, Some(start))
        .await
        .unwrap();

    assert_eq!(sub.status, SubscriptionStatus::Active);
    assert_eq!(sub.price_at_start, 15.99);
    assert_eq!(sub.start_date, start);
    assert_eq!(sub.next_billing, start + Months::new(1));
    assert!(sub.end_date.is_none());

    // Later price changes show in views but never in the snapshot
    netflix.price = 19.99;
    svc.products.update_product(netflix).await.unwrap();

    let stored = svc.subscriptions.get_subscription(sub.id).await.unwrap();
    assert_eq!(stored.price_at_start, 15.99);
    let views = svc.subscriptions.list_user_subscriptions(john.id).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].price, 19.99);
    assert_eq!(views[0].product_name, "Netflix");
}

#[tokio::test]
async fn test_create_subscription_defaults_start_to_now() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let spotify = svc.product("Spotify", 9.99).await;

    let before = Utc::now();
    let sub = svc
        .subscriptions
        .create_subscription(john.id, spotify.id, None)
        .await
        .unwrap();

    assert!(sub.start_date >= before);
    assert!(sub.start_date <= Utc::now());
}

#[tokio::test]
async fn test_create_subscription_requires_existing_user_and_product() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let netflix = svc.product("Netflix", 15.99).await;

    let no_user = svc
        .subscriptions
        .create_subscription(UserId::new(), netflix.id, None)
        .await
        .unwrap_err();
    assert_eq!(no_user.to_string(), "user not found");

    let no_product = svc
        .subscriptions
        .create_subscription(john.id, ProductId::new(), None)
        .await
        .unwrap_err();
    assert_eq!(no_product.to_string(), "product not found");

    assert_eq!(svc.subscriptions.count_subscriptions().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_subscription_rejects_inactive_product_and_user() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let jane = svc.user("jane").await;
    let netflix = svc.product("Netflix", 15.99).await;
    let spotify = svc.product("Spotify", 9.99).await;

    svc.products.deactivate_product(netflix.id).await.unwrap();
    let result = svc
        .subscriptions
        .create_subscription(john.id, netflix.id, None)
        .await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));

    svc.users.deactivate_user(jane.id).await.unwrap();
    let result = svc
        .subscriptions
        .create_subscription(jane.id, spotify.id, None)
        .await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn test_cancel_subscription_persists() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let netflix = svc.product("Netflix", 15.99).await;
    let sub = svc
        .subscriptions
        .create_subscription(john.id, netflix.id, None)
        .await
        .unwrap();

    let cancelled = svc.subscriptions.cancel_subscription(sub.id).await.unwrap();
    assert!(cancelled.is_cancelled());
    assert!(cancelled.end_date.is_some());

    let stored = svc.subscriptions.get_subscription(sub.id).await.unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Cancelled);
    assert_eq!(stored.end_date, cancelled.end_date);
    assert!(svc
        .subscriptions
        .list_active_subscriptions()
        .await
        .unwrap()
        .is_empty());

    // Cancelling again is allowed and keeps the status
    let again = svc.subscriptions.cancel_subscription(sub.id).await.unwrap();
    assert!(again.is_cancelled());
}

#[tokio::test]
async fn test_cancel_expired_subscription_is_rejected() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let netflix = svc.product("Netflix", 15.99).await;
    let mut sub = svc
        .subscriptions
        .create_subscription(john.id, netflix.id, None)
        .await
        .unwrap();

    sub.status = SubscriptionStatus::Expired;
    svc.repos.subscriptions.update(&sub).await.unwrap();

    let result = svc.subscriptions.cancel_subscription(sub.id).await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
    let stored = svc.subscriptions.get_subscription(sub.id).await.unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Expired);
}

#[tokio::test]
async fn test_renew_subscription_advances_billing() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let netflix = svc.product("Netflix", 15.99).await;
    let sub = svc
        .subscriptions
        .create_subscription(john.id, netflix.id, None)
        .await
        .unwrap();

    let renewal = svc.subscriptions.renew_subscription(sub.id).await.unwrap();
    assert!(renewal.renewed);
    assert_eq!(
        renewal.subscription.next_billing,
        sub.next_billing + Months::new(1)
    );

    let stored = svc.subscriptions.get_subscription(sub.id).await.unwrap();
    assert_eq!(stored.next_billing, renewal.subscription.next_billing);
    assert_eq!(stored.price_at_start, 15.99);
}

#[tokio::test]
async fn test_renew_cancelled_subscription_changes_nothing() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let netflix = svc.product("Netflix", 15.99).await;
    let sub = svc
        .subscriptions
        .create_subscription(john.id, netflix.id, None)
        .await
        .unwrap();
    let cancelled = svc.subscriptions.cancel_subscription(sub.id).await.unwrap();

    let renewal = svc.subscriptions.renew_subscription(sub.id).await.unwrap();
    assert!(!renewal.renewed);
    assert_eq!(renewal.subscription.next_billing, sub.next_billing);

    let stored = svc.subscriptions.get_subscription(sub.id).await.unwrap();
    assert_eq!(stored.next_billing, sub.next_billing);
    assert_eq!(stored.updated_at, cancelled.updated_at);
}

#[tokio::test]
async fn test_expiring_window() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let netflix = svc.product("Netflix", 15.99).await;
    let spotify = svc.product("Spotify", 9.99).await;

    // Billed in about 5 days
    let start = Utc::now() - Months::new(1) + Duration::days(5);
    svc.subscriptions
        .create_subscription(john.id, netflix.id, Some(start))
        .await
        .unwrap();
    // Billed in about a month
    svc.subscriptions
        .create_subscription(john.id, spotify.id, None)
        .await
        .unwrap();

    assert!(svc
        .subscriptions
        .list_expiring_subscriptions(0)
        .await
        .unwrap()
        .is_empty());
    let week = svc.subscriptions.list_expiring_subscriptions(7).await.unwrap();
    assert_eq!(week.len(), 1);
    assert_eq!(week[0].product_name, "Netflix");
    assert_eq!(
        svc.subscriptions
            .list_expiring_subscriptions(40)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_expiring_rejects_negative_days() {
    let svc = TestServices::new();

    let result = svc.subscriptions.list_expiring_subscriptions(-1).await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn test_deleted_product_hides_subscription_from_views() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let netflix = svc.product("Netflix", 15.99).await;
    let sub = svc
        .subscriptions
        .create_subscription(john.id, netflix.id, None)
        .await
        .unwrap();

    svc.products.delete_product(netflix.id).await.unwrap();

    assert!(svc.subscriptions.list_subscriptions().await.unwrap().is_empty());
    assert!(svc
        .subscriptions
        .list_user_subscriptions(john.id)
        .await
        .unwrap()
        .is_empty());
    // Raw access still sees the dangling row
    assert!(svc.subscriptions.get_subscription(sub.id).await.is_ok());
    assert_eq!(
        svc.subscriptions
            .list_product_subscriptions(netflix.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_delete_subscription() {
    let svc = TestServices::new();
    let john = svc.user("john").await;
    let netflix = svc.product("Netflix", 15.99).await;
    let sub = svc
        .subscriptions
        .create_subscription(john.id, netflix.id, None)
        .await
        .unwrap();

    svc.subscriptions.delete_subscription(sub.id).await.unwrap();
    assert_eq!(svc.subscriptions.count_subscriptions().await.unwrap(), 0);

    let err = svc.subscriptions.delete_subscription(sub.id).await.unwrap_err();
    assert_eq!(err.to_string(), "subscription not found");
    let err = svc
        .subscriptions
        .cancel_subscription(SubscriptionId::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_storage_errors_propagate() {
    let svc = TestServices::new();
    let failing = SubscriptionService::new(
        Arc::new(FailingSubscriptionRepository),
        Arc::new(svc.repos.products.clone()),
        Arc::new(svc.repos.users.clone()),
    );

    let err = failing.list_subscriptions().await.unwrap_err();
    assert!(matches!(err, ServiceError::Storage(DbError::Timeout)));
    assert_eq!(err.status_code(), 504);
    assert_eq!(err.error_code(), "STORAGE_TIMEOUT");

    let err = failing
        .renew_subscription(SubscriptionId::new())
        .await
        .unwrap_err();
    assert!(!err.is_not_found());
}
