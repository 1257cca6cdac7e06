//! Join engine tests against the in-memory backend
//!
//! Covers the subscription + product projection: live catalog price, inner
//! join semantics for dangling product references, and the expiring query.

use chrono::{Duration, Utc};
use subsman_db::{
    MemoryRepositories, ProductRepository, SubscriptionRepository, UserRepository,
};
use subsman_types::{Product, Subscription, SubscriptionView, User};

fn sorted_names(mut views: Vec<SubscriptionView>) -> Vec<String> {
    views.sort_by(|a, b| a.product_name.cmp(&b.product_name));
    views.into_iter().map(|v| v.product_name).collect()
}

async fn setup() -> (MemoryRepositories, User, Product, Product) {
    let repos = MemoryRepositories::new();
    let user = repos
        .users
        .create(User::new("john_doe", "john@example.com", "password123"))
        .await
        .unwrap();
    let netflix = repos
        .products
        .create(Product::new("Netflix", "Movies and shows", 15.99, "monthly", "streaming"))
        .await
        .unwrap();
    let spotify = repos
        .products
        .create(Product::new("Spotify", "Music", 9.99, "monthly", "music"))
        .await
        .unwrap();
    (repos, user, netflix, spotify)
}

#[tokio::test]
async fn test_view_carries_live_product_fields() {
    let (repos, user, mut netflix, _) = setup().await;
    let sub = repos
        .subscriptions
        .create(Subscription::for_product(user.id, &netflix, Utc::now()))
        .await
        .unwrap();

    // Catalog price changes after subscribing
    netflix.price = 17.99;
    repos.products.update(&netflix).await.unwrap();

    for views in [
        repos.subscriptions.get_all().await.unwrap(),
        repos.subscriptions.get_by_user_id(user.id).await.unwrap(),
        repos.subscriptions.get_active().await.unwrap(),
    ] {
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, sub.id);
        assert_eq!(views[0].product_name, "Netflix");
        assert_eq!(views[0].description, "Movies and shows");
        assert_eq!(views[0].price, 17.99);
    }

    // The raw entity keeps its snapshot
    let raw = repos.subscriptions.get_by_id(sub.id).await.unwrap();
    assert_eq!(raw.price_at_start, 15.99);
}

#[tokio::test]
async fn test_dangling_product_is_dropped_from_every_view() {
    let (repos, user, netflix, spotify) = setup().await;
    let now = Utc::now();
    repos
        .subscriptions
        .create(Subscription::for_product(user.id, &netflix, now - Duration::days(40)))
        .await
        .unwrap();
    let orphan = repos
        .subscriptions
        .create(Subscription::for_product(user.id, &spotify, now - Duration::days(40)))
        .await
        .unwrap();

    repos.products.delete(spotify.id).await.unwrap();

    assert_eq!(sorted_names(repos.subscriptions.get_all().await.unwrap()), ["Netflix"]);
    assert_eq!(
        sorted_names(repos.subscriptions.get_by_user_id(user.id).await.unwrap()),
        ["Netflix"]
    );
    assert_eq!(sorted_names(repos.subscriptions.get_active().await.unwrap()), ["Netflix"]);
    assert_eq!(
        sorted_names(repos.subscriptions.get_expiring(30).await.unwrap()),
        ["Netflix"]
    );

    // Raw reads still see the orphan
    assert_eq!(repos.subscriptions.count().await.unwrap(), 2);
    let by_product = repos.subscriptions.get_by_product_id(spotify.id).await.unwrap();
    assert_eq!(by_product.len(), 1);
    assert_eq!(by_product[0].id, orphan.id);
}

#[tokio::test]
async fn test_get_expiring_zero_days_is_due_now() {
    let (repos, user, netflix, spotify) = setup().await;
    let now = Utc::now();

    let mut overdue = Subscription::for_product(user.id, &netflix, now);
    overdue.next_billing = now - Duration::hours(1);
    let overdue = repos.subscriptions.create(overdue).await.unwrap();

    let mut upcoming = Subscription::for_product(user.id, &spotify, now);
    upcoming.next_billing = now + Duration::days(3);
    repos.subscriptions.create(upcoming).await.unwrap();

    let mut cancelled = Subscription::for_product(user.id, &netflix, now);
    cancelled.next_billing = now - Duration::hours(2);
    cancelled.cancel_at(now);
    repos.subscriptions.create(cancelled).await.unwrap();

    let due = repos.subscriptions.get_expiring(0).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, overdue.id);

    assert_eq!(repos.subscriptions.get_expiring(5).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_replaces_fields_but_keeps_price_snapshot() {
    let (repos, user, netflix, _) = setup().await;
    let mut sub = repos
        .subscriptions
        .create(Subscription::for_product(user.id, &netflix, Utc::now()))
        .await
        .unwrap();

    sub.cancel();
    sub.price_at_start = 0.01;
    repos.subscriptions.update(&sub).await.unwrap();

    let stored = repos.subscriptions.get_by_id(sub.id).await.unwrap();
    assert!(stored.is_cancelled());
    assert!(stored.end_date.is_some());
    assert_eq!(stored.price_at_start, 15.99);
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let repos = MemoryRepositories::new();
    let ghost = Subscription::for_product(
        subsman_types::UserId::new(),
        &Product::new("Ghost", "", 1.0, "monthly", "none"),
        Utc::now(),
    );

    assert!(repos.subscriptions.get_by_id(ghost.id).await.unwrap_err().is_not_found());
    assert!(repos.subscriptions.update(&ghost).await.unwrap_err().is_not_found());
    assert!(repos.subscriptions.delete(ghost.id).await.unwrap_err().is_not_found());
    assert!(repos.subscriptions.get_all().await.unwrap().is_empty());
}
