use rust_decimal::Decimal;
use std::sync::Arc;

use uport_storefront::session::{Session, SessionContext};
use uport_storefront::store::{keys, KeyValueStore, SqliteStore};

fn acme() -> Session {
    Session {
        user_id: "7".into(),
        name: "Acme Co".into(),
        user_type: "2".into(),
        token: "abc".into(),
        minimum_qty: Some(3),
    }
}

#[tokio::test]
async fn session_round_trip_in_memory() {
    let store = Arc::new(SqliteStore::open("sqlite::memory:").await.unwrap());
    let session = SessionContext::new(store.clone());

    session.save(&acme()).await.unwrap();
    let user = session.current().await.unwrap();
    assert_eq!(user.id.as_deref(), Some("7"));
    assert_eq!(user.name.as_deref(), Some("Acme Co"));
    assert_eq!(user.user_type.as_deref(), Some("2"));
    assert_eq!(user.token.as_deref(), Some("abc"));
    assert_eq!(session.minimum_qty().await.unwrap(), Some(3));

    session.set_cart_count(4).await.unwrap();
    session.set_cart_count(5).await.unwrap();
    assert_eq!(session.cart_count().await.unwrap(), 5);

    session.clear().await.unwrap();
    assert!(!session.is_logged_in().await.unwrap());
    assert_eq!(store.get(keys::TOKEN).await.unwrap(), None);
    assert_eq!(store.get(keys::CART_COUNT).await.unwrap().as_deref(), Some("5"));

    store.clear().await.unwrap();
    assert_eq!(store.get(keys::CART_COUNT).await.unwrap(), None);
}

#[tokio::test]
async fn values_survive_reopen() {
    let td = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", td.path().join("data").join("storefront.db").display());

    {
        let store = Arc::new(SqliteStore::open(&url).await.unwrap());
        let session = SessionContext::new(store.clone());
        session.save(&acme()).await.unwrap();
        session
            .set_delivery_charge(Decimal::new(2500, 2))
            .await
            .unwrap();
        store.pool().close().await;
    }

    let store = Arc::new(SqliteStore::open(&url).await.unwrap());
    let session = SessionContext::new(store);
    assert!(session.is_logged_in().await.unwrap());
    assert_eq!(session.token().await.unwrap().as_deref(), Some("abc"));
    assert_eq!(
        session.delivery_charge().await.unwrap(),
        Some(Decimal::from(25))
    );
}
