mod common;

use common::{harness, logged_in, ok};
use serde_json::json;
use uport_storefront::model::OrderStatus;
use uport_storefront::navigation::{Navigator, Route};
use uport_storefront::screens::{
    HomeScreen, MyOrdersScreen, NoticeKind, OrderDetailsScreen, ProfileScreen, SettingsScreen,
    Transition,
};
use uport_storefront::services::media::FileImageSource;
use uport_storefront::store::keys;

#[tokio::test]
async fn order_history_and_details() {
    let h = logged_in(vec![
        json!({"status": 1, "result": [
            {"id": 31, "order_number": "UP-1001", "total_amount": "320.00", "status": "2",
             "created_at": "2024-03-05 10:15:00"},
            {"id": 32, "order_number": "", "total_amount": 90, "status": 0, "created_at": ""}
        ]}),
        ok(json!({
            "id": 31, "order_number": "UP-1001", "total_amount": "320", "delivery_charge": "20",
            "status": 2, "created_at": "2024-03-05 10:15:00",
            "items": [{"id": 1, "product_name": "Rice", "quantity": 2, "price": "100"}]
        })),
    ])
    .await;

    let mut orders = MyOrdersScreen::new(h.ctx.clone());
    orders.load().await;
    assert_eq!(orders.orders.len(), 2);
    assert_eq!(orders.orders[0].status(), OrderStatus::Delivered);
    assert_eq!(orders.orders[1].status(), OrderStatus::Pending);

    let rendered = orders.to_string();
    assert!(rendered.contains("UP-1001"));
    assert!(rendered.contains("05 Mar 2024"));
    assert!(rendered.contains("Delivered"));

    let outcome = orders.open(0);
    let mut nav = Navigator::new(Route::MyOrders);
    outcome.transition.as_ref().unwrap().apply(&mut nav);
    assert_eq!(nav.current(), &Route::OrderDetails { order_id: 31 });
    assert!(orders.open(9).is_error());

    let mut details = OrderDetailsScreen::new(h.ctx.clone(), 31);
    assert!(details.load().await.notice.is_none());
    let order = details.order.as_ref().unwrap();
    assert_eq!(order.items.len(), 1);
    assert!(details.to_string().contains("Rice x 2"));

    let requests = h.transport.requests().await;
    assert_eq!(requests[0].path, "api/v1/GetMyOrder/7");
    assert_eq!(requests[1].path, "api/v1/GetOrderDetails");
    assert_eq!(
        requests[1].body,
        Some(json!({"order": {"order_id": 31, "user_id": 7, "user_type": 2}}))
    );
}

#[tokio::test]
async fn profile_load_and_update() {
    let h = logged_in(vec![
        ok(json!({
            "id": 7, "name": "Acme Co", "mobile": "9876543210", "email": "acme@example.com",
            "company_name": "Acme", "landmark": "Bus stand", "address": "1 Market St", "area": "Adyar"
        })),
        json!({"status": 1, "message": "Profile updated"}),
    ])
    .await;

    let mut screen = ProfileScreen::new(h.ctx.clone());
    assert!(screen.load().await.notice.is_none());
    assert_eq!(screen.form.landmark, "Bus stand");
    assert!(screen.to_string().contains("acme@example.com"));

    screen.form.name = "Acme Traders".into();
    screen.form.address = String::new();
    assert_eq!(
        screen.update().await.notice.unwrap().message,
        "Please fill all fields"
    );

    screen.form.address = "2 Market St".into();
    let outcome = screen.update().await;
    assert_eq!(outcome.notice.unwrap().message, "Profile updated");
    assert_eq!(screen.user_name, "Acme Traders");
    assert_eq!(
        h.store.snapshot().await.get(keys::USER_NAME).map(String::as_str),
        Some("Acme Traders")
    );

    let requests = h.transport.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "api/v1/MyProfile/7");
    assert_eq!(
        requests[1].body,
        Some(json!({
            "user_id": "7", "name": "Acme Traders", "landmark": "Bus stand", "address": "2 Market St"
        }))
    );

    let outcome = screen.logout().await;
    assert_eq!(outcome.transition, Some(Transition::Reset(Route::Login)));
    assert!(!h.ctx.session.is_logged_in().await.unwrap());
}

#[tokio::test]
async fn settings_persist_notification_preference() {
    let h = harness(vec![json!({"status": 0, "message": "Please update the app"})]);

    let mut settings = SettingsScreen::new(h.ctx.clone());
    settings.load().await;
    assert!(settings.notifications);
    assert_eq!(settings.app_version, "1.0.41");

    settings.set_notifications(false).await;
    assert_eq!(
        h.store.snapshot().await.get(keys::NOTIFICATIONS).map(String::as_str),
        Some("0")
    );
    let mut reloaded = SettingsScreen::new(h.ctx.clone());
    reloaded.load().await;
    assert!(!reloaded.notifications);

    let outcome = settings.check_version().await;
    let notice = outcome.notice.unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.message, "Please update the app");
    assert_eq!(settings.update_available, Some(true));
    assert_eq!(h.transport.paths().await, ["api/v1/CheckVersion/1.0.41"]);
}

#[tokio::test]
async fn grocery_list_upload() {
    let td = tempfile::tempdir().unwrap();
    let photo = td.path().join("list.png");
    std::fs::write(&photo, b"\x89PNG fake").unwrap();

    // logged out: nothing is captured or sent
    let guest = harness(vec![]);
    let mut home = HomeScreen::new(guest.ctx.clone());
    let outcome = home
        .upload_grocery_list(&FileImageSource::new(&photo))
        .await;
    assert_eq!(outcome.notice.unwrap().message, "Please login to continue");
    assert!(guest.transport.uploads().await.is_empty());

    let h = logged_in(vec![json!({"status": 1, "message": "List received"})]).await;
    let mut home = HomeScreen::new(h.ctx.clone());

    let cancelled = home.upload_grocery_list(&FileImageSource::new("")).await;
    assert_eq!(cancelled.notice.unwrap().kind, NoticeKind::Info);

    let missing = home
        .upload_grocery_list(&FileImageSource::new(td.path().join("nope.jpg")))
        .await;
    assert!(missing.is_error());
    assert!(h.transport.uploads().await.is_empty());

    let mut nav = Navigator::new(Route::Home);
    nav.navigate(Route::UploadGroceryList);
    let outcome = home
        .upload_grocery_list(&FileImageSource::new(&photo))
        .await;
    outcome.transition.as_ref().unwrap().apply(&mut nav);
    assert_eq!(nav.current(), &Route::Home);
    let notice = outcome.notice.unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, "List received");

    let uploads = h.transport.uploads().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].path, "api/v1/UploadGroceryList");
    assert_eq!(uploads[0].file_field, "image");
    assert_eq!(uploads[0].file_name, "list.png");
    assert_eq!(uploads[0].mime_type, "image/png");
    assert_eq!(uploads[0].bytes, b"\x89PNG fake");
    assert_eq!(
        uploads[0].fields,
        vec![("user_id".to_string(), "7".to_string())]
    );
}
