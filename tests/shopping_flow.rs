mod common;

use common::{cart_line, harness, logged_in, ok};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uport_storefront::navigation::Route;
use uport_storefront::screens::{CartScreen, HomeScreen, ProductScreen, SubCategoryScreen, Transition};
use uport_storefront::store::keys;

fn products(in_cart: i64) -> Value {
    json!({
        "status": 1,
        "image_url": "/uploads/products/",
        "products": [{
            "id": 11,
            "eng_name": "Basmati Rice",
            "tml_name": "பாசுமதி அரிசி",
            "pro_image": "rice.png",
            "list_product": [
                {"id": 101, "product_size": "1kg", "sales_price": "95", "regular_price": "110",
                 "offer_price": "15", "quantity": in_cart, "available_stock": 10},
                {"id": 102, "product_size": "5kg", "sales_price": "450", "regular_price": "500",
                 "offer_price": "50", "quantity": 0, "available_stock": 0}
            ]
        }]
    })
}

#[tokio::test]
async fn home_fetches_banners_and_categories() {
    let h = logged_in(vec![
        json!({"status": 1, "sliders": [{"slider": "b1.png"}, {"slider": ""}], "image_url": "/uploads/slider/"}),
        json!({"status": 1, "categories": [{"id": 4, "name": "Grains", "sub_name": "Rice & more", "image": "g.png"}]}),
    ])
    .await;
    h.ctx.session.set_cart_count(3).await.unwrap();

    let mut home = HomeScreen::new(h.ctx.clone());
    let outcome = home.load().await;
    assert!(outcome.notice.is_none());

    assert_eq!(home.user_name, "Acme Co");
    assert_eq!(home.cart_count, 3);
    assert_eq!(home.banners, ["https://uports.in/admin/uploads/slider/b1.png"]);
    assert_eq!(home.categories.len(), 1);
    assert_eq!(
        home.open_category(0),
        Some(Route::SubCategory {
            category_id: 4,
            category_name: "Grains".into()
        })
    );
    assert_eq!(home.open_category(1), None);

    let paths = h.transport.paths().await;
    assert!(paths.contains(&"api/v1/GetBanner/2".to_string()));
    assert!(paths.contains(&"api/v1/GetCategoryBB".to_string()));

    let rendered = home.to_string();
    assert!(rendered.contains("Hello, Acme Co"));
    assert!(rendered.contains("[0] Grains"));
}

#[tokio::test]
async fn subcategories_open_product_route() {
    let h = harness(vec![ok(json!({
        "subcategories": [{"id": 21, "name": "Rice", "short_desc": "", "image": "r.png"}]
    }))]);

    let mut screen = SubCategoryScreen::new(h.ctx.clone(), 4, "Grains");
    screen.load().await;
    assert_eq!(screen.subcategories.len(), 1);
    assert_eq!(
        screen.open(0),
        Some(Route::Product {
            subcategory_id: 21,
            subcategory_name: "Rice".into()
        })
    );
    assert_eq!(h.transport.paths().await, ["api/v1/GetSubCategoryBB/4"]);
    assert!(screen.to_string().contains("Best offer applicable"));
}

#[tokio::test]
async fn guest_browsing_cannot_add_to_cart() {
    let h = harness(vec![products(0)]);
    let mut screen = ProductScreen::new(h.ctx.clone(), 21, "Rice");
    screen.load().await;

    let requests = h.transport.requests().await;
    assert_eq!(requests[0].body.as_ref().unwrap()["user_id"], 1);

    let outcome = screen.add_to_cart(0).await;
    assert_eq!(
        outcome.notice.unwrap().message,
        "Please login to add items to cart"
    );
    assert_eq!(h.transport.requests().await.len(), 1);
}

#[tokio::test]
async fn add_selected_variant_refreshes_count_and_products() {
    let h = logged_in(vec![
        products(0),
        json!({"status": 1, "message": "Added"}),
        ok(json!([cart_line(1, 101, "95", 1)])),
        products(1),
    ])
    .await;

    let mut screen = ProductScreen::new(h.ctx.clone(), 21, "Rice");
    screen.load().await;
    assert_eq!(screen.selected, [0]);

    assert!(!screen.select_variant(0, 5));
    assert!(screen.select_variant(0, 1));
    let outcome = screen.add_to_cart(0).await;
    assert_eq!(outcome.notice.unwrap().message, "Out of stock");

    assert!(screen.select_variant(0, 0));
    let outcome = screen.add_to_cart(0).await;
    assert!(!outcome.is_error(), "{outcome:?}");

    assert_eq!(screen.cart_count, 1);
    assert_eq!(screen.selected_variant(0).unwrap().quantity, 1);
    assert_eq!(
        h.store.snapshot().await.get(keys::CART_COUNT).map(String::as_str),
        Some("1")
    );

    let requests = h.transport.requests().await;
    let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "api/v1/GetProductBB",
            "api/v1/AddToCart",
            "api/v1/GetCartDetails/7",
            "api/v1/GetProductBB"
        ]
    );
    assert_eq!(
        requests[1].body,
        Some(json!({"user_id": 7, "product_id": 101, "quantity": 1}))
    );
}

#[tokio::test]
async fn stepping_quantity_to_zero_removes_cart_line() {
    let h = logged_in(vec![
        products(1),
        ok(json!([cart_line(55, 101, "95", 1)])),
        json!({"status": 1, "message": "Removed"}),
        json!({"status": 0, "result": ""}),
        products(0),
    ])
    .await;

    let mut screen = ProductScreen::new(h.ctx.clone(), 21, "Rice");
    screen.load().await;
    let outcome = screen.set_quantity(0, 0).await;
    assert!(!outcome.is_error(), "{outcome:?}");

    let requests = h.transport.requests().await;
    let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "api/v1/GetProductBB",
            "api/v1/GetCartDetails/7",
            "api/v1/RemoveFromCart",
            "api/v1/GetCartDetails/7",
            "api/v1/GetProductBB"
        ]
    );
    assert_eq!(requests[2].body, Some(json!({"id": 55})));
    assert_eq!(screen.cart_count, 0);
    assert_eq!(screen.selected_variant(0).unwrap().quantity, 0);
}

fn delivery(charge: &str) -> Value {
    ok(json!({"area": {"delivery_charge": charge}}))
}

#[tokio::test]
async fn cart_totals_and_minimum_gate() {
    let h = logged_in(vec![
        ok(json!([cart_line(1, 10, "100", 2), cart_line(2, 20, "50", 1)])),
        delivery("20"),
        json!({"status": 1, "minimum_order": "500"}),
        json!({"status": 1, "minimum_order": "500"}),
    ])
    .await;

    let mut cart = CartScreen::new(h.ctx.clone());
    assert!(cart.load().await.notice.is_none());

    assert_eq!(cart.subtotal(), Decimal::from(250));
    assert_eq!(cart.total(), Decimal::from(320));
    assert!(!cart.gate().enabled());
    assert_eq!(cart.gate().label(), "Minimum order ₹500.00");

    let stored = h.store.snapshot().await;
    assert_eq!(stored.get(keys::CART_COUNT).map(String::as_str), Some("2"));
    assert_eq!(stored.get(keys::DELIVERY_CHARGE).map(String::as_str), Some("20"));

    let outcome = cart.checkout().await;
    let notice = outcome.notice.unwrap();
    assert!(notice.is_error());
    assert_eq!(notice.message, "Minimum order ₹500.00");
    assert!(!h
        .transport
        .paths()
        .await
        .contains(&"api/v1/place_order".to_string()));

    let rendered = cart.to_string();
    assert!(rendered.contains("₹320.00"));
}

#[tokio::test]
async fn malformed_cart_line_keeps_the_others() {
    let mut broken = cart_line(2, 20, "50", 1);
    broken["quantity"] = json!("two");
    let h = logged_in(vec![
        ok(json!([cart_line(1, 10, "100", 2), broken])),
        delivery("0"),
        json!({"status": 1, "minimum_order": 0}),
    ])
    .await;

    let mut cart = CartScreen::new(h.ctx.clone());
    assert!(cart.load().await.notice.is_none());

    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].id, 1);
    assert_eq!(cart.subtotal(), Decimal::from(200));
    assert_eq!(
        h.store.snapshot().await.get(keys::CART_COUNT).map(String::as_str),
        Some("1")
    );
}

#[tokio::test]
async fn checkout_at_exact_minimum_places_order() {
    let h = logged_in(vec![
        ok(json!([cart_line(1, 10, "250", 2), cart_line(2, 20, "80", 0)])),
        delivery("20"),
        json!({"status": 1, "minimum_order": 500}),
        json!({"status": 1, "result": {"minimum_order": 500}}),
        json!({"status": 1, "message": "Order placed"}),
        json!({"status": 1, "result": []}),
    ])
    .await;

    let mut cart = CartScreen::new(h.ctx.clone());
    cart.load().await;
    assert!(cart.gate().enabled());
    assert_eq!(cart.gate().label(), "Place Order");

    let outcome = cart.checkout().await;
    assert_eq!(outcome.transition, Some(Transition::Replace(Route::MyOrders)));
    assert_eq!(outcome.notice.unwrap().message, "Order placed");

    let requests = h.transport.requests().await;
    let placed = requests
        .iter()
        .find(|r| r.path == "api/v1/place_order")
        .expect("order placed");
    assert_eq!(
        placed.body,
        Some(json!({"order": {"user_id": 7, "medicine": [{"product_id": 10, "quantity": 2}]}}))
    );
    assert!(cart.lines.is_empty());
    assert_eq!(h.ctx.session.cart_count().await.unwrap(), 0);
}

#[tokio::test]
async fn cart_quantity_changes_use_signed_deltas() {
    let h = logged_in(vec![
        ok(json!([cart_line(1, 10, "100", 3)])),
        delivery("0"),
        json!({"status": 1}),
        json!({"status": 1}),
        ok(json!([cart_line(1, 10, "100", 2)])),
        json!({"status": 1}),
        json!({"status": 0, "result": ""}),
    ])
    .await;

    let mut cart = CartScreen::new(h.ctx.clone());
    cart.load().await;

    assert!(cart.change_quantity(0, 3).await.notice.is_none());
    assert!(cart.change_quantity(0, 2).await.notice.is_none());
    assert_eq!(cart.lines[0].quantity, 2);

    let outcome = cart.change_quantity(0, 0).await;
    assert_eq!(outcome.notice.unwrap().message, "Item removed from cart");
    assert!(cart.lines.is_empty());

    let requests = h.transport.requests().await;
    let add = requests
        .iter()
        .find(|r| r.path == "api/v1/AddToCart")
        .unwrap();
    assert_eq!(
        add.body,
        Some(json!({"user_id": 7, "product_id": 10, "quantity": -1}))
    );
    let remove = requests
        .iter()
        .find(|r| r.path == "api/v1/RemoveFromCart")
        .unwrap();
    assert_eq!(remove.body, Some(json!({"id": 1})));
}

#[tokio::test]
async fn empty_cart_cannot_check_out() {
    let h = logged_in(vec![
        json!({"status": 0, "message": "Cart is empty", "result": ""}),
        json!({"status": 0}),
        json!({"status": 1, "minimum_order": 0}),
    ])
    .await;
    h.ctx
        .session
        .set_delivery_charge(Decimal::from(30))
        .await
        .unwrap();

    let mut cart = CartScreen::new(h.ctx.clone());
    cart.load().await;
    assert_eq!(cart.subtotal(), Decimal::ZERO);
    // cached charge is kept when the fetch carries none
    assert_eq!(cart.delivery_charge, Decimal::from(30));

    let outcome = cart.checkout().await;
    assert_eq!(outcome.notice.unwrap().message, "Your cart is empty");
    assert_eq!(h.transport.requests().await.len(), 3);
    assert!(cart.to_string().contains("Your cart is empty"));
}

#[tokio::test]
async fn cart_requires_login() {
    let h = harness(vec![]);
    let mut cart = CartScreen::new(h.ctx.clone());
    let outcome = cart.load().await;
    assert_eq!(outcome.notice.unwrap().message, "Please login to continue");
    assert!(h.transport.requests().await.is_empty());
}
