//! Integration tests for the on-disk cart.

#![allow(clippy::unwrap_used)]

use atelier_integration_tests::TestContext;
use atelier_storefront::cart::{CartError, CartService, FileCartStore, StoreError};
use atelier_storefront::{CartLineItem, LineKey};
use rust_decimal::Decimal;
use serde_json::Value;

fn line(product: &str, color: &str, size: &str, price: i64, quantity: u32) -> CartLineItem {
    let json = serde_json::json!({
        "id": product,
        "name": format!("{product} item"),
        "price": price.to_string(),
        "colorName": color,
        "colorHex": "#000000",
        "size": size,
        "quantity": quantity,
        "totalPrice": (price * i64::from(quantity)).to_string(),
        "timestamp": "2026-01-01T00:00:00Z"
    });
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_cart_survives_reopen() {
    let mut ctx = TestContext::new().unwrap();
    ctx.cart.add(line("p1", "Navy", "M", 45, 2)).unwrap();
    ctx.cart.add(line("p2", "White", "L", 64, 1)).unwrap();

    let reopened = ctx.reopen();
    let cart = reopened.load();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.subtotal(), Decimal::from(154));
}

#[test]
fn test_payload_uses_camel_case_lines() {
    let mut ctx = TestContext::new().unwrap();
    ctx.cart.add(line("p1", "Navy", "M", 45, 2)).unwrap();

    let raw = std::fs::read_to_string(ctx.cart_path()).unwrap();
    let payload: Value = serde_json::from_str(&raw).unwrap();
    let first = payload.as_array().and_then(|lines| lines.first()).unwrap();
    assert_eq!(first.get("id").and_then(Value::as_str), Some("p1"));
    assert_eq!(first.get("colorName").and_then(Value::as_str), Some("Navy"));
    assert_eq!(first.get("quantity").and_then(Value::as_u64), Some(2));
    assert!(first.get("totalPrice").is_some());
}

#[test]
fn test_malformed_file_loads_empty_and_is_replaced() {
    let mut ctx = TestContext::new().unwrap();
    std::fs::create_dir_all(ctx.cart_path().parent().unwrap()).unwrap();
    std::fs::write(ctx.cart_path(), "{ definitely not a cart").unwrap();

    assert!(ctx.cart.load().is_empty());

    ctx.cart.add(line("p1", "Navy", "M", 45, 1)).unwrap();
    assert_eq!(ctx.reopen().load().len(), 1);
}

#[test]
fn test_quota_rejects_write_and_keeps_file() {
    let ctx = TestContext::new().unwrap();
    let mut cart = CartService::new(FileCartStore::new(ctx.cart_path()).with_quota(300));
    cart.add(line("p1", "Navy", "M", 45, 1)).unwrap();
    let before = std::fs::read_to_string(ctx.cart_path()).unwrap();

    let err = cart.add(line("p2", "White", "L", 64, 1)).unwrap_err();
    assert!(matches!(
        err,
        CartError::Storage(StoreError::QuotaExceeded { .. })
    ));
    assert_eq!(std::fs::read_to_string(ctx.cart_path()).unwrap(), before);
}

#[test]
fn test_clear_writes_empty_cart() {
    let mut ctx = TestContext::new().unwrap();
    ctx.cart.add(line("p1", "Navy", "M", 45, 1)).unwrap();
    ctx.cart.clear().unwrap();

    assert!(ctx.reopen().load().is_empty());
    assert_eq!(std::fs::read_to_string(ctx.cart_path()).unwrap(), "[]");
    assert!(matches!(
        ctx.cart.remove(&LineKey::new("p1", "Navy", "M")),
        Err(CartError::LineNotFound(_))
    ));
}
