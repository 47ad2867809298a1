//! Integration tests for address versions and the re-key protocol.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use time::macros::datetime;
use user_addresses::config::UserAddressesConfig;
use user_addresses::domain::error::DomainError;
use user_addresses_sdk::{AddressKey, AddressType};

mod support;
use support::{TestContext, address_req, john_doe, update_req};

async fn with_user(ctx: &TestContext) -> i32 {
    ctx.services
        .users
        .create_user(john_doe())
        .await
        .expect("Failed to create user")
        .id
}

#[tokio::test]
async fn create_normalizes_and_enriches() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;

    let view = ctx
        .services
        .addresses
        .create_address(address_req(user_id, "HOME", "2024-01-01"))
        .await
        .expect("Failed to create address");

    assert_eq!(view.address.fields.country_code, "USA");
    assert_eq!(view.formatted_address, "Main St 1\n12345 NYC\nUSA");
    assert!(view.is_active);
    assert_eq!(view.id, format!("{user_id}-HOME-1704067200000"));
    assert_eq!(
        view.address.key.valid_from,
        datetime!(2024-01-01 0:00 UTC)
    );

    let users = ctx.services.users.list_users().await.unwrap();
    assert_eq!(users[0].address_count, 1);
}

#[tokio::test]
async fn future_address_is_not_active() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;

    let view = ctx
        .services
        .addresses
        .create_address(address_req(user_id, "POST", "2999-01-01"))
        .await
        .unwrap();
    assert!(!view.is_active);
}

#[tokio::test]
async fn dates_outside_unix_32bit_range_round_trip() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;

    let old = svc
        .create_address(address_req(user_id, "HOME", "1969-07-20"))
        .await
        .unwrap();
    let far = svc
        .create_address(address_req(user_id, "HOME", "2999-01-01"))
        .await
        .unwrap();
    assert_eq!(old.id, format!("{user_id}-HOME--14256000000"));
    assert_eq!(far.address.key.valid_from, datetime!(2999-01-01 0:00 UTC));

    let rows = svc.list_addresses(user_id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, far.id);
    assert_eq!(rows[1].address.key.valid_from, datetime!(1969-07-20 0:00 UTC));

    svc.delete_address(AddressKey::parse_display_id(&old.id).unwrap())
        .await
        .unwrap();
    assert_eq!(svc.list_addresses(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_key_is_a_conflict() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;

    svc.create_address(address_req(user_id, "HOME", "2024-01-01"))
        .await
        .unwrap();
    let err = svc
        .create_address(address_req(user_id, "HOME", "2024-01-01T00:00:00Z"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }), "{err:?}");

    // Same instant, other type: a separate version.
    svc.create_address(address_req(user_id, "WORK", "2024-01-01"))
        .await
        .unwrap();
    assert_eq!(svc.list_addresses(user_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn create_for_missing_user_is_not_found() {
    let ctx = TestContext::new().await;
    let err = ctx
        .services
        .addresses
        .create_address(address_req(4242, "HOME", "2024-01-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let mut req = address_req(user_id, "CABIN", "yesterday");
    req.country_code = "us".to_owned();
    req.post_code = "12a".to_owned();

    let err = ctx
        .services
        .addresses
        .create_address(req)
        .await
        .unwrap_err();
    let DomainError::Validation { violations } = err else {
        panic!("expected validation error, got {err:?}");
    };
    let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["address_type", "valid_from", "post_code", "country_code"]
    );
}

#[tokio::test]
async fn list_orders_by_type_then_newest_first() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;
    for (ty, day) in [
        ("WORK", "2023-06-01"),
        ("HOME", "2022-01-01"),
        ("HOME", "2024-01-01"),
        ("INVOICE", "2024-03-01"),
    ] {
        svc.create_address(address_req(user_id, ty, day)).await.unwrap();
    }

    let ids: Vec<String> = svc
        .list_addresses(user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|v| {
            format!(
                "{}@{}",
                v.address.key.address_type,
                v.address.key.valid_from.date()
            )
        })
        .collect();
    assert_eq!(
        ids,
        vec![
            "HOME@2024-01-01",
            "HOME@2022-01-01",
            "INVOICE@2024-03-01",
            "WORK@2023-06-01",
        ]
    );
}

#[tokio::test]
async fn update_within_tolerance_patches_in_place() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;
    svc.create_address(address_req(user_id, "HOME", "2024-01-01"))
        .await
        .unwrap();

    let view = svc
        .update_address(update_req(
            user_id,
            "HOME",
            "2024-01-01T00:00:00.500Z",
            "HOME",
            "2024-01-01",
            "Boston",
        ))
        .await
        .expect("Failed to update address");

    assert_eq!(view.address.fields.city, "Boston");
    assert_eq!(view.address.fields.country_code, "POL");
    assert_eq!(view.id, format!("{user_id}-HOME-1704067200000"));

    let rows = svc.list_addresses(user_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].address.fields.city, "Boston");
}

#[tokio::test]
async fn new_key_within_tolerance_keeps_stored_key() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;
    svc.create_address(address_req(user_id, "HOME", "2024-01-01"))
        .await
        .unwrap();

    let view = svc
        .update_address(update_req(
            user_id,
            "HOME",
            "2024-01-01",
            "HOME",
            "2024-01-01T00:00:00.800Z",
            "Boston",
        ))
        .await
        .unwrap();
    assert_eq!(view.address.key.valid_from, datetime!(2024-01-01 0:00 UTC));
}

#[tokio::test]
async fn changing_valid_from_rekeys() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;
    svc.create_address(address_req(user_id, "HOME", "2024-01-01"))
        .await
        .unwrap();

    let view = svc
        .update_address(update_req(
            user_id,
            "HOME",
            "2024-01-01",
            "HOME",
            "2024-06-01",
            "Boston",
        ))
        .await
        .unwrap();
    assert_eq!(view.address.key.valid_from, datetime!(2024-06-01 0:00 UTC));

    let rows = svc.list_addresses(user_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, format!("{user_id}-HOME-1717200000000"));
    assert_eq!(rows[0].address.fields.city, "Boston");
}

#[tokio::test]
async fn changing_type_rekeys() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;
    svc.create_address(address_req(user_id, "HOME", "2024-01-01"))
        .await
        .unwrap();

    svc.update_address(update_req(
        user_id,
        "HOME",
        "2024-01-01T00:00:00.999Z",
        "INVOICE",
        "2024-01-01",
        "Boston",
    ))
    .await
    .unwrap();

    let rows = svc.list_addresses(user_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].address.key.address_type, AddressType::Invoice);
}

#[tokio::test]
async fn original_outside_tolerance_is_not_found() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;
    svc.create_address(address_req(user_id, "HOME", "2024-01-01"))
        .await
        .unwrap();

    let err = svc
        .update_address(update_req(
            user_id,
            "HOME",
            "2024-01-01T00:00:01.500Z",
            "HOME",
            "2024-01-01",
            "Boston",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }), "{err:?}");

    let rows = svc.list_addresses(user_id).await.unwrap();
    assert_eq!(rows[0].address.fields.city, "NYC");
}

#[tokio::test]
async fn tolerance_is_configurable() {
    let ctx = TestContext::with_config(&UserAddressesConfig {
        key_match_tolerance_ms: 0,
    })
    .await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;
    svc.create_address(address_req(user_id, "HOME", "2024-01-01"))
        .await
        .unwrap();

    let err = svc
        .update_address(update_req(
            user_id,
            "HOME",
            "2024-01-01T00:00:00.001Z",
            "HOME",
            "2024-01-01",
            "Boston",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn rekey_collision_rolls_back() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;
    svc.create_address(address_req(user_id, "HOME", "2024-01-01"))
        .await
        .unwrap();
    svc.create_address(address_req(user_id, "WORK", "2024-01-01"))
        .await
        .unwrap();

    let err = svc
        .update_address(update_req(
            user_id,
            "HOME",
            "2024-01-01",
            "WORK",
            "2024-01-01",
            "Boston",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }), "{err:?}");

    let rows = svc.list_addresses(user_id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].address.key.address_type, AddressType::Home);
    assert!(rows.iter().all(|r| r.address.fields.city == "NYC"));
}

#[tokio::test]
async fn delete_requires_exact_key() {
    let ctx = TestContext::new().await;
    let user_id = with_user(&ctx).await;
    let svc = &ctx.services.addresses;
    svc.create_address(address_req(user_id, "HOME", "2024-01-01"))
        .await
        .unwrap();

    let key = AddressKey {
        user_id,
        address_type: AddressType::Home,
        valid_from: datetime!(2024-01-01 0:00 UTC),
    };
    let near = AddressKey {
        valid_from: datetime!(2024-01-01 0:00:00.001 UTC),
        ..key
    };
    let err = svc.delete_address(near).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    svc.delete_address(key).await.unwrap();
    assert!(svc.list_addresses(user_id).await.unwrap().is_empty());

    let again = svc.delete_address(key).await.unwrap_err();
    assert!(matches!(again, DomainError::NotFound { .. }));
}
