//! End-to-end cart and checkout flow over mocked collaborators.

use std::num::NonZeroU32;

use testresult::TestResult;
use uuid::Uuid;

use panier::prelude::*;
use panier::orders::MockOrderGateway;

fn catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            reference: CatalogRef::Product(ProductUuid::new(Uuid::now_v7())),
            name: "Tomates bio".to_string(),
            unit_price: 500,
            unit_label: Some("kg".to_string()),
            image_ref: None,
        },
        CatalogEntry {
            reference: CatalogRef::Product(ProductUuid::new(Uuid::now_v7())),
            name: "Gombo frais".to_string(),
            unit_price: 350,
            unit_label: Some("botte".to_string()),
            image_ref: None,
        },
        CatalogEntry {
            reference: CatalogRef::Basket(BasketUuid::new(Uuid::now_v7())),
            name: "Panier familial".to_string(),
            unit_price: 12_500,
            unit_label: None,
            image_ref: Some("paniers/familial.jpg".to_string()),
        },
    ]
}

fn form() -> DeliveryForm {
    DeliveryForm {
        name: "Abalo".to_string(),
        surname: "Essi".to_string(),
        phone: "+228 90 11 22 33".to_string(),
        neighborhood: "Tokoin".to_string(),
        address: "près du marché".to_string(),
        notes: String::new(),
    }
}

#[tokio::test]
async fn browse_fill_submit_and_redownload_receipt() -> TestResult {
    let entries = catalog();
    let mut store = CartStore::new(MemoryStorage::new());

    // Browse: two products, one basket; the first product twice.
    for entry in &entries {
        store.add(CartLine::from_entry(entry));
    }
    store.add(CartLine::from_entry(entries.first().ok_or("catalog entry")?));

    assert_eq!(store.cart().len(), 3, "merged by reference");
    assert_eq!(store.cart().total_items(), 4);
    assert_eq!(store.cart().total_price(), 2 * 500 + 350 + 12_500);

    let mut gateway = MockOrderGateway::new();
    gateway.expect_create_order().times(1).returning(|request| {
        assert_eq!(request.buyer().phone().as_str(), "90112233");
        assert_eq!(request.items().len(), 3);

        Ok(OrderNumber::new("CMD-042").expect("valid number"))
    });

    let checkout = Checkout::new(gateway);
    let pre_submit_lines = store.cart().lines().to_vec();

    let confirmation = checkout
        .submit(&mut store, &form(), PaymentMethod::TMoney)
        .await?;

    assert_eq!(confirmation.order_number().as_str(), "CMD-042");
    assert!(store.cart().is_empty());

    // The receipt renders from the held snapshot, not the (empty) store.
    let mut first_render = Vec::new();
    confirmation.receipt().write_to(&mut first_render)?;

    let mut second_render = Vec::new();
    confirmation.receipt().write_to(&mut second_render)?;

    assert_eq!(first_render, second_render, "re-download must be identical");

    let text = String::from_utf8(first_render)?;
    assert!(text.contains("CMD-042"), "order number missing");
    assert!(text.contains("Tomates bio"), "line missing");
    assert_eq!(confirmation.receipt().lines(), pre_submit_lines.as_slice());

    Ok(())
}

#[tokio::test]
async fn rejected_submit_leaves_everything_editable() -> TestResult {
    let entries = catalog();
    let mut store = CartStore::new(MemoryStorage::new());

    for entry in &entries {
        store.add(CartLine::from_entry(entry));
    }

    let mut gateway = MockOrderGateway::new();
    gateway
        .expect_create_order()
        .times(1)
        .returning(|_| Err(OrderGatewayError::Rejected("Stock insuffisant".to_string())));

    let checkout = Checkout::new(gateway);
    let pre_submit = store.cart().clone();

    let result = checkout.submit(&mut store, &form(), PaymentMethod::Cash).await;

    match result {
        Err(CheckoutError::Rejected(message)) => assert_eq!(message, "Stock insuffisant"),
        other => panic!("expected Rejected, got {other:?}"),
    }

    assert_eq!(store.cart(), &pre_submit);

    // The buyer can adjust the cart and the gate stays open for a retry.
    let first = store.cart().lines().first().ok_or("line")?.reference();
    store.update_quantity(first, 1);

    assert!(check_gate(store.cart(), &form()).is_ok());

    Ok(())
}

#[tokio::test]
async fn cart_survives_a_reload_between_browse_and_checkout() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cart.json");
    let entries = catalog();

    {
        let mut store = CartStore::new(JsonFileStorage::new(&path));

        store.add(
            CartLine::from_entry(entries.first().ok_or("catalog entry")?)
                .with_quantity(NonZeroU32::new(2).ok_or("non-zero")?),
        );
        store.set_active_section(Section::Cart);
    }

    // New session: rehydrate once from storage.
    let mut store = CartStore::restore(JsonFileStorage::new(&path))?;

    assert_eq!(store.cart().total_items(), 2);
    assert_eq!(store.cart().active_section(), Section::Cart);

    let mut gateway = MockOrderGateway::new();
    gateway
        .expect_create_order()
        .times(1)
        .returning(|_| Ok(OrderNumber::new("CMD-043").expect("valid number")));

    let checkout = Checkout::new(gateway);
    checkout
        .submit(&mut store, &form(), PaymentMethod::Flooz)
        .await?;

    // The cleared cart is what the next session restores.
    let restored = CartStore::restore(JsonFileStorage::new(&path))?;
    assert!(restored.cart().is_empty());

    Ok(())
}
