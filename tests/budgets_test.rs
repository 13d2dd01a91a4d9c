mod common;

use anyhow::Result;
use common::{signed_in, test_service};
use pocketbook::application::AppError;
use pocketbook::domain::{Category, MAX_AMOUNT_CENTS};

#[tokio::test]
async fn test_budget_set_and_list() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let session = signed_in(&service, "alice").await?;

    assert!(service.list_budgets().await?.is_empty());

    service
        .set_budget(session.username(), Category::Food, 40000)
        .await?;
    service
        .set_budget(session.username(), Category::Transport, 10000)
        .await?;

    let budgets = service.list_budgets().await?;
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets[0].category, Category::Food);
    assert_eq!(budgets[0].amount_cents, 40000);
    assert_eq!(budgets[1].category, Category::Transport);
    assert_eq!(budgets[1].amount_cents, 10000);

    Ok(())
}

#[tokio::test]
async fn test_budget_replaced_by_category() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let session = signed_in(&service, "alice").await?;

    service
        .set_budget(session.username(), Category::Food, 40000)
        .await?;
    service
        .set_budget(session.username(), Category::Health, 5000)
        .await?;
    service
        .set_budget(session.username(), Category::Food, 35000)
        .await?;
    // Same value again changes nothing
    service
        .set_budget(session.username(), Category::Food, 35000)
        .await?;

    let budgets = service.list_budgets().await?;
    assert_eq!(budgets.len(), 2);

    // Replacing keeps the category's original position
    assert_eq!(budgets[0].category, Category::Food);
    assert_eq!(budgets[0].amount_cents, 35000);
    assert_eq!(budgets[1].category, Category::Health);

    Ok(())
}

#[tokio::test]
async fn test_budgets_are_shared_across_users() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let alice = signed_in(&service, "alice").await?;
    let bob = signed_in(&service, "bob").await?;

    service
        .set_budget(alice.username(), Category::Food, 40000)
        .await?;
    service
        .set_budget(bob.username(), Category::Food, 20000)
        .await?;
    service
        .set_budget(bob.username(), Category::Shopping, 15000)
        .await?;

    // Budgets are keyed by category only: bob's Food budget replaced alice's,
    // and everyone sees every budget.
    let budgets = service.list_budgets().await?;
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets[0].category, Category::Food);
    assert_eq!(budgets[0].amount_cents, 20000);
    assert_eq!(budgets[0].username, "bob");
    assert_eq!(budgets[1].category, Category::Shopping);

    Ok(())
}

#[tokio::test]
async fn test_zero_budget_allowed_negative_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let session = signed_in(&service, "alice").await?;

    let budget = service
        .set_budget(session.username(), Category::Other, 0)
        .await?;
    assert_eq!(budget.amount_cents, 0);

    let err = service
        .set_budget(session.username(), Category::Other, -1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(-1)));

    let budgets = service.list_budgets().await?;
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].amount_cents, 0);

    Ok(())
}

#[tokio::test]
async fn test_budget_above_cap_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let session = signed_in(&service, "alice").await?;

    let err = service
        .set_budget(session.username(), Category::Food, MAX_AMOUNT_CENTS + 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount(_)));
    assert!(service.list_budgets().await?.is_empty());

    service
        .set_budget(session.username(), Category::Food, MAX_AMOUNT_CENTS)
        .await?;
    assert_eq!(service.list_budgets().await?[0].amount_cents, MAX_AMOUNT_CENTS);

    Ok(())
}
