//! End-to-end capture sessions through the public API.

use tally_capture::{
    Advance, BusinessAction, CaptureError, CaptureFlow, CaptureWizard, FlowChoice, FlowRouter,
    RecordingSink, Retreat, SaleKind, Step,
};
use tally_core::pricing::classify;
use tally_core::{
    Decimal, DeviationStatus, Money, PaymentStatus, RetailUnit, StockItem, TransactionKind,
    UnitType,
};

fn rice() -> StockItem {
    StockItem {
        id: "rice-50kg".to_string(),
        name: "Rice".to_string(),
        category: "Grains".to_string(),
        bulk_unit: "50kg bag".to_string(),
        retail_units: vec![RetailUnit::new("cup", Decimal::from(200), Money::from_major(200))],
        cost_price_per_bulk: Money::from_major(32_000),
        standard_bulk_price: Money::from_major(35_000),
        quantity_on_hand: Decimal::from(3),
    }
}

fn rice_sale() -> CaptureWizard<RecordingSink> {
    let mut selector = || Some(rice());
    let flow = FlowRouter::start(&FlowChoice::money_in(SaleKind::Product), &mut selector).unwrap();
    CaptureWizard::new(flow, RecordingSink::new()).unwrap()
}

/// Drives a rice sale up to the price step: customer, cup, 10 cups.
fn rice_sale_at_price() -> CaptureWizard<RecordingSink> {
    let mut wizard = rice_sale();
    wizard.set_customer_name("Mama Tunde").unwrap();
    wizard.advance().unwrap();
    wizard.select_unit_and_advance("cup").unwrap();
    wizard.set_quantity("10").unwrap();
    wizard.advance().unwrap();
    assert_eq!(wizard.current_step(), Some(Step::Price));
    wizard
}

#[test]
fn test_retail_sale_at_standard_price() {
    let wizard = rice_sale_at_price();

    let figures = wizard.derived_figures().unwrap().unwrap();
    assert_eq!(figures.price_per_unit, Money::from_major(200));
    assert_eq!(figures.total_amount, Money::from_major(2_000));
    assert_eq!(figures.unit_cost, Money::from_major(160));
    assert_eq!(figures.total_cost, Money::from_major(1_600));
    assert_eq!(figures.total_profit, Money::from_major(400));
    assert!(!figures.is_loss);
    assert!(figures.price_deviation.is_standard());
}

#[test]
fn test_price_override_below_standard() {
    let mut wizard = rice_sale_at_price();
    wizard.set_price("150").unwrap();

    let figures = wizard.derived_figures().unwrap().unwrap();
    assert_eq!(figures.price_deviation.status, DeviationStatus::Below);
    assert_eq!(figures.price_deviation.delta, Money::from_major(50));
    assert_eq!(
        figures.price_deviation,
        classify(Money::from_major(150), Money::from_major(200))
    );
}

#[test]
fn test_below_cost_sale_still_submits() {
    let mut wizard = rice_sale_at_price();
    wizard.set_price("120").unwrap();

    let figures = wizard.derived_figures().unwrap().unwrap();
    assert_eq!(figures.total_cost, Money::from_major(1_600));
    assert_eq!(figures.total_amount, Money::from_major(1_200));
    assert_eq!(figures.total_profit, Money::from_major(-400));
    assert!(figures.is_loss);

    wizard.advance().unwrap();
    wizard.set_payment(PaymentStatus::Paid).unwrap();
    wizard.advance().unwrap();

    let submission = match wizard.advance().unwrap() {
        Advance::Submitted(s) => s,
        other => panic!("expected submission, got {:?}", other),
    };
    assert_eq!(submission.transaction.kind(), TransactionKind::SaleProduct);
    assert_eq!(submission.transaction.total_profit(), Some(Money::from_major(-400)));
    assert_eq!(submission.reward.action, BusinessAction::SaleRecorded);
}

#[test]
fn test_expense_without_name_stays_put() {
    let mut selector = || None::<StockItem>;
    let flow = FlowRouter::start(&FlowChoice::money_out(), &mut selector).unwrap();
    let mut wizard = CaptureWizard::new(flow, RecordingSink::new()).unwrap();
    assert_eq!(wizard.current_step(), Some(Step::ExpenseName));

    let err = wizard.advance().unwrap_err();
    assert!(matches!(err, CaptureError::Validation(_)));
    assert_eq!(err.to_string(), "expense name is required");
    assert_eq!(wizard.current_step(), Some(Step::ExpenseName));
}

#[test]
fn test_reselecting_unit_resets_price_keeps_quantity() {
    let mut wizard = rice_sale_at_price();
    wizard.set_price("150").unwrap();
    wizard.retreat().unwrap();
    assert_eq!(wizard.current_step(), Some(Step::Quantity));

    wizard.retreat().unwrap();
    assert_eq!(wizard.current_step(), Some(Step::UnitType));
    wizard.select_unit_and_advance("cup").unwrap();
    wizard.advance().unwrap();
    wizard.advance().unwrap();

    assert_eq!(wizard.current_step(), Some(Step::Payment));
    let draft = wizard.draft().unwrap();
    assert_eq!(draft.quantity(), Some(Decimal::from(10)));
    assert_eq!(draft.price(), Some(Money::from_major(200)));
    assert_eq!(draft.unit_type(), Some(&UnitType::Retail("cup".to_string())));
}

#[test]
fn test_retreat_then_advance_round_trip() {
    let mut wizard = rice_sale_at_price();
    let before = wizard.draft().cloned().unwrap();

    assert_eq!(
        wizard.retreat().unwrap(),
        Retreat::Moved {
            from: Step::Price,
            to: Step::Quantity
        }
    );
    wizard.advance().unwrap();

    assert_eq!(wizard.draft().cloned().unwrap(), before);
}

#[test]
fn test_one_reward_per_submission() {
    let mut wizard = CaptureWizard::new(CaptureFlow::Expense, RecordingSink::new()).unwrap();
    wizard.set_expense_name("Shop rent").unwrap();
    wizard.advance().unwrap();
    wizard.set_amount("₦50,000").unwrap();
    wizard.advance().unwrap();
    wizard.advance().unwrap();

    // a closed wizard cannot submit twice
    assert!(matches!(wizard.advance(), Err(CaptureError::Closed)));

    let sink = wizard.into_sink();
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.events()[0].action, BusinessAction::ExpenseRecorded);
    assert_eq!(sink.events()[0].amount, Some(Money::from_major(50_000)));
}

#[test]
fn test_no_reward_on_cancellation() {
    let mut wizard = rice_sale_at_price();
    while wizard.is_open() {
        wizard.retreat().unwrap();
    }
    assert!(wizard.into_sink().is_empty());
}

#[test]
fn test_product_sale_needs_item() {
    let mut selector = || None::<StockItem>;
    assert!(matches!(
        FlowRouter::start(&FlowChoice::money_in(SaleKind::Product), &mut selector),
        Err(CaptureError::ItemRequired)
    ));
}
