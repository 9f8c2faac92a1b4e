use crate::core::FeeRate;

#[test]
fn test_fee_rate_calculate() {
    assert_eq!(FeeRate::calculate(0, 0).as_u64(), 0);
    assert_eq!(FeeRate::calculate(100, 0).as_u64(), 0);
    assert_eq!(FeeRate::calculate(355, 355).as_u64(), 1000);
    assert_eq!(FeeRate::calculate(1, 3).as_u64(), 333);
}

#[test]
fn test_fee_rounds_up() {
    let rate = FeeRate::from_u64(1000);
    assert_eq!(rate.fee(355), 355);
    assert_eq!(FeeRate::from_u64(1500).fee(355), 533);
    assert_eq!(FeeRate::from_u64(1).fee(1), 1);
    assert_eq!(FeeRate::zero().fee(1000), 0);
    assert_eq!(FeeRate::from_u64(u64::MAX).fee(usize::MAX), u64::MAX);
}
