use crate::{Epoch, EpochError, EPOCH_IN_MILLISECONDS};
use proptest::prelude::*;

fn parts(e: Epoch) -> (i64, i64, i64) {
    (e.integer(), e.numerator(), e.denominator())
}

#[test]
fn normalize_reduces_carries_and_borrows() {
    assert_eq!(parts(Epoch::new_raw(1, 2, 4).normalize()), (1, 1, 2));
    assert_eq!(parts(Epoch::new_raw(0, 5, 2).normalize()), (2, 1, 2));
    assert_eq!(parts(Epoch::new_raw(5, -1, 2).normalize()), (4, 1, 2));
    assert_eq!(parts(Epoch::new_raw(3, -7, 2).normalize()), (-1, 1, 2));
}

#[test]
fn normalize_keeps_genesis() {
    assert_eq!(parts(Epoch::genesis().normalize()), (0, 0, 0));
}

#[test]
fn normalize_base_fixes_denominator() {
    assert_eq!(parts(Epoch::new_raw(1, 2, 0).normalize_base()), (1, 0, 1));
    assert_eq!(parts(Epoch::new_raw(1, 2, -3).normalize_base()), (1, -2, 3));
}

#[test]
fn construction_rejects_bad_denominators() {
    assert_eq!(
        Epoch::new(1, 1, -2),
        Err(EpochError::InvalidDenominator {
            integer: 1,
            numerator: 1,
            denominator: -2
        })
    );
    assert!(Epoch::new(1, 0, 0).is_err());
    assert!(Epoch::new(0, 0, 0).unwrap().is_genesis());
}

#[test]
fn add_and_sub() {
    let sum = Epoch::new_raw(1, 1, 2) + Epoch::new_raw(2, 1, 3);
    assert_eq!(parts(sum), (3, 5, 6));
    let diff = sum - Epoch::new_raw(1, 5, 6);
    assert_eq!(parts(diff), (2, 0, 1));
}

#[test]
fn genesis_is_additive_identity() {
    let e = Epoch::new_raw(3, 4, 5);
    assert_eq!(parts(e + Epoch::genesis()), (3, 4, 5));
    assert_eq!(parts(Epoch::genesis() + e), (3, 4, 5));
    assert_eq!(parts(e - Epoch::genesis()), (3, 4, 5));
    assert_eq!(parts(Epoch::genesis() - Epoch::new_raw(1, 1, 2)), (-2, 1, 2));
}

#[test]
fn compare_by_value() {
    let a = Epoch::new_raw(1, 0, 1);
    let b = Epoch::new_raw(1, 1, 2);
    let c = Epoch::new_raw(2, 0, 1);
    assert!(a < b);
    assert!(b <= b);
    assert_eq!(b, Epoch::new_raw(1, 2, 4));
    assert!(c > b);
    assert!(Epoch::genesis() < a);
    assert_eq!(Epoch::genesis(), Epoch::new_raw(0, 0, 1));
}

#[test]
fn pack_layout() {
    let e = Epoch::new_raw(0x010203, 0x0405, 0x0607);
    let num = e.to_num().unwrap();
    assert_eq!(num & 0xff_ffff, 0x010203);
    assert_eq!((num >> 24) & 0xffff, 0x0405);
    assert_eq!((num >> 40) & 0xffff, 0x0607);
    assert_eq!(parts(Epoch::from_num(num)), (0x010203, 0x0405, 0x0607));
    assert_eq!(e.to_packed_hex().unwrap(), "0x6070405010203");
    assert_eq!(Epoch::genesis().to_packed_hex().unwrap(), "0x0");
}

#[test]
fn pack_rejects_out_of_range() {
    assert_eq!(Epoch::new_raw(-1, 0, 1).to_num(), Err(EpochError::Negative));
    assert_eq!(Epoch::new_raw(0, -1, 1).to_num(), Err(EpochError::Negative));
    assert_eq!(Epoch::new_raw(0, 0, -1).to_num(), Err(EpochError::Negative));
    assert_eq!(Epoch::new_raw(1 << 24, 1, 1).to_num(), Err(EpochError::Overflow));
    assert_eq!(Epoch::new_raw(1, 1 << 16, 1).to_num(), Err(EpochError::Overflow));
    assert_eq!(Epoch::new_raw(1, 1, 1 << 16).to_num(), Err(EpochError::Overflow));
}

#[test]
fn to_unix_estimates_from_reference() {
    let reference = Epoch::new_raw(1, 0, 1);
    let target = Epoch::new_raw(2, 1, 2);
    let expected = 1000 + EPOCH_IN_MILLISECONDS + EPOCH_IN_MILLISECONDS / 2;
    assert_eq!(
        target.to_unix(&reference, 1000, EPOCH_IN_MILLISECONDS),
        Some(expected)
    );
    assert_eq!(
        Epoch::genesis().to_unix(&Epoch::new_raw(10, 0, 1), 0, EPOCH_IN_MILLISECONDS),
        None
    );
}

#[test]
fn one_nervos_dao_cycle() {
    assert_eq!(parts(Epoch::one_nervos_dao_cycle()), (180, 0, 1));
}

proptest! {
    #[test]
    fn normalize_is_idempotent_and_canonical(
        integer in -1_000_000i64..1_000_000,
        numerator in -100_000i64..100_000,
        denominator in 1i64..65_536,
    ) {
        let once = Epoch::new_raw(integer, numerator, denominator).normalize();
        let twice = once.normalize();
        prop_assert_eq!(parts(once), parts(twice));
        prop_assert!(0 <= once.numerator());
        prop_assert!(once.numerator() < once.denominator());
    }

    #[test]
    fn pack_round_trip(
        integer in 0i64..(1 << 24),
        numerator in 0i64..(1 << 16),
        denominator in 0i64..(1 << 16),
    ) {
        let e = Epoch::new_raw(integer, numerator, denominator);
        let unpacked = Epoch::from_num(e.to_num().unwrap());
        prop_assert_eq!(parts(unpacked), (integer, numerator, denominator));
    }

    #[test]
    fn add_then_sub_restores_value(
        a in (0i64..10_000, 0i64..1_800, 1i64..1_800),
        b in (0i64..10_000, 0i64..1_800, 1i64..1_800),
    ) {
        let x = Epoch::new_raw(a.0, a.1, a.2);
        let y = Epoch::new_raw(b.0, b.1, b.2);
        prop_assert_eq!((x + y) - y, x);
    }
}
