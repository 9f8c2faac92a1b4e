mod fee_rate;

use crate::{
    bytes::Bytes,
    core::{
        capacity_bytes, Byte32, Capacity, CellDep, CellInput, CellOutput, DepType, OutPoint,
        Script, ScriptHashType, Transaction,
    },
    utilities::hex,
};

pub(crate) fn h(s: &str) -> Bytes {
    Bytes::from(hex::decode(s).unwrap())
}

pub(crate) fn secp_lock() -> Script {
    Script::new(
        "0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8"
            .parse()
            .unwrap(),
        ScriptHashType::Type,
        h("0x36c329ed630d6ce750712a477543672adab57f4c"),
    )
}

/// One dep group, one input, one 100 CKB output, no witnesses.
pub(crate) fn sample_tx() -> Transaction {
    Transaction {
        cell_deps: vec![CellDep::new(
            OutPoint::new(
                "0xf8de3bb47d055cdf460d93a2a6e1b05f7432f9777c8c474abf4eec1d4aee5d37"
                    .parse()
                    .unwrap(),
                0,
            ),
            DepType::DepGroup,
        )],
        inputs: vec![CellInput::new(
            OutPoint::new(Byte32::new([0x22; 32]), 1),
            0,
        )],
        outputs: vec![CellOutput::new(
            capacity_bytes!(100),
            secp_lock(),
            None,
        )],
        outputs_data: vec![Bytes::new()],
        ..Default::default()
    }
}

#[test]
fn capacity_bytes_literal() {
    assert_eq!(capacity_bytes!(100), Capacity::shannons(10_000_000_000));
}
