use ckb_types::core::{Cell, Script};
use std::ops::Range;

/// Narrows a cell search.
///
/// Ranges are half-open, `[start, end)`, as in the CKB indexer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellFilter {
    /// The type script cells must carry.
    pub script: Option<Script>,
    /// Allowed occupied sizes of the type script, zero for cells without one.
    pub script_len_range: Option<Range<u64>>,
    /// Allowed output data lengths.
    pub output_data_len_range: Option<Range<u64>>,
}

impl CellFilter {
    /// Cells without a type script and without data, plain capacity.
    pub fn capacity_only() -> Self {
        CellFilter {
            script: None,
            script_len_range: Some(0..1),
            output_data_len_range: Some(0..1),
        }
    }

    /// Cells carrying `type_script` and at least 16 bytes of data.
    pub fn udt(type_script: Script) -> Self {
        CellFilter {
            script: Some(type_script),
            script_len_range: None,
            output_data_len_range: Some(16..0xffff_ffff),
        }
    }

    /// Whether `cell` passes the filter.
    pub fn matches(&self, cell: &Cell) -> bool {
        let type_ = cell.cell_output.type_.as_ref();
        if let Some(script) = &self.script {
            if type_ != Some(script) {
                return false;
            }
        }
        if let Some(range) = &self.script_len_range {
            let len = type_.map_or(0, Script::occupied_size) as u64;
            if !range.contains(&len) {
                return false;
            }
        }
        if let Some(range) = &self.output_data_len_range {
            if !range.contains(&(cell.output_data.len() as u64)) {
                return false;
            }
        }
        true
    }
}
