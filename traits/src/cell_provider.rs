use async_trait::async_trait;
use ckb_error::{Error, InternalErrorKind};
use ckb_types::core::{error::TransactionError, Cell, CellInput, OutPoint};

/// Looks cells up by out point.
#[async_trait]
pub trait CellProvider: Send + Sync {
    /// Fetches a cell, live or dead. `None` when the out point is unknown.
    async fn get_cell(&self, out_point: &OutPoint) -> Result<Option<Cell>, Error>;

    /// Fills the cell cache of `input` and returns the spent cell.
    ///
    /// A resolved input is never fetched again. A cell returned for another out point is an
    /// [`InternalErrorKind::DataCorrupted`] error.
    async fn resolve_input(&self, input: &mut CellInput) -> Result<Cell, Error> {
        if let Some(cell) = input.cell() {
            return Ok(cell);
        }
        let cell = self
            .get_cell(&input.previous_output)
            .await?
            .ok_or_else(|| TransactionError::UnresolvableInput(input.previous_output.clone()))?;
        if cell.out_point != input.previous_output {
            return Err(InternalErrorKind::DataCorrupted
                .other(format!(
                    "asked for cell {}, got {}",
                    input.previous_output, cell.out_point
                ))
                .into());
        }
        input.resolve(cell.cell_output.clone(), cell.output_data.clone());
        Ok(cell)
    }
}
