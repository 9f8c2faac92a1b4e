use crate::CellFilter;
use ckb_error::Error;
use ckb_types::core::Cell;
use futures::stream::BoxStream;

/// Live cells yielded one at a time.
pub type CellStream<'a> = BoxStream<'a, Result<Cell, Error>>;

/// Searches the live cells an owner can spend.
pub trait CellCollector: Send + Sync {
    /// Starts a new search.
    ///
    /// The stream is lazy and can't be restarted; callers query again for every independent
    /// selection pass.
    fn find_cells(&self, filter: CellFilter) -> CellStream<'_>;
}
