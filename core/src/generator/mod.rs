use alloc::vec::Vec;
use core::future::Future;

use crate::*;
pub use random::*;

mod random;

/// Row-major `[y][x]` layout returned by a generator.
pub type SeedGrid = Vec<Vec<CellSeed>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GenerateRequest {
    pub config: BoardConfig,
    /// Guaranteed mine-free.
    pub start: Coord2,
}

/// Produces a full mine layout once the first click is known.
pub trait BoardGenerator {
    type Error: core::error::Error + 'static;

    fn generate(
        &self,
        request: GenerateRequest,
    ) -> impl Future<Output = core::result::Result<SeedGrid, Self::Error>> + Send;
}

/// Cells kept free of mines around the first click.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SafeArea {
    /// Only the clicked cell.
    StartCell,
    /// The clicked cell and its neighbors, so the first click always opens a region.
    #[default]
    Neighborhood,
}
