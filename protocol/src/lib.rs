//! Wire format of the board generation and hint services.
//!
//! Field names are camelCase JSON, grids are row-major `[y][x]`, and
//! coordinates travel as `[x, y]` arrays.

use thiserror::Error;

pub use generate::*;
pub use hint::*;

mod generate;
mod hint;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Board(#[from] sweephint_core::BoardError),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;
