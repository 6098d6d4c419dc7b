use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Board is already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = core::result::Result<T, BoardError>;

/// Fatal failure while populating a board through a [`crate::BoardGenerator`].
#[derive(Error, Debug, PartialEq)]
pub enum InitializeError<E> {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("Board generator failed: {0}")]
    Generator(#[source] E),
}
