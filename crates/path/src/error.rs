use crate::document::PathId;
use crate::geom::{Point, TransformError};
use thiserror::Error;

/// Errors produced while building, iterating or editing paths.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum PathError {
    #[error("The path must begin with a move-to command.")]
    MissingMoveTo,
    #[error("The path iterator has no current segment.")]
    IteratorExhausted,
    #[error("Command {0:?} is not one of M, L, C or Z.")]
    UnreducedCommand(char),
    #[error("No vector {vector} in segment {segment}.")]
    InvalidHandle { segment: usize, vector: usize },
    #[error("No path with id {0:?} in the document.")]
    UnknownPath(PathId),
    #[error("No shape named {0:?} is registered.")]
    UnknownShape(String),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("Coordinate {0:?} is not finite.")]
    NonFiniteCoordinate(Point),
}
