use thiserror::Error;

use crate::cursor::OutOfBounds;

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// The field did not fit in the remaining packet space.
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),
}
