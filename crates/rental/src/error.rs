use lockerhub_core::error::CoreError;

/// Error returned by every rental service operation.
///
/// [`RentalError::Core`] carries an expected, caller-actionable outcome.
/// [`RentalError::Database`] is a storage fault; it is never retried here.
#[derive(Debug, thiserror::Error)]
pub enum RentalError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RentalResult<T> = Result<T, RentalError>;

impl RentalError {
    /// The domain error, if this is not a storage fault.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            RentalError::Core(core) => Some(core),
            RentalError::Database(_) => None,
        }
    }
}
