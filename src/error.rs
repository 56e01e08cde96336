use thiserror::Error;

/// Errors emitted by [`crate::Connection`].
///
/// Apart from the lifecycle variants, every error originates in the driver and is forwarded
/// unchanged as the source of [`Error::Driver`]. Callers who need the driver specific error can
/// downcast it, e.g. to [`odbc_api::Error`].
#[derive(Error, Debug)]
pub enum Error {
    /// A query has been issued (or a close requested) while the connection is not open.
    #[error("The connection to the data source is closed. Open it before running queries.")]
    ClosedConnection,
    /// `open` has been called on a connection which already holds a live handle. The existing
    /// handle is kept.
    #[error("The connection to the data source is already open.")]
    AlreadyOpen,
    /// Failure reported by the driver. Connecting, executing and fetching all end up here.
    #[error("The driver reported an error:\n{0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wraps an error emitted by a [`crate::Driver`] implementation.
    pub fn driver(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Driver(Box::new(source))
    }
}
