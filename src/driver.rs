use crate::{Dataset, Value};

/// Entry point to an external data source driver. [`crate::Connection`] talks to its data source
/// exclusively through this trait and [`DriverConnection`], so the driver can be replaced, e.g.
/// by an in memory fake in tests.
///
/// The production implementation is [`crate::OdbcDriver`].
pub trait Driver {
    /// Live connection to a data source. Releasing it is the job of [`DriverConnection::close`].
    type Connection: DriverConnection;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Request a new connection from the driver.
    fn connect(
        &self,
        connection_string: &str,
        autocommit: bool,
    ) -> Result<Self::Connection, Self::Error>;
}

/// A connection handed out by a [`Driver`].
pub trait DriverConnection {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute `query` on a statement which is released before this method returns, both on
    /// success and on error.
    ///
    /// # Parameters
    ///
    /// * `query`: Text in the query language of the driver.
    /// * `params`: Positional parameters. An empty slice executes the query without binding any
    ///   parameters.
    /// * `fetch`: If `true` the entire result set is fetched and returned together with the
    ///   column names. Statements not producing a result set yield [`Dataset::empty`]. If `false`
    ///   the query runs for its side effects only and `None` is returned.
    fn execute(
        &mut self,
        query: &str,
        params: &[Value],
        fetch: bool,
    ) -> Result<Option<Dataset>, Self::Error>;

    /// Release the connection.
    fn close(self) -> Result<(), Self::Error>;
}
