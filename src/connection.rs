use log::{debug, info};
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::{Dataset, Driver, DriverConnection, Error, Rows, Value};

/// Name of the ODBC driver registered by the Advantage StreamlineSQL installation.
const ODBC_DRIVER_NAME: &str = "Advantage StreamlineSQL ODBC";

/// Connection string used to open the data directory `datasource`. Requests the local server
/// (`ServerTypes=1`).
///
/// ```
/// assert_eq!(
///     "DRIVER={Advantage StreamlineSQL ODBC};DataDirectory=C:\\data;ServerTypes=1;",
///     adt_odbc::connection_string("C:\\data")
/// );
/// ```
pub fn connection_string(datasource: &str) -> String {
    format!("DRIVER={{{ODBC_DRIVER_NAME}}};DataDirectory={datasource};ServerTypes=1;")
}

/// Removes every character which is not alphanumeric from `table`. This includes underscores,
/// whitespace, quotes and separators. It keeps trivial injections out of [`Connection::read_table`]
/// but it is no substitute for proper escaping.
///
/// A character counts as alphanumeric if its Unicode general category is a letter (`L*`) or a
/// number (`N*`). Combining marks are removed, even though they are part of a word.
///
/// ```
/// assert_eq!("abDROP", adt_odbc::clean_table_name("a;b DROP"));
/// ```
pub fn clean_table_name(table: &str) -> String {
    table.chars().filter(|&c| is_letter_or_number(c)).collect()
}

fn is_letter_or_number(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
    )
}

/// A connection to a single data directory, caching the result set of the last persisted query.
///
/// # Example
///
/// ```no_run
/// use adt_odbc::{odbc_api::Environment, Connection, OdbcDriver};
///
/// fn main() -> Result<(), anyhow::Error> {
///     let odbc_environment = Environment::new()?;
///
///     // Opens the connection right away
///     let mut connection = Connection::connect(OdbcDriver::new(&odbc_environment), "/srv/data")?;
///
///     connection.read_table("customers")?;
///     for row in connection.iter_dataset() {
///         println!("{:?}", row.get("name"));
///     }
///
///     connection.close()?;
///     Ok(())
/// }
/// ```
pub struct Connection<D: Driver> {
    driver: D,
    /// Path to the data directory. Immutable after construction.
    datasource: String,
    /// Live handle to the data source. `None` means the connection is closed.
    handle: Option<D::Connection>,
    /// Result set of the last persisting query. Columns and rows are replaced together.
    dataset: Option<Dataset>,
}

impl<D: Driver> Connection<D> {
    /// Creates a closed connection. Nothing is sent to the driver until [`Self::open`] is called.
    pub fn new(driver: D, datasource: impl Into<String>) -> Self {
        Self {
            driver,
            datasource: datasource.into(),
            handle: None,
            dataset: None,
        }
    }

    /// Creates a connection and opens it immediately. Blocks until the driver either established
    /// the connection or failed to do so.
    pub fn connect(driver: D, datasource: impl Into<String>) -> Result<Self, Error> {
        let mut connection = Self::new(driver, datasource);
        connection.open()?;
        Ok(connection)
    }

    /// Connects to the data directory with autocommit enabled.
    ///
    /// Fails with [`Error::AlreadyOpen`] if the connection is open, leaving the existing handle in
    /// place. Driver errors are not retried.
    pub fn open(&mut self) -> Result<(), Error> {
        if self.handle.is_some() {
            return Err(Error::AlreadyOpen);
        }
        let connection_string = connection_string(&self.datasource);
        debug!("Opening connection: {connection_string}");
        let handle = self
            .driver
            .connect(&connection_string, true)
            .map_err(Error::driver)?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Releases the handle to the data source. The connection counts as closed afterwards, even
    /// if the driver reports an error while closing.
    pub fn close(&mut self) -> Result<(), Error> {
        let handle = self.handle.take().ok_or(Error::ClosedConnection)?;
        debug!("Closing connection to '{}'", self.datasource);
        handle.close().map_err(Error::driver)
    }

    /// Executes `query` with the positional parameters `args`.
    ///
    /// If `persist` is `true` the entire result set replaces the cached dataset and columns. A
    /// statement without result set, like an `INSERT`, caches an empty dataset without columns.
    /// If `persist` is `false` the query is executed for its side effects only and the cache is
    /// left untouched. A failing query never alters the cache.
    pub fn run_query(&mut self, query: &str, args: &[Value], persist: bool) -> Result<(), Error> {
        let handle = self.handle.as_mut().ok_or(Error::ClosedConnection)?;
        debug!("Executing query (persist: {persist}): {query}");
        let fetched = handle
            .execute(query, args, persist)
            .map_err(Error::driver)?;
        if let Some(dataset) = fetched.filter(|_| persist) {
            info!(
                "Caching {} rows with columns {:?}",
                dataset.num_rows(),
                dataset.columns()
            );
            self.dataset = Some(dataset);
        }
        Ok(())
    }

    /// Shorthand for [`Self::run_query`] without parameters, persisting the result.
    pub fn execute(&mut self, query: &str) -> Result<(), Error> {
        self.run_query(query, &[], true)
    }

    /// Caches the entire content of `table`. All characters which are not alphanumeric are
    /// removed from `table` first, see [`clean_table_name`].
    pub fn read_table(&mut self, table: &str) -> Result<(), Error> {
        let query = format!("SELECT * FROM {};", clean_table_name(table));
        self.run_query(&query, &[], true)
    }

    /// Iterates over the cached dataset, one column name to value mapping per row. Text values
    /// are trimmed. Each call starts over at the first row. Yields nothing if no result has been
    /// persisted yet.
    pub fn iter_dataset(&self) -> Rows<'_> {
        self.dataset
            .as_ref()
            .map(Dataset::iter)
            .unwrap_or_else(Rows::empty)
    }

    pub fn datasource(&self) -> &str {
        &self.datasource
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Driver connection, if open. Allows issuing statements the wrapper does not cover.
    pub fn handle(&self) -> Option<&D::Connection> {
        self.handle.as_ref()
    }

    pub fn handle_mut(&mut self) -> Option<&mut D::Connection> {
        self.handle.as_mut()
    }

    /// Cached result of the last persisting query.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Column names of the cached dataset.
    pub fn columns(&self) -> Option<&[String]> {
        self.dataset.as_ref().map(Dataset::columns)
    }
}
