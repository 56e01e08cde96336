use std::{char::DecodeUtf16Error, string::FromUtf8Error};

use odbc_api::{ConnectionOptions, Environment};
use thiserror::Error;

use crate::{Dataset, Driver, DriverConnection, Value};

mod fetch;
mod parameter;

use self::{fetch::fetch_all, parameter::to_input_parameter};

pub use self::fetch::{FetchStrategy, FieldBuffer};

/// Errors of the ODBC driver implementation. These end up as the source of
/// [`crate::Error::Driver`].
#[derive(Error, Debug)]
pub enum OdbcError {
    /// Error reported by the ODBC driver manager or driver, forwarded unchanged.
    #[error(transparent)]
    Odbc(#[from] odbc_api::Error),
    /// Text fields requested as narrow strings are assumed to be UTF-8.
    #[error("Column {col} contains text which is not valid UTF-8.")]
    InvalidUtf8 {
        /// One based index of the column
        col: u16,
        source: FromUtf8Error,
    },
    /// Text fields fetched as wide strings must be valid UTF-16.
    #[error("Column {col} contains text which is not valid UTF-16.")]
    InvalidUtf16 {
        /// One based index of the column
        col: u16,
        source: DecodeUtf16Error,
    },
    #[error("The driver returned an invalid date or time for column {col}.")]
    InvalidDateTime {
        /// One based index of the column
        col: u16,
    },
}

/// [`Driver`] connecting through an ODBC driver manager.
///
/// Only one ODBC environment should exist per process, so the driver borrows it rather than
/// owning it. All connections handed out borrow the environment as well.
#[derive(Clone, Copy)]
pub struct OdbcDriver<'env> {
    environment: &'env Environment,
    /// Number of seconds to wait for a login request to complete. `None` leaves it to the driver.
    login_timeout_sec: Option<u32>,
}

impl<'env> OdbcDriver<'env> {
    pub fn new(environment: &'env Environment) -> Self {
        Self {
            environment,
            login_timeout_sec: None,
        }
    }

    /// Limit the time spent waiting for the data source to accept a connection.
    pub fn with_login_timeout_sec(self, login_timeout_sec: u32) -> Self {
        Self {
            login_timeout_sec: Some(login_timeout_sec),
            ..self
        }
    }
}

impl<'env> Driver for OdbcDriver<'env> {
    type Connection = odbc_api::Connection<'env>;
    type Error = OdbcError;

    fn connect(
        &self,
        connection_string: &str,
        autocommit: bool,
    ) -> Result<Self::Connection, OdbcError> {
        let options = ConnectionOptions {
            login_timeout_sec: self.login_timeout_sec,
            ..ConnectionOptions::default()
        };
        let connection = self
            .environment
            .connect_with_connection_string(connection_string, options)?;
        connection.set_autocommit(autocommit)?;
        Ok(connection)
    }
}

impl DriverConnection for odbc_api::Connection<'_> {
    type Error = OdbcError;

    fn execute(
        &mut self,
        query: &str,
        params: &[Value],
        fetch: bool,
    ) -> Result<Option<Dataset>, OdbcError> {
        // Statement handle is freed once it goes out of scope, whatever way we leave this method.
        let mut statement = self.preallocate()?;
        let params: Vec<_> = params.iter().map(to_input_parameter).collect();
        let cursor = if params.is_empty() {
            statement.execute(query, ())?
        } else {
            statement.execute(query, params.as_slice())?
        };
        if !fetch {
            return Ok(None);
        }
        let dataset = match cursor {
            Some(cursor) => fetch_all(cursor)?,
            None => Dataset::empty(),
        };
        Ok(Some(dataset))
    }

    /// Disconnects by dropping the handle.
    fn close(self) -> Result<(), OdbcError> {
        drop(self);
        Ok(())
    }
}
