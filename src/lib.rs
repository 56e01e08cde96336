//! Query the data directory of an Advantage StreamlineSQL server over ODBC, cache the result set
//! of the last query and iterate it as rows mapping column names to values.
//!
//! ```no_run
//! use adt_odbc::{odbc_api::Environment, Connection, OdbcDriver, Value};
//!
//! fn main() -> Result<(), anyhow::Error> {
//!     let odbc_environment = Environment::new()?;
//!     let mut connection = Connection::connect(OdbcDriver::new(&odbc_environment), "/srv/data")?;
//!
//!     // Statements which are only executed for their side effects do not touch the cache.
//!     connection.run_query(
//!         "INSERT INTO orders VALUES (?, ?);",
//!         &[Value::Integer(42), Value::from("pending")],
//!         false,
//!     )?;
//!
//!     connection.run_query("SELECT * FROM orders WHERE id = ?;", &[Value::Integer(42)], true)?;
//!     for row in connection.iter_dataset() {
//!         println!("{:?}", row["status"]);
//!     }
//!
//!     connection.close()?;
//!     Ok(())
//! }
//! ```
mod connection;
mod dataset;
mod date_time;
mod driver;
mod error;
mod odbc_driver;
mod value;

pub use self::{
    connection::{Connection, clean_table_name, connection_string},
    dataset::{Dataset, Row, Rows},
    driver::{Driver, DriverConnection},
    error::Error,
    odbc_driver::{FetchStrategy, FieldBuffer, OdbcDriver, OdbcError},
    value::Value,
};

// Rexport odbc_api and chrono to make it easier for downstream crates to depend on them, avoiding
// version mismatches
pub use chrono;
pub use odbc_api;
