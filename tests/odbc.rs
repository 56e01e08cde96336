//! Tests against an actual Advantage StreamlineSQL ODBC driver. They require the driver to be
//! installed and registered with the driver manager, which is why they are ignored by default.
//! Run them with `cargo test -- --ignored`. The data directory defaults to the system temporary
//! directory and can be overwritten using the `ADT_DATA_DIRECTORY` environment variable.

use adt_odbc::{
    Connection, Error, OdbcDriver, Value,
    chrono::NaiveDate,
    clean_table_name,
    odbc_api::{Environment, sys::AttrConnectionPooling},
};
use float_eq::assert_float_eq;
use lazy_static::lazy_static;
use stdext::function_name;

// Rust by default executes tests in parallel. Yet only one environment is allowed at a time.
lazy_static! {
    static ref ENV: Environment = unsafe {
        // The wrapper does not pool connections, neither should the driver manager.
        Environment::set_connection_pooling(AttrConnectionPooling::Off).unwrap();
        Environment::new().unwrap()
    };
}

fn data_directory() -> String {
    std::env::var("ADT_DATA_DIRECTORY")
        .unwrap_or_else(|_| std::env::temp_dir().to_string_lossy().into_owned())
}

fn connect() -> Connection<OdbcDriver<'static>> {
    Connection::connect(OdbcDriver::new(&ENV), data_directory()).unwrap()
}

#[test]
#[ignore = "requires the Advantage StreamlineSQL ODBC driver"]
fn open_and_close() {
    let mut connection = Connection::new(OdbcDriver::new(&ENV), data_directory());

    connection.open().unwrap();
    assert!(connection.is_open());

    connection.close().unwrap();
    assert!(!connection.is_open());
}

#[test]
#[ignore = "requires the Advantage StreamlineSQL ODBC driver"]
fn run_query_closed() {
    let table_name = function_name!().rsplit_once(':').unwrap().1;
    let mut connection = connect();
    setup_test_table(&mut connection, table_name);
    connection.close().unwrap();

    let result = connection.run_query(&format!("SELECT * FROM {table_name};"), &[], true);

    assert!(matches!(result, Err(Error::ClosedConnection)));
}

#[test]
#[ignore = "requires the Advantage StreamlineSQL ODBC driver"]
fn iter_dataset() {
    let table_name = function_name!().rsplit_once(':').unwrap().1;
    let mut connection = connect();
    setup_test_table(&mut connection, table_name);
    let insert = format!("INSERT INTO {table_name} VALUES (1, 'Test');");
    connection.run_query(&insert, &[], false).unwrap();
    let insert = format!("INSERT INTO {table_name} VALUES (2, 'Test2');");
    connection.run_query(&insert, &[], false).unwrap();

    connection
        .run_query(&format!("SELECT * FROM {table_name};"), &[], true)
        .unwrap();

    // char(10) is blank padded by the driver
    assert_eq!(
        Some("Test"),
        connection.dataset().unwrap().rows()[0][1]
            .as_str()
            .map(str::trim)
    );
    let mut rows = connection.iter_dataset();
    let row = rows.next().unwrap();
    assert_eq!(Value::Integer(1), row["column1"]);
    assert_eq!(Value::from("Test"), row["column2"]);
    let row = rows.next().unwrap();
    assert_eq!(Value::Integer(2), row["column1"]);
    assert_eq!(Value::from("Test2"), row["column2"]);
    assert!(rows.next().is_none());

    connection.close().unwrap();
}

#[test]
#[ignore = "requires the Advantage StreamlineSQL ODBC driver"]
fn parameterized_query() {
    let table_name = function_name!().rsplit_once(':').unwrap().1;
    let mut connection = connect();
    setup_test_table(&mut connection, table_name);
    let insert = format!("INSERT INTO {table_name} VALUES (?, ?);");
    connection
        .run_query(&insert, &[Value::Integer(3), Value::from("Three")], false)
        .unwrap();

    let select = format!("SELECT column2 FROM {table_name} WHERE column1 = ?;");
    connection
        .run_query(&select, &[Value::Integer(3)], true)
        .unwrap();

    assert_eq!(Some(&["column2".to_owned()][..]), connection.columns());
    let names: Vec<_> = connection
        .iter_dataset()
        .map(|row| row["column2"].clone())
        .collect();
    assert_eq!(vec![Value::from("Three")], names);
}

#[test]
#[ignore = "requires the Advantage StreamlineSQL ODBC driver"]
fn fetch_double_and_date() {
    // `read_table` strips the underscores of the test name
    let table_name = &clean_table_name(function_name!().rsplit_once(':').unwrap().1);
    let mut connection = connect();
    drop_table(&mut connection, table_name);
    let create = format!("CREATE TABLE {table_name} (amount double, booked date);");
    connection.run_query(&create, &[], false).unwrap();
    let insert = format!("INSERT INTO {table_name} VALUES (1.5, '2021-03-04');");
    connection.run_query(&insert, &[], false).unwrap();

    connection.read_table(table_name).unwrap();

    let row = connection.iter_dataset().next().unwrap();
    assert_float_eq!(1.5, row["amount"].as_f64().unwrap(), abs <= 1e-9);
    assert_eq!(
        Value::Date(NaiveDate::from_ymd_opt(2021, 3, 4).unwrap()),
        row["booked"]
    );
}

#[test]
#[ignore = "requires the Advantage StreamlineSQL ODBC driver"]
fn syntax_error_is_forwarded() {
    let mut connection = connect();

    let result = connection.run_query("SELEKT nothing;", &[], true);

    assert!(matches!(result, Err(Error::Driver(_))));
    assert!(connection.dataset().is_none());
}

fn setup_test_table(connection: &mut Connection<OdbcDriver<'_>>, table_name: &str) {
    drop_table(connection, table_name);
    let create = format!("CREATE TABLE {table_name} (column1 integer, column2 char(10));");
    connection.run_query(&create, &[], false).unwrap();
}

fn drop_table(connection: &mut Connection<OdbcDriver<'_>>, table_name: &str) {
    // Fails if the table does not exist yet, which is fine.
    let _ = connection.run_query(&format!("DROP TABLE {table_name};"), &[], false);
}
