#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
pub type Connection = diesel::SqliteConnection;

#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
pub type Connection = diesel::PgConnection;

/// All the possible errors that can be encountered in this crate
#[derive(Debug)]
pub enum Error {
    Db(diesel::result::Error),
    DuplicateEmail,
    DuplicateTitle,
    Hashing(bcrypt::BcryptError),
    InvalidCredentials,
    InvalidValue,
    Io(std::io::Error),
    Migration(diesel_migrations::RunMigrationsError),
    NotFound,
    Unauthorized,
    UnknownEmail,
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::Hashing(err)
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Error::NotFound,
            _ => Error::Db(err),
        }
    }
}

impl From<diesel_migrations::RunMigrationsError> for Error {
    fn from(err: diesel_migrations::RunMigrationsError) -> Self {
        Error::Migration(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Adds a function to a model, to retrieve an instance by a given field.
///
/// # Usage
///
/// ```ignore
/// impl User {
///     find_by!(users, find_by_email, email as &str);
/// }
///
/// // Get the user with email "foo@bar.baz", if any.
/// User::find_by_email(&conn, "foo@bar.baz");
/// ```
macro_rules! find_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Self> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Lists all the rows of a model matching a given field.
macro_rules! list_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Vec<Self>> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .order($table::id.asc())
                .load::<Self>(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to retrieve a row by its primary key.
macro_rules! get {
    ($table:ident) => {
        pub fn get(conn: &crate::Connection, id: i32) -> Result<Self> {
            $table::table
                .filter($table::id.eq(id))
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Retrieves the last inserted row of a model.
///
/// Needed because the SQLite backend has no `RETURNING` clause, so inserts
/// go through `execute` and the fresh row is fetched back by id.
macro_rules! last {
    ($table:ident) => {
        pub fn last(conn: &crate::Connection) -> Result<Self> {
            $table::table
                .order_by($table::id.desc())
                .first(conn)
                .map_err(Error::from)
        }
    };
}

pub mod admin;
pub mod comments;
pub mod config;
pub mod db_conn;
pub mod migrations;
pub mod posts;
pub mod safe_string;
pub mod schema;
pub mod users;

pub use config::CONFIG;

#[cfg(test)]
pub mod tests {
    use crate::{db_conn, migrations, CONFIG};
    use diesel::r2d2::ConnectionManager;

    pub fn db() -> db_conn::DbConn {
        db_conn::DbConn(
            DB_POOL
                .get()
                .expect("Couldn't get a connection from the test pool"),
        )
    }

    lazy_static! {
        static ref DB_POOL: db_conn::DbPool = {
            // A single connection, so that every test shares the same
            // in-memory SQLite database.
            let pool = db_conn::DbPool::builder()
                .max_size(1)
                .connection_customizer(Box::new(db_conn::PragmaForeignKey))
                .build(ConnectionManager::new(CONFIG.database_url.as_str()))
                .unwrap();
            migrations::run_pending(&pool.get().unwrap()).expect("Couldn't run migrations");
            pool
        };
    }
}
