use crate::{db_conn::DbConn, schema::users, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{
    self,
    result::{DatabaseErrorKind, Error as DieselError},
    ExpressionMethods, QueryDsl, RunQueryDsl,
};
use rocket::{
    outcome::IntoOutcome,
    request::{self, FromRequest, Request},
};
use std::cmp::PartialEq;

pub const AUTH_COOKIE: &str = "user_id";

/// The one and only administrator is the first account ever registered.
/// This is fixed by registration order and can't be reassigned.
pub const ADMIN_USER_ID: i32 = 1;

#[derive(Queryable, Identifiable, Clone, Debug, AsChangeset, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub hashed_password: String,
}

impl User {
    get!(users);
    last!(users);
    find_by!(users, find_by_email, email as &str);

    pub fn insert(conn: &Connection, new: NewUser) -> Result<Self> {
        diesel::insert_into(users::table)
            .values(new)
            .execute(conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    Error::DuplicateEmail
                }
                err => Error::Db(err),
            })?;
        Self::last(conn)
    }

    pub fn is_admin(&self) -> bool {
        self.id == ADMIN_USER_ID
    }

    pub fn list(conn: &Connection) -> Result<Vec<User>> {
        users::table
            .order(users::id.asc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        users::table.count().get_result(conn).map_err(Error::from)
    }

    pub fn hash_pass(pass: &str) -> Result<String> {
        bcrypt::hash(pass, 10).map_err(Error::from)
    }

    pub fn login(conn: &Connection, email: &str, password: &str) -> Result<User> {
        match User::find_by_email(conn, email) {
            Ok(user) => {
                if bcrypt::verify(password, &user.hashed_password).unwrap_or(false) {
                    Ok(user)
                } else {
                    Err(Error::InvalidCredentials)
                }
            }
            Err(_) => {
                // No user was found. Verify a password anyway, so that the
                // response time doesn't tell which of the two cases happened.
                let other = User::get(conn, ADMIN_USER_ID)
                    .map(|u| u.hashed_password)
                    .unwrap_or_default();
                let _ = bcrypt::verify(password, &other);
                Err(Error::UnknownEmail)
            }
        }
    }

    pub fn reset_password(&self, conn: &Connection, pass: &str) -> Result<()> {
        diesel::update(self)
            .set(users::hashed_password.eq(User::hash_pass(pass)?))
            .execute(conn)?;
        Ok(())
    }
}

impl<'a, 'r> FromRequest<'a, 'r> for User {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<User, ()> {
        let conn = request.guard::<DbConn>()?;
        request
            .cookies()
            .get_private(AUTH_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok())
            .and_then(|id| User::get(&*conn, id).ok())
            .or_forward(())
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl NewUser {
    /// Registers a new user. The caller hashes the password first, the
    /// plaintext never reaches this crate.
    pub fn new_local(
        conn: &Connection,
        name: String,
        email: String,
        hashed_password: String,
    ) -> Result<User> {
        User::insert(
            conn,
            NewUser {
                name,
                email,
                hashed_password,
            },
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{tests::db, Connection as Conn};
    use diesel::Connection;

    pub(crate) fn fill_database(conn: &Conn) -> Vec<User> {
        let admin = NewUser::new_local(
            conn,
            "The admin".to_owned(),
            "admin@example.com".to_owned(),
            User::hash_pass("invalid_admin_password").unwrap(),
        )
        .unwrap();
        let user = NewUser::new_local(
            conn,
            "Some user".to_owned(),
            "user@example.com".to_owned(),
            User::hash_pass("invalid_user_password").unwrap(),
        )
        .unwrap();
        vec![admin, user]
    }

    #[test]
    fn find_by() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert_eq!(
                users[1].id,
                User::find_by_email(&conn, "user@example.com").unwrap().id
            );
            assert!(User::find_by_email(&conn, "nobody@example.com").is_err());
            Ok(())
        });
    }

    #[test]
    fn first_user_is_admin() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert_eq!(users[0].id, ADMIN_USER_ID);
            assert!(users[0].is_admin());
            assert!(!users[1].is_admin());
            Ok(())
        });
    }

    #[test]
    fn register_and_login() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let registered = NewUser::new_local(
                &conn,
                "Test".to_owned(),
                "test@example.com".to_owned(),
                User::hash_pass("test_password").unwrap(),
            )
            .unwrap();
            let logged_in = User::login(&conn, "test@example.com", "test_password").unwrap();
            assert_eq!(registered.id, logged_in.id);
            Ok(())
        });
    }

    #[test]
    fn duplicate_email_registers_nobody() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            fill_database(&conn);
            let count = User::count(&conn).unwrap();
            match NewUser::new_local(
                &conn,
                "Impostor".to_owned(),
                "user@example.com".to_owned(),
                User::hash_pass("impostor_password").unwrap(),
            ) {
                Err(Error::DuplicateEmail) => {}
                other => panic!("Unexpected result: {:?}", other.map(|u| u.id)),
            }
            assert_eq!(count, User::count(&conn).unwrap());
            Ok(())
        });
    }

    #[test]
    fn login_failures() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            fill_database(&conn);
            match User::login(&conn, "user@example.com", "wrong_password") {
                Err(Error::InvalidCredentials) => {}
                other => panic!("Unexpected result: {:?}", other.map(|u| u.id)),
            }
            match User::login(&conn, "nobody@example.com", "whatever") {
                Err(Error::UnknownEmail) => {}
                other => panic!("Unexpected result: {:?}", other.map(|u| u.id)),
            }
            Ok(())
        });
    }

    #[test]
    fn reset_password() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            users[1].reset_password(&conn, "new_password").unwrap();
            assert!(User::login(&conn, "user@example.com", "new_password").is_ok());
            match User::login(&conn, "user@example.com", "invalid_user_password") {
                Err(Error::InvalidCredentials) => {}
                other => panic!("Unexpected result: {:?}", other.map(|u| u.id)),
            }
            Ok(())
        });
    }
}
