use crate::{users::User, Error, Result};
use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
    Outcome,
};

/// The gate in front of every content mutation: only the first registered
/// account may pass. Called before any side effect takes place.
pub fn require_admin(user: &User) -> Result<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(Error::Unauthorized)
    }
}

/// Wrapper around User to use as a request guard on pages reserved to the
/// admin. Anonymous visitors and other accounts get a plain 403, with no
/// hint of what the page would have contained.
pub struct Admin(pub User);

impl<'a, 'r> FromRequest<'a, 'r> for Admin {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<Self, Self::Error> {
        match request.guard::<User>() {
            Outcome::Success(user) if user.is_admin() => Outcome::Success(Admin(user)),
            _ => Outcome::Failure((Status::Forbidden, ())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests as user_tests};
    use diesel::Connection;

    #[test]
    fn only_first_user_passes() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            assert!(require_admin(&users[0]).is_ok());
            match require_admin(&users[1]) {
                Err(Error::Unauthorized) => {}
                _ => panic!("Unexpected result"),
            }
            Ok(())
        });
    }
}
