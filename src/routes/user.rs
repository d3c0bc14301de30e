use rocket::{
    http::{Cookie, Cookies},
    request::LenientForm,
    response::Redirect,
};
use rocket_contrib::templates::Template;
use validator::{Validate, ValidationError, ValidationErrors};

use encre_models::{
    db_conn::DbConn,
    users::{NewUser, User, AUTH_COOKIE},
    Error,
};

#[derive(Default, FromForm, Serialize, Validate)]
pub struct NewUserForm {
    #[validate(length(min = 1, message = "Name can't be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password should be at least 8 characters long"))]
    pub password: String,
}

#[get("/register")]
pub fn new(user: Option<User>) -> Template {
    render_form(user, &NewUserForm::default(), &ValidationErrors::new())
}

#[post("/register", data = "<form>")]
pub fn create(
    conn: DbConn,
    form: LenientForm<NewUserForm>,
    mut cookies: Cookies,
) -> Result<Redirect, Template> {
    let mut form = form.into_inner();
    form.name = form.name.trim().to_owned();
    form.email = form.email.trim().to_owned();
    form.validate()
        .map_err(|err| render_form(None, &form, &err))?;

    let hashed = User::hash_pass(&form.password)
        .map_err(|err| render_form(None, &form, &to_validation(err)))?;
    match NewUser::new_local(&*conn, form.name.clone(), form.email.clone(), hashed) {
        Ok(user) => {
            cookies.add_private(Cookie::new(AUTH_COOKIE, user.id.to_string()));
            Ok(Redirect::to(uri!(super::posts::index)))
        }
        Err(Error::DuplicateEmail) => Ok(Redirect::to(uri!(
            super::session::new: m = "The email you entered already exists. Login instead!"
        ))),
        Err(err) => Err(render_form(None, &form, &to_validation(err))),
    }
}

fn render_form(account: Option<User>, form: &NewUserForm, errors: &ValidationErrors) -> Template {
    Template::render(
        "users/new",
        json!({
            "account": account,
            "form": form,
            "errors": super::error_messages(errors),
        }),
    )
}

fn to_validation<T: std::fmt::Debug>(err: T) -> ValidationErrors {
    warn!("Error: {:?}", err);
    let mut errors = ValidationErrors::new();
    let mut error = ValidationError::new("server_error");
    error.message = Some("An unknown error occurred".into());
    errors.add("__all__", error);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> NewUserForm {
        NewUserForm {
            name: "Someone".to_owned(),
            email: "someone@example.com".to_owned(),
            password: "long enough".to_owned(),
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn rejects_a_malformed_email() {
        let mut form = valid_form();
        form.email = "someone".to_owned();
        let errors = form.validate().unwrap_err();
        assert!(errors.errors().contains_key("email"));
    }

    #[test]
    fn rejects_a_short_password() {
        let mut form = valid_form();
        form.password = "short".to_owned();
        let errors = form.validate().unwrap_err();
        assert!(errors.errors().contains_key("password"));
    }
}
