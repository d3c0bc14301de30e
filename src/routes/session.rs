use rocket::{
    http::{Cookie, Cookies},
    request::{FlashMessage, Form},
    response::Redirect,
};
use rocket_contrib::templates::Template;

use encre_models::{
    db_conn::DbConn,
    users::{User, AUTH_COOKIE},
    Error,
};

#[derive(FromForm)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[get("/login?<m>")]
pub fn new(m: Option<String>, user: Option<User>) -> Template {
    Template::render(
        "session/login",
        json!({
            "account": user,
            "message": m,
        }),
    )
}

#[post("/login", data = "<form>")]
pub fn create(
    conn: DbConn,
    form: Form<LoginForm>,
    flash: Option<FlashMessage>,
    mut cookies: Cookies,
) -> Result<Redirect, Redirect> {
    match User::login(&*conn, &form.email, &form.password) {
        Ok(user) => {
            cookies.add_private(Cookie::new(AUTH_COOKIE, user.id.to_string()));
            // Head back to the page that asked for a login, if any.
            let destination = flash
                .filter(|f| f.name() == "callback")
                .map(|f| f.msg().to_owned())
                .unwrap_or_else(|| "/".to_owned());
            Ok(Redirect::to(destination))
        }
        Err(Error::UnknownEmail) => Err(Redirect::to(uri!(
            new: m = "Sorry, the email you entered does not exist. Try again."
        ))),
        Err(_) => Err(Redirect::to(
            uri!(new: m = "Incorrect credentials. Try again."),
        )),
    }
}

#[get("/logout")]
pub fn delete(mut cookies: Cookies) -> Redirect {
    if let Some(cookie) = cookies.get_private(AUTH_COOKIE) {
        cookies.remove_private(cookie);
    }
    Redirect::to(uri!(super::posts::index))
}
