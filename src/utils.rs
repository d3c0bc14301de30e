use rocket::{
    http::uri::{Origin, Uri},
    response::{Flash, Redirect},
};

/// Sends an anonymous visitor to the login page, remembering where they
/// came from so that a successful login can send them back.
pub fn requires_login(message: &str, url: Origin<'static>) -> Flash<Redirect> {
    Flash::new(
        Redirect::to(format!("/login?m={}", Uri::percent_encode(message))),
        "callback",
        url.to_string(),
    )
}
