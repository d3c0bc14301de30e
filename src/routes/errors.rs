use encre_models::{users::User, Error};
use rocket::{
    http::Status,
    request::{FromRequest, Request},
    response::{self, status::Custom, Responder},
};
use rocket_contrib::templates::Template;

#[derive(Debug)]
pub struct ErrorPage(Error);

impl From<Error> for ErrorPage {
    fn from(err: Error) -> ErrorPage {
        ErrorPage(err)
    }
}

impl<'r> Responder<'r> for ErrorPage {
    fn respond_to(self, req: &Request) -> response::Result<'r> {
        warn!("Error: {:?}", self.0);
        let user = User::from_request(req).succeeded();
        match self.0 {
            Error::NotFound => Custom(
                Status::NotFound,
                Template::render("errors/404", json!({ "account": user })),
            )
            .respond_to(req),
            Error::Unauthorized => Custom(
                Status::Forbidden,
                Template::render("errors/403", json!({ "account": user })),
            )
            .respond_to(req),
            _ => Custom(
                Status::InternalServerError,
                Template::render("errors/500", json!({ "account": user })),
            )
            .respond_to(req),
        }
    }
}

#[catch(403)]
pub fn forbidden(req: &Request) -> Template {
    let user = User::from_request(req).succeeded();
    Template::render("errors/403", json!({ "account": user }))
}

#[catch(404)]
pub fn not_found(req: &Request) -> Template {
    let user = User::from_request(req).succeeded();
    Template::render("errors/404", json!({ "account": user }))
}

#[catch(500)]
pub fn server_error(req: &Request) -> Template {
    let user = User::from_request(req).succeeded();
    Template::render("errors/500", json!({ "account": user }))
}
