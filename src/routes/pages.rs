use encre_models::users::User;
use rocket_contrib::templates::Template;

#[get("/about")]
pub fn about(user: Option<User>) -> Template {
    Template::render("pages/about", json!({ "account": user }))
}

#[get("/contact")]
pub fn contact(user: Option<User>) -> Template {
    Template::render("pages/contact", json!({ "account": user }))
}
