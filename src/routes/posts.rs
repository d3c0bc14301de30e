use rocket::{request::LenientForm, response::Redirect};
use rocket_contrib::templates::Template;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::routes::errors::ErrorPage;
use encre_models::{
    admin::Admin,
    comments::Comment,
    db_conn::DbConn,
    posts::{NewPost, Post},
    safe_string::SafeString,
    users::User,
    Error,
};

#[derive(Default, FromForm, Serialize, Validate)]
pub struct NewPostForm {
    #[validate(length(min = 1, message = "Title can't be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Subtitle can't be empty"))]
    pub subtitle: String,
    #[validate(length(min = 1, message = "Your name can't be empty"))]
    pub author: String,
    #[validate(url(message = "Invalid image URL"))]
    pub img_url: String,
    #[validate(length(min = 1, message = "Body can't be empty"))]
    pub body: String,
}

#[get("/")]
pub fn index(conn: DbConn, user: Option<User>) -> Result<Template, ErrorPage> {
    let posts = Post::list(&*conn)?;
    Ok(Template::render(
        "posts/index",
        json!({
            "account": user,
            "posts": posts,
        }),
    ))
}

#[get("/post/<id>")]
pub fn details(id: i32, conn: DbConn, user: Option<User>) -> Result<Template, ErrorPage> {
    let post = Post::get(&*conn, id)?;
    let author = post.get_author(&*conn)?;
    let comments = Comment::list_by_post(&*conn, post.id)?
        .into_iter()
        .map(|comment| {
            let author = comment.get_author(&*conn)?;
            Ok(json!({
                "text": comment.text,
                "author": author.name,
            }))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(Template::render(
        "posts/details",
        json!({
            "account": user,
            "post": post,
            "author": author.name,
            "comments": comments,
        }),
    ))
}

#[get("/new-post")]
pub fn new(admin: Admin) -> Template {
    render_form(
        &admin.0,
        &NewPostForm::default(),
        &ValidationErrors::new(),
        false,
        None,
    )
}

#[post("/new-post", data = "<form>")]
pub fn create(
    conn: DbConn,
    admin: Admin,
    form: LenientForm<NewPostForm>,
) -> Result<Redirect, Template> {
    let form = form.into_inner();
    form.validate()
        .map_err(|err| render_form(&admin.0, &form, &err, false, None))?;

    Post::create(
        &*conn,
        &admin.0,
        NewPost {
            title: form.title.clone(),
            subtitle: form.subtitle.clone(),
            date: String::new(),
            body: SafeString::new(&form.body),
            img_url: form.img_url.clone(),
            author_id: admin.0.id,
        },
    )
    .map_err(|err| render_form(&admin.0, &form, &to_validation(err), false, None))?;
    Ok(Redirect::to(uri!(index)))
}

#[get("/edit-post/<id>")]
pub fn edit(id: i32, conn: DbConn, admin: Admin) -> Result<Template, ErrorPage> {
    let post = Post::get(&*conn, id)?;
    let author = post.get_author(&*conn)?;
    let form = NewPostForm {
        title: post.title.clone(),
        subtitle: post.subtitle.clone(),
        author: author.name,
        img_url: post.img_url.clone(),
        body: post.body.to_string(),
    };
    Ok(render_form(
        &admin.0,
        &form,
        &ValidationErrors::new(),
        true,
        Some(post.id),
    ))
}

#[post("/edit-post/<id>", data = "<form>")]
pub fn update(
    id: i32,
    conn: DbConn,
    admin: Admin,
    form: LenientForm<NewPostForm>,
) -> Result<Redirect, Result<Template, ErrorPage>> {
    let mut post = Post::get(&*conn, id).map_err(|err| Err(ErrorPage::from(err)))?;
    let form = form.into_inner();
    form.validate()
        .map_err(|err| Ok(render_form(&admin.0, &form, &err, true, Some(id))))?;

    post.title = form.title.clone();
    post.subtitle = form.subtitle.clone();
    post.body = SafeString::new(&form.body);
    post.img_url = form.img_url.clone();
    // Whoever edits a post takes it over.
    post.author_id = admin.0.id;
    post.update(&*conn, &admin.0)
        .map_err(|err| Ok(render_form(&admin.0, &form, &to_validation(err), true, Some(id))))?;
    Ok(Redirect::to(uri!(index)))
}

#[get("/delete-post/<id>")]
pub fn delete(id: i32, conn: DbConn, admin: Admin) -> Result<Redirect, ErrorPage> {
    let post = Post::get(&*conn, id)?;
    post.delete(&*conn, &admin.0)?;
    Ok(Redirect::to(uri!(index)))
}

#[post("/delete-post/<id>")]
pub fn delete_form(id: i32, conn: DbConn, admin: Admin) -> Result<Redirect, ErrorPage> {
    delete(id, conn, admin)
}

fn render_form(
    account: &User,
    form: &NewPostForm,
    errors: &ValidationErrors,
    is_edit: bool,
    id: Option<i32>,
) -> Template {
    Template::render(
        "posts/new",
        json!({
            "account": account,
            "form": form,
            "errors": super::error_messages(errors),
            "is_edit": is_edit,
            "id": id,
        }),
    )
}

fn to_validation(err: Error) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    match err {
        Error::DuplicateTitle => {
            let mut error = ValidationError::new("duplicate_title");
            error.message = Some("A post with this title already exists".into());
            errors.add("title", error);
        }
        err => {
            warn!("Error: {:?}", err);
            let mut error = ValidationError::new("server_error");
            error.message = Some("An unknown error occurred".into());
            errors.add("__all__", error);
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> NewPostForm {
        NewPostForm {
            title: "A title".to_owned(),
            subtitle: "A subtitle".to_owned(),
            author: "The admin".to_owned(),
            img_url: "https://example.com/cover.png".to_owned(),
            body: "<p>Some body</p>".to_owned(),
        }
    }

    #[test]
    fn all_fields_are_required() {
        assert!(valid_form().validate().is_ok());
        for missing in &["title", "subtitle", "author", "img_url", "body"] {
            let mut form = valid_form();
            match *missing {
                "title" => form.title.clear(),
                "subtitle" => form.subtitle.clear(),
                "author" => form.author.clear(),
                "img_url" => form.img_url.clear(),
                _ => form.body.clear(),
            }
            let errors = form.validate().unwrap_err();
            assert!(errors.errors().contains_key(missing));
        }
    }

    #[test]
    fn img_url_must_be_a_url() {
        let mut form = valid_form();
        form.img_url = "not a url".to_owned();
        assert!(form.validate().is_err());
    }
}
