use rocket::{
    request::Form,
    response::{Flash, Redirect},
};

use crate::routes::errors::ErrorPage;
use crate::utils;
use encre_models::{
    comments::{Comment, NewComment},
    db_conn::DbConn,
    posts::Post,
    users::User,
};

#[derive(FromForm)]
pub struct CommentForm {
    pub comment: String,
}

#[post("/post/<id>", data = "<form>")]
pub fn create(
    id: i32,
    form: Form<CommentForm>,
    user: User,
    conn: DbConn,
) -> Result<Redirect, ErrorPage> {
    let post = Post::get(&*conn, id)?;
    Comment::insert(
        &*conn,
        NewComment {
            text: form.comment.clone(),
            post_id: post.id,
            author_id: user.id,
        },
    )?;
    Ok(Redirect::to(uri!(super::posts::details: id = id)))
}

#[post("/post/<id>", rank = 2, data = "<_form>")]
pub fn create_auth(id: i32, _form: Form<CommentForm>) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in order to post a comment",
        uri!(super::posts::details: id = id),
    )
}
