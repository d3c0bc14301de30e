use crate::{
    admin,
    safe_string::SafeString,
    schema::{comments, posts},
    users::User,
    Connection, Error, Result,
};
use chrono::Utc;
use diesel::{
    self,
    result::{DatabaseErrorKind, Error as DieselError},
    Connection as _,
    ExpressionMethods, QueryDsl, RunQueryDsl,
};

#[derive(Queryable, Identifiable, Clone, Debug, AsChangeset, Serialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: SafeString,
    pub img_url: String,
    pub author_id: i32,
}

#[derive(Insertable)]
#[table_name = "posts"]
pub struct NewPost {
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: SafeString,
    pub img_url: String,
    pub author_id: i32,
}

impl Post {
    get!(posts);
    last!(posts);
    find_by!(posts, find_by_title, title as &str);

    /// Every post there is, in publication order.
    pub fn list(conn: &Connection) -> Result<Vec<Post>> {
        posts::table
            .order(posts::id.asc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        posts::table.count().get_result(conn).map_err(Error::from)
    }

    /// Publishes a new post, signed by `actor`, stamped with today's date.
    pub fn create(conn: &Connection, actor: &User, mut new: NewPost) -> Result<Post> {
        admin::require_admin(actor)?;
        if new.title.is_empty()
            || new.subtitle.is_empty()
            || new.body.is_empty()
            || new.img_url.is_empty()
        {
            return Err(Error::InvalidValue);
        }
        new.author_id = actor.id;
        new.date = Post::today();
        diesel::insert_into(posts::table)
            .values(new)
            .execute(conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    Error::DuplicateTitle
                }
                err => Error::Db(err),
            })?;
        Self::last(conn)
    }

    /// Saves an edited post. The creation date is the one thing an edit
    /// never touches.
    pub fn update(&self, conn: &Connection, actor: &User) -> Result<Post> {
        admin::require_admin(actor)?;
        if self.title.is_empty()
            || self.subtitle.is_empty()
            || self.body.is_empty()
            || self.img_url.is_empty()
        {
            return Err(Error::InvalidValue);
        }
        diesel::update(self)
            .set(self)
            .execute(conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    Error::DuplicateTitle
                }
                err => Error::Db(err),
            })?;
        Self::get(conn, self.id)
    }

    /// Removes the post and its comments, in one transaction.
    pub fn delete(&self, conn: &Connection, actor: &User) -> Result<()> {
        admin::require_admin(actor)?;
        conn.transaction(|| {
            diesel::delete(comments::table.filter(comments::post_id.eq(self.id)))
                .execute(conn)?;
            diesel::delete(self)
                .execute(conn)
                .map(|_| ())
                .map_err(Error::from)
        })
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    /// The current date, the way it is displayed under a post title:
    /// `Month Day, Year`.
    pub fn today() -> String {
        Utc::now().format("%B %-d, %Y").to_string()
    }
}
