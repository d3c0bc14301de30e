use crate::{posts::Post, schema::comments, users::User, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Queryable, Identifiable, Clone, Debug, Serialize)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "comments"]
pub struct NewComment {
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
}

impl Comment {
    get!(comments);
    last!(comments);
    list_by!(comments, list_by_post, post_id as i32);

    /// Records a comment under an existing post. There is no way to edit or
    /// remove it afterwards.
    pub fn insert(conn: &Connection, new: NewComment) -> Result<Self> {
        Post::get(conn, new.post_id)?;
        diesel::insert_into(comments::table)
            .values(new)
            .execute(conn)?;
        Self::last(conn)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn get_post(&self, conn: &Connection) -> Result<Post> {
        Post::get(conn, self.post_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{posts::tests as post_tests, tests::db};
    use diesel::Connection;

    #[test]
    fn insert_records_parent_and_author() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (posts, users) = post_tests::fill_database(&conn);
            let comment = Comment::insert(
                &conn,
                NewComment {
                    text: "A fine read".to_owned(),
                    post_id: posts[0].id,
                    author_id: users[1].id,
                },
            )
            .unwrap();
            assert_eq!(comment.get_post(&conn).unwrap().id, posts[0].id);
            assert_eq!(comment.get_author(&conn).unwrap().id, users[1].id);
            Ok(())
        });
    }

    // Post fields are all mandatory, comment text isn't.
    #[test]
    fn empty_text_is_accepted() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (posts, users) = post_tests::fill_database(&conn);
            let comment = Comment::insert(
                &conn,
                NewComment {
                    text: String::new(),
                    post_id: posts[0].id,
                    author_id: users[1].id,
                },
            )
            .unwrap();
            assert_eq!(comment.text, "");
            Ok(())
        });
    }

    #[test]
    fn missing_post() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (_, users) = post_tests::fill_database(&conn);
            match Comment::insert(
                &conn,
                NewComment {
                    text: "Shouting into the void".to_owned(),
                    post_id: 9999,
                    author_id: users[1].id,
                },
            ) {
                Err(Error::NotFound) => {}
                _ => panic!("Unexpected result"),
            }
            Ok(())
        });
    }

    #[test]
    fn list_by_post() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (posts, users) = post_tests::fill_database(&conn);
            for text in &["First!", "Second!"] {
                Comment::insert(
                    &conn,
                    NewComment {
                        text: (*text).to_owned(),
                        post_id: posts[0].id,
                        author_id: users[1].id,
                    },
                )
                .unwrap();
            }
            let comments = Comment::list_by_post(&conn, posts[0].id).unwrap();
            assert_eq!(comments.len(), 2);
            assert_eq!(comments[0].text, "First!");
            assert!(Comment::list_by_post(&conn, posts[1].id).unwrap().is_empty());
            Ok(())
        });
    }
}
