table! {
    comments (id) {
        id -> Int4,
        text -> Text,
        post_id -> Int4,
        author_id -> Int4,
        creation_date -> Timestamp,
    }
}

table! {
    posts (id) {
        id -> Int4,
        title -> Varchar,
        subtitle -> Varchar,
        date -> Varchar,
        body -> Text,
        img_url -> Varchar,
        author_id -> Int4,
    }
}

table! {
    users (id) {
        id -> Int4,
        name -> Varchar,
        email -> Varchar,
        hashed_password -> Varchar,
        creation_date -> Timestamp,
    }
}

joinable!(comments -> posts (post_id));
joinable!(comments -> users (author_id));
joinable!(posts -> users (author_id));

allow_tables_to_appear_in_same_query!(comments, posts, users,);
