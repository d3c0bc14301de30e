use rocket::response::NamedFile;
use std::path::{Path, PathBuf};
use validator::ValidationErrors;

pub mod comments;
pub mod errors;
pub mod pages;
pub mod posts;
pub mod session;
pub mod user;

#[get("/static/<file..>", rank = 2)]
pub fn static_files(file: PathBuf) -> Option<NamedFile> {
    NamedFile::open(Path::new("static/").join(file)).ok()
}

/// Flattens validation failures into the one-line messages the form
/// templates show.
pub fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .map(|error| {
            error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| "Invalid value".to_owned())
        })
        .collect()
}
