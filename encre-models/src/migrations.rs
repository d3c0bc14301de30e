use crate::{Connection, Result};

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
embed_migrations!("../migrations/sqlite");

#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
embed_migrations!("../migrations/postgres");

/// Runs every migration that hasn't been applied to this database yet.
pub fn run_pending(conn: &Connection) -> Result<()> {
    embedded_migrations::run(conn)?;
    Ok(())
}
