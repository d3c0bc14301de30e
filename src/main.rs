#![feature(decl_macro, proc_macro_hygiene)]

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;
#[macro_use]
extern crate tracing;

use diesel::r2d2::ConnectionManager;
use encre_models::{
    db_conn::{DbPool, PragmaForeignKey},
    migrations, Connection, CONFIG,
};
use rocket_contrib::templates::Template;

mod routes;
mod utils;

/// Initializes a database pool and brings the schema up to date.
fn init_pool() -> Option<DbPool> {
    let manager = ConnectionManager::<Connection>::new(CONFIG.database_url.as_str());
    let mut builder = DbPool::builder().connection_customizer(Box::new(PragmaForeignKey));
    if let Some(max_size) = CONFIG.db_max_size {
        builder = builder.max_size(max_size);
    }
    if let Some(min_idle) = CONFIG.db_min_idle {
        builder = builder.min_idle(Some(min_idle));
    }
    let pool = builder.build(manager).ok()?;
    let conn = pool.get().ok()?;
    migrations::run_pending(&conn).ok()?;
    Some(pool)
}

fn init_logger() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Unable to set global subscriber");
}

fn main() {
    init_logger();

    match dotenv::dotenv() {
        Ok(path) => info!("Configuration read from {}", path.display()),
        Err(ref e) if e.not_found() => info!("no .env was found"),
        e => e.map(|_| ()).unwrap(),
    }

    let dbpool = init_pool().expect("main: database pool initialization error");
    let rocket_config = CONFIG.rocket.clone().expect("main: rocket config error");

    info!("Starting Encre on {}", CONFIG.base_url.as_str());

    rocket::custom(rocket_config)
        .mount(
            "/",
            routes![
                routes::comments::create,
                routes::comments::create_auth,
                routes::pages::about,
                routes::pages::contact,
                routes::posts::index,
                routes::posts::details,
                routes::posts::new,
                routes::posts::create,
                routes::posts::edit,
                routes::posts::update,
                routes::posts::delete,
                routes::posts::delete_form,
                routes::session::new,
                routes::session::create,
                routes::session::delete,
                routes::user::new,
                routes::user::create,
                routes::static_files,
            ],
        )
        .register(catchers![
            routes::errors::forbidden,
            routes::errors::not_found,
            routes::errors::server_error,
        ])
        .manage(dbpool)
        .attach(Template::fairing())
        .launch();
}
