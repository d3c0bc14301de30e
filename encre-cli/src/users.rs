use clap::{App, Arg, ArgMatches, SubCommand};
use std::io::{self, Write};

use encre_models::{
    users::{NewUser, User, ADMIN_USER_ID},
    Connection,
};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("users")
        .about("Manage users")
        .subcommand(
            SubCommand::with_name("new")
                .arg(
                    Arg::with_name("name")
                        .short("n")
                        .long("name")
                        .takes_value(true)
                        .help("The display name of the new user"),
                )
                .arg(
                    Arg::with_name("email")
                        .short("e")
                        .long("email")
                        .takes_value(true)
                        .help("Email address of the new user"),
                )
                .arg(
                    Arg::with_name("password")
                        .short("p")
                        .long("password")
                        .takes_value(true)
                        .help("The password of the new user"),
                )
                .about("Create a new user"),
        )
        .subcommand(SubCommand::with_name("list").about("List all users"))
        .subcommand(
            SubCommand::with_name("reset-password")
                .arg(
                    Arg::with_name("email")
                        .short("e")
                        .long("email")
                        .takes_value(true)
                        .help("Email address of the user"),
                )
                .about("Reset a user's password"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        ("list", Some(_)) => list(conn),
        ("reset-password", Some(x)) => reset_password(x, conn),
        ("", None) => command().print_help().unwrap(),
        _ => println!("Unknown subcommand"),
    }
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let name = args
        .value_of("name")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Name"));
    let email = args
        .value_of("email")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Email address"));
    let password = args
        .value_of("password")
        .map(String::from)
        .unwrap_or_else(read_password);

    let user = NewUser::new_local(
        conn,
        name,
        email,
        User::hash_pass(&password).expect("Couldn't hash the password"),
    )
    .expect("Couldn't save the new user");
    if user.id == ADMIN_USER_ID {
        println!("Created user {} (id {}), the administrator", user.name, user.id);
    } else {
        println!("Created user {} (id {})", user.name, user.id);
    }
}

fn list(conn: &Connection) {
    for user in User::list(conn).expect("Couldn't list users") {
        println!("{}\t{}\t{}", user.id, user.name, user.email);
    }
}

fn reset_password<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let email = args
        .value_of("email")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Email address"));
    let user = User::find_by_email(conn, &email).expect("No user has this email");
    user.reset_password(conn, &read_password())
        .expect("Couldn't save the new password");
    println!("Password of {} has been reset", user.email);
}

fn read_password() -> String {
    print!("Password: ");
    io::stdout().flush().expect("Couldn't flush STDOUT");
    rpassword::read_password().expect("Couldn't read your password.")
}
