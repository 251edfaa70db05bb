use std::io::{self, BufRead as _, Write as _};

use anyhow::Context as _;
use esports_lib::{Database, repo::admins};

#[derive(clap::Args, Debug)]
pub struct CreateAdminCommand {
    username: String,
    email: String,
    /// The password of the account. It is read from the standard input if omitted.
    #[arg(long)]
    password: Option<String>,
}

fn read_password() -> anyhow::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;
    let mut password = String::new();
    io::stdin()
        .lock()
        .read_line(&mut password)
        .context("cannot read the password")?;
    Ok(password.trim_end_matches(['\r', '\n']).to_owned())
}

pub async fn create_admin(db: Database, cmd: CreateAdminCommand) -> anyhow::Result<()> {
    if admins::find_by_username(&db.sql_conn, &cmd.username)
        .await?
        .is_some()
    {
        anyhow::bail!("admin `{}` already exists", cmd.username);
    }

    let password = match cmd.password {
        Some(password) => password,
        None => read_password()?,
    };

    let admin = admins::create(&db.sql_conn, cmd.username, cmd.email, &password).await?;
    println!("Created admin {} ({})", admin.id, admin.username);

    Ok(())
}
