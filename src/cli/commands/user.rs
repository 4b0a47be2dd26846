//! User management command handlers

use anyhow::Context;
use std::io::BufRead;

use crate::config::Config;
use crate::db::Store;
use crate::services::Registration;
use crate::services::auth_service_impl::register_user;

/// Password comes from `FLIXDEX_USER_PASSWORD`, else the first line of stdin.
fn read_password() -> anyhow::Result<String> {
    if let Ok(password) = std::env::var("FLIXDEX_USER_PASSWORD") {
        return Ok(password);
    }

    eprintln!("Password (read from stdin):");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn cmd_user_add(config: &Config, username: &str, email: &str) -> anyhow::Result<()> {
    let password = read_password()?;

    let store = Store::with_pool_options(
        &config.general.database_url,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let user = register_user(
        &store,
        &config.security,
        Registration {
            username: username.to_string(),
            email: email.to_string(),
            password,
        },
    )
    .await?;

    println!("Created user '{}' (id {})", user.username, user.id);
    Ok(())
}
