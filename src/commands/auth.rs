use anyhow::{Context as _, Result};
use dialoguer::Input;
use evplan_core::protocol::Credentials;
use evplan_core::{IdentityChange, Session};
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::utils::tui;

pub async fn signup(ctx: Context, email: Option<String>) -> Result<()> {
    let credentials = prompt_credentials(email)?;

    let spinner = tui::create_spinner("Signing up");
    let result = Session::signup(&ctx.backend, &credentials).await;
    spinner.finish_and_clear();

    println!("{}", result?.green());
    println!("\nRun `evplan login` to start planning.");
    Ok(())
}

pub async fn login(mut ctx: Context, email: Option<String>) -> Result<()> {
    let credentials = prompt_credentials(email)?;

    let spinner = tui::create_spinner("Logging in");
    let result = ctx.session.login(&ctx.backend, &credentials).await;
    spinner.finish_and_clear();

    let (message, change) = result?;
    if change != IdentityChange::Unchanged {
        ctx.store.save(&ctx.session)?;
    }

    println!("{}", message.green());
    println!("Logged in as {}", credentials.email.bold());
    Ok(())
}

pub fn logout(mut ctx: Context) -> Result<()> {
    match ctx.session.logout() {
        IdentityChange::SignedOut => {
            ctx.store.save(&ctx.session)?;
            println!("Logged out");
        }
        _ => println!("{}", "Not logged in".dimmed()),
    }
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    match ctx.session.identity() {
        Some(email) => println!("{}", email),
        None => println!("{}", "Not logged in".dimmed()),
    }
    Ok(())
}

fn prompt_credentials(email: Option<String>) -> Result<Credentials> {
    let email = match email {
        Some(e) => e,
        None => Input::<String>::new()
            .with_prompt("  Email")
            .interact_text()?,
    };
    let password = rpassword::prompt_password("  Password: ").context("Failed to read password")?;

    Ok(Credentials {
        email: email.trim().to_string(),
        password,
    })
}
