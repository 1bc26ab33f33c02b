use anyhow::Result;
use chrono::Local;
use dialoguer::Input;
use evplan_core::event::{DATE_FORMAT, EventDraft};
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::utils::tui;

pub struct NewArgs {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

pub async fn run(ctx: Context, args: NewArgs) -> Result<()> {
    let interactive = args.title.is_none() || args.date.is_none();
    let draft = build_draft(args, interactive)?;

    let mut vm = ctx.view_model().await?;
    vm.draft = draft;

    let spinner = tui::create_spinner("Creating event");
    let result = vm.create_event().await;
    spinner.finish_and_clear();

    if interactive {
        println!();
    }
    println!("{}", format!("  {}", result?).green());

    Ok(())
}

fn build_draft(args: NewArgs, interactive: bool) -> Result<EventDraft> {
    // --- Title ---
    let title = match args.title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    let mut draft = EventDraft {
        title,
        ..EventDraft::default()
    };

    // --- Date ---
    draft.date = match args.date {
        Some(d) => d,
        None => prompt_date(&draft)?,
    };

    // --- Time, location, description ---
    draft.time = optional(args.time, "  Time? (skip)", interactive)?;
    draft.location = optional(args.location, "  Where? (skip)", interactive)?;
    draft.description = optional(args.description, "  Description? (skip)", interactive)?;

    Ok(draft)
}

/// Prompt for the date until the draft validates.
fn prompt_date(draft: &EventDraft) -> Result<String> {
    let today = Local::now().date_naive();
    loop {
        let input: String = Input::new()
            .with_prompt(format!("  When? ({})", today.format(DATE_FORMAT)))
            .interact_text()?;

        let candidate = EventDraft {
            date: input.clone(),
            ..draft.clone()
        };
        match candidate.validate(today) {
            Ok(_) => return Ok(input),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

fn optional(value: Option<String>, prompt: &str, interactive: bool) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if interactive => Ok(Input::new()
            .with_prompt(prompt)
            .default(String::new())
            .show_default(false)
            .interact_text()?),
        None => Ok(String::new()),
    }
}
