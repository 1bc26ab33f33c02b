use anyhow::Result;
use evplan_core::{EventId, EventViewModel};
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::render::{Render, attendee_total};
use crate::utils::tui;

pub async fn run(ctx: Context, event_id: String) -> Result<()> {
    let event_id = EventId::new(event_id);
    let backend = ctx.backend;
    let mut vm = EventViewModel::new(backend, ctx.session.identity().map(str::to_string));

    let spinner = tui::create_spinner("Loading attendees");
    let result = vm.toggle_attendees(&event_id).await;
    spinner.finish_and_clear();
    result?;

    let roster = vm.roster(&event_id).unwrap_or_default();
    if roster.is_empty() {
        println!("{}", "No responses yet".dimmed());
        return Ok(());
    }

    for record in roster {
        println!("  {}", record.render());
    }
    println!("{}", attendee_total(roster.len()).dimmed());

    Ok(())
}
