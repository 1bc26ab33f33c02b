use anyhow::Result;
use evplan_core::{Event, EventViewModel, EventsView, HttpBackend};
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::render::{pluralize, render_event, render_event_details};

pub async fn run(ctx: Context, json: bool) -> Result<()> {
    let vm = ctx.view_model().await?;

    if json {
        let out = serde_json::json!({
            "organized": vm.organized(),
            "invited": vm.invited(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_view(&vm);
    Ok(())
}

/// Print whatever the view model currently displays.
pub fn print_view(vm: &EventViewModel<HttpBackend>) {
    match vm.display() {
        EventsView::Search(results) => {
            let label = format!(
                "Search results ({} {})",
                results.len(),
                pluralize("event", results.len())
            );
            println!("{}", label.bold());
            print_events(vm, results, "No events found");
        }
        EventsView::Collections { organized, invited } => {
            println!("{}", "Organized by me".bold());
            print_events(vm, organized, "You have not organized any events");
            println!();
            println!("{}", "Invited to".bold());
            print_events(vm, invited, "No invitations");
        }
    }
}

fn print_events(vm: &EventViewModel<HttpBackend>, events: &[Event], empty: &str) {
    if events.is_empty() {
        println!("  {}", empty.dimmed());
        return;
    }

    for event in events {
        println!("  {}", render_event(event, vm.role_of(event)));
        for line in render_event_details(event) {
            println!("     {}", line);
        }
    }
}
