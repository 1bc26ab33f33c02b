use anyhow::Result;
use evplan_core::{EventId, ResponseStatus};
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(ctx: Context, event_id: String, status: ResponseStatus) -> Result<()> {
    let event_id = EventId::new(event_id);
    let mut vm = ctx.view_model().await?;

    let spinner = tui::create_spinner("Saving response");
    let result = vm.respond_to_event(&event_id, status).await;
    spinner.finish_and_clear();

    println!("{}", result?.green());
    if let Some(event) = vm.invited().iter().find(|e| e.id == event_id) {
        let current = event.my_status.map(|s| s.render()).unwrap_or_default();
        println!("{} {}", event.title.bold(), current);
    }
    Ok(())
}
