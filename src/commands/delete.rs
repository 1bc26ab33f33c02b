use anyhow::Result;
use evplan_core::{DeleteOutcome, EventId};
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::render::pluralize;

pub async fn run(ctx: Context, event_id: String, yes: bool) -> Result<()> {
    let event_id = EventId::new(event_id);
    let mut vm = ctx.view_model().await?;

    let confirm = |prompt: &str| {
        yes
            || dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .unwrap_or(false)
    };

    match vm.delete_event(&event_id, &confirm).await? {
        DeleteOutcome::Cancelled => println!("{}", "Cancelled".dimmed()),
        DeleteOutcome::Deleted(message) => {
            let left = vm.organized().len();
            println!("{}", message.green());
            println!("{} organized {} left", left, pluralize("event", left));
        }
    }

    Ok(())
}
