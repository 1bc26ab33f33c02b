use anyhow::Result;
use evplan_core::EventId;
use owo_colors::OwoColorize;

use crate::commands::Context;
use crate::utils::tui;

pub async fn run(ctx: Context, event_id: String, email: String) -> Result<()> {
    let event_id = EventId::new(event_id);
    let mut vm = ctx.view_model().await?;
    vm.set_invite_draft(&event_id, email);

    let spinner = tui::create_spinner("Sending invitation");
    let result = vm.invite_user(&event_id).await;
    spinner.finish_and_clear();

    println!("{}", result?.green());
    Ok(())
}
