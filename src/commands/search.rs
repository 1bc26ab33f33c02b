use anyhow::Result;
use evplan_core::{EventViewModel, RoleFilter, SearchQuery};
use owo_colors::OwoColorize;

use crate::commands::{Context, events};
use crate::utils::tui;

pub async fn run(
    ctx: Context,
    keyword: Option<String>,
    date: Option<String>,
    role: RoleFilter,
) -> Result<()> {
    let query = SearchQuery::new(
        keyword.unwrap_or_default(),
        date.unwrap_or_default(),
        role,
    );

    if query.has_no_filters() {
        println!("{}", "Nothing to search for. Use --keyword, --date or --role.".dimmed());
        return Ok(());
    }

    let identity = ctx.session.identity().map(str::to_string);
    let mut vm = EventViewModel::new(ctx.backend, None);
    if identity.is_some() {
        let spinner = tui::create_spinner("Loading events");
        let loaded = vm.on_identity_changed(identity).await;
        spinner.finish_and_clear();
        loaded?;
    }

    let spinner = tui::create_spinner("Searching");
    let result = vm.search(query).await;
    spinner.finish_and_clear();

    if result? == 0 {
        println!("{}", "No matching events".dimmed());
        println!();
    }
    events::print_view(&vm);

    Ok(())
}
