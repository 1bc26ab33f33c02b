//! TUI rendering traits for evplan types.
//!
//! Extension traits that add colored terminal rendering to evplan-core types
//! using owo_colors.

use evplan_core::{Event, ResponseRecord, ResponseStatus, Role};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ResponseStatus {
    fn render(&self) -> String {
        match self {
            ResponseStatus::Going => self.as_str().green().to_string(),
            ResponseStatus::Maybe => self.as_str().yellow().to_string(),
            ResponseStatus::NotGoing => self.as_str().red().to_string(),
        }
    }
}

impl Render for Role {
    fn render(&self) -> String {
        let tag = format!("[{}]", self.as_str());
        match self {
            Role::Organizer => tag.cyan().to_string(),
            Role::Attendee => tag.magenta().to_string(),
        }
    }
}

impl Render for ResponseRecord {
    fn render(&self) -> String {
        format!("{} {}", self.email, self.status.render())
    }
}

/// One event line, tagged with the viewer's role.
pub fn render_event(event: &Event, role: Role) -> String {
    let mut line = format!("{} {}", event.title.bold(), role.render());

    let when = format_when(event);
    if !when.is_empty() {
        line.push_str(&format!(" {}", when.dimmed()));
    }
    if !event.location.is_empty() {
        line.push_str(&format!(" {}", format!("@ {}", event.location).dimmed()));
    }
    if let Some(status) = event.my_status {
        line.push_str(&format!(" {}", status.render()));
    }

    line
}

/// Detail lines shown under an event: id, organizer and description.
pub fn render_event_details(event: &Event) -> Vec<String> {
    let mut lines = vec![format!("id: {}", event.id).dimmed().to_string()];
    lines.push(format!("by {}", event.organizer_email).dimmed().to_string());
    if !event.description.is_empty() {
        lines.push(event.description.clone());
    }
    lines
}

/// Date and time of an event, e.g. "Fri Mar 20 10:00".
fn format_when(event: &Event) -> String {
    let date = match event.calendar_date() {
        Some(d) => d.format("%a %b %-d").to_string(),
        None => event.date.clone(),
    };
    match (date.is_empty(), event.time.is_empty()) {
        (true, _) => event.time.clone(),
        (false, true) => date,
        (false, false) => format!("{} {}", date, event.time),
    }
}

/// Footer under a roster.
pub fn attendee_total(count: usize) -> String {
    format!("Total attendees: {}", count)
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evplan_core::EventId;

    fn event(date: &str, time: &str) -> Event {
        Event {
            id: EventId::new("e1"),
            title: "Sprint Review".into(),
            date: date.into(),
            time: time.into(),
            location: String::new(),
            description: String::new(),
            organizer_email: "a@x.com".into(),
            role_hint: None,
            my_status: None,
        }
    }

    #[test]
    fn when_combines_date_and_time() {
        assert_eq!(format_when(&event("2026-03-20", "10:00")), "Fri Mar 20 10:00");
        assert_eq!(format_when(&event("2026-03-20T00:00:00.000Z", "")), "Fri Mar 20");
        assert_eq!(format_when(&event("", "10:00")), "10:00");
        assert_eq!(format_when(&event("someday", "")), "someday");
    }

    #[test]
    fn attendee_total_counts_responses() {
        assert_eq!(attendee_total(0), "Total attendees: 0");
        assert_eq!(attendee_total(2), "Total attendees: 2");
    }

    #[test]
    fn pluralize_counts() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 0), "events");
        assert_eq!(pluralize("event", 3), "events");
    }
}
