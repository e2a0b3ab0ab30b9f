//! Messages explaining a selection.
//!
//! The engine reports what happened as a machine-readable kind; the
//! front-end phrases it. The English text from `Display` is a fallback.

use std::fmt;

use chrono::{Month, NaiveDate};
use serde::Serialize;

/// Why a selection looks the way it does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionMessage {
    /// Several further results, cheapest first.
    MoreTickets,
    /// Exactly one further result remained.
    LastPair,
    /// Further results were asked for on a specific date.
    OnePairPerDay,
    /// No further results.
    NoMoreTickets,
    /// Nothing matches the constraint.
    NoMatchingTickets,
    /// Nothing under the ceiling; the cheapest trip is returned instead.
    NothingUnderPrice { ceiling: u32 },
    NoTicketsInMonth { month: u32 },
    MonthBeyondWindow { month: u32, window_days: u32 },
    NoTicketsOnDate { date: NaiveDate },
    DateBeyondWindow { date: NaiveDate, window_days: u32 },
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| format!("month {month}"))
}

impl fmt::Display for SelectionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMessage::MoreTickets => write!(f, "More tickets, cheapest first:"),
            SelectionMessage::LastPair => write!(f, "Here is the last pair of tickets:"),
            SelectionMessage::OnePairPerDay => {
                write!(f, "There is only one cheapest pair of tickets per day.")
            }
            SelectionMessage::NoMoreTickets => write!(f, "That's all, there are no more tickets."),
            SelectionMessage::NoMatchingTickets => write!(f, "No tickets match your request."),
            SelectionMessage::NothingUnderPrice { ceiling } => write!(
                f,
                "No tickets for {ceiling} or less. Here is the cheapest pair:"
            ),
            SelectionMessage::NoTicketsInMonth { month } => {
                write!(f, "No tickets found for {}.", month_name(*month))
            }
            SelectionMessage::MonthBeyondWindow { month, window_days } => write!(
                f,
                "No tickets for {} yet: they go on sale {window_days} days ahead.",
                month_name(*month)
            ),
            SelectionMessage::NoTicketsOnDate { date } => {
                write!(f, "No tickets found for {}.", date.format("%d.%m.%Y"))
            }
            SelectionMessage::DateBeyondWindow { date, window_days } => write!(
                f,
                "No tickets for {} yet: they go on sale {window_days} days ahead.",
                date.format("%d.%m.%Y")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_kind_and_fields() {
        let json = serde_json::to_value(SelectionMessage::NothingUnderPrice { ceiling: 900 }).unwrap();
        assert_eq!(json["kind"], "nothing_under_price");
        assert_eq!(json["ceiling"], 900);

        let json = serde_json::to_value(SelectionMessage::LastPair).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "last_pair"}));
    }

    #[test]
    fn text_names_the_month() {
        let msg = SelectionMessage::MonthBeyondWindow {
            month: 7,
            window_days: 60,
        };
        assert_eq!(
            msg.to_string(),
            "No tickets for July yet: they go on sale 60 days ahead."
        );
        assert!(
            SelectionMessage::NoTicketsInMonth { month: 13 }
                .to_string()
                .contains("month 13")
        );
    }
}
