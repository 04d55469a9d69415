//! # Cell classification
//!
//! Maps free-text cells onto fixed categories through ordered keyword vocabularies.
//! Matching is case-insensitive substring containment over the trimmed cell text, and the first
//! rule whose keywords hit wins, so rule order decides ambiguous cells such as
//! "re-opened, in progress".
use crate::frame::Value;
use serde::Serialize;
use std::fmt::Display;

/// Ticket priority
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Ticket status. `Other` collects non-blank statuses no keyword recognises.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
    Other,
}

/// Task completion state in completion-tracking sheets
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Completion {
    Done,
    Pending,
    #[serde(rename = "Not Scheduled")]
    NotScheduled,
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        })
    }
}

impl Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Closed => "Closed",
            TicketStatus::Other => "Other",
        })
    }
}

impl Display for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Completion::Done => "Done",
            Completion::Pending => "Pending",
            Completion::NotScheduled => "Not Scheduled",
        })
    }
}

/// An ordered list of (keywords → category) rules
#[derive(Clone, Debug, PartialEq)]
pub struct Vocabulary<C> {
    rules: Vec<(Vec<String>, C)>,
    /// Category of non-blank cells no rule matches; `None` leaves them unclassified
    fallback: Option<C>,
}

impl<C: Copy> Vocabulary<C> {
    pub fn new() -> Self {
        Vocabulary {
            rules: Vec::new(),
            fallback: None,
        }
    }

    /// Appends a rule; rules are evaluated in the order they were added. Keywords are lower-cased.
    pub fn rule(mut self, keywords: &[&str], category: C) -> Self {
        let keywords = keywords.iter().map(|keyword| keyword.trim().to_lowercase()).collect();
        self.rules.push((keywords, category));
        self
    }

    pub fn with_fallback(mut self, fallback: C) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Classifies a cell. Blank cells are always `None`; anything else gets the first matching
    /// rule's category, or the fallback.
    pub fn classify(&self, value: &Value) -> Option<C> {
        if value.is_blank() {
            return None;
        }
        let text = value.to_normalized();
        self.rules
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| text.contains(keyword.as_str())))
            .map(|(_, category)| *category)
            .or(self.fallback)
    }

    /// Categories in evaluation order
    pub fn categories(&self) -> impl Iterator<Item = C> + '_ {
        self.rules.iter().map(|(_, category)| *category)
    }
}

impl<C: Copy> Default for Vocabulary<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// High → Medium → Low; anything else is unclassified.
pub fn priority_vocabulary() -> Vocabulary<Priority> {
    Vocabulary::new()
        .rule(&["high"], Priority::High)
        .rule(&["medium"], Priority::Medium)
        .rule(&["low"], Priority::Low)
}

/// Closed → In Progress → Open, then `Other` for every remaining non-blank status.
pub fn ticket_status_vocabulary() -> Vocabulary<TicketStatus> {
    Vocabulary::new()
        .rule(&["closed"], TicketStatus::Closed)
        .rule(&["progress"], TicketStatus::InProgress)
        .rule(&["open"], TicketStatus::Open)
        .with_fallback(TicketStatus::Other)
}

/// Done → Pending → Not Scheduled; anything else is unclassified.
/// "in progress" counts as pending here, unlike in the ticket vocabulary.
pub fn completion_vocabulary() -> Vocabulary<Completion> {
    Vocabulary::new()
        .rule(&["done", "completed", "complete", "ok", "yes"], Completion::Done)
        .rule(&["pending", "pendiente", "to do", "todo", "open", "in progress"], Completion::Pending)
        .rule(&["not scheduled", "n/a", "na", "tbd"], Completion::NotScheduled)
}
