//! Application timeline classification.
//!
//! A tracked application's row carries a band of timeline cells: when it
//! was screened, assigned homework, interviewed, offered, or answered.
//! This module classifies a row into a final status from which cells are
//! filled, and aggregates statuses across a sheet.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::FieldMap;

/// The timeline cells of one application row.
///
/// A cell is "set" when non-empty after trimming; content is typically a
/// date but any marker counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Screening call cell.
    pub screening: String,
    /// Take-home assignment cell.
    pub assignment: String,
    /// Interview round cells, in order.
    pub interviews: [String; 3],
    /// Offer cell.
    pub offer: String,
    /// Feedback cell; feedback without an offer usually means rejection.
    pub feedback: String,
}

impl Timeline {
    /// Extracts the timeline from a record's fields.
    ///
    /// Absent fields read as empty cells.
    #[must_use]
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            screening: fields.get_or_empty("screening").to_string(),
            assignment: fields.get_or_empty("assignment").to_string(),
            interviews: [
                fields.get_or_empty("interview1").to_string(),
                fields.get_or_empty("interview2").to_string(),
                fields.get_or_empty("interview3").to_string(),
            ],
            offer: fields.get_or_empty("offer").to_string(),
            feedback: fields.get_or_empty("feedback").to_string(),
        }
    }

    /// Classifies the row into its final status.
    ///
    /// Precedence: an offer beats everything; any interview without an
    /// offer means the process ran but ended; screening or assignment
    /// alone means an early-stage rejection; feedback alone means a plain
    /// rejection; nothing set means no answer yet.
    #[must_use]
    pub fn status(&self) -> ApplicationStatus {
        if is_set(&self.offer) {
            return ApplicationStatus::Offer;
        }
        if self.interviews.iter().any(|c| is_set(c)) {
            return ApplicationStatus::InterviewNoOffer;
        }
        if is_set(&self.screening) || is_set(&self.assignment) {
            return ApplicationStatus::RejectedEarly;
        }
        if is_set(&self.feedback) {
            return ApplicationStatus::Rejected;
        }
        ApplicationStatus::NoAnswer
    }

    /// Parses every set cell that holds a recognizable date.
    ///
    /// Accepts ISO (`2024-05-01`) and day-first (`01/05/2024`) forms;
    /// unparsable markers are simply not dates and are skipped.
    #[must_use]
    pub fn event_dates(&self) -> Vec<NaiveDate> {
        self.cells().filter_map(parse_event_date).collect()
    }

    fn cells(&self) -> impl Iterator<Item = &str> {
        [
            self.screening.as_str(),
            self.assignment.as_str(),
            self.interviews[0].as_str(),
            self.interviews[1].as_str(),
            self.interviews[2].as_str(),
            self.offer.as_str(),
            self.feedback.as_str(),
        ]
        .into_iter()
    }
}

fn is_set(cell: &str) -> bool {
    !cell.trim().is_empty()
}

/// Parses one timeline cell as a date, if it holds one.
#[must_use]
pub fn parse_event_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(cell, "%d/%m/%Y"))
        .ok()
}

/// Final status of one tracked application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// An offer was extended.
    Offer,
    /// Interviews happened but no offer followed.
    InterviewNoOffer,
    /// Rejected after screening or an assignment, before any interview.
    RejectedEarly,
    /// Rejected with feedback but no recorded process.
    Rejected,
    /// No response recorded.
    NoAnswer,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offer => write!(f, "Offer"),
            Self::InterviewNoOffer => write!(f, "Interview Stage (No Offer)"),
            Self::RejectedEarly => write!(f, "Rejected (Early Stage)"),
            Self::Rejected => write!(f, "Rejected"),
            Self::NoAnswer => write!(f, "No Answer"),
        }
    }
}

/// Aggregate counts over many application statuses.
///
/// `interviews` counts every application that reached an interview,
/// whether or not it ended in an offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    /// Total applications classified.
    pub total: usize,
    /// No response recorded.
    pub no_answer: usize,
    /// Rejected without reaching an interview.
    pub rejected: usize,
    /// Reached the interview stage.
    pub interviews: usize,
    /// Ended with an offer.
    pub offers: usize,
    /// Interviewed but no offer.
    pub no_offer: usize,
}

impl StatusBreakdown {
    /// Tallies a sequence of statuses.
    #[must_use]
    pub fn collect(statuses: impl IntoIterator<Item = ApplicationStatus>) -> Self {
        let mut breakdown = Self::default();
        for status in statuses {
            breakdown.total += 1;
            match status {
                ApplicationStatus::Offer => {
                    breakdown.offers += 1;
                    breakdown.interviews += 1;
                }
                ApplicationStatus::InterviewNoOffer => {
                    breakdown.no_offer += 1;
                    breakdown.interviews += 1;
                }
                ApplicationStatus::RejectedEarly | ApplicationStatus::Rejected => {
                    breakdown.rejected += 1;
                }
                ApplicationStatus::NoAnswer => breakdown.no_answer += 1,
            }
        }
        breakdown
    }
}
