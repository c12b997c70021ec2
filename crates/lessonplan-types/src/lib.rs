//! Shared types and errors for the lesson plan generator.
//!
//! This crate is used on both sides of the server-function boundary, so it
//! stays free of runtime and networking dependencies:
//! - `LessonPlanRequest` — the four inputs collected from the user
//! - `LessonPlanRow` / `LessonPlanTable` — the normalized generation result
//! - `GenerationError` — every way a generation can fail

use serde::{Deserialize, Serialize};

/// Error taxonomy for a single lesson plan generation.
///
/// The `Display` output of each variant is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum GenerationError {
    /// The external call itself failed: transport, auth, quota, or a blocked response.
    #[error("Error generating content: {message}")]
    Service {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("No response text received.")]
    EmptyResponse,

    /// The response text was not valid JSON.
    #[error("Error parsing JSON response: {message}")]
    Parse { message: String },

    /// Valid JSON that is not an array. `found` names the JSON kind received.
    #[error("Response did not return an array of lesson plans.")]
    Shape { found: String },
}

impl GenerationError {
    pub fn service(provider: impl Into<String>, message: impl Into<String>) -> Self {
        GenerationError::Service {
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }

    /// HTTP status reported by the service, when the failure came with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GenerationError::Service { status, .. } => *status,
            _ => None,
        }
    }
}

/// A convenience alias for `Result<T, GenerationError>`.
pub type Result<T> = std::result::Result<T, GenerationError>;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// The four free-text inputs of one submit.
///
/// Non-emptiness is enforced by the form, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPlanRequest {
    pub topic: String,
    pub grade: String,
    pub subject: String,
    pub sub_units: String,
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPlanRow {
    pub duration: String,
    pub guide: String,
    /// Empty when the service omitted it.
    pub remarks: String,
}

impl LessonPlanRow {
    pub fn new(
        duration: impl Into<String>,
        guide: impl Into<String>,
        remarks: impl Into<String>,
    ) -> Self {
        Self {
            duration: duration.into(),
            guide: guide.into(),
            remarks: remarks.into(),
        }
    }

    /// Cells in header order.
    pub fn cells(&self) -> [&str; 3] {
        [
            self.duration.as_str(),
            self.guide.as_str(),
            self.remarks.as_str(),
        ]
    }
}

/// Ordered rows under the fixed `Duration | Guide | Remarks` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPlanTable {
    pub rows: Vec<LessonPlanRow>,
}

impl LessonPlanTable {
    pub const HEADER: [&'static str; 3] = ["Duration", "Guide", "Remarks"];

    pub fn new(rows: Vec<LessonPlanRow>) -> Self {
        Self { rows }
    }

    pub fn header(&self) -> [&'static str; 3] {
        Self::HEADER
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rectangular view: header row first, then one row per lesson segment.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(Self::HEADER.iter().map(|h| h.to_string()).collect());
        grid.extend(
            self.rows
                .iter()
                .map(|row| row.cells().iter().map(|c| c.to_string()).collect()),
        );
        grid
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
