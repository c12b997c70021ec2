//! State of the lesson plan form.
//!
//! `CollectorState` is owned by the form component and only changes phase in
//! `begin_submit` and `finish`:
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Succeeded(table)
//!                       │
//!                       └──err──▶ Failed(message)
//! Succeeded / Failed ──submit──▶ Submitting
//! ```
//!
//! There is no cancel transition: once submitted, a request runs to completion.

use lessonplan_types::{LessonPlanRequest, LessonPlanTable};

pub const SUBMIT_LABEL: &str = "Generate Table";
pub const BUSY_LABEL: &str = "Generating...";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded(LessonPlanTable),
    Failed(String),
}

/// Which of the four inputs an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Topic,
    Grade,
    Subject,
    SubUnits,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Topic, Field::Grade, Field::Subject, Field::SubUnits];

    pub fn label(self) -> &'static str {
        match self {
            Field::Topic => "Topic:",
            Field::Grade => "Grade:",
            Field::Subject => "Subject:",
            Field::SubUnits => "Sub-units:",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectorState {
    pub topic: String,
    pub grade: String,
    pub subject: String,
    pub sub_units: String,
    phase: Phase,
}

impl CollectorState {
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Topic => &self.topic,
            Field::Grade => &self.grade,
            Field::Subject => &self.subject,
            Field::SubUnits => &self.sub_units,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Topic => self.topic = value,
            Field::Grade => self.grade = value,
            Field::Subject => self.subject = value,
            Field::SubUnits => self.sub_units = value,
        }
    }

    /// Enter `Submitting` and hand out a fresh request.
    ///
    /// Returns `None` while a request is already in flight. Any previous table
    /// or error is dropped here, before the call starts.
    pub fn begin_submit(&mut self) -> Option<LessonPlanRequest> {
        if self.is_busy() {
            return None;
        }
        self.phase = Phase::Submitting;
        Some(LessonPlanRequest {
            topic: self.topic.clone(),
            grade: self.grade.clone(),
            subject: self.subject.clone(),
            sub_units: self.sub_units.clone(),
        })
    }

    /// Record the outcome of the in-flight request.
    ///
    /// Ignored unless a request is in flight.
    pub fn finish(&mut self, outcome: Result<LessonPlanTable, String>) {
        if !self.is_busy() {
            tracing::debug!("ignoring generation outcome with no request in flight");
            return;
        }
        self.phase = match outcome {
            Ok(table) => Phase::Succeeded(table),
            Err(message) => Phase::Failed(message),
        };
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() {
            BUSY_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn table(&self) -> Option<&LessonPlanTable> {
        match &self.phase {
            Phase::Succeeded(table) => Some(table),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lessonplan_types::LessonPlanRow;

    fn filled() -> CollectorState {
        let mut state = CollectorState::default();
        state.set(Field::Topic, "Photosynthesis".into());
        state.set(Field::Grade, "7".into());
        state.set(Field::Subject, "Science".into());
        state.set(Field::SubUnits, "Light reactions, Dark reactions".into());
        state
    }

    fn sample_table() -> LessonPlanTable {
        LessonPlanTable::new(vec![LessonPlanRow::new("10 min", "Introduce topic", "")])
    }

    #[test]
    fn starts_idle_and_enabled() {
        let state = CollectorState::default();
        assert_eq!(state.phase(), &Phase::Idle);
        assert!(!state.is_busy());
        assert_eq!(state.submit_label(), "Generate Table");
        assert!(state.table().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn begin_submit_builds_request_from_fields() {
        let mut state = filled();
        let request = state.begin_submit().expect("idle form accepts a submit");
        assert_eq!(
            request,
            LessonPlanRequest {
                topic: "Photosynthesis".into(),
                grade: "7".into(),
                subject: "Science".into(),
                sub_units: "Light reactions, Dark reactions".into(),
            }
        );
        assert!(state.is_busy());
        assert_eq!(state.submit_label(), "Generating...");
    }

    #[test]
    fn second_submit_while_busy_is_ignored() {
        let mut state = filled();
        assert!(state.begin_submit().is_some());
        assert!(state.begin_submit().is_none());
        assert!(state.is_busy());
    }

    #[test]
    fn success_stores_table_and_clears_busy() {
        let mut state = filled();
        state.begin_submit();
        state.finish(Ok(sample_table()));

        assert!(!state.is_busy());
        assert_eq!(state.submit_label(), "Generate Table");
        assert_eq!(state.table(), Some(&sample_table()));
        assert!(state.error().is_none());
    }

    #[test]
    fn failure_stores_message_and_clears_busy() {
        let mut state = filled();
        state.begin_submit();
        state.finish(Err("No response text received.".into()));

        assert!(!state.is_busy());
        assert_eq!(state.error(), Some("No response text received."));
        assert!(state.table().is_none());
    }

    #[test]
    fn new_submit_clears_previous_table_and_error() {
        let mut state = filled();
        state.begin_submit();
        state.finish(Ok(sample_table()));
        state.begin_submit();
        assert!(state.table().is_none());

        state.finish(Err("boom".into()));
        state.begin_submit();
        assert!(state.error().is_none());
        assert_eq!(state.phase(), &Phase::Submitting);
    }

    #[test]
    fn fields_persist_across_submits() {
        let mut state = filled();
        state.begin_submit();
        state.finish(Ok(sample_table()));
        assert_eq!(state.value(Field::Topic), "Photosynthesis");
        assert_eq!(state.value(Field::SubUnits), "Light reactions, Dark reactions");
    }

    #[test]
    fn outcome_without_request_is_ignored() {
        let mut state = filled();
        state.finish(Ok(sample_table()));
        assert_eq!(state.phase(), &Phase::Idle);
    }

    #[test]
    fn field_labels_in_form_order() {
        let labels: Vec<_> = Field::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, vec!["Topic:", "Grade:", "Subject:", "Sub-units:"]);
    }
}
