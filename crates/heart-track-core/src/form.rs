//! Record form: input capture, validation and the submit state machine.
//!
//! ```text
//! Idle ──begin_submit──▶ Submitting ──finish_submit(Ok)──▶ Idle (inputs cleared)
//!                                   └─finish_submit(Err)─▶ IdleWithError (inputs kept)
//! ```

use std::fmt::Display;

use tracing::{debug, warn};

use crate::models::{LocalVitalsInput, RemoteVitalsInput};
use crate::store::VitalsStore;

pub const SUCCESS_NOTICE: &str = "Vitals logged successfully";
pub const FAILURE_NOTICE: &str = "Error saving vitals";

/// Submit state of a form instance.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    /// A write is in flight; inputs and submit are disabled
    Submitting,
    /// The last write failed; inputs kept for retry
    IdleWithError(String),
}

/// Transient user-visible message.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    /// Persisted. Carries the pre-submission values for optimistic display.
    Saved(T),
    /// A required field was empty; nothing happened
    Ignored,
    /// A numeric field did not parse; inputs kept
    Invalid(&'static str),
    /// Another submission from this form is still in flight
    Busy,
    /// The store rejected the write; inputs kept
    Failed(String),
}

/// Why a set of raw inputs could not become a store input.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    Missing(&'static str),
    NotNumeric(&'static str),
}

/// Raw string inputs of a form variant.
pub trait FormFields: Default {
    type Input: Clone;

    /// Validate and convert the raw inputs.
    fn parse(&self) -> Result<Self::Input, FieldError>;
}

/// Inputs of the local tracker form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalVitalsFields {
    pub heart_rate: String,
    pub blood_pressure: String,
    pub notes: String,
}

impl FormFields for LocalVitalsFields {
    type Input = LocalVitalsInput;

    fn parse(&self) -> Result<LocalVitalsInput, FieldError> {
        let heart_rate_raw = required("heartRate", &self.heart_rate)?;
        let blood_pressure = required("bloodPressure", &self.blood_pressure)?;
        let notes = self.notes.trim();

        Ok(LocalVitalsInput {
            heart_rate: numeric("heartRate", heart_rate_raw)?,
            blood_pressure: blood_pressure.to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

/// Inputs of the connected dashboard form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteVitalsFields {
    pub heart_rate: String,
    pub blood_pressure: String,
    pub cholesterol: String,
    pub glucose: String,
}

impl FormFields for RemoteVitalsFields {
    type Input = RemoteVitalsInput;

    fn parse(&self) -> Result<RemoteVitalsInput, FieldError> {
        // Presence first, so an empty field is ignored even when another is malformed
        let heart_rate = required("heartRate", &self.heart_rate)?;
        let blood_pressure = required("bloodPressure", &self.blood_pressure)?;
        let cholesterol = required("cholesterol", &self.cholesterol)?;
        let glucose = required("glucose", &self.glucose)?;

        Ok(RemoteVitalsInput::new(
            numeric("heartRate", heart_rate)?,
            blood_pressure.to_string(),
            Some(numeric("cholesterol", cholesterol)?),
            Some(numeric("glucose", glucose)?),
        ))
    }
}

fn required<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(FieldError::Missing(field))
    } else {
        Ok(trimmed)
    }
}

fn numeric(field: &'static str, raw: &str) -> Result<f64, FieldError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FieldError::NotNumeric(field)),
    }
}

/// A single-flight vitals form.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordForm<F: FormFields> {
    fields: F,
    state: FormState,
    notice: Option<Notice>,
}

pub type LocalVitalsForm = RecordForm<LocalVitalsFields>;
pub type RemoteVitalsForm = RecordForm<RemoteVitalsFields>;

impl<F: FormFields> Default for RecordForm<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FormFields> RecordForm<F> {
    pub fn new() -> Self {
        Self {
            fields: F::default(),
            state: FormState::Idle,
            notice: None,
        }
    }

    /// Form pre-filled with `fields`.
    pub fn with_fields(fields: F) -> Self {
        Self {
            fields,
            ..Self::new()
        }
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    /// Editable inputs. `None` while a submission is in flight.
    pub fn fields_mut(&mut self) -> Option<&mut F> {
        match self.state {
            FormState::Submitting => None,
            _ => Some(&mut self.fields),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.state != FormState::Submitting
    }

    /// Last notice raised by this form.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Take the notice, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Validate and enter `Submitting`.
    ///
    /// `Err` carries the outcome when no write should happen.
    pub fn begin_submit(&mut self) -> Result<F::Input, SubmitOutcome<F::Input>> {
        if self.state == FormState::Submitting {
            return Err(SubmitOutcome::Busy);
        }

        match self.fields.parse() {
            Ok(input) => {
                self.state = FormState::Submitting;
                Ok(input)
            }
            Err(FieldError::Missing(field)) => {
                debug!(field, "submit ignored, required field empty");
                Err(SubmitOutcome::Ignored)
            }
            Err(FieldError::NotNumeric(field)) => {
                self.notice = Some(Notice::Error(format!("{} must be a number", field)));
                Err(SubmitOutcome::Invalid(field))
            }
        }
    }

    /// Leave `Submitting` with the store's answer.
    pub fn finish_submit<R, E: Display>(
        &mut self,
        input: F::Input,
        result: Result<R, E>,
    ) -> SubmitOutcome<F::Input> {
        match result {
            Ok(_) => {
                self.fields = F::default();
                self.state = FormState::Idle;
                self.notice = Some(Notice::Success(SUCCESS_NOTICE.to_string()));
                SubmitOutcome::Saved(input)
            }
            Err(e) => {
                warn!(error = %e, "vitals submission failed");
                self.state = FormState::IdleWithError(e.to_string());
                self.notice = Some(Notice::Error(FAILURE_NOTICE.to_string()));
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }

    /// Validate, append to `store`, and settle the state machine.
    pub fn submit<S>(&mut self, store: &S) -> SubmitOutcome<F::Input>
    where
        S: VitalsStore<Input = F::Input>,
    {
        let input = match self.begin_submit() {
            Ok(input) => input,
            Err(outcome) => return outcome,
        };
        let result = store.append(&input);
        self.finish_submit(input, result)
    }
}
