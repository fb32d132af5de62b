use std::collections::BTreeMap;

use log::{debug, error, info};

use crate::dom::UiNode;
use crate::error::SendError;
use crate::validation::{validate, ContactFields, Field, ValidationReport};

pub const INVALID_STATUS: &str = "Please correct the errors above and try again.";
pub const SUCCESS_STATUS: &str = "Thank you for your message! We will get back to you soon.";
pub const FAILED_STATUS: &str = "Sorry, there was an error sending your message. Please try again later.";
pub const LOADING_LABEL: &str = r#"<span class="spinner"></span> Sending..."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// What a submit trigger led to.
#[derive(Debug, PartialEq)]
pub enum SubmitStart {
    /// A submission is already in flight.
    Busy,
    /// Validation failed; carries the status generation to auto-hide.
    Invalid { report: ValidationReport, status: u64 },
    /// Valid; the caller must send these fields and call `finish_submit`.
    Ready(ContactFields),
}

/// An input and the element that displays its error, if the page has one.
pub struct FieldControls<N> {
    pub input: N,
    pub error: Option<N>,
}

pub struct ContactForm<N: UiNode> {
    fields: BTreeMap<Field, FieldControls<N>>,
    submit_button: N,
    status: Option<N>,
    phase: SubmitPhase,
    saved_label: Option<String>,
    status_generation: u64,
}

impl<N: UiNode> ContactForm<N> {
    pub fn new(fields: BTreeMap<Field, FieldControls<N>>, submit_button: N, status: Option<N>) -> Self {
        Self {
            fields,
            submit_button,
            status,
            phase: SubmitPhase::Idle,
            saved_label: None,
            status_generation: 0,
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn read_fields(&self) -> ContactFields {
        let values: Vec<(&'static str, String)> = self
            .fields
            .iter()
            .map(|(field, controls)| (field.id(), controls.input.value()))
            .collect();
        ContactFields::from_pairs(values.iter().map(|(id, value)| (*id, value.as_str())))
    }

    /// Clears every shown error, validates all fields and shows the failures.
    pub fn validate(&mut self) -> ValidationReport {
        for field in Field::ALL {
            self.clear_error(field);
        }
        let report = validate(&self.read_fields());
        for (field, message) in report.errors() {
            self.show_error(field, message);
        }
        report
    }

    /// Submit trigger. The caller has already prevented the default navigation.
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.phase == SubmitPhase::Submitting {
            debug!("Ignoring submit while a submission is in flight");
            return SubmitStart::Busy;
        }
        let report = self.validate();
        if !report.is_valid() {
            debug!("Contact form invalid: {} field(s)", report.len());
            let status = self.show_status(StatusKind::Error, INVALID_STATUS);
            return SubmitStart::Invalid { report, status };
        }

        self.transition(SubmitPhase::Submitting);
        self.saved_label = Some(self.submit_button.markup());
        self.submit_button.set_disabled(true);
        self.submit_button.set_markup(LOADING_LABEL);
        SubmitStart::Ready(self.read_fields())
    }

    /// Completion of the external send. Returns the status generation to auto-hide.
    pub fn finish_submit(&mut self, result: Result<(), SendError>) -> u64 {
        let status = match result {
            Ok(()) => {
                info!("Contact form sent");
                for controls in self.fields.values() {
                    controls.input.set_value("");
                }
                self.show_status(StatusKind::Success, SUCCESS_STATUS)
            }
            Err(e) => {
                error!("Contact form submission failed: {}", e);
                self.show_status(StatusKind::Error, FAILED_STATUS)
            }
        };
        self.submit_button.set_disabled(false);
        if let Some(label) = self.saved_label.take() {
            self.submit_button.set_markup(&label);
        }
        self.transition(SubmitPhase::Idle);
        status
    }

    /// A field lost focus. Non-empty values re-run the whole validation.
    pub fn on_blur(&mut self, field: Field) -> Option<ValidationReport> {
        let controls = self.fields.get(&field)?;
        if controls.input.value().trim().is_empty() {
            return None;
        }
        Some(self.validate())
    }

    /// A field was edited. Only that field's error is cleared.
    pub fn on_input(&mut self, field: Field) {
        if self.has_error(field) {
            self.clear_error(field);
        }
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.fields.get(&field).map_or(false, |controls| {
            controls.input.has_class("error")
                || controls.error.as_ref().map_or(false, |node| node.has_class("show"))
        })
    }

    /// Hides the status message if it is still the one shown under `generation`.
    pub fn hide_status(&mut self, generation: u64) -> bool {
        if generation != self.status_generation {
            return false;
        }
        match &self.status {
            Some(status) => {
                status.set_class("show", false);
                true
            }
            None => false,
        }
    }

    fn show_status(&mut self, kind: StatusKind, message: &str) -> u64 {
        self.status_generation += 1;
        if let Some(status) = &self.status {
            status.set_text(message);
            status.set_class("success", kind == StatusKind::Success);
            status.set_class("error", kind == StatusKind::Error);
            status.set_class("show", true);
        }
        self.status_generation
    }

    fn show_error(&self, field: Field, message: &str) {
        if let Some(controls) = self.fields.get(&field) {
            controls.input.set_class("error", true);
            if let Some(node) = &controls.error {
                node.set_text(message);
                node.set_class("show", true);
            }
        }
    }

    fn clear_error(&self, field: Field) {
        if let Some(controls) = self.fields.get(&field) {
            controls.input.set_class("error", false);
            if let Some(node) = &controls.error {
                node.set_text("");
                node.set_class("show", false);
            }
        }
    }

    fn transition(&mut self, next: SubmitPhase) {
        debug!("Contact form {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}
