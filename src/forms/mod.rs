//! Signup forms
//!
//! Question model, per-field validators, the form controller state machine,
//! the catalog of form variants and the form id table.

pub mod catalog;
pub mod controller;
pub mod question;
pub mod registry;
pub mod time_slot;
pub mod validators;
pub mod value;

pub use catalog::{build_form, build_form_for_title, FormVariant, MusicFormParams, PerformanceType};
pub use controller::{FormController, FormEvent, FormPhase, SubmitOutcome};
pub use question::{Question, QuestionKind};
pub use registry::{FormIds, FormRegistry};
pub use time_slot::TimeSlot;
pub use value::{FieldValue, FormValues, GroupItem, UploadedFile};
