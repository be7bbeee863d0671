//! User-triggered mutations: validation, dispatch, follow-up resource updates
//! and report exports.

pub mod dispatcher;
pub mod error;
pub mod export;
pub mod validation;

pub use dispatcher::{
    clamp_selection, AcknowledgeOutcome, ActionDispatcher, ActionTargets, Notification, NotificationKind, Notifier,
};
pub use error::{ActionError, FieldError, ValidationError};
pub use export::ReportExporter;
pub use validation::{validate_survey, PasswordForm, RemarkResponseForm};
