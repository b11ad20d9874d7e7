// Multi-step creation wizards: catalogue, draft fields, payloads and the controller.

pub mod catalog;
pub mod controller;
pub mod error;
pub mod field;
pub mod payload;

pub use catalog::WizardKind;
pub use controller::{
    PendingSubmission, StepForward, SubmitReceipt, SubscriptionId, Transition, WizardController,
    WizardEvent, WizardObserver, WizardPhase, WizardState,
};
pub use error::WizardError;
pub use field::{Draft, FieldKind, FieldSpec, FieldValue, FileRef};
pub use payload::WizardPayload;
