//! Browser-side half of the contact pipeline, modelled as a library: field
//! state and validation, cooldown persistence, captcha token lifecycle, and
//! the network call, behind mockable seams.

mod controller;
mod store;
mod transport;
mod widget;

pub use controller::{ControllerConfig, FormField, SubmissionController, SubmitOutcome};
pub use store::{CooldownStore, MemoryStore, MockCooldownStore};
pub use transport::{
    HttpTransport, MockSubmissionTransport, SendStatus, SubmissionTransport, TransportError,
};
pub use widget::{CallbackWidget, CaptchaWidget, MockCaptchaWidget};
