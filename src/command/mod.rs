//! Front ends translating external requests into notes store calls.
//!
//! Both take the store by `&mut`; callers are expected to hold whatever lock
//! serializes mutations of the instance (see [`crate::instance`]).

pub mod intent;
pub mod service;

pub use intent::{AddNoteIntentHandler, Intent, IntentResponse, Slot, INTENT_ADD_NOTE};
pub use service::{ServiceCall, ServiceOutcome, ServiceRequest, DOMAIN};
