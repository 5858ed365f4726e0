//! # Toast data model.
//!
//! This module provides the types a queued toast is made of:
//! - [`CallerId`], [`ToastToken`], [`WindowToken`], [`DisplayId`], [`ChangeId`] - identities
//! - [`ToastRequest`] - unvalidated request as received from the binding layer
//! - [`PendingToast`] - validated request, not yet queued
//! - [`ToastRecord`] - queued toast owning its [`DisplayLease`]
//! - [`ToastPayload`] / [`ToastState`] - payload variant and display state

mod identity;
mod lease;
mod record;
mod request;

pub use identity::{CallerId, ChangeId, DisplayId, ToastToken, WindowToken};
pub use lease::DisplayLease;
pub(crate) use record::RecordId;
pub use record::{PendingToast, ToastPayload, ToastRecord, ToastState};
pub use request::ToastRequest;
