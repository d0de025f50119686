//! Form-submission state engine for schema-driven table forms.
//!
//! A [`session::controller::FormSession`] owns one form's draft values,
//! its validation flags and the submit/reset lifecycle. Drafts are written
//! through to a [`draft::store::DraftStore`] keyed by the form's
//! [`identity::storage_key::StorageKey`], so they survive reloads and never
//! mix between forms.

pub mod cli;
pub mod draft;
pub mod identity;
pub mod sched;
pub mod schema;
pub mod session;
pub mod trace;
pub mod validation;
