//! View-model layer between `mockctl-api` and the front ends (CLI / TUI).
//!
//! This crate owns the admin screens' behavior, independent of how they
//! are rendered:
//!
//! - **[`Admin`]**: cheaply cloneable facade bundling a [`Backend`], the
//!   [`EventBus`] and the [`Navigator`]. Hands out controllers.
//!
//! - **[`ListController<R>`]**: loads a collection and binds it to a
//!   paginated, sortable, filterable [`TableView`]. Service lists follow
//!   the group selector; the service action list can regenerate itself.
//!
//! - **[`EditController<R>`]**: snapshot + working copy editing with
//!   dirty tracking, save and blocking alerts. [`ServiceEditController`]
//!   and [`ServiceNewController`] add environment / mock-group options,
//!   delete, and new-record defaults.
//!
//! - **[`Record`]**: the trait tying a wire type to its table columns,
//!   form fields, routes and backend calls.

pub mod admin;
pub mod backend;
pub mod bus;
pub mod config;
pub mod edit;
pub mod error;
pub mod list;
pub mod model;
pub mod navigation;
pub mod reference;
pub mod regenerate;
pub mod service;
pub mod table;

#[cfg(test)]
mod fake;

// ── Primary re-exports ──────────────────────────────────────────────
pub use admin::Admin;
pub use backend::Backend;
pub use bus::{BusMessage, EventBus};
pub use config::{ClientConfig, TlsVerification};
pub use edit::{EditController, EditSession};
pub use error::CoreError;
pub use list::{ListController, ListState};
pub use model::{
    Environment, FieldKind, FieldSpec, Flag, MockGroup, Record, RecordId, Service, ServiceAction,
    display_value,
};
pub use navigation::{Navigator, Route};
pub use reference::ReferenceData;
pub use regenerate::RegenerateControl;
pub use service::{ServiceEditController, ServiceForm, ServiceNewController, blank_service};
pub use table::{SortDirection, SortSpec, TableParams, TableView};

pub use mockctl_api::{ALL_GROUPS, FlagEncoding};
