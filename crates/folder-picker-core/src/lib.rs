//! Core of the folder picker property control.
//!
//! The picker lets a user browse a document library's folder hierarchy page
//! by page, tick one folder and confirm it as the value of a host property.
//! This crate holds everything that does not depend on a transport:
//!
//! - **Browse state machine**: [`BrowseModel`] and its [`BrowseState`]
//! - **Controller**: [`FolderPicker`], which runs fetches and validation on
//!   a tokio runtime and reports every transition through [`Signal`]s
//! - **Lister contract**: the [`FolderLister`] trait and the
//!   [`MockFolderLister`] backend
//! - **Validation**: debounced, optionally asynchronous host validation
//!   ([`ErrorMessage`], [`Debouncer`])
//! - **Configuration**: [`PickerConfig`], loadable from TOML
//!
//! A SharePoint REST backend lives in the `folder-picker-net` crate.
//!
//! # Browsing
//!
//! ```ignore
//! use folder_picker_core::{FolderPicker, PickerConfig};
//!
//! let picker = FolderPicker::builder(PickerConfig::new("folder").with_base_folder("/sites/a"))
//!     .lister(my_lister)
//!     .build()?;
//!
//! picker.open();                           // lists /sites/a, page 0
//! picker.navigate_into("/sites/a/docs");   // lists /sites/a/docs
//! picker.toggle_select("/sites/a/docs/reports");
//! picker.confirm();                        // validated after the debounce delay
//! ```
//!
//! # Rendering
//!
//! [`FolderPicker::view`] returns a [`PickerView`] describing what to draw
//! and which actions are enabled. Connect to
//! [`FolderPicker::state_changed`] to re-render after each transition.
//!
//! # Logging
//!
//! See [`logging::targets`] for the `tracing` targets used by this crate.

mod config;
mod controller;
mod debounce;
mod error;
mod folder;
mod host;
mod lister;
pub mod logging;
pub mod signal;
mod state;
mod validation;
mod view;

pub use config::{DEFAULT_PAGE_SIZE, DEFAULT_VALIDATION_DELAY_MS, PickerConfig};
pub use controller::{FolderPicker, FolderPickerBuilder};
pub use debounce::Debouncer;
pub use error::{ConfigError, PickerError, Result, TransportError};
pub use folder::{
    Folder, FolderPage, PageWindow, is_root, is_within, normalize_folder_path, parent_folder,
};
pub use host::{HostBindings, PropertyBag, PropertyChangeFn, RenderFn};
pub use lister::{FolderLister, ListFuture, MockFolderLister};
pub use signal::{ConnectionId, Signal};
pub use state::{BrowseModel, BrowseState, FetchRequest};
pub use validation::{ErrorMessage, ErrorMessageFn, ValidationGate, ValidationOutcome};
pub use view::{DialogView, FolderRow, PickerView};
