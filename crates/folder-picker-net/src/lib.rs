//! SharePoint backend for the folder picker.
//!
//! This crate provides the remote half of the picker:
//!
//! - **HTTP client**: a `reqwest`-based client with retry and backoff
//!   ([`http`])
//! - **Folder lister**: [`SpFolderLister`], paging through a web's folders
//!   with the SharePoint REST API ([`sharepoint`])
//! - **Environment selection**: [`SiteConfig`] and
//!   [`lister_for_environment`], which pick the mock backend for a local
//!   workbench and the REST backend inside SharePoint
//!
//! # Example
//!
//! ```ignore
//! use folder_picker_core::{FolderPicker, PickerConfig};
//! use folder_picker_net::{SiteConfig, lister_for_environment};
//!
//! let site = SiteConfig::sharepoint("https://contoso.sharepoint.com/sites/a")
//!     .with_access_token(token);
//! let config = PickerConfig::new("folder")
//!     .with_web_server_relative_url(site.web_server_relative_url()?);
//!
//! let picker = FolderPicker::builder(config)
//!     .shared_lister(lister_for_environment(&site)?)
//!     .build()?;
//! picker.open();
//! ```
//!
//! Listing failures reach the picker as
//! [`TransportError`](folder_picker_core::TransportError); a folder that
//! does not exist lists as an empty page.

mod environment;
mod error;
pub mod http;
pub mod sharepoint;

pub use environment::{EnvironmentType, SiteConfig, lister_for_environment};
pub use error::{NetworkError, Result};
pub use sharepoint::{FolderQuery, SpFolderLister};
