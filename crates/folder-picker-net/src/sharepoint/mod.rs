//! SharePoint REST backend.
//!
//! [`SpFolderLister`] implements [`FolderLister`](folder_picker_core::FolderLister)
//! against the `/_api/web` endpoints of one SharePoint web:
//!
//! ```text
//! GET {site}/_api/web/folders?$select=Name,ServerRelativeUrl&$orderBy=Name&$top={n}&$skip={m}
//! GET {site}/_api/web/GetFolderByServerRelativeUrl('{path}')/folders?...
//! ```
//!
//! The query string is written verbatim rather than through a query builder
//! so the `$`-prefixed OData options reach the server unencoded.

mod lister;
mod query;

pub use lister::{ODATA_NOMETADATA, SpFolderLister};
pub use query::{FolderQuery, odata_path_literal};
