//! The folder lister contract and the mock backend.
//!
//! A [`FolderLister`] resolves a folder path and a [`PageWindow`] into one page
//! of child folders. The controller holds it as `Arc<dyn FolderLister>`; which
//! backend is used is decided by whoever builds the picker.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::TransportError;
use crate::folder::{Folder, FolderPage, PageWindow};

/// The future returned by [`FolderLister::list`].
pub type ListFuture<'a> = BoxFuture<'a, Result<FolderPage, TransportError>>;

/// Resolves a folder path and page window into child folders.
///
/// Implementations return an empty page when the folder does not exist and
/// reserve [`TransportError`] for network or service failures.
pub trait FolderLister: Send + Sync {
    /// List the children of `parent_path` within `window`, ordered by name.
    ///
    /// An empty `parent_path` denotes the site root.
    fn list<'a>(&'a self, parent_path: &'a str, window: PageWindow) -> ListFuture<'a>;
}

impl<L: FolderLister + ?Sized> FolderLister for Arc<L> {
    fn list<'a>(&'a self, parent_path: &'a str, window: PageWindow) -> ListFuture<'a> {
        (**self).list(parent_path, window)
    }
}

impl<L: FolderLister + ?Sized> FolderLister for Box<L> {
    fn list<'a>(&'a self, parent_path: &'a str, window: PageWindow) -> ListFuture<'a> {
        (**self).list(parent_path, window)
    }
}

/// Static backend for local development.
///
/// Always answers with the same three folders and ignores both the parent
/// path and the page window. Hosts rely on this exact page, so it is not
/// paginated.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFolderLister;

impl MockFolderLister {
    /// Create the mock backend.
    pub fn new() -> Self {
        Self
    }

    /// The fixed page served for every request.
    pub fn folders() -> FolderPage {
        vec![
            Folder::new("Mock Folder One", "/mockfolderone"),
            Folder::new("Mock Folder Two", "/mockfoldertwo"),
            Folder::new("Mock Folder Three", "/mockfolderthree"),
        ]
    }
}

impl FolderLister for MockFolderLister {
    fn list<'a>(&'a self, parent_path: &'a str, window: PageWindow) -> ListFuture<'a> {
        tracing::debug!(
            target: "folder_picker_core::lister",
            parent_path,
            page = window.index,
            "serving mock folders"
        );
        Box::pin(async { Ok(Self::folders()) })
    }
}
