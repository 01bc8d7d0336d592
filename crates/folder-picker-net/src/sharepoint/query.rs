//! OData query construction for the folders endpoint.

use std::fmt::Write as _;

use folder_picker_core::{PageWindow, is_root};

const SELECT: &str = "$select=Name,ServerRelativeUrl&$orderBy=Name";

/// The request for one page of a folder's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderQuery {
    parent_path: String,
    window: PageWindow,
}

impl FolderQuery {
    /// Query the children of `parent_path` within `window`.
    ///
    /// An empty path or `/` lists the children of the web's root folder.
    pub fn new(parent_path: impl Into<String>, window: PageWindow) -> Self {
        Self {
            parent_path: parent_path.into(),
            window,
        }
    }

    /// The folder whose children are listed.
    pub fn parent_path(&self) -> &str {
        &self.parent_path
    }

    /// The requested page.
    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Whether the query targets the web's root folder.
    pub fn is_root(&self) -> bool {
        is_root(&self.parent_path)
    }

    /// The site-relative request path, query string included.
    ///
    /// ```
    /// use folder_picker_core::PageWindow;
    /// use folder_picker_net::sharepoint::FolderQuery;
    ///
    /// let query = FolderQuery::new("/sites/a", PageWindow::new(1, 6));
    /// assert_eq!(
    ///     query.to_path(),
    ///     "/_api/web/GetFolderByServerRelativeUrl('/sites/a')/folders\
    ///      ?$select=Name,ServerRelativeUrl&$orderBy=Name&$top=6&$skip=6"
    /// );
    /// ```
    pub fn to_path(&self) -> String {
        let mut path = if self.is_root() {
            String::from("/_api/web/folders")
        } else {
            format!(
                "/_api/web/GetFolderByServerRelativeUrl('{}')/folders",
                odata_path_literal(&self.parent_path)
            )
        };
        // Writing to a String cannot fail.
        let _ = write!(
            path,
            "?{SELECT}&$top={}&$skip={}",
            self.window.size,
            self.window.skip()
        );
        path
    }
}

/// Escape a server-relative path for use inside an OData string literal in
/// a URL path.
///
/// Single quotes are doubled. `%`, `#` and `?` are percent-encoded so the
/// literal survives URL parsing; everything else is left for the URL parser.
pub fn odata_path_literal(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for ch in path.chars() {
        match ch {
            '\'' => escaped.push_str("''"),
            '%' => escaped.push_str("%25"),
            '#' => escaped.push_str("%23"),
            '?' => escaped.push_str("%3F"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_query() {
        for root in ["", "/"] {
            let query = FolderQuery::new(root, PageWindow::new(0, 6));
            assert!(query.is_root());
            assert_eq!(
                query.to_path(),
                "/_api/web/folders?$select=Name,ServerRelativeUrl&$orderBy=Name&$top=6&$skip=0"
            );
        }
    }

    #[test]
    fn test_subfolder_query_pages() {
        let query = FolderQuery::new("/sites/a/Shared Documents", PageWindow::new(3, 10));
        assert_eq!(
            query.to_path(),
            "/_api/web/GetFolderByServerRelativeUrl('/sites/a/Shared Documents')/folders\
             ?$select=Name,ServerRelativeUrl&$orderBy=Name&$top=10&$skip=30"
        );
    }

    #[test]
    fn test_literal_escaping() {
        assert_eq!(odata_path_literal("/sites/a/Bob's files"), "/sites/a/Bob''s files");
        assert_eq!(odata_path_literal("/sites/a/100% #1?"), "/sites/a/100%25 %231%3F");
    }
}
