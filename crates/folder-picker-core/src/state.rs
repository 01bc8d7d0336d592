//! Browse state and its transition functions.
//!
//! [`BrowseModel`] is the single writer of [`BrowseState`]. Each transition
//! mutates the state in one step and, when it needs data, returns a
//! [`FetchRequest`] for the controller to hand to the lister. Nothing in this
//! module performs I/O, which keeps every invariant testable synchronously.

use crate::config::PickerConfig;
use crate::error::TransportError;
use crate::folder::{FolderPage, PageWindow, is_root, is_within, parent_folder};

/// Observable state of a folder picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseState {
    /// Folder whose children are listed. `""` is the site root.
    pub current_path: String,
    /// Zero-based page cursor within `current_path`.
    pub page_index: usize,
    /// The page currently displayed.
    pub items: FolderPage,
    /// Folder ticked in the dialog but not yet confirmed.
    pub selected_path: Option<String>,
    /// The value surfaced to the host.
    pub confirmed_path: Option<String>,
    /// Whether the browse dialog is open.
    pub is_open: bool,
    /// Whether a page is being fetched.
    pub is_loading: bool,
    /// Message from the host validator, if it rejected the value.
    pub error_message: Option<String>,
    /// Last transport failure for the current location.
    pub load_error: Option<String>,
}

/// A page the controller must fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Sequence token; only the latest token may complete.
    pub token: u64,
    /// Folder to list.
    pub path: String,
    /// Page to list.
    pub window: PageWindow,
}

/// The browse state machine.
#[derive(Debug, Clone)]
pub struct BrowseModel {
    state: BrowseState,
    base_folder: String,
    web_url: String,
    page_size: usize,
    fetch_seq: u64,
}

impl BrowseModel {
    /// Seed the model from configuration.
    ///
    /// With an initial folder, browsing starts in its parent and the folder
    /// itself is both confirmed and selected. Otherwise browsing starts at
    /// the base folder. The start location never lies above the base folder,
    /// and a parent equal to the web root starts at the root sentinel.
    pub fn new(config: &PickerConfig) -> Self {
        let base_folder = config.normalized_base_folder();
        let web_url = config.normalized_web_url();
        let initial = config.normalized_initial_folder();

        let current_path = match &initial {
            Some(folder) => {
                let parent = parent_folder(folder);
                if !is_within(&parent, &base_folder) {
                    base_folder.clone()
                } else if is_root(&base_folder) && parent == web_url {
                    String::new()
                } else {
                    parent
                }
            }
            None => base_folder.clone(),
        };

        Self {
            state: BrowseState {
                current_path,
                is_loading: true,
                selected_path: initial.clone(),
                confirmed_path: initial,
                ..Default::default()
            },
            base_folder,
            web_url,
            page_size: config.page_size.max(1),
            fetch_seq: 0,
        }
    }

    /// The current state.
    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    /// The configured base folder, normalized.
    pub fn base_folder(&self) -> &str {
        &self.base_folder
    }

    /// Folders per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether the current location is the top of the browsable subtree:
    /// the root sentinel, the base folder or the web root.
    pub fn is_at_root(&self) -> bool {
        let current = &self.state.current_path;
        is_root(current) || *current == self.base_folder || *current == self.web_url
    }

    /// Whether `token` names the fetch the state is still waiting for.
    pub fn is_awaiting(&self, token: u64) -> bool {
        token == self.fetch_seq && self.state.is_loading
    }

    /// Whether "up" is available.
    pub fn can_navigate_up(&self) -> bool {
        !self.state.is_loading && !self.is_at_root()
    }

    /// Whether "next page" is available. A short page means there is no more.
    pub fn can_go_next(&self) -> bool {
        !self.state.is_loading && self.state.items.len() == self.page_size
    }

    /// Whether "previous page" is available.
    pub fn can_go_previous(&self) -> bool {
        !self.state.is_loading && self.state.page_index > 0
    }

    /// Whether "select" is available.
    pub fn can_confirm(&self) -> bool {
        self.state
            .selected_path
            .as_deref()
            .is_some_and(|path| !path.is_empty())
    }

    /// Open the dialog on page 0 of the current folder.
    pub fn open(&mut self) -> FetchRequest {
        self.state.is_open = true;
        self.state.page_index = 0;
        self.begin_fetch()
    }

    /// Browse into a child folder.
    pub fn navigate_into(&mut self, folder_path: &str) -> FetchRequest {
        self.state.current_path = folder_path.to_string();
        self.state.page_index = 0;
        self.state.selected_path = None;
        self.begin_fetch()
    }

    /// Browse to the parent folder. `None` at the top of the subtree.
    pub fn navigate_up(&mut self) -> Option<FetchRequest> {
        if self.is_at_root() {
            return None;
        }

        let mut parent = parent_folder(&self.state.current_path);
        if parent == self.web_url {
            parent.clear();
        }
        if !is_within(&parent, &self.base_folder) {
            parent = self.base_folder.clone();
        }

        self.state.current_path = parent;
        self.state.page_index = 0;
        self.state.selected_path = None;
        Some(self.begin_fetch())
    }

    /// Move to the next page. `None` when the current page is short.
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if !self.can_go_next() {
            return None;
        }
        self.state.page_index += 1;
        self.state.selected_path = None;
        Some(self.begin_fetch())
    }

    /// Move to the previous page. `None` on the first page.
    pub fn previous_page(&mut self) -> Option<FetchRequest> {
        if self.state.page_index == 0 {
            return None;
        }
        self.state.page_index -= 1;
        self.state.selected_path = None;
        Some(self.begin_fetch())
    }

    /// Re-issue the fetch for the current location.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if !self.state.is_open {
            return None;
        }
        Some(self.begin_fetch())
    }

    /// Tick a folder of the current page. Returns `false` if it is not listed.
    pub fn toggle_select(&mut self, folder_path: &str) -> bool {
        if !self.state.items.iter().any(|f| f.path == folder_path) {
            return false;
        }
        self.state.selected_path = Some(folder_path.to_string());
        true
    }

    /// Commit the selection and close the dialog.
    ///
    /// Returns the value to validate, or `None` when nothing is selected.
    pub fn confirm(&mut self) -> Option<String> {
        if !self.can_confirm() {
            return None;
        }
        let selected = self.state.selected_path.clone()?;
        self.state.confirmed_path = Some(selected.clone());
        self.state.is_open = false;
        self.state.is_loading = false;
        self.supersede_fetch();
        Some(selected)
    }

    /// Clear the value and reset browsing to the base folder.
    ///
    /// Returns the value to validate (always `""`).
    pub fn clear_selection(&mut self) -> String {
        self.state.confirmed_path = Some(String::new());
        self.state.current_path = self.base_folder.clone();
        self.state.page_index = 0;
        self.state.is_open = false;
        self.state.is_loading = false;
        self.supersede_fetch();
        String::new()
    }

    /// Close the dialog without changing the confirmed value.
    pub fn dismiss(&mut self) {
        self.state.is_open = false;
        self.state.is_loading = false;
        self.supersede_fetch();
    }

    /// Apply a lister response. Returns `false` for stale responses.
    pub fn complete_fetch(
        &mut self,
        token: u64,
        result: Result<FolderPage, TransportError>,
    ) -> bool {
        if !self.is_awaiting(token) {
            return false;
        }

        self.state.is_loading = false;
        match result {
            Ok(items) => {
                self.state.items = items;
                self.state.load_error = None;
            }
            Err(err) => {
                self.state.items.clear();
                self.state.load_error = Some(err.to_string());
            }
        }

        let selection_listed = self.state.selected_path.as_deref().is_none_or(|selected| {
            self.state.items.iter().any(|f| f.path == selected)
        });
        if !selection_listed {
            self.state.selected_path = None;
        }
        true
    }

    /// Record the outcome of validation.
    pub fn set_error_message(&mut self, message: Option<String>) {
        self.state.error_message = message.filter(|m| !m.is_empty());
    }

    fn begin_fetch(&mut self) -> FetchRequest {
        self.fetch_seq += 1;
        self.state.is_loading = true;
        self.state.items.clear();
        self.state.load_error = None;
        FetchRequest {
            token: self.fetch_seq,
            path: self.state.current_path.clone(),
            window: PageWindow::new(self.state.page_index, self.page_size),
        }
    }

    fn supersede_fetch(&mut self) {
        self.fetch_seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::Folder;

    fn page(prefix: &str, count: usize) -> FolderPage {
        (0..count)
            .map(|i| Folder::new(format!("F{i}"), format!("{prefix}/f{i}")))
            .collect()
    }

    fn loaded(config: &PickerConfig, items: FolderPage) -> BrowseModel {
        let mut model = BrowseModel::new(config);
        let request = model.open();
        assert!(model.complete_fetch(request.token, Ok(items)));
        model
    }

    #[test]
    fn test_seed_from_initial_folder() {
        let config = PickerConfig::new("folder").with_initial_folder("/sites/a/docs/reports");
        let model = BrowseModel::new(&config);

        assert_eq!(model.state().current_path, "/sites/a/docs");
        assert_eq!(model.state().confirmed_path.as_deref(), Some("/sites/a/docs/reports"));
        assert!(!model.state().is_open);
    }

    #[test]
    fn test_seed_from_base_folder() {
        let config = PickerConfig::new("folder").with_base_folder("/sites/a/");
        let model = BrowseModel::new(&config);
        assert_eq!(model.state().current_path, "/sites/a");
        assert_eq!(model.state().confirmed_path, None);
        assert!(model.is_at_root());
    }

    #[test]
    fn test_open_requests_page_zero() {
        let config = PickerConfig::new("folder").with_base_folder("/sites/a");
        let mut model = BrowseModel::new(&config);
        let request = model.open();

        assert!(model.state().is_open);
        assert!(model.state().is_loading);
        assert_eq!(request.path, "/sites/a");
        assert_eq!(request.window, PageWindow::new(0, 6));
    }

    #[test]
    fn test_navigate_up_then_into_restores_path() {
        let config = PickerConfig::new("folder");
        let mut model = loaded(&config, page("", 6));
        model.navigate_into("/sites/a/docs");
        let original = model.state().current_path.clone();

        model.navigate_up().unwrap();
        assert_eq!(model.state().current_path, "/sites/a");
        model.navigate_into(&original);
        assert_eq!(model.state().current_path, original);
        assert_eq!(model.state().page_index, 0);
    }

    #[test]
    fn test_navigate_up_collapses_web_root() {
        let config = PickerConfig::new("folder").with_web_server_relative_url("/sites/a");
        let mut model = BrowseModel::new(&config);
        model.navigate_into("/sites/a/docs");

        model.navigate_up().unwrap();
        assert_eq!(model.state().current_path, "");
        assert!(model.navigate_up().is_none());
    }

    #[test]
    fn test_seed_directly_under_web_root_stays_in_web() {
        let config = PickerConfig::new("folder")
            .with_web_server_relative_url("/sites/a")
            .with_initial_folder("/sites/a/docs");
        let mut model = BrowseModel::new(&config);

        assert_eq!(model.state().current_path, "");
        assert!(model.is_at_root());
        assert!(model.navigate_up().is_none());
        assert_eq!(model.open().path, "");
    }

    #[test]
    fn test_web_root_is_top_of_subtree() {
        let config = PickerConfig::new("folder").with_web_server_relative_url("/sites/a");
        let mut model = BrowseModel::new(&config);
        model.navigate_into("/sites/a");

        assert!(model.is_at_root());
        assert!(model.navigate_up().is_none());
        assert_eq!(model.state().current_path, "/sites/a");
    }

    #[test]
    fn test_seed_never_starts_above_base_folder() {
        let config = PickerConfig::new("folder")
            .with_base_folder("/sites/a/docs")
            .with_initial_folder("/sites/a/docs");
        let mut model = BrowseModel::new(&config);

        assert_eq!(model.state().current_path, "/sites/a/docs");
        assert_eq!(model.state().confirmed_path.as_deref(), Some("/sites/a/docs"));
        assert_eq!(model.open().path, "/sites/a/docs");

        let config = PickerConfig::new("folder")
            .with_base_folder("/sites/a/docs")
            .with_initial_folder("/other/place");
        assert_eq!(BrowseModel::new(&config).state().current_path, "/sites/a/docs");
    }

    #[test]
    fn test_navigate_up_never_crosses_base_folder() {
        let config = PickerConfig::new("folder").with_base_folder("/sites/a/docs");
        let mut model = BrowseModel::new(&config);
        model.navigate_into("/sites/a/docs/reports");

        model.navigate_up().unwrap();
        assert_eq!(model.state().current_path, "/sites/a/docs");
        assert!(model.navigate_up().is_none());

        // An initial folder outside the base clamps to the base on the way up.
        model.navigate_into("/other/place/deep");
        model.navigate_up().unwrap();
        assert_eq!(model.state().current_path, "/sites/a/docs");
    }

    #[test]
    fn test_pagination_gating_and_cursor() {
        let config = PickerConfig::new("folder");
        let mut model = loaded(&config, page("", 6));

        assert!(model.previous_page().is_none());
        let request = model.next_page().unwrap();
        assert_eq!(request.window, PageWindow::new(1, 6));
        assert_eq!(model.state().page_index, 1);

        assert!(model.complete_fetch(request.token, Ok(page("", 2))));
        assert!(model.next_page().is_none());
        assert_eq!(model.state().page_index, 1);

        let request = model.previous_page().unwrap();
        assert_eq!(request.window.index, 0);
        assert_eq!(model.state().page_index, 0);
    }

    #[test]
    fn test_next_page_disabled_while_loading() {
        let config = PickerConfig::new("folder");
        let mut model = loaded(&config, page("", 6));
        model.next_page().unwrap();
        assert!(model.next_page().is_none());
    }

    #[test]
    fn test_page_moves_clear_selection() {
        let config = PickerConfig::new("folder");
        let mut model = loaded(&config, page("", 6));
        assert!(model.toggle_select("/f1"));
        let request = model.next_page().unwrap();
        assert_eq!(model.state().selected_path, None);

        model.complete_fetch(request.token, Ok(page("", 6)));
        assert!(model.toggle_select("/f2"));
        model.previous_page().unwrap();
        assert_eq!(model.state().selected_path, None);
    }

    #[test]
    fn test_toggle_select_is_single_and_listed_only() {
        let config = PickerConfig::new("folder");
        let mut model = loaded(&config, page("", 3));

        assert!(model.toggle_select("/f0"));
        assert!(model.toggle_select("/f2"));
        assert_eq!(model.state().selected_path.as_deref(), Some("/f2"));
        assert!(!model.toggle_select("/elsewhere"));
        assert_eq!(model.state().selected_path.as_deref(), Some("/f2"));
    }

    #[test]
    fn test_confirm_and_dismiss() {
        let config = PickerConfig::new("folder").with_initial_folder("/f9");
        let mut model = loaded(&config, page("", 3));
        assert_eq!(model.state().selected_path, None);
        assert_eq!(model.confirm(), None);

        model.toggle_select("/f1");
        assert_eq!(model.confirm().as_deref(), Some("/f1"));
        assert_eq!(model.state().confirmed_path.as_deref(), Some("/f1"));
        assert!(!model.state().is_open);

        model.open();
        model.dismiss();
        assert_eq!(model.state().confirmed_path.as_deref(), Some("/f1"));
        assert!(!model.state().is_loading);
    }

    #[test]
    fn test_clear_resets_to_base() {
        let config = PickerConfig::new("folder")
            .with_base_folder("/sites/a")
            .with_initial_folder("/sites/a/docs/x");
        let mut model = BrowseModel::new(&config);

        assert_eq!(model.clear_selection(), "");
        assert_eq!(model.state().confirmed_path.as_deref(), Some(""));
        assert_eq!(model.state().current_path, "/sites/a");
        assert!(!model.state().is_open);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let config = PickerConfig::new("folder");
        let mut model = BrowseModel::new(&config);
        let old = model.open();
        let new = model.navigate_into("/sites/b");

        assert!(!model.complete_fetch(old.token, Ok(page("/sites/a", 2))));
        assert!(model.state().is_loading);
        assert!(model.complete_fetch(new.token, Ok(page("/sites/b", 1))));
        assert_eq!(model.state().items[0].path, "/sites/b/f0");
    }

    #[test]
    fn test_response_after_dismiss_is_discarded() {
        let config = PickerConfig::new("folder");
        let mut model = BrowseModel::new(&config);
        let request = model.open();
        model.dismiss();
        assert!(!model.complete_fetch(request.token, Ok(page("", 2))));
        assert!(model.state().items.is_empty());
    }

    #[test]
    fn test_transport_error_clears_loading() {
        let config = PickerConfig::new("folder");
        let mut model = BrowseModel::new(&config);
        let request = model.open();

        assert!(model.complete_fetch(request.token, Err(TransportError::Timeout)));
        assert!(!model.state().is_loading);
        assert!(model.state().items.is_empty());
        assert!(model.state().load_error.is_some());

        let retry = model.retry().unwrap();
        assert!(model.state().load_error.is_none());
        assert!(model.complete_fetch(retry.token, Ok(page("", 1))));
    }

    #[test]
    fn test_fetch_prunes_unlisted_selection() {
        let config = PickerConfig::new("folder").with_initial_folder("/f1");
        let mut model = BrowseModel::new(&config);
        assert_eq!(model.state().selected_path.as_deref(), Some("/f1"));

        let request = model.open();
        model.complete_fetch(request.token, Ok(page("", 3)));
        assert_eq!(model.state().selected_path.as_deref(), Some("/f1"));

        assert!(model.toggle_select("/f2"));
        model.dismiss();
        let request = model.open();
        model.complete_fetch(request.token, Ok(page("/other", 2)));
        assert_eq!(model.state().selected_path, None);
    }
}
