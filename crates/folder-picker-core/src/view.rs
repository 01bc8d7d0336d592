//! Render-ready snapshot of the control.
//!
//! [`PickerView`] describes what a front end has to draw and which actions
//! are enabled, without committing to any rendering technology.

use crate::state::BrowseModel;

/// One folder row in the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRow {
    /// Display label.
    pub name: String,
    /// Server-relative path, passed back to `navigate_into`/`toggle_select`.
    pub path: String,
    /// The row is the confirmed value.
    pub checked: bool,
    /// The row is the pending selection.
    pub selected: bool,
}

/// The browse dialog, present only while it is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    /// Folder being listed.
    pub current_path: String,
    /// Show a spinner instead of the pagination controls.
    pub loading: bool,
    /// Show the go-to-parent action.
    pub show_parent: bool,
    /// The folders of the current page.
    pub rows: Vec<FolderRow>,
    /// Previous-page action enabled.
    pub previous_enabled: bool,
    /// Next-page action enabled.
    pub next_enabled: bool,
    /// Select action enabled.
    pub select_enabled: bool,
    /// Listing failure with a retry affordance.
    pub load_error: Option<String>,
}

/// Snapshot of the whole control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerView {
    /// Label above the value.
    pub label: String,
    /// The confirmed folder as shown in the read-only field.
    pub value: String,
    /// Browse action enabled.
    pub browse_enabled: bool,
    /// Clear action enabled.
    pub clear_enabled: bool,
    /// Validation message below the field.
    pub error_message: Option<String>,
    /// The dialog, when open.
    pub dialog: Option<DialogView>,
}

impl PickerView {
    pub(crate) fn build(model: &BrowseModel, label: &str, disabled: bool) -> Self {
        let state = model.state();
        let confirmed = state.confirmed_path.as_deref();

        let dialog = state.is_open.then(|| DialogView {
            current_path: state.current_path.clone(),
            loading: state.is_loading,
            show_parent: model.can_navigate_up(),
            rows: state
                .items
                .iter()
                .map(|folder| FolderRow {
                    name: folder.name.clone(),
                    path: folder.path.clone(),
                    checked: confirmed == Some(folder.path.as_str()),
                    selected: state.selected_path.as_deref() == Some(folder.path.as_str()),
                })
                .collect(),
            previous_enabled: model.can_go_previous(),
            next_enabled: model.can_go_next(),
            select_enabled: model.can_confirm(),
            load_error: state.load_error.clone(),
        });

        Self {
            label: label.to_string(),
            value: confirmed.unwrap_or_default().to_string(),
            browse_enabled: !disabled,
            clear_enabled: !disabled,
            error_message: state.error_message.clone(),
            dialog,
        }
    }
}
