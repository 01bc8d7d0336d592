//! The folder picker controller.
//!
//! [`FolderPicker`] owns the browse dialog's state, drives the folder lister
//! and forwards confirmed values through debounced validation to the host.
//!
//! Every public action applies one [`BrowseModel`] transition, emits
//! [`state_changed`](FolderPicker::state_changed) with a snapshot and then
//! starts any fetch that transition asked for. Lister
//! responses and validation results arrive later on the runtime and follow
//! the same apply-then-emit path. Actions never return errors: failures are
//! recorded in the state.
//!
//! # Example
//!
//! ```
//! use folder_picker_core::{FolderPicker, HostBindings, MockFolderLister, PickerConfig, PropertyBag};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> folder_picker_core::Result<()> {
//! let properties = PropertyBag::new();
//! let picker = FolderPicker::builder(PickerConfig::new("folder").with_label("Folder"))
//!     .lister(MockFolderLister::new())
//!     .host(HostBindings::new(properties.clone()))
//!     .build()?;
//!
//! picker.state_changed().connect(|state| {
//!     println!("{} folders listed", state.items.len());
//! });
//! picker.open();
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::PickerConfig;
use crate::debounce::Debouncer;
use crate::error::{PickerError, Result, TransportError};
use crate::folder::FolderPage;
use crate::host::HostBindings;
use crate::lister::{FolderLister, MockFolderLister};
use crate::signal::Signal;
use crate::state::{BrowseModel, BrowseState, FetchRequest};
use crate::validation::{ValidationGate, ValidationOutcome};
use crate::view::PickerView;

/// Builder for [`FolderPicker`].
pub struct FolderPickerBuilder {
    config: PickerConfig,
    lister: Option<Arc<dyn FolderLister>>,
    host: HostBindings,
    runtime: Option<Handle>,
}

impl FolderPickerBuilder {
    fn new(config: PickerConfig) -> Self {
        Self {
            config,
            lister: None,
            host: HostBindings::default(),
            runtime: None,
        }
    }

    /// Set the folder backend. Defaults to [`MockFolderLister`].
    pub fn lister<L: FolderLister + 'static>(mut self, lister: L) -> Self {
        self.lister = Some(Arc::new(lister));
        self
    }

    /// Set a shared folder backend.
    pub fn shared_lister(mut self, lister: Arc<dyn FolderLister>) -> Self {
        self.lister = Some(lister);
        self
    }

    /// Set the host bindings.
    pub fn host(mut self, host: HostBindings) -> Self {
        self.host = host;
        self
    }

    /// Run fetches and timers on this runtime instead of the current one.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build the picker.
    ///
    /// Fails when the configuration is invalid or when no runtime was given
    /// and the caller is not inside one.
    pub fn build(self) -> Result<FolderPicker> {
        self.config.validate()?;

        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| PickerError::NoRuntime)?,
        };

        let model = BrowseModel::new(&self.config);
        let initial_folder = self.config.normalized_initial_folder();
        let debouncer = Debouncer::new(self.config.validation_delay(), runtime.clone());
        let gate = ValidationGate::new(self.host.on_get_error_message.clone());
        let lister = self
            .lister
            .unwrap_or_else(|| Arc::new(MockFolderLister::new()));

        tracing::debug!(
            target: "folder_picker_core::controller",
            target_property = %self.config.target_property,
            current_path = %model.state().current_path,
            page_size = model.page_size(),
            "folder picker created"
        );

        Ok(FolderPicker {
            inner: Arc::new(PickerInner {
                config: self.config,
                host: self.host,
                lister,
                runtime,
                initial_folder,
                model: Mutex::new(model),
                fetch_task: Mutex::new(None),
                gate,
                debouncer,
                disposed: AtomicBool::new(false),
                state_changed: Signal::new(),
                value_changed: Signal::new(),
            }),
        })
    }
}

impl fmt::Debug for FolderPickerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolderPickerBuilder")
            .field("config", &self.config)
            .field("has_lister", &self.lister.is_some())
            .field("host", &self.host)
            .finish()
    }
}

struct PickerInner {
    config: PickerConfig,
    host: HostBindings,
    lister: Arc<dyn FolderLister>,
    runtime: Handle,
    initial_folder: Option<String>,
    model: Mutex<BrowseModel>,
    fetch_task: Mutex<Option<JoinHandle<()>>>,
    gate: ValidationGate,
    debouncer: Debouncer,
    disposed: AtomicBool,
    state_changed: Signal<BrowseState>,
    value_changed: Signal<String>,
}

impl PickerInner {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn start_fetch(self: &Arc<Self>, request: FetchRequest) {
        tracing::debug!(
            target: "folder_picker_core::controller",
            token = request.token,
            path = %request.path,
            page = request.window.index,
            "fetching folders"
        );

        let weak: Weak<Self> = Arc::downgrade(self);
        let lister = self.lister.clone();
        let task = self.runtime.spawn(async move {
            let result = lister.list(&request.path, request.window).await;
            if let Some(inner) = weak.upgrade() {
                inner.finish_fetch(request.token, result);
            }
        });

        if let Some(previous) = self.fetch_task.lock().replace(task) {
            previous.abort();
        }
    }

    fn finish_fetch(&self, token: u64, result: std::result::Result<FolderPage, TransportError>) {
        if self.is_disposed() {
            return;
        }
        if let Err(err) = &result {
            tracing::warn!(target: "folder_picker_core::controller", token, error = %err, "folder listing failed");
        }

        let applied = self.model.lock().complete_fetch(token, result);
        if applied {
            self.commit();
        } else {
            tracing::debug!(target: "folder_picker_core::controller", token, "discarded stale folder page");
        }
    }

    fn cancel_fetch(&self) {
        if let Some(task) = self.fetch_task.lock().take() {
            task.abort();
        }
    }

    /// Emit the current state. Must be called with no lock held.
    fn commit(&self) {
        if self.is_disposed() {
            return;
        }
        let snapshot = self.model.lock().state().clone();
        self.state_changed.emit(snapshot);
    }

    fn schedule_validation(self: &Arc<Self>, value: String) {
        let weak = Arc::downgrade(self);
        self.debouncer.schedule(async move {
            if let Some(inner) = weak.upgrade() {
                inner.validate(value).await;
            }
        });
    }

    async fn validate(&self, value: String) {
        if self.is_disposed() {
            return;
        }

        match self.gate.run(&value).await {
            ValidationOutcome::Accepted => {
                if self.is_disposed() {
                    return;
                }
                self.model.lock().set_error_message(None);
                self.notify(&value);
                self.commit();
            }
            ValidationOutcome::Rejected(message) => {
                if self.is_disposed() {
                    return;
                }
                tracing::debug!(target: "folder_picker_core::validation", value = %value, message = %message, "value rejected");
                self.model.lock().set_error_message(Some(message));
                self.commit();
            }
            ValidationOutcome::Unchanged => {}
        }
    }

    fn notify(&self, value: &str) {
        let key = self.config.target_property.as_str();

        if let Some(on_change) = &self.host.on_property_change {
            let previous = self
                .host
                .properties
                .set(key, value)
                .or_else(|| self.initial_folder.clone());
            tracing::debug!(
                target: "folder_picker_core::validation",
                key,
                old = previous.as_deref().unwrap_or_default(),
                new = value,
                "notifying host"
            );
            on_change(key, previous.as_deref(), value);

            if !self.config.disable_reactive_property_changes
                && let Some(render) = &self.host.render
            {
                render();
            }
        }

        self.value_changed.emit(value.to_string());
    }
}

/// A folder picker property control.
///
/// Construct with [`FolderPicker::builder`]. Dropping the picker disposes it.
pub struct FolderPicker {
    inner: Arc<PickerInner>,
}

impl FolderPicker {
    /// Start building a picker for `config`.
    pub fn builder(config: PickerConfig) -> FolderPickerBuilder {
        FolderPickerBuilder::new(config)
    }

    /// The configuration the picker was built with.
    pub fn config(&self) -> &PickerConfig {
        &self.inner.config
    }

    /// The host bindings.
    pub fn host(&self) -> &HostBindings {
        &self.inner.host
    }

    /// Emitted with a snapshot after every state transition.
    pub fn state_changed(&self) -> &Signal<BrowseState> {
        &self.inner.state_changed
    }

    /// Emitted with the new value after the host has been notified.
    pub fn value_changed(&self) -> &Signal<String> {
        &self.inner.value_changed
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> BrowseState {
        self.inner.model.lock().state().clone()
    }

    /// A render-ready snapshot of the control.
    pub fn view(&self) -> PickerView {
        let model = self.inner.model.lock();
        PickerView::build(&model, &self.inner.config.label, self.inner.config.disabled)
    }

    /// Whether "up" is available.
    pub fn can_navigate_up(&self) -> bool {
        self.inner.model.lock().can_navigate_up()
    }

    /// Whether "next page" is available.
    pub fn can_go_next(&self) -> bool {
        self.inner.model.lock().can_go_next()
    }

    /// Whether "previous page" is available.
    pub fn can_go_previous(&self) -> bool {
        self.inner.model.lock().can_go_previous()
    }

    /// Whether "select" is available.
    pub fn can_confirm(&self) -> bool {
        self.inner.model.lock().can_confirm()
    }

    /// Whether a validation is waiting for the debounce delay to pass.
    pub fn is_validation_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Open the browse dialog on the first page of the current folder.
    pub fn open(&self) {
        if self.inner.config.disabled {
            tracing::debug!(target: "folder_picker_core::controller", "open ignored, control disabled");
            return;
        }
        self.fetching(|model| Some(model.open()));
    }

    /// Browse into a child folder.
    pub fn navigate_into(&self, folder_path: &str) {
        self.fetching(|model| Some(model.navigate_into(folder_path)));
    }

    /// Browse to the parent folder. Does nothing at the top of the subtree.
    pub fn navigate_up(&self) {
        self.fetching(BrowseModel::navigate_up);
    }

    /// Show the next page. Does nothing when the current page is short.
    pub fn next_page(&self) {
        self.fetching(BrowseModel::next_page);
    }

    /// Show the previous page. Does nothing on the first page.
    pub fn previous_page(&self) {
        self.fetching(BrowseModel::previous_page);
    }

    /// Fetch the current location again, typically after a failure.
    pub fn retry(&self) {
        self.fetching(BrowseModel::retry);
    }

    /// Tick a folder of the current page, replacing the previous selection.
    pub fn toggle_select(&self, folder_path: &str) {
        if self.is_disposed() {
            return;
        }
        let listed = self.inner.model.lock().toggle_select(folder_path);
        if !listed {
            tracing::debug!(target: "folder_picker_core::controller", path = folder_path, "ignored selection of unlisted folder");
            return;
        }
        self.inner.commit();
    }

    /// Confirm the selection, close the dialog and schedule validation.
    ///
    /// Does nothing when no folder is selected.
    pub fn confirm(&self) {
        if self.is_disposed() {
            return;
        }
        let Some(value) = self.inner.model.lock().confirm() else {
            return;
        };
        self.inner.cancel_fetch();
        tracing::debug!(target: "folder_picker_core::controller", value = %value, "selection confirmed");
        self.inner.commit();
        self.inner.schedule_validation(value);
    }

    /// Clear the value, reset browsing to the base folder and schedule
    /// validation of the empty value.
    pub fn clear_selection(&self) {
        if self.is_disposed() {
            return;
        }
        if self.inner.config.disabled {
            tracing::debug!(target: "folder_picker_core::controller", "clear ignored, control disabled");
            return;
        }
        let value = self.inner.model.lock().clear_selection();
        self.inner.cancel_fetch();
        tracing::debug!(target: "folder_picker_core::controller", "selection cleared");
        self.inner.commit();
        self.inner.schedule_validation(value);
    }

    /// Close the dialog without changing the confirmed value.
    pub fn dismiss(&self) {
        if self.is_disposed() {
            return;
        }
        self.inner.model.lock().dismiss();
        self.inner.cancel_fetch();
        self.inner.commit();
    }

    /// Tear the picker down.
    ///
    /// Cancels the in-flight fetch and pending validation and disconnects all
    /// observers. Nothing reaches the host afterwards. Calling it again does
    /// nothing.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.debouncer.dispose();
        self.inner.cancel_fetch();
        self.inner.state_changed.disconnect_all();
        self.inner.value_changed.disconnect_all();
        tracing::debug!(target: "folder_picker_core::controller", "folder picker disposed");
    }

    fn fetching<F>(&self, transition: F)
    where
        F: FnOnce(&mut BrowseModel) -> Option<FetchRequest>,
    {
        if self.is_disposed() {
            return;
        }
        let request = {
            let mut model = self.inner.model.lock();
            transition(&mut *model)
        };
        let Some(request) = request else {
            return;
        };
        self.inner.commit();

        // A slot may have moved on to another location during the commit.
        if self.inner.model.lock().is_awaiting(request.token) {
            self.inner.start_fetch(request);
        }
    }
}

impl Drop for FolderPicker {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for FolderPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolderPicker")
            .field("target_property", &self.inner.config.target_property)
            .field("state", &self.state())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
