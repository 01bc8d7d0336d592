//! Logging targets for the folder picker.
//!
//! The crate is instrumented with `tracing`. Nothing is printed unless the
//! host installs a subscriber, for example:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("folder_picker_core::controller=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Crate-wide target.
    pub const CORE: &str = "folder_picker_core";
    /// Controller transitions and fetch bookkeeping.
    pub const CONTROLLER: &str = "folder_picker_core::controller";
    /// Folder listing backends.
    pub const LISTER: &str = "folder_picker_core::lister";
    /// Validation and host notification.
    pub const VALIDATION: &str = "folder_picker_core::validation";
    /// Debounce timers.
    pub const DEBOUNCE: &str = "folder_picker_core::debounce";
    /// Signal emission.
    pub const SIGNAL: &str = "folder_picker_core::signal";
    /// Configuration loading and path normalization.
    pub const CONFIG: &str = "folder_picker_core::config";
}
