//! Host bindings: the property bag and callbacks owned by the web part.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::validation::{ErrorMessage, ErrorMessageFn};

/// Callback invoked as `(property_key, old_value, new_value)`.
pub type PropertyChangeFn = Arc<dyn Fn(&str, Option<&str>, &str) + Send + Sync>;

/// Host re-render hook.
pub type RenderFn = Arc<dyn Fn() + Send + Sync>;

/// The web part's property values, shared between the host and its controls.
///
/// Cloning a bag yields another handle to the same storage.
#[derive(Clone, Default)]
pub struct PropertyBag {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl PropertyBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a property.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    /// Write a property, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.write().insert(key.into(), value.into())
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether the bag holds no properties.
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl fmt::Debug for PropertyBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.read().iter()).finish()
    }
}

/// Everything the picker needs from its host besides plain configuration.
#[derive(Clone, Default)]
pub struct HostBindings {
    /// Property storage the confirmed value is written into.
    pub properties: PropertyBag,
    /// Optional validator run before the host is notified.
    pub on_get_error_message: Option<ErrorMessageFn>,
    /// Change callback. Without it the host is never notified.
    pub on_property_change: Option<PropertyChangeFn>,
    /// Re-render hook, skipped when reactive changes are disabled.
    pub render: Option<RenderFn>,
}

impl HostBindings {
    /// Bindings around a property bag with no callbacks.
    pub fn new(properties: PropertyBag) -> Self {
        Self {
            properties,
            ..Default::default()
        }
    }

    /// Attach a validator.
    pub fn on_get_error_message<F, M>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> M + Send + Sync + 'static,
        M: Into<ErrorMessage>,
    {
        self.on_get_error_message = Some(Arc::new(move |value: &str| -> ErrorMessage {
            validator(value).into()
        }));
        self
    }

    /// Attach the change callback.
    pub fn on_property_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, Option<&str>, &str) + Send + Sync + 'static,
    {
        self.on_property_change = Some(Arc::new(callback));
        self
    }

    /// Attach the re-render hook.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }
}

impl fmt::Debug for HostBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBindings")
            .field("properties", &self.properties)
            .field("has_validator", &self.on_get_error_message.is_some())
            .field("has_change_callback", &self.on_property_change.is_some())
            .field("has_render", &self.render.is_some())
            .finish()
    }
}
