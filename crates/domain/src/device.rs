//! Device — an inventoried item with a name, a description, and an optional photo.

use serde::{Deserialize, Serialize};

use crate::error::{StockroomError, ValidationError};
use crate::id::DeviceId;

/// A stored device record.
///
/// `photo` holds the filename of a file in the photo store, or `None` when the
/// device has no photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Device {
    #[cfg_attr(feature = "openapi", schema(value_type = i64))]
    pub id: DeviceId,
    pub inventory_name: String,
    pub description: String,
    /// Filename in the photo store.
    pub photo: Option<String>,
}

impl Device {
    /// Create a builder for constructing a [`NewDevice`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }
}

/// A device that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub inventory_name: String,
    pub description: String,
    pub photo: Option<String>,
}

impl NewDevice {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::Validation`] when `inventory_name` is blank.
    pub fn validate(&self) -> Result<(), StockroomError> {
        if self.inventory_name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Attach the id chosen by storage.
    #[must_use]
    pub fn into_device(self, id: DeviceId) -> Device {
        Device {
            id,
            inventory_name: self.inventory_name,
            description: self.description,
            photo: self.photo,
        }
    }
}

/// Step-by-step builder for [`NewDevice`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    inventory_name: Option<String>,
    description: Option<String>,
    photo: Option<String>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn inventory_name(mut self, name: impl Into<String>) -> Self {
        self.inventory_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    /// Consume the builder, validate, and return a [`NewDevice`].
    ///
    /// `description` defaults to the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::Validation`] if `inventory_name` is missing or blank.
    pub fn build(self) -> Result<NewDevice, StockroomError> {
        let device = NewDevice {
            inventory_name: self.inventory_name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            photo: self.photo,
        };
        device.validate()?;
        Ok(device)
    }
}

/// Partial update of a device.
///
/// A field is only written when it is present **and** non-empty, so a patch
/// can never blank out `inventory_name` or `description`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevicePatch {
    pub inventory_name: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
}

impl DevicePatch {
    /// Write the non-empty fields of this patch into `device`.
    ///
    /// Returns the photo filename that was replaced, if any.
    pub fn apply(self, device: &mut Device) -> Option<String> {
        if let Some(name) = non_empty(self.inventory_name) {
            device.inventory_name = name;
        }
        if let Some(description) = non_empty(self.description) {
            device.description = description;
        }
        match non_empty(self.photo) {
            Some(photo) if device.photo.as_deref() != Some(photo.as_str()) => {
                device.photo.replace(photo)
            }
            _ => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
