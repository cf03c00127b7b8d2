//! Admin fleet management
//!
//! List, add, edit and delete vehicles, and upload vehicle images. After
//! any successful save or delete the list is fetched again.

use crate::api::UploadFile;
use crate::task::{TaskSlot, guarded};
use crate::{ClientError, ClientResult, RentalApi};
use shared::error::{AppError, ErrorCode};
use shared::models::{Vehicle, VehicleInput};
use tokio_util::sync::CancellationToken;
use validator::Validate;

pub const MSG_LOAD_CARS_FAILED: &str = "Failed to load cars";
pub const MSG_SAVE_FAILED: &str = "Failed to save car";
pub const MSG_DELETE_FAILED: &str = "Failed to delete car";
pub const MSG_UPLOAD_FAILED: &str = "Failed to upload images";

/// Open add/edit form
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleEditor {
    /// `None` when adding a new vehicle
    pub id: Option<String>,
    pub input: VehicleInput,
}

impl VehicleEditor {
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Default)]
pub struct FleetManager {
    cars: TaskSlot<Vec<Vehicle>>,
    editor: Option<VehicleEditor>,
    busy: bool,
    error: Option<String>,
    notice: Option<String>,
    cancel: CancellationToken,
}

impl FleetManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<A>(&mut self, api: &A)
    where
        A: RentalApi + ?Sized,
    {
        let ticket = self.cars.begin();
        let result = guarded(&self.cancel, api.admin_cars()).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Error fetching fleet");
        }
        self.cars.finish_with(ticket, result, MSG_LOAD_CARS_FAILED);
    }

    pub fn cars(&self) -> &[Vehicle] {
        self.cars.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.cars.is_loading()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.cars.error()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn editor(&self) -> Option<&VehicleEditor> {
        self.editor.as_ref()
    }

    /// Open a blank form
    pub fn open_new(&mut self) {
        self.error = None;
        self.editor = Some(VehicleEditor {
            id: None,
            input: VehicleInput::default(),
        });
    }

    /// Open the form pre-filled from a listed vehicle
    pub fn open_edit(&mut self, id: &str) -> bool {
        let Some(vehicle) = self.cars().iter().find(|v| v.id == id) else {
            return false;
        };
        let editor = VehicleEditor {
            id: Some(vehicle.id.clone()),
            input: VehicleInput::from(vehicle),
        };
        self.error = None;
        self.editor = Some(editor);
        true
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Mutate the open form; no-op when no form is open
    pub fn edit(&mut self, f: impl FnOnce(&mut VehicleInput)) {
        if let Some(editor) = self.editor.as_mut() {
            f(&mut editor.input);
        }
    }

    pub fn remove_image(&mut self, index: usize) {
        if let Some(editor) = self.editor.as_mut()
            && index < editor.input.images.len()
        {
            editor.input.images.remove(index);
        }
    }

    /// Upload files and append the returned URLs to the open form
    pub async fn upload<A>(&mut self, api: &A, files: Vec<UploadFile>) -> ClientResult<usize>
    where
        A: RentalApi + ?Sized,
    {
        if self.editor.is_none() {
            return Err(AppError::validation("No vehicle form is open").into());
        }
        if files.is_empty() {
            return Ok(0);
        }
        let count = files.len();
        self.error = None;
        self.notice = None;
        self.busy = true;
        let result = guarded(&self.cancel, api.upload_images(files)).await;
        self.busy = false;

        match result {
            Ok(response) => {
                let added = response.urls.len();
                tracing::info!(files = count, urls = added, "Images uploaded");
                self.edit(|input| input.images.extend(response.urls));
                self.notice = Some("Images uploaded successfully".to_string());
                Ok(added)
            }
            Err(e) => Err(self.fail(e, "Error uploading images", MSG_UPLOAD_FAILED)),
        }
    }

    /// Validate and send the open form; create or update by whether it has an id
    pub async fn save<A>(&mut self, api: &A) -> ClientResult<Vehicle>
    where
        A: RentalApi + ?Sized,
    {
        let Some(editor) = self.editor.clone() else {
            return Err(AppError::validation("No vehicle form is open").into());
        };
        self.error = None;
        self.notice = None;
        if let Err(errors) = editor.input.validate() {
            let err = ClientError::from(AppError::from(errors));
            self.error = Some(err.user_message(MSG_SAVE_FAILED));
            return Err(err);
        }

        self.busy = true;
        let result = match editor.id.as_deref() {
            Some(id) => guarded(&self.cancel, api.update_car(id, &editor.input)).await,
            None => guarded(&self.cancel, api.create_car(&editor.input)).await,
        };
        self.busy = false;

        match result {
            Ok(vehicle) => {
                tracing::info!(car_id = %vehicle.id, new = editor.is_new(), "Vehicle saved");
                self.editor = None;
                self.notice = Some(
                    if editor.is_new() {
                        "Car added successfully"
                    } else {
                        "Car updated successfully"
                    }
                    .to_string(),
                );
                self.load(api).await;
                Ok(vehicle)
            }
            Err(e) => Err(self.fail(e, "Error saving vehicle", MSG_SAVE_FAILED)),
        }
    }

    /// Delete a vehicle. Asking the user to confirm is the caller's job.
    pub async fn delete<A>(&mut self, api: &A, id: &str) -> ClientResult<()>
    where
        A: RentalApi + ?Sized,
    {
        if self.cars.value().is_some() && !self.cars().iter().any(|v| v.id == id) {
            return Err(AppError::new(ErrorCode::VehicleNotFound).with_detail("id", id).into());
        }
        self.error = None;
        self.notice = None;
        self.busy = true;
        let result = guarded(&self.cancel, api.delete_car(id)).await;
        self.busy = false;

        match result {
            Ok(()) => {
                tracing::info!(car_id = id, "Vehicle deleted");
                if self.editor.as_ref().and_then(|e| e.id.as_deref()) == Some(id) {
                    self.editor = None;
                }
                self.notice = Some("Car deleted successfully".to_string());
                self.load(api).await;
                Ok(())
            }
            Err(e) => Err(self.fail(e, "Error deleting vehicle", MSG_DELETE_FAILED)),
        }
    }

    fn fail(&mut self, e: ClientError, log: &str, fallback: &str) -> ClientError {
        if !e.is_cancelled() {
            tracing::warn!(error = %e, "{}", log);
            self.error = Some(e.user_message(fallback));
        }
        e
    }

    /// Token another task can cancel to tear the view down mid-request
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.cars.invalidate();
    }
}

impl Drop for FleetManager {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
