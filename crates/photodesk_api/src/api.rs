//! Route-shaped use-case API.
//!
//! # Responsibility
//! - Map each route onto one orchestrator call.
//! - Translate null-object results into a distinct not-found error.
//!
//! # Invariants
//! - Routes never return a null sentinel as data.
//! - Binary content leaves only through `download_photo`.
//! - Every failure is an `ApiError` carrying path, status and timestamp.

use crate::error::ApiError;
use chrono::Utc;
use log::{debug, warn};
use photodesk_core::{
    Address, AddressInput, AddressService, CoreConfig, Database, DbError, Photo, PhotoService,
    PhotoState, RepoResult,
};

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;

/// Successful route result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub body: T,
}

impl<T> ApiResponse<T> {
    fn ok(body: T) -> Self {
        Self {
            status: STATUS_OK,
            body,
        }
    }

    fn created(body: T) -> Self {
        Self {
            status: STATUS_CREATED,
            body,
        }
    }
}

/// Raw photo payload with the headers a transport should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDownload {
    pub content_type: String,
    pub content_disposition: String,
    pub bytes: Vec<u8>,
}

/// Entry point bundling the orchestrators behind the routes.
#[derive(Debug, Clone)]
pub struct Api {
    photos: PhotoService,
    addresses: AddressService,
    super_duper: bool,
}

impl Api {
    /// Opens the configured database and wires the services.
    pub fn new(config: &CoreConfig) -> Result<Self, DbError> {
        let db = Database::open(&config.db_path)?;
        Ok(Self {
            photos: PhotoService::new(db.clone()),
            addresses: AddressService::new(db),
            super_duper: config.super_duper,
        })
    }

    /// `GET /value`
    pub fn get_value(&self) -> String {
        if self.super_duper {
            return "Super Duper".to_string();
        }
        Utc::now().to_rfc3339()
    }

    /// `GET /photos`
    pub fn get_photos(&self) -> Result<ApiResponse<Vec<PhotoState>>, ApiError> {
        let photos = respond("/photos", self.photos.find_all())?;
        Ok(ApiResponse::ok(
            photos
                .iter()
                .filter(|photo| !photo.is_null())
                .map(Photo::state)
                .collect(),
        ))
    }

    /// `GET /photos/{id}`
    pub fn get_photo(&self, id: &str) -> Result<ApiResponse<PhotoState>, ApiError> {
        let path = format!("/photos/{id}");
        let photo = found(&path, respond(&path, self.photos.try_get(id))?)?;
        Ok(ApiResponse::ok(photo.state()))
    }

    /// `POST /photos`
    ///
    /// Only the submitted file name is used; identity is always fresh.
    pub fn set_photo(&self, body: &PhotoState) -> Result<ApiResponse<PhotoState>, ApiError> {
        let photo = respond(
            "/photos",
            self.photos.create_from_file_name(body.file_name.as_str()),
        )?;
        Ok(ApiResponse::created(photo.state()))
    }

    /// `POST /photos/upload`
    pub fn upload_photo(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<ApiResponse<PhotoState>, ApiError> {
        let photo = respond(
            "/photos/upload",
            self.photos.create_upload(file_name, bytes, content_type),
        )?;
        Ok(ApiResponse::created(photo.state()))
    }

    /// `GET /photos/download/{id}`
    pub fn download_photo(&self, id: &str) -> Result<ApiResponse<PhotoDownload>, ApiError> {
        let path = format!("/photos/download/{id}");
        let state = found(&path, respond(&path, self.photos.try_get(id))?)?.into_state();

        Ok(ApiResponse::ok(PhotoDownload {
            content_disposition: format!("attachment; filename=\"{}\"", state.file_name),
            content_type: state.content_type,
            bytes: state.file,
        }))
    }

    /// `DELETE /photos/{id}`
    ///
    /// Returns the state as it was just before deletion.
    pub fn delete_photo(&self, id: &str) -> Result<ApiResponse<PhotoState>, ApiError> {
        let path = format!("/photos/{id}");
        let photo = found(&path, respond(&path, self.photos.remove(id))?)?;
        Ok(ApiResponse::ok(photo.state()))
    }

    /// `POST /addresses`
    pub fn create_address(&self, input: &AddressInput) -> Result<ApiResponse<Address>, ApiError> {
        let address = respond("/addresses", self.addresses.create_and_persist(input))?;
        Ok(ApiResponse::created(address))
    }

    /// `GET /addresses/{id}`
    pub fn get_address(&self, id: &str) -> Result<ApiResponse<Address>, ApiError> {
        let path = format!("/addresses/{id}");
        let address = respond(&path, self.addresses.try_get(id))?;
        if address.is_null() {
            return Err(not_found(&path));
        }
        Ok(ApiResponse::ok(address))
    }
}

fn respond<T>(path: &str, result: RepoResult<T>) -> Result<T, ApiError> {
    result.map_err(|err| {
        let api_error = ApiError::from_repo(path, &err);
        warn!(
            "event=api_request module=api status=error path={path} http_status={} error={err}",
            api_error.status
        );
        api_error
    })
}

fn found(path: &str, photo: Photo) -> Result<Photo, ApiError> {
    if photo.is_null() {
        return Err(not_found(path));
    }
    Ok(photo)
}

fn not_found(path: &str) -> ApiError {
    debug!("event=api_request module=api status=not_found path={path}");
    ApiError::not_found(path)
}

#[cfg(test)]
mod tests {
    use super::{Api, STATUS_CREATED, STATUS_OK};
    use crate::error::{STATUS_BAD_REQUEST, STATUS_NOT_FOUND};
    use photodesk_core::{AddressInput, CoreConfig, PhotoState};
    use tempfile::TempDir;

    fn api_with(super_duper: bool) -> (TempDir, Api) {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig {
            db_path: dir.path().join("api.sqlite3"),
            super_duper,
            ..CoreConfig::default()
        };
        let api = Api::new(&config).unwrap();
        (dir, api)
    }

    #[test]
    fn upload_fetch_delete_round_trip() {
        let (_dir, api) = api_with(false);

        let created = api.upload_photo("a.png", Vec::new(), "image/png").unwrap();
        assert_eq!(created.status, STATUS_CREATED);
        let id = created.body.external_id().as_str().to_string();
        assert_eq!(id.len(), 36);
        assert_eq!(created.body.file_name, "a.png");

        let fetched = api.get_photo(&id).unwrap();
        assert_eq!(fetched.status, STATUS_OK);
        assert_eq!(fetched.body.file_name, "a.png");
        assert_eq!(fetched.body.content_type, "image/png");

        let deleted = api.delete_photo(&id).unwrap();
        assert_eq!(deleted.body.external_id().as_str(), id);
        assert_eq!(deleted.body.file_name, "a.png");

        let err = api.get_photo(&id).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.path, format!("/photos/{id}"));
    }

    #[test]
    fn unknown_photo_is_not_found_everywhere() {
        let (_dir, api) = api_with(false);

        for err in [
            api.get_photo("missing").unwrap_err(),
            api.download_photo("missing").unwrap_err(),
            api.delete_photo("missing").unwrap_err(),
        ] {
            assert_eq!(err.status, STATUS_NOT_FOUND);
        }
    }

    #[test]
    fn not_found_error_serializes_with_path_status_and_timestamp() {
        let (_dir, api) = api_with(false);
        let err = api.get_photo("missing").unwrap_err();

        let json: serde_json::Value = serde_json::from_str(&err.to_json().unwrap()).unwrap();
        assert_eq!(json["path"], "/photos/missing");
        assert_eq!(json["status"], 404);
        assert!(json["timestamp"].is_string());
        assert!(json["message"].is_string());
    }

    #[test]
    fn set_photo_uses_only_the_file_name() {
        let (_dir, api) = api_with(false);
        let body = PhotoState::new("b.gif", vec![1, 2], "image/gif");

        let created = api.set_photo(&body).unwrap();
        assert_eq!(created.body.file_name, "b.gif");
        assert_ne!(created.body.external_id(), body.external_id());
        assert!(created.body.file.is_empty());
        assert_eq!(created.body.content_type, "");
    }

    #[test]
    fn invalid_upload_is_bad_request() {
        let (_dir, api) = api_with(false);
        let err = api
            .upload_photo("notes.txt", Vec::new(), "text/plain")
            .unwrap_err();
        assert_eq!(err.status, STATUS_BAD_REQUEST);
        assert_eq!(err.path, "/photos/upload");
    }

    #[test]
    fn download_returns_bytes_and_headers() {
        let (_dir, api) = api_with(false);
        let created = api
            .upload_photo("c.jpg", vec![0xff, 0xd8], "image/jpeg")
            .unwrap();
        let id = created.body.external_id().as_str().to_string();

        let download = api.download_photo(&id).unwrap().body;
        assert_eq!(download.bytes, vec![0xff, 0xd8]);
        assert_eq!(download.content_type, "image/jpeg");
        assert_eq!(download.content_disposition, "attachment; filename=\"c.jpg\"");
    }

    #[test]
    fn get_photos_lists_every_created_photo() {
        let (_dir, api) = api_with(false);
        api.upload_photo("a.png", Vec::new(), "image/png").unwrap();
        api.upload_photo("b.png", Vec::new(), "image/png").unwrap();

        let listed = api.get_photos().unwrap().body;
        let names: Vec<_> = listed.iter().map(|state| state.file_name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png"]);
    }

    #[test]
    fn address_create_and_lookup() {
        let (_dir, api) = api_with(false);
        let input = AddressInput {
            street1: Some("1 Main St".to_string()),
            city: Some("Springfield".to_string()),
            zip_code: Some("12345".to_string()),
            ..AddressInput::default()
        };

        let created = api.create_address(&input).unwrap();
        assert_eq!(created.status, STATUS_CREATED);
        let id = created.body.external_id().as_str().to_string();

        let fetched = api.get_address(&id).unwrap();
        assert_eq!(fetched.body.city.as_deref(), Some("Springfield"));

        assert!(api.get_address("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn value_probe_honors_super_duper_flag() {
        let (_dir, plain) = api_with(false);
        assert_ne!(plain.get_value(), "Super Duper");

        let (_dir, flagged) = api_with(true);
        assert_eq!(flagged.get_value(), "Super Duper");
    }
}
