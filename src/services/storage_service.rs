use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::config::Config;
use crate::errors::AppResult;
use crate::models::upload_model::{SelectedFile, UploadResponse};
use crate::services::api_client::ApiClient;

/// External image hosting. Returns the public URL of the stored image.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload_image(&self, file: &SelectedFile) -> AppResult<String>;
}

/// Unsigned multipart uploads to the configured image host.
#[derive(Clone)]
pub struct StorageService {
    client: Client,
    upload_url: String,
    upload_preset: String,
    folder: String,
}

impl StorageService {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            upload_url: config.image_upload_url.clone(),
            upload_preset: config.image_upload_preset.clone(),
            folder: config.image_upload_folder.clone(),
        })
    }

    fn form_for(&self, file: &SelectedFile) -> AppResult<Form> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;

        Ok(Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", self.folder.clone()))
    }
}

#[async_trait]
impl ImageHost for StorageService {
    async fn upload_image(&self, file: &SelectedFile) -> AppResult<String> {
        let form = self.form_for(file)?;

        tracing::debug!(
            file_name = %file.file_name,
            size = file.size(),
            "Uploading image"
        );

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponse = ApiClient::read_json(response, "Upload failed").await?;
        Ok(body.secure_url)
    }
}
