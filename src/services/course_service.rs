use async_trait::async_trait;
use http::StatusCode;

use crate::errors::{AppError, AppResult};
use crate::models::course_model::{Course, CoursePayload};
use crate::models::filter_model::FilterOptions;
use crate::services::api_client::ApiClient;

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn list_courses(&self) -> AppResult<Vec<Course>>;
    async fn filter_options(&self) -> AppResult<FilterOptions>;
    async fn get_course(&self, id: &str) -> AppResult<Course>;
    /// `Ok(None)` when the server accepted the course but did not echo it back.
    async fn create_course(
        &self,
        payload: &CoursePayload,
        idempotency_key: Option<&str>,
    ) -> AppResult<Option<Course>>;
    async fn update_course(
        &self,
        id: &str,
        payload: &CoursePayload,
        idempotency_key: Option<&str>,
    ) -> AppResult<Option<Course>>;
    async fn delete_course(&self, id: &str) -> AppResult<()>;
}

pub struct CourseService {
    api: ApiClient,
}

impl CourseService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn with_key(
        request: reqwest::RequestBuilder,
        idempotency_key: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match idempotency_key {
            Some(key) => request.header(IDEMPOTENCY_HEADER, key),
            None => request,
        }
    }
}

#[async_trait]
impl CourseApi for CourseService {
    async fn list_courses(&self) -> AppResult<Vec<Course>> {
        let url = self.api.routes().courses();
        tracing::debug!(%url, "Fetching courses");

        let response = self.api.http().get(&url).send().await?;
        ApiClient::read_json(response, "Failed to load courses").await
    }

    async fn filter_options(&self) -> AppResult<FilterOptions> {
        let url = self.api.routes().course_filters();
        tracing::debug!(%url, "Fetching course filters");

        let response = self.api.http().get(&url).send().await?;
        ApiClient::read_json(response, "Failed to load filters").await
    }

    async fn get_course(&self, id: &str) -> AppResult<Course> {
        let url = self.api.routes().course(id);
        tracing::debug!(%url, "Fetching course");

        let response = self.api.http().get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Course not found".to_string()));
        }
        ApiClient::read_json(response, "Failed to load course").await
    }

    async fn create_course(
        &self,
        payload: &CoursePayload,
        idempotency_key: Option<&str>,
    ) -> AppResult<Option<Course>> {
        let url = self.api.routes().courses();
        let request = Self::with_key(self.api.http().post(&url).json(payload), idempotency_key);

        let response = request.send().await?;
        let course: Option<Course> =
            ApiClient::read_json_if_present(response, "Failed to create course").await?;

        tracing::info!(
            course_id = ?course.as_ref().map(|c| c.id.as_str()),
            title = %payload.title,
            "Course created"
        );
        Ok(course)
    }

    async fn update_course(
        &self,
        id: &str,
        payload: &CoursePayload,
        idempotency_key: Option<&str>,
    ) -> AppResult<Option<Course>> {
        let url = self.api.routes().course(id);
        let request = Self::with_key(self.api.http().put(&url).json(payload), idempotency_key);

        let response = request.send().await?;
        let course: Option<Course> =
            ApiClient::read_json_if_present(response, "Failed to update course").await?;

        tracing::info!(course_id = %id, "Course updated");
        Ok(course)
    }

    async fn delete_course(&self, id: &str) -> AppResult<()> {
        let url = self.api.routes().course(id);

        let response = self.api.http().delete(&url).send().await?;
        ApiClient::check(response, "Failed to delete course").await?;

        tracing::info!(course_id = %id, "Course deleted");
        Ok(())
    }
}
