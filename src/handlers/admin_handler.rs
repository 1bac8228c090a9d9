use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::course_model::{Course, CourseStats},
    models::filter_model::{CatalogVariant, Choice, FilterCriteria, FilterOptions},
    models::paging::PaginationParams,
    models::upload_model::SelectedFile,
    services::catalog_service::CatalogService,
    services::course_form::{CourseFormController, FormMode},
    services::course_service::CourseApi,
    services::storage_service::ImageHost,
    services::upload_service::UploadCoordinator,
    AppState,
};

use super::catalog_handler::CatalogView;

/// Which dialog is open over the course table.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Modal {
    #[default]
    Closed,
    Create,
    Edit { course_id: String },
    Delete { course: Course },
}

/// Course management screen.
pub struct AdminHandler {
    api: Arc<dyn CourseApi>,
    uploads: UploadCoordinator,
    form: CourseFormController,
    courses: Vec<Course>,
    filter_options: FilterOptions,
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
    modal: Modal,
    loading: bool,
    submitting: bool,
}

impl AdminHandler {
    pub fn new(api: Arc<dyn CourseApi>, images: Arc<dyn ImageHost>, page_size: usize) -> Self {
        Self {
            api,
            uploads: UploadCoordinator::new(images),
            form: CourseFormController::new(),
            courses: Vec::new(),
            filter_options: FilterOptions::default(),
            criteria: FilterCriteria::default(),
            page: 1,
            page_size,
            modal: Modal::Closed,
            loading: false,
            submitting: false,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.courses.clone(),
            state.images.clone(),
            state.config.admin_page_size,
        )
    }

    /// Fetch courses and filter options together. Whatever fails keeps its previous value.
    pub async fn load(&mut self) -> AppResult<()> {
        self.loading = true;
        let (courses, options) = tokio::join!(self.api.list_courses(), self.api.filter_options());
        self.loading = false;

        let mut first_error = None;

        match courses {
            Ok(courses) => self.courses = courses,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching courses");
                first_error.get_or_insert(e);
            }
        }

        match options {
            Ok(options) => self.filter_options = options,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching filter options");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.filter_options
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn uploads(&self) -> &UploadCoordinator {
        &self.uploads
    }

    pub fn form(&self) -> &CourseFormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CourseFormController {
        &mut self.form
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.criteria.search_term = term.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, category: impl Into<Choice>) {
        self.criteria.category = category.into();
        self.page = 1;
    }

    pub fn set_instructor(&mut self, instructor: impl Into<Choice>) {
        self.criteria.instructor = instructor.into();
        self.page = 1;
    }

    pub fn reset_filters(&mut self) {
        self.criteria.reset();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) -> AppResult<()> {
        PaginationParams::new(page, self.page_size)
            .validate()
            .map_err(AppError::BadRequest)?;
        self.page = page;
        Ok(())
    }

    pub fn view(&self) -> CatalogView {
        if self.loading {
            return CatalogView::Loading;
        }
        CatalogView::build(
            &self.courses,
            &self.criteria,
            CatalogVariant::Admin,
            self.page,
            self.page_size,
        )
    }

    /// Totals over every loaded course, ignoring the current filters.
    pub fn stats(&self) -> CourseStats {
        CatalogService::stats(&self.courses)
    }

    pub fn open_create(&mut self) {
        self.form.reset();
        self.uploads.reset();
        self.submitting = false;
        self.modal = Modal::Create;
    }

    pub fn open_edit(&mut self, course_id: &str) -> AppResult<()> {
        let course = self.find(course_id)?.clone();

        self.form.load_from_existing(&course);
        self.uploads.reset_with_preview(Some(course.thumbnail.clone()));
        self.submitting = false;
        self.modal = Modal::Edit {
            course_id: course.id,
        };
        Ok(())
    }

    pub fn open_delete(&mut self, course_id: &str) -> AppResult<()> {
        let course = self.find(course_id)?.clone();
        self.modal = Modal::Delete { course };
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
        self.form.reset();
        self.uploads.reset();
        self.submitting = false;
    }

    /// Upload a new thumbnail. The form's thumbnail changes only when the upload succeeds.
    pub async fn select_thumbnail(&mut self, file: SelectedFile) -> AppResult<String> {
        let url = self.uploads.upload(file).await?;
        self.form.set_thumbnail(url.clone());
        Ok(url)
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && self.form.can_submit(self.uploads.is_uploading())
    }

    /// Create or update, depending on the open modal, then re-fetch the list.
    ///
    /// The stored course is returned when the server echoes it back. A 2xx reply without
    /// a course body still counts as saved.
    pub async fn submit(&mut self) -> AppResult<Option<Course>> {
        if self.submitting {
            return Err(AppError::Conflict("Already saving this course".to_string()));
        }
        if self.uploads.is_uploading() {
            return Err(AppError::Conflict(
                "Wait for the image upload to finish".to_string(),
            ));
        }

        let course_id = match (&self.modal, self.form.mode()) {
            (Modal::Create, FormMode::Create) => None,
            (Modal::Edit { course_id }, FormMode::Edit { .. }) => Some(course_id.clone()),
            _ => return Err(AppError::BadRequest("No course form is open".to_string())),
        };

        let payload = self.form.to_payload()?;
        let key = self.form.idempotency_key().to_string();

        self.submitting = true;
        let result = match &course_id {
            None => self.api.create_course(&payload, Some(&key)).await,
            Some(id) => self.api.update_course(id, &payload, Some(&key)).await,
        };
        self.submitting = false;

        let course = result.map_err(|e| {
            tracing::error!(course_id = ?course_id, error = %e, "Error saving course");
            e
        })?;
        if course.is_none() {
            tracing::debug!(course_id = ?course_id, "Saved without a course in the reply");
        }

        self.close_modal();
        self.refetch().await;
        Ok(course)
    }

    pub async fn confirm_delete(&mut self) -> AppResult<()> {
        let course_id = match &self.modal {
            Modal::Delete { course } => course.id.clone(),
            _ => return Err(AppError::BadRequest("No course selected for deletion".to_string())),
        };
        if self.submitting {
            return Err(AppError::Conflict("Already deleting this course".to_string()));
        }

        self.submitting = true;
        let result = self.api.delete_course(&course_id).await;
        self.submitting = false;

        result.map_err(|e| {
            tracing::error!(course_id = %course_id, error = %e, "Error deleting course");
            e
        })?;

        self.close_modal();
        self.refetch().await;
        Ok(())
    }

    // The mutation already succeeded; a failed reload only leaves the old list on screen.
    async fn refetch(&mut self) {
        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "Reload after save failed");
        }
    }

    fn find(&self, course_id: &str) -> AppResult<&Course> {
        self.courses
            .iter()
            .find(|c| c.id == course_id)
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }
}
