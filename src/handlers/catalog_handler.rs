use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::contact_model::EnrollmentRequest,
    models::course_model::{Batch, BatchAvailability, Course, Level},
    models::filter_model::{CatalogVariant, Choice, FilterCriteria, SortBy},
    models::paging::{CatalogPage, PaginationMeta, PaginationParams},
    services::catalog_service::CatalogService,
    services::course_service::CourseApi,
    utils::{date, validation},
    AppState,
};

/// What the catalog grid should render.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    Loading,
    NoResults,
    Results(CatalogPage<Course>),
}

impl CatalogView {
    /// Run the query for `page`, clamped into the range the filtered set allows.
    pub fn build(
        courses: &[Course],
        criteria: &FilterCriteria,
        variant: CatalogVariant,
        page: usize,
        page_size: usize,
    ) -> Self {
        let first = CatalogService::apply(courses, criteria, variant, PaginationParams::new(1, page_size));
        if first.is_no_results() {
            return CatalogView::NoResults;
        }

        let page = PaginationMeta::clamp_page(page, first.total_pages());
        if page == 1 {
            return CatalogView::Results(first);
        }
        CatalogView::Results(CatalogService::apply(
            courses,
            criteria,
            variant,
            PaginationParams::new(page, page_size),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetails {
    pub batch: Batch,
    pub availability: String,
    pub is_full: bool,
    pub starts: String,
    pub ends: String,
}

/// Everything the course details screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetails {
    pub course: Course,
    pub batches: Vec<BatchDetails>,
    pub total_students: u64,
    pub upcoming_start: Option<NaiveDate>,
    pub upcoming_start_label: String,
}

impl CourseDetails {
    pub fn new(course: Course, today: NaiveDate) -> Self {
        let batches = course
            .batches
            .iter()
            .map(|batch| {
                let availability = batch.availability();
                BatchDetails {
                    batch: batch.clone(),
                    availability: availability.to_string(),
                    is_full: availability == BatchAvailability::Full,
                    starts: date::format_short(batch.start_date),
                    ends: date::format_short(batch.end_date),
                }
            })
            .collect();
        let upcoming_start = course.upcoming_batch_start(today);

        Self {
            total_students: course.enrolled_students(),
            upcoming_start,
            upcoming_start_label: date::format_long(upcoming_start),
            batches,
            course,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentAck {
    pub course_id: String,
    pub batch_name: String,
    pub message: String,
}

/// How many courses the home page highlights.
pub const FEATURED_COUNT: usize = 4;

/// Public catalog screen: fetched list, criteria and current page.
pub struct CatalogHandler {
    api: Arc<dyn CourseApi>,
    courses: Vec<Course>,
    categories: Vec<String>,
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
    loading: bool,
}

impl CatalogHandler {
    pub fn new(api: Arc<dyn CourseApi>, page_size: usize) -> Self {
        Self {
            api,
            courses: Vec::new(),
            categories: Vec::new(),
            criteria: FilterCriteria::default(),
            page: 1,
            page_size,
            loading: false,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.courses.clone(), state.config.catalog_page_size)
    }

    /// Fetch the catalog. A failure keeps whatever was loaded before.
    pub async fn load(&mut self) -> AppResult<()> {
        self.loading = true;
        let result = self.api.list_courses().await;
        self.loading = false;

        match result {
            Ok(courses) => {
                self.categories = CatalogService::unique_categories(&courses);
                tracing::debug!(count = courses.len(), "Catalog loaded");
                self.courses = courses;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching courses");
                Err(e)
            }
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Home page highlights, taken from the loaded list without any filters applied.
    pub fn featured(&self) -> Vec<Course> {
        CatalogService::featured(&self.courses, FEATURED_COUNT)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn levels(&self) -> [Level; 3] {
        Level::ALL
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.criteria.search_term = term.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, category: impl Into<Choice>) {
        self.criteria.category = category.into();
        self.page = 1;
    }

    pub fn set_level(&mut self, level: impl Into<Choice>) {
        self.criteria.level = level.into();
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort_by: SortBy) {
        self.criteria.sort_by = sort_by;
        self.page = 1;
    }

    /// Parse a sort value as the select sends it (`price-low`, ...).
    pub fn set_sort_str(&mut self, sort_by: &str) -> AppResult<()> {
        let sort_by = SortBy::from_str(sort_by).map_err(AppError::BadRequest)?;
        self.set_sort(sort_by);
        Ok(())
    }

    pub fn set_page(&mut self, page: usize) -> AppResult<()> {
        PaginationParams::new(page, self.page_size)
            .validate()
            .map_err(AppError::BadRequest)?;
        self.page = page;
        Ok(())
    }

    pub fn reset_filters(&mut self) {
        self.criteria.reset();
        self.page = 1;
    }

    pub fn view(&self) -> CatalogView {
        if self.loading {
            return CatalogView::Loading;
        }
        CatalogView::build(
            &self.courses,
            &self.criteria,
            CatalogVariant::Public,
            self.page,
            self.page_size,
        )
    }

    pub async fn course_details(&self, id: &str) -> AppResult<CourseDetails> {
        let course = self.api.get_course(id).await?;
        Ok(CourseDetails::new(course, Local::now().date_naive()))
    }

    /// Check an enrollment request for one batch of a course and acknowledge it.
    pub fn request_enrollment(
        &self,
        details: &CourseDetails,
        batch_index: usize,
        request: &EnrollmentRequest,
    ) -> AppResult<EnrollmentAck> {
        let batch = details
            .batches
            .get(batch_index)
            .ok_or_else(|| AppError::NotFound("Batch not found".to_string()))?;

        if batch.is_full {
            return Err(AppError::Conflict(format!("{} is full", batch.batch.name)));
        }

        if let Err(e) = request.validate() {
            return Err(AppError::Validation(validation::messages(&e).join("; ")));
        }

        tracing::info!(
            course_id = %details.course.id,
            batch = %batch.batch.name,
            email = %request.email,
            "Enrollment requested"
        );

        Ok(EnrollmentAck {
            course_id: details.course.id.clone(),
            batch_name: batch.batch.name.clone(),
            message: format!(
                "Thanks {}, we received your request for {} ({}).",
                request.name, details.course.title, batch.batch.name
            ),
        })
    }
}
