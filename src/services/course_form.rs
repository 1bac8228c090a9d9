use std::str::FromStr;

use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::course_model::{Batch, Course, CourseDraft, CoursePayload, Level};
use crate::utils::date;
use crate::utils::validation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { course_id: String },
}

/// Top-level draft fields, named as the form names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    Title,
    Description,
    Instructor,
    Price,
    Category,
    Syllabus,
    Duration,
    Level,
    Thumbnail,
    IsPublished,
}

impl FromStr for CourseField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "title" => CourseField::Title,
            "description" => CourseField::Description,
            "instructor" => CourseField::Instructor,
            "price" => CourseField::Price,
            "category" => CourseField::Category,
            "syllabus" => CourseField::Syllabus,
            "duration" => CourseField::Duration,
            "level" => CourseField::Level,
            "thumbnail" => CourseField::Thumbnail,
            "isPublished" => CourseField::IsPublished,
            other => return Err(AppError::BadRequest(format!("Unknown field: {}", other))),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchField {
    Name,
    StartDate,
    EndDate,
    MaxStudents,
}

impl FromStr for BatchField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "name" => BatchField::Name,
            "startDate" => BatchField::StartDate,
            "endDate" => BatchField::EndDate,
            "maxStudents" => BatchField::MaxStudents,
            other => return Err(AppError::BadRequest(format!("Unknown batch field: {}", other))),
        })
    }
}

/// What an input hands over: typed text, or a checkbox state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checkbox(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Checkbox(value)
    }
}

fn coerce_checkbox(value: FieldValue) -> AppResult<bool> {
    match value {
        FieldValue::Checkbox(checked) => Ok(checked),
        FieldValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "1" => Ok(true),
            "false" | "off" | "0" | "" => Ok(false),
            other => Err(AppError::BadRequest(format!("Not a checkbox value: {}", other))),
        },
    }
}

/// State of the create/edit course form.
pub struct CourseFormController {
    draft: CourseDraft,
    mode: FormMode,
    idempotency_key: String,
}

impl Default for CourseFormController {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseFormController {
    pub fn new() -> Self {
        Self {
            draft: CourseDraft::default(),
            mode: FormMode::Create,
            idempotency_key: cuid2::create_id(),
        }
    }

    pub fn draft(&self) -> &CourseDraft {
        &self.draft
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Sent with create/update so a server that supports it can drop duplicates.
    pub fn idempotency_key(&self) -> &str {
        &self.idempotency_key
    }

    pub fn set_field(&mut self, field: CourseField, value: FieldValue) -> AppResult<()> {
        match (field, value) {
            (CourseField::IsPublished, value) => {
                self.draft.is_published = coerce_checkbox(value)?;
                Ok(())
            }
            (field, FieldValue::Text(text)) => self.set_text(field, text),
            (field, FieldValue::Checkbox(_)) => Err(AppError::BadRequest(format!(
                "{:?} is not a checkbox field",
                field
            ))),
        }
    }

    fn set_text(&mut self, field: CourseField, text: String) -> AppResult<()> {
        match field {
            CourseField::Title => self.draft.title = text,
            CourseField::Description => self.draft.description = text,
            CourseField::Instructor => self.draft.instructor = text,
            CourseField::Price => self.draft.price = text,
            CourseField::Category => self.draft.category = text,
            CourseField::Syllabus => self.draft.syllabus = text,
            CourseField::Duration => self.draft.duration = text,
            CourseField::Thumbnail => self.draft.thumbnail = text,
            CourseField::Level => {
                self.draft.level = Level::from_str(&text).map_err(AppError::BadRequest)?
            }
            CourseField::IsPublished => {
                self.draft.is_published = coerce_checkbox(FieldValue::Text(text))?
            }
        }
        Ok(())
    }

    pub fn set_thumbnail(&mut self, url: impl Into<String>) {
        self.draft.thumbnail = url.into();
    }

    pub fn add_batch(&mut self) {
        let next = self.draft.batches.len() + 1;
        self.draft.batches.push(Batch::numbered(next));
    }

    /// Remove a batch. The last remaining batch is never removed.
    pub fn remove_batch(&mut self, index: usize) -> bool {
        if self.draft.batches.len() <= 1 || index >= self.draft.batches.len() {
            return false;
        }
        self.draft.batches.remove(index);
        true
    }

    pub fn update_batch(&mut self, index: usize, field: BatchField, value: &str) -> AppResult<()> {
        let batch = self
            .draft
            .batches
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound(format!("No batch at position {}", index + 1)))?;

        match field {
            BatchField::Name => batch.name = value.to_string(),
            BatchField::StartDate => batch.start_date = Self::parse_batch_date(value)?,
            BatchField::EndDate => batch.end_date = Self::parse_batch_date(value)?,
            BatchField::MaxStudents => {
                batch.max_students = value
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        AppError::Validation(
                            "Max students must be a whole number of at least 1".to_string(),
                        )
                    })?;
            }
        }
        Ok(())
    }

    fn parse_batch_date(value: &str) -> AppResult<Option<chrono::NaiveDate>> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        date::parse_date(value)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Invalid date: {}", value)))
    }

    /// Seed the form from a stored course for editing.
    pub fn load_from_existing(&mut self, course: &Course) {
        self.draft = CourseDraft::from(course);
        self.mode = FormMode::Edit {
            course_id: course.id.clone(),
        };
        self.idempotency_key = cuid2::create_id();
    }

    /// Replace the whole draft (e.g. one read from a file), keeping the current mode.
    pub fn replace_draft(&mut self, mut draft: CourseDraft) {
        if draft.batches.is_empty() {
            draft.batches.push(Batch::numbered(1));
        }
        self.draft = draft;
    }

    pub fn reset(&mut self) {
        self.draft = CourseDraft::default();
        self.mode = FormMode::Create;
        self.idempotency_key = cuid2::create_id();
    }

    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = match self.draft.validate() {
            Ok(()) => Vec::new(),
            Err(e) => validation::messages(&e),
        };

        if self.draft.parsed_price().is_none() {
            errors.push("Price must be a number of at least 0".to_string());
        }

        // Edit mode may keep the stored thumbnail, which can be empty on old records.
        if self.mode == FormMode::Create && self.draft.thumbnail.trim().is_empty() {
            errors.push("Course thumbnail is required".to_string());
        }

        errors.sort();
        errors
    }

    pub fn validate_for_submit(&self) -> bool {
        self.validation_errors().is_empty()
    }

    pub fn can_submit(&self, upload_in_flight: bool) -> bool {
        !upload_in_flight && self.validate_for_submit()
    }

    pub fn to_payload(&self) -> AppResult<CoursePayload> {
        let errors = self.validation_errors();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors.join("; ")));
        }

        let price = self
            .draft
            .parsed_price()
            .ok_or_else(|| AppError::Validation("Price must be a number of at least 0".to_string()))?;

        Ok(CoursePayload::from_draft(&self.draft, price))
    }
}
