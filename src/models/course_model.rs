use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::utils::date;
use crate::utils::validation::non_blank;

pub const DEFAULT_MAX_STUDENTS: u32 = 30;
const FEW_SEATS_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown level: {}", s))
    }
}

/// A scheduled cohort of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "date::lenient")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "date::lenient")]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_max_students")]
    pub max_students: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_students: Option<u32>,
}

fn default_max_students() -> u32 {
    DEFAULT_MAX_STUDENTS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAvailability {
    Full,
    FewLeft(u32),
    Available(u32),
}

impl fmt::Display for BatchAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchAvailability::Full => f.write_str("Full"),
            BatchAvailability::FewLeft(n) => write!(f, "{} seats left", n),
            BatchAvailability::Available(n) => write!(f, "{} seats available", n),
        }
    }
}

impl Batch {
    pub fn numbered(n: usize) -> Self {
        Self {
            name: format!("Batch {}", n),
            start_date: None,
            end_date: None,
            max_students: DEFAULT_MAX_STUDENTS,
            current_students: None,
        }
    }

    /// Seat count used for display; a zero capacity from the API means the default.
    pub fn capacity(&self) -> u32 {
        if self.max_students == 0 {
            DEFAULT_MAX_STUDENTS
        } else {
            self.max_students
        }
    }

    pub fn enrolled(&self) -> u32 {
        self.current_students.unwrap_or(0)
    }

    pub fn availability(&self) -> BatchAvailability {
        let available = self.capacity().saturating_sub(self.enrolled());
        match available {
            0 => BatchAvailability::Full,
            n if n <= FEW_SEATS_THRESHOLD => BatchAvailability::FewLeft(n),
            n => BatchAvailability::Available(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub instructor: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub syllabus: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub is_published: bool,
    /// Missing on some old records; those sort after every dated course.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Course {
    pub fn enrolled_students(&self) -> u64 {
        self.batches.iter().map(|b| u64::from(b.enrolled())).sum()
    }

    /// Earliest batch start on or after `today`.
    pub fn upcoming_batch_start(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.batches
            .iter()
            .filter_map(|b| b.start_date)
            .filter(|start| *start >= today)
            .min()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseStats {
    pub total: usize,
    pub published: usize,
    pub total_students: u64,
    pub total_revenue: f64,
}

/// In-progress form state for a course. Text inputs stay raw until submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    #[serde(default)]
    #[validate(custom(function = non_blank, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = non_blank, message = "Instructor is required"))]
    pub instructor: String,
    #[serde(default, deserialize_with = "price_text")]
    pub price: String,
    #[serde(default)]
    #[validate(custom(function = non_blank, message = "Category is required"))]
    pub category: String,
    #[serde(default)]
    #[validate(custom(function = non_blank, message = "Syllabus is required"))]
    pub syllabus: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default = "initial_batches")]
    #[validate(length(min = 1, message = "At least one batch is required"))]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub is_published: bool,
}

fn initial_batches() -> Vec<Batch> {
    vec![Batch::numbered(1)]
}

fn price_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Text(String),
        Number(f64),
    }

    Ok(match Option::<RawPrice>::deserialize(deserializer)? {
        Some(RawPrice::Text(text)) => text,
        Some(RawPrice::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            instructor: String::new(),
            price: String::new(),
            category: String::new(),
            syllabus: String::new(),
            duration: String::new(),
            level: Level::Beginner,
            thumbnail: String::new(),
            batches: initial_batches(),
            is_published: false,
        }
    }
}

impl From<&Course> for CourseDraft {
    fn from(course: &Course) -> Self {
        let batches = if course.batches.is_empty() {
            initial_batches()
        } else {
            course.batches.clone()
        };

        Self {
            title: course.title.clone(),
            description: course.description.clone().unwrap_or_default(),
            instructor: course.instructor.clone(),
            price: course.price.to_string(),
            category: course.category.clone(),
            syllabus: course.syllabus.clone(),
            duration: course.duration.clone().unwrap_or_default(),
            level: course.level,
            thumbnail: course.thumbnail.clone(),
            batches,
            is_published: course.is_published,
        }
    }
}

impl CourseDraft {
    /// Parsed price, if the raw text is a finite non-negative number.
    pub fn parsed_price(&self) -> Option<f64> {
        self.price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
    }
}

/// Body of `POST /courses` and `PUT /courses/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub instructor: String,
    pub price: f64,
    pub category: String,
    pub syllabus: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub level: Level,
    pub thumbnail: String,
    pub batches: Vec<Batch>,
    pub is_published: bool,
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CoursePayload {
    pub fn from_draft(draft: &CourseDraft, price: f64) -> Self {
        Self {
            title: draft.title.trim().to_string(),
            description: non_empty(&draft.description),
            instructor: draft.instructor.trim().to_string(),
            price,
            category: draft.category.trim().to_string(),
            syllabus: draft.syllabus.clone(),
            duration: non_empty(&draft.duration),
            level: draft.level,
            thumbnail: draft.thumbnail.clone(),
            batches: draft.batches.clone(),
            is_published: draft.is_published,
        }
    }
}
