#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use course_catalog::errors::{AppError, AppResult};
use course_catalog::models::course_model::{Batch, Course, CoursePayload, Level};
use course_catalog::models::filter_model::FilterOptions;
use course_catalog::models::upload_model::SelectedFile;
use course_catalog::services::course_service::CourseApi;
use course_catalog::services::storage_service::ImageHost;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn course(id: &str, title: &str, instructor: &str, category: &str, price: f64) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        instructor: instructor.to_string(),
        price,
        category: category.to_string(),
        syllabus: "Week 1".to_string(),
        duration: None,
        level: Level::Beginner,
        thumbnail: format!("https://img.example.com/{}.png", id),
        batches: vec![Batch::numbered(1)],
        is_published: true,
        created_at: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
    }
}

/// Seven courses, created one day apart in id order ("c1" oldest).
pub fn sample_courses() -> Vec<Course> {
    let specs = [
        ("c1", "Intro to React", "Ada Lovelace", "Web", 40.0, Level::Beginner),
        ("c2", "Advanced React Patterns", "Grace Hopper", "Web", 120.0, Level::Advanced),
        ("c3", "Rust Fundamentals", "Ferris Crab", "Systems", 80.0, Level::Beginner),
        ("c4", "Async Rust", "Ferris Crab", "Systems", 150.0, Level::Advanced),
        ("c5", "UI Design Basics", "Ada Lovelace", "Design", 20.0, Level::Beginner),
        ("c6", "Data Modeling", "Edgar Codd", "Data", 60.0, Level::Intermediate),
        ("c7", "SQL in Practice", "Edgar Codd", "Data", 60.0, Level::Intermediate),
    ];

    specs
        .iter()
        .enumerate()
        .map(|(i, (id, title, instructor, category, price, level))| {
            let mut c = course(id, title, instructor, category, *price);
            c.level = *level;
            c.created_at = c.created_at.map(|t| t + Duration::days(i as i64));
            c
        })
        .collect()
}

pub fn png(name: &str, size: usize) -> SelectedFile {
    SelectedFile::new(name, "image/png", vec![0u8; size])
}

/// Course API kept in memory, counting the calls it receives.
#[derive(Default)]
pub struct InMemoryCourses {
    pub courses: Mutex<Vec<Course>>,
    pub list_calls: AtomicUsize,
    pub keys: Mutex<Vec<String>>,
    pub fail_mutations: AtomicBool,
    pub fail_list: AtomicBool,
    /// Store mutations but reply without the saved course.
    pub quiet_mutations: AtomicBool,
}

impl InMemoryCourses {
    pub fn with(courses: Vec<Course>) -> Self {
        Self {
            courses: Mutex::new(courses),
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Course> {
        self.courses.lock().unwrap().clone()
    }

    fn check_mutation(&self, fallback: &str) -> AppResult<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(AppError::Api {
                status: 500,
                message: fallback.to_string(),
            });
        }
        Ok(())
    }

    fn reply(&self, course: Course) -> Option<Course> {
        if self.quiet_mutations.load(Ordering::SeqCst) {
            return None;
        }
        Some(course)
    }

    fn record_key(&self, key: Option<&str>) {
        if let Some(key) = key {
            self.keys.lock().unwrap().push(key.to_string());
        }
    }

    fn apply(id: &str, payload: &CoursePayload) -> Course {
        Course {
            id: id.to_string(),
            title: payload.title.clone(),
            description: payload.description.clone(),
            instructor: payload.instructor.clone(),
            price: payload.price,
            category: payload.category.clone(),
            syllabus: payload.syllabus.clone(),
            duration: payload.duration.clone(),
            level: payload.level,
            thumbnail: payload.thumbnail.clone(),
            batches: payload.batches.clone(),
            is_published: payload.is_published,
            created_at: Some(Utc::now()),
        }
    }
}

#[async_trait]
impl CourseApi for InMemoryCourses {
    async fn list_courses(&self) -> AppResult<Vec<Course>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(AppError::Api {
                status: 500,
                message: "Failed to load courses".to_string(),
            });
        }
        Ok(self.snapshot())
    }

    async fn filter_options(&self) -> AppResult<FilterOptions> {
        let courses = self.snapshot();
        let mut categories: Vec<String> = courses.iter().map(|c| c.category.clone()).collect();
        let mut instructors: Vec<String> = courses.iter().map(|c| c.instructor.clone()).collect();
        categories.sort();
        categories.dedup();
        instructors.sort();
        instructors.dedup();
        Ok(FilterOptions {
            categories,
            instructors,
        })
    }

    async fn get_course(&self, id: &str) -> AppResult<Course> {
        self.snapshot()
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }

    async fn create_course(
        &self,
        payload: &CoursePayload,
        idempotency_key: Option<&str>,
    ) -> AppResult<Option<Course>> {
        self.check_mutation("Failed to create course")?;
        self.record_key(idempotency_key);

        let mut courses = self.courses.lock().unwrap();
        let course = Self::apply(&format!("new{}", courses.len() + 1), payload);
        courses.push(course.clone());
        Ok(self.reply(course))
    }

    async fn update_course(
        &self,
        id: &str,
        payload: &CoursePayload,
        idempotency_key: Option<&str>,
    ) -> AppResult<Option<Course>> {
        self.check_mutation("Failed to update course")?;
        self.record_key(idempotency_key);

        let mut courses = self.courses.lock().unwrap();
        let slot = courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
        let created_at = slot.created_at;
        *slot = Self::apply(id, payload);
        slot.created_at = created_at;
        Ok(self.reply(slot.clone()))
    }

    async fn delete_course(&self, id: &str) -> AppResult<()> {
        self.check_mutation("Failed to delete course")?;
        self.courses.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

/// Image host that answers after `delay`, or fails when told to.
pub struct FakeImageHost {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub delay: std::time::Duration,
}

impl FakeImageHost {
    pub fn new() -> Self {
        Self::with_delay(std::time::Duration::ZERO)
    }

    pub fn with_delay(delay: std::time::Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            delay,
        }
    }

    pub fn failing() -> Self {
        let host = Self::new();
        host.fail.store(true, Ordering::SeqCst);
        host
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload_image(&self, file: &SelectedFile) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Api {
                status: 502,
                message: "Upload failed".to_string(),
            });
        }
        Ok(format!("https://img.example.com/uploads/{}", file.file_name))
    }
}
