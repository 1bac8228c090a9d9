use std::collections::HashSet;

use crate::models::course_model::{Course, CourseStats};
use crate::models::filter_model::{CatalogVariant, FilterCriteria, SortBy};
use crate::models::paging::{CatalogPage, PaginationMeta, PaginationParams};

/// Search, filter, sort and paginate an already-fetched course list.
pub struct CatalogService;

impl CatalogService {
    pub fn apply(
        courses: &[Course],
        criteria: &FilterCriteria,
        variant: CatalogVariant,
        params: PaginationParams,
    ) -> CatalogPage<Course> {
        let needle = criteria.search_term.to_lowercase();

        let mut filtered: Vec<&Course> = courses
            .iter()
            .filter(|course| Self::matches_search(course, &needle, variant))
            .filter(|course| criteria.category.matches(&course.category))
            .filter(|course| criteria.instructor.matches(&course.instructor))
            .filter(|course| {
                variant == CatalogVariant::Admin || criteria.level.matches(course.level.as_str())
            })
            .collect();

        if variant == CatalogVariant::Public {
            Self::sort(&mut filtered, criteria.sort_by);
        }

        let pagination = PaginationMeta::new(params.page, params.limit, filtered.len());
        let items = if params.limit == 0 {
            Vec::new()
        } else {
            filtered
                .into_iter()
                .skip(params.skip())
                .take(params.take())
                .cloned()
                .collect()
        };

        CatalogPage::new(items, pagination)
    }

    fn matches_search(course: &Course, needle: &str, variant: CatalogVariant) -> bool {
        if needle.is_empty() {
            return true;
        }

        let contains = |text: &str| text.to_lowercase().contains(needle);

        contains(course.title.as_str())
            || course.description.as_deref().is_some_and(contains)
            || (variant == CatalogVariant::Public && contains(course.instructor.as_str()))
    }

    fn sort(courses: &mut [&Course], sort_by: SortBy) {
        match sort_by {
            SortBy::Newest => courses.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortBy::PriceLow => courses.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortBy::PriceHigh => courses.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortBy::Popular => courses.sort_by(|a, b| b.batches.len().cmp(&a.batches.len())),
        }
    }

    /// The first `limit` published courses, in fetch order.
    pub fn featured(courses: &[Course], limit: usize) -> Vec<Course> {
        courses
            .iter()
            .filter(|c| c.is_published)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Distinct non-empty categories, in the order they first appear.
    pub fn unique_categories(courses: &[Course]) -> Vec<String> {
        let mut seen = HashSet::new();
        courses
            .iter()
            .map(|c| c.category.as_str())
            .filter(|c| !c.is_empty() && seen.insert(*c))
            .map(str::to_string)
            .collect()
    }

    pub fn stats(courses: &[Course]) -> CourseStats {
        courses.iter().fold(
            CourseStats {
                total: courses.len(),
                ..CourseStats::default()
            },
            |mut stats, course| {
                let enrolled = course.enrolled_students();
                if course.is_published {
                    stats.published += 1;
                }
                stats.total_students += enrolled;
                stats.total_revenue += enrolled as f64 * course.price;
                stats
            },
        )
    }
}
