//! Paths of the remote course API, relative to `API_BASE_URL`.

#[derive(Debug, Clone)]
pub struct ApiRoutes {
    base: String,
}

impl ApiRoutes {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn courses(&self) -> String {
        format!("{}/courses", self.base)
    }

    pub fn course(&self, id: &str) -> String {
        format!("{}/courses/{}", self.base, id)
    }

    pub fn course_filters(&self) -> String {
        format!("{}/courses/filters/all", self.base)
    }

    pub fn current_user(&self) -> String {
        format!("{}/users/me", self.base)
    }

    pub fn logout(&self) -> String {
        format!("{}/users/logout", self.base)
    }
}
