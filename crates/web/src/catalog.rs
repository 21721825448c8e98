use async_trait::async_trait;
use storage::dto::catalog::CatalogCourse;
use storage::error::{StatsError, StatsResult};
use storage::services::rounds::CourseCatalog;

/// Course catalog reached over HTTP at `{base_url}/courses`.
pub struct HttpCourseCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCourseCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CourseCatalog for HttpCourseCatalog {
    async fn fetch_course(&self, course_id: i64) -> StatsResult<CatalogCourse> {
        let url = format!("{}/courses/{}", self.base_url, course_id);
        tracing::debug!(%url, "Fetching course from catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| StatsError::Catalog(e.to_string()))?;

        response
            .json::<CatalogCourse>()
            .await
            .map_err(|e| StatsError::Catalog(e.to_string()))
    }

    async fn search_courses(&self, name: Option<&str>) -> StatsResult<Vec<CatalogCourse>> {
        let url = format!("{}/courses", self.base_url);
        tracing::debug!(%url, ?name, "Searching catalog courses");

        let mut request = self.client.get(&url);
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            request = request.query(&[("name", name)]);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| StatsError::Catalog(e.to_string()))?;

        response
            .json::<Vec<CatalogCourse>>()
            .await
            .map_err(|e| StatsError::Catalog(e.to_string()))
    }
}
