//! Content endpoints.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, info};

use super::client::ApiClient;
use super::request::ApiRequest;
use crate::domain::entities::{
    BlogCategory, ContactMessage, DashboardStats, Experience, ListQuery, NewsletterSubscriber,
    Page, Post, Profile, Program, Project, ProjectCategory, Resource, Service, Tag, Testimonial,
};
use crate::domain::errors::ApiError;

fn reject_missing(name: &str, missing: &[&'static str]) -> Result<(), ApiError> {
    if missing.is_empty() {
        return Ok(());
    }
    Err(ApiError::validation(format!(
        "{name}: missing required fields: {}",
        missing.join(", ")
    )))
}

fn item_path(base: &str, id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') {
        return Err(ApiError::validation(format!("invalid id: {id:?}")));
    }
    Ok(format!("{base}/{id}"))
}

/// CRUD access to one collection.
pub struct ResourceApi<R> {
    client: Arc<ApiClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceApi<R> {
    /// Wraps `client`.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    /// Fetches one page.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<R>, ApiError> {
        debug!(resource = R::NAME, query = ?query, "Listing");
        self.client
            .page(ApiRequest::get(R::PATH).query(query.to_pairs()))
            .await
    }

    /// # Errors
    /// Returns error if the id is invalid or the request fails.
    pub async fn get(&self, id: &str) -> Result<R, ApiError> {
        self.client
            .data(ApiRequest::get(item_path(R::PATH, id)?))
            .await
    }

    /// Creates a record after checking required fields.
    ///
    /// # Errors
    /// Returns validation error without a request when required fields are empty.
    pub async fn create(&self, item: &R) -> Result<R, ApiError> {
        reject_missing(R::NAME, &item.missing_fields())?;
        let created: R = self
            .client
            .data(ApiRequest::post(R::PATH).json(item)?)
            .await?;
        info!(resource = R::NAME, id = created.id(), "Created");
        Ok(created)
    }

    /// Replaces a record after checking required fields.
    ///
    /// # Errors
    /// Returns validation error without a request when required fields are empty.
    pub async fn update(&self, id: &str, item: &R) -> Result<R, ApiError> {
        reject_missing(R::NAME, &item.missing_fields())?;
        let path = item_path(R::PATH, id)?;
        let updated = self.client.data(ApiRequest::put(path).json(item)?).await?;
        info!(resource = R::NAME, id, "Updated");
        Ok(updated)
    }

    /// # Errors
    /// Returns error if the id is invalid or the request fails.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .send(ApiRequest::delete(item_path(R::PATH, id)?))
            .await?;
        info!(resource = R::NAME, id, "Deleted");
        Ok(())
    }
}

/// Every content endpoint behind one handle.
pub struct ContentApi {
    client: Arc<ApiClient>,
}

impl ContentApi {
    /// Wraps `client`.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Typed API for any collection.
    #[must_use]
    pub fn resource<R: Resource>(&self) -> ResourceApi<R> {
        ResourceApi::new(Arc::clone(&self.client))
    }

    /// Blog posts.
    #[must_use]
    pub fn posts(&self) -> ResourceApi<Post> {
        self.resource()
    }

    /// Blog categories.
    #[must_use]
    pub fn blog_categories(&self) -> ResourceApi<BlogCategory> {
        self.resource()
    }

    /// Blog tags.
    #[must_use]
    pub fn tags(&self) -> ResourceApi<Tag> {
        self.resource()
    }

    /// Portfolio projects.
    #[must_use]
    pub fn projects(&self) -> ResourceApi<Project> {
        self.resource()
    }

    /// Project categories.
    #[must_use]
    pub fn project_categories(&self) -> ResourceApi<ProjectCategory> {
        self.resource()
    }

    /// Offered services.
    #[must_use]
    pub fn services(&self) -> ResourceApi<Service> {
        self.resource()
    }

    /// Client testimonials.
    #[must_use]
    pub fn testimonials(&self) -> ResourceApi<Testimonial> {
        self.resource()
    }

    /// Programs and skills.
    #[must_use]
    pub fn programs(&self) -> ResourceApi<Program> {
        self.resource()
    }

    /// Work experience.
    #[must_use]
    pub fn experiences(&self) -> ResourceApi<Experience> {
        self.resource()
    }

    /// Newsletter subscribers.
    #[must_use]
    pub fn subscribers(&self) -> ResourceApi<NewsletterSubscriber> {
        self.resource()
    }

    /// Contact form messages.
    #[must_use]
    pub fn messages(&self) -> ResourceApi<ContactMessage> {
        self.resource()
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.client.data(ApiRequest::get("/profile")).await
    }

    /// # Errors
    /// Returns validation error without a request when the name is empty.
    pub async fn update_profile(&self, profile: &Profile) -> Result<Profile, ApiError> {
        reject_missing("profile", &profile.missing_fields())?;
        self.client
            .data(ApiRequest::put("/profile").json(profile)?)
            .await
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.client.data(ApiRequest::get("/stats/dashboard")).await
    }

    /// # Errors
    /// Returns error if the id is invalid or the request fails.
    pub async fn mark_message_read(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/read", item_path(ContactMessage::PATH, id)?);
        self.client.send(ApiRequest::patch(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path() {
        assert_eq!(item_path("/projects", " 7 ").unwrap(), "/projects/7");
        assert!(item_path("/projects", "").is_err());
        assert!(item_path("/projects", "../admin").is_err());
    }

    #[test]
    fn test_reject_missing_lists_fields() {
        let err = reject_missing("posts", &["title", "content"]).unwrap_err();
        assert_eq!(
            err,
            ApiError::validation("posts: missing required fields: title, content")
        );
        assert!(reject_missing("posts", &[]).is_ok());
    }
}
