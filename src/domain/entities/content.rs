//! Content entities mirrored from the API.
//!
//! The server owns these records; the client only keeps transient copies for
//! display and editing. Fields the client does not model are kept in `extra`
//! so an edit round trip does not drop them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

type Extra = Map<String, Value>;

/// A CRUD collection exposed by the API.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection path relative to the API base URL.
    const PATH: &'static str;
    /// Human-readable collection name.
    const NAME: &'static str;
    /// Column headers for tabular output.
    const COLUMNS: &'static [&'static str];

    /// Server-assigned identifier, absent on drafts.
    fn id(&self) -> Option<&str>;

    /// Cells matching [`Self::COLUMNS`].
    fn row(&self) -> Vec<String>;

    /// Names of required fields that are empty.
    fn missing_fields(&self) -> Vec<&'static str>;
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn required(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|(_, is_blank)| *is_blank)
        .map(|(name, _)| *name)
        .collect()
}

fn date_cell(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string())
}

fn flag_cell(value: bool) -> String {
    if value { "✓".into() } else { String::new() }
}

/// Blog post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Display title.
    pub title: String,
    /// URL slug, derived by the server when empty.
    #[serde(default)]
    pub slug: String,
    /// Short summary for listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Publication state such as `draft` or `published`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Owning category id.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub category_id: Option<String>,
    /// Attached tags as returned by the server.
    #[serde(default)]
    pub tags: Vec<Value>,
    /// Publication time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Creation time, read-only.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for Post {
    const PATH: &'static str = "/blog/posts";
    const NAME: &'static str = "posts";
    const COLUMNS: &'static [&'static str] = &["id", "title", "status", "published"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            self.title.clone(),
            self.status.clone().unwrap_or_default(),
            date_cell(self.published_at.as_ref()),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[("title", blank(&self.title)), ("content", blank(&self.content))])
    }
}

/// Blog category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogCategory {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// URL slug, derived by the server when empty.
    #[serde(default)]
    pub slug: String,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for BlogCategory {
    const PATH: &'static str = "/blog/categories";
    const NAME: &'static str = "blog categories";
    const COLUMNS: &'static [&'static str] = &["id", "name", "slug"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            self.name.clone(),
            self.slug.clone(),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[("name", blank(&self.name))])
    }
}

/// Blog tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// URL slug, derived by the server when empty.
    #[serde(default)]
    pub slug: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for Tag {
    const PATH: &'static str = "/blog/tags";
    const NAME: &'static str = "tags";
    const COLUMNS: &'static [&'static str] = &["id", "name", "slug"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            self.name.clone(),
            self.slug.clone(),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[("name", blank(&self.name))])
    }
}

/// Portfolio project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Project name.
    pub title: String,
    /// URL slug, derived by the server when empty.
    #[serde(default)]
    pub slug: String,
    /// Project summary.
    #[serde(default)]
    pub description: String,
    /// Main image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Owning category id.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub category_id: Option<String>,
    /// Technology labels.
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Deployed site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    /// Source repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    /// Shown on the home page.
    #[serde(default)]
    pub featured: bool,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for Project {
    const PATH: &'static str = "/projects";
    const NAME: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &["id", "title", "technologies", "featured"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            self.title.clone(),
            self.technologies.join(", "),
            flag_cell(self.featured),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("title", blank(&self.title)),
            ("description", blank(&self.description)),
        ])
    }
}

/// Project category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCategory {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// URL slug, derived by the server when empty.
    #[serde(default)]
    pub slug: String,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for ProjectCategory {
    const PATH: &'static str = "/projects/categories";
    const NAME: &'static str = "project categories";
    const COLUMNS: &'static [&'static str] = &["id", "name", "slug"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            self.name.clone(),
            self.slug.clone(),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[("name", blank(&self.name))])
    }
}

/// Offered service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Display title.
    pub title: String,
    /// Service description.
    #[serde(default)]
    pub description: String,
    /// Icon name or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Bullet points.
    #[serde(default)]
    pub features: Vec<String>,
    /// Sort position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for Service {
    const PATH: &'static str = "/services";
    const NAME: &'static str = "services";
    const COLUMNS: &'static [&'static str] = &["id", "title", "order"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            self.title.clone(),
            self.order.map(|o| o.to_string()).unwrap_or_default(),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("title", blank(&self.title)),
            ("description", blank(&self.description)),
        ])
    }
}

/// Client testimonial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Author name.
    pub name: String,
    /// Job title of the author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Quote.
    #[serde(default)]
    pub content: String,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Star rating out of five.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for Testimonial {
    const PATH: &'static str = "/testimonials";
    const NAME: &'static str = "testimonials";
    const COLUMNS: &'static [&'static str] = &["id", "name", "company", "rating"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            self.name.clone(),
            self.company.clone().unwrap_or_default(),
            self.rating.map(|r| "★".repeat(usize::from(r))).unwrap_or_default(),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[("name", blank(&self.name)), ("content", blank(&self.content))])
    }
}

/// Tool or program listed on the "used programs" section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Program or skill name.
    pub name: String,
    /// Icon name or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Grouping label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Skill level in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proficiency: Option<u8>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for Program {
    const PATH: &'static str = "/used-programs";
    const NAME: &'static str = "programs";
    const COLUMNS: &'static [&'static str] = &["id", "name", "category", "proficiency"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            self.name.clone(),
            self.category.clone().unwrap_or_default(),
            self.proficiency.map(|p| format!("{p}%")).unwrap_or_default(),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[("name", blank(&self.name))])
    }
}

/// Work experience entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Role held.
    pub title: String,
    /// Company name.
    #[serde(default)]
    pub company: String,
    /// City or country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Start date as sent by the server.
    #[serde(default)]
    pub start_date: String,
    /// End date, absent while ongoing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Still ongoing.
    #[serde(default)]
    pub current: bool,
    /// What the role involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for Experience {
    const PATH: &'static str = "/experiences";
    const NAME: &'static str = "experiences";
    const COLUMNS: &'static [&'static str] = &["id", "title", "company", "period"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        let end = if self.current {
            "الآن".to_string()
        } else {
            self.end_date.clone().unwrap_or_default()
        };
        vec![
            self.id.clone().unwrap_or_default(),
            self.title.clone(),
            self.company.clone(),
            format!("{} - {end}", self.start_date),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("title", blank(&self.title)),
            ("company", blank(&self.company)),
            ("startDate", blank(&self.start_date)),
        ])
    }
}

/// Newsletter subscriber.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscriber {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Email address.
    pub email: String,
    /// Subscriber name, when given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Publication state such as `draft` or `published`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Subscription time.
    #[serde(default, skip_serializing)]
    pub subscribed_at: Option<DateTime<Utc>>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for NewsletterSubscriber {
    const PATH: &'static str = "/newsletter/subscribers";
    const NAME: &'static str = "subscribers";
    const COLUMNS: &'static [&'static str] = &["id", "email", "status", "since"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            self.email.clone(),
            self.status.clone().unwrap_or_default(),
            date_cell(self.subscribed_at.as_ref()),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[("email", blank(&self.email))])
    }
}

/// Message submitted through the public contact form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    /// Server id, absent until created.
    #[serde(
        default,
        skip_serializing,
        deserialize_with = "crate::domain::serde_utils::string_or_number::option::deserialize"
    )]
    pub id: Option<String>,
    /// Sender name.
    pub name: String,
    /// Sender address.
    #[serde(default)]
    pub email: String,
    /// Message subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Message body.
    #[serde(default)]
    pub message: String,
    /// Marked read by an admin.
    #[serde(default, alias = "read")]
    pub is_read: bool,
    /// Creation time, read-only.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for ContactMessage {
    const PATH: &'static str = "/contact/messages";
    const NAME: &'static str = "messages";
    const COLUMNS: &'static [&'static str] = &["id", "from", "subject", "received", "read"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone().unwrap_or_default(),
            format!("{} <{}>", self.name, self.email),
            self.subject.clone().unwrap_or_default(),
            date_cell(self.created_at.as_ref()),
            flag_cell(self.is_read),
        ]
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("name", blank(&self.name)),
            ("email", blank(&self.email)),
            ("message", blank(&self.message)),
        ])
    }
}

/// Site owner profile, a singleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Full name.
    pub name: String,
    /// Headline shown under the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Portrait URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Public contact address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// City or country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Network name to profile URL.
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Profile {
    /// Names of required fields that are empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        required(&[("name", blank(&self.name))])
    }
}

/// Counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Blog posts.
    #[serde(default)]
    pub posts: u64,
    /// Projects.
    #[serde(default)]
    pub projects: u64,
    /// Services.
    #[serde(default)]
    pub services: u64,
    /// Testimonials.
    #[serde(default)]
    pub testimonials: u64,
    /// Newsletter subscribers.
    #[serde(default)]
    pub subscribers: u64,
    /// Contact messages.
    #[serde(default)]
    pub messages: u64,
    /// Contact messages not yet read.
    #[serde(default)]
    pub unread_messages: u64,
}

impl DashboardStats {
    /// Label and value pairs in display order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, u64); 7] {
        [
            ("المقالات", self.posts),
            ("المشاريع", self.projects),
            ("الخدمات", self.services),
            ("آراء العملاء", self.testimonials),
            ("المشتركون", self.subscribers),
            ("الرسائل", self.messages),
            ("رسائل غير مقروءة", self.unread_messages),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_preserves_unknown_fields() {
        let json = r#"{
            "id": 12,
            "title": "مرحبا",
            "content": "نص",
            "titleEn": "Hello",
            "tags": [{"id": 1, "name": "rust"}],
            "publishedAt": "2024-03-01T10:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();

        assert_eq!(post.id(), Some("12"));
        assert_eq!(post.extra.get("titleEn"), Some(&Value::from("Hello")));

        let out = serde_json::to_value(&post).unwrap();
        assert_eq!(out["titleEn"], "Hello");
        assert!(out.get("id").is_none());
    }

    #[test]
    fn test_post_required_fields() {
        let post = Post {
            title: "عنوان".into(),
            ..Post::default()
        };
        assert_eq!(post.missing_fields(), vec!["content"]);
    }

    #[test]
    fn test_contact_message_read_alias() {
        let json = r#"{"id": "m1", "name": "سارة", "email": "s@x.io", "message": "hi", "read": true}"#;
        let msg: ContactMessage = serde_json::from_str(json).unwrap();

        assert!(msg.is_read);
        assert_eq!(msg.row()[1], "سارة <s@x.io>");
    }

    #[test]
    fn test_experience_current_period() {
        let exp = Experience {
            title: "Engineer".into(),
            company: "Acme".into(),
            start_date: "2021-01".into(),
            current: true,
            ..Experience::default()
        };
        assert_eq!(exp.row()[3], "2021-01 - الآن");
        assert!(exp.missing_fields().is_empty());
    }

    #[test]
    fn test_rows_match_columns() {
        assert_eq!(Post::default().row().len(), Post::COLUMNS.len());
        assert_eq!(Project::default().row().len(), Project::COLUMNS.len());
        assert_eq!(ContactMessage::default().row().len(), ContactMessage::COLUMNS.len());
        assert_eq!(Testimonial::default().row().len(), Testimonial::COLUMNS.len());
    }

    #[test]
    fn test_dashboard_stats_defaults() {
        let stats: DashboardStats = serde_json::from_str(r#"{"posts": 3}"#).unwrap();
        assert_eq!(stats.entries()[0], ("المقالات", 3));
        assert_eq!(stats.unread_messages, 0);
    }
}
