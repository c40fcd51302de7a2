//! Domain entity definitions.

mod content;
mod error_record;
mod page;
mod session;
mod token;
mod upload;
mod user;

pub use content::{
    BlogCategory, ContactMessage, DashboardStats, Experience, NewsletterSubscriber, Post, Profile,
    Program, Project, ProjectCategory, Resource, Service, Tag, Testimonial,
};
pub use error_record::ErrorRecord;
pub use page::{ListQuery, Page, PageMeta};
pub use session::{AuthSession, Credentials, PasswordChange, Session};
pub use token::{AuthToken, TokenPair};
pub use upload::{LocalFile, UploadKind, UploadedFile};
pub use user::{Role, SessionUser};
