//! Command handlers for the back-office CLI.

use std::io::{BufRead, Write};
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::application::dto::{UploadState, UploadStatus};
use crate::application::services::UploadPolicy;
use crate::domain::entities::{
    Credentials, ListQuery, LocalFile, PasswordChange, Profile, Resource, UploadKind,
};
use crate::domain::errors::ApiError;
use crate::infrastructure::api::ResourceApi;
use crate::infrastructure::config::{Command, Payload, ResourceKind};
use crate::presentation::ui::App;
use crate::presentation::ui::table::{render_page_meta, render_pairs, render_table};

/// Runs `$body` with `$api` bound to the typed API for `$kind`.
macro_rules! with_resource {
    ($app:expr, $kind:expr, |$api:ident| $body:expr) => {
        match $kind {
            ResourceKind::Posts => {
                let $api = $app.content.posts();
                $body
            }
            ResourceKind::BlogCategories => {
                let $api = $app.content.blog_categories();
                $body
            }
            ResourceKind::Tags => {
                let $api = $app.content.tags();
                $body
            }
            ResourceKind::Projects => {
                let $api = $app.content.projects();
                $body
            }
            ResourceKind::ProjectCategories => {
                let $api = $app.content.project_categories();
                $body
            }
            ResourceKind::Services => {
                let $api = $app.content.services();
                $body
            }
            ResourceKind::Testimonials => {
                let $api = $app.content.testimonials();
                $body
            }
            ResourceKind::Programs => {
                let $api = $app.content.programs();
                $body
            }
            ResourceKind::Experiences => {
                let $api = $app.content.experiences();
                $body
            }
            ResourceKind::Subscribers => {
                let $api = $app.content.subscribers();
                $body
            }
            ResourceKind::Messages => {
                let $api = $app.content.messages();
                $body
            }
        }
    };
}

pub(crate) async fn dispatch(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => login(app, email, password).await,
        Command::Logout => {
            app.session.logout().await?;
            app.toasts.success("تم تسجيل الخروج");
            Ok(())
        }
        Command::Whoami => {
            let user = app.session.fetch_current_user().await?;
            println!(
                "{}",
                render_pairs(&[
                    ("الاسم", user.display_name().to_string()),
                    ("البريد", user.email().to_string()),
                    ("الدور", user.role().to_string()),
                ])
            );
            Ok(())
        }
        Command::Refresh => {
            app.session.refresh().await?;
            app.toasts.success("تم تجديد الجلسة");
            Ok(())
        }
        Command::ChangePassword {
            current,
            new_password,
        } => {
            app.session
                .change_password(&PasswordChange::new(current, new_password))
                .await?;
            app.toasts.success("تم تغيير كلمة المرور");
            Ok(())
        }
        Command::Stats => {
            let stats = app.content.dashboard_stats().await?;
            println!("{}", render_pairs(&stats.entries()));
            Ok(())
        }
        Command::List {
            resource,
            page,
            limit,
            search,
            status,
        } => {
            let mut query = ListQuery::new().page(page).limit(limit);
            if let Some(search) = search {
                query = query.search(search);
            }
            if let Some(status) = status {
                query = query.status(status);
            }
            with_resource!(app, resource, |api| list(&api, &query).await)
        }
        Command::Show { resource, id } => {
            with_resource!(app, resource, |api| show(&api, &id).await)
        }
        Command::Create { resource, payload } => {
            let raw = read_payload(payload.data, payload.file.as_deref()).await?;
            with_resource!(app, resource, |api| create(app, &api, &raw).await)
        }
        Command::Update {
            resource,
            id,
            payload,
        } => {
            let Payload { data, file } = payload;
            let raw = read_payload(data, file.as_deref()).await?;
            with_resource!(app, resource, |api| update(app, &api, &id, &raw).await)
        }
        Command::Delete { resource, id } => {
            with_resource!(app, resource, |api| api.delete(&id).await)?;
            app.toasts.success("تم الحذف بنجاح");
            Ok(())
        }
        Command::MarkRead { id } => {
            app.content.mark_message_read(&id).await?;
            app.toasts.success("تم تعليم الرسالة كمقروءة");
            Ok(())
        }
        Command::Profile { data, file } => profile(app, data, file.as_deref()).await,
        Command::UploadImage { path } => upload(app, UploadKind::Image, &path).await,
        Command::UploadFile { path } => upload(app, UploadKind::File, &path).await,
        Command::ErrorLogs { clear } => error_logs(app, clear).await,
    }
}

async fn login(app: &App, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let user = app.session.login(&Credentials::new(email, password)).await?;
    app.toasts
        .success(format!("مرحباً {}", user.display_name()));
    Ok(())
}

fn prompt_password() -> Result<String> {
    eprint!("كلمة المرور: ");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .wrap_err("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn read_payload(data: Option<String>, file: Option<&Path>) -> Result<String> {
    match (data, file) {
        (Some(data), _) => Ok(data),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read {}", path.display())),
        (None, None) => Err(eyre!("either --data or --file is required")),
    }
}

fn parse<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).wrap_err("Payload is not a valid record")
}

async fn list<R: Resource>(api: &ResourceApi<R>, query: &ListQuery) -> Result<()> {
    let page = api.list(query).await?;
    let rows: Vec<Vec<String>> = page.items.iter().map(Resource::row).collect();

    println!("{}", render_table(R::COLUMNS, &rows));
    println!("{}", render_page_meta(page.meta.as_ref(), page.len()));
    Ok(())
}

async fn show<R: Resource>(api: &ResourceApi<R>, id: &str) -> Result<()> {
    let item = api.get(id).await?;
    println!("{}", render_pairs(&[("id", item.id().unwrap_or(id))]));
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}

async fn create<R: Resource>(app: &App, api: &ResourceApi<R>, raw: &str) -> Result<()> {
    let created = api.create(&parse::<R>(raw)?).await?;
    if let Some(id) = created.id() {
        println!("{id}");
    }
    app.toasts.success("تم الإنشاء بنجاح");
    Ok(())
}

async fn update<R: Resource>(app: &App, api: &ResourceApi<R>, id: &str, raw: &str) -> Result<()> {
    api.update(id, &parse::<R>(raw)?).await?;
    app.toasts.success("تم الحفظ بنجاح");
    Ok(())
}

async fn profile(app: &App, data: Option<String>, file: Option<&Path>) -> Result<()> {
    if data.is_none() && file.is_none() {
        let profile = app.content.profile().await?;
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    let raw = read_payload(data, file).await?;
    app.content.update_profile(&parse::<Profile>(&raw)?).await?;
    app.toasts.success("تم تحديث الملف الشخصي");
    Ok(())
}

async fn upload(app: &App, kind: UploadKind, path: &Path) -> Result<()> {
    let uploader = app.uploader(kind);
    let file = read_upload(uploader.policy(), path).await?;
    let (result, ()) = tokio::join!(uploader.upload(file), show_progress(uploader.subscribe()));

    let uploaded = result?;
    println!("{}", uploaded.url);
    app.toasts.success("تم رفع الملف بنجاح");
    Ok(())
}

/// Loads `path` once its size on disk passes the policy limit.
async fn read_upload(policy: &UploadPolicy, path: &Path) -> Result<LocalFile> {
    let size = tokio::fs::metadata(path)
        .await
        .wrap_err_with(|| format!("Failed to inspect {}", path.display()))?
        .len();
    let checked = policy.check_size(size);
    if !checked.valid {
        return Err(ApiError::validation(checked.error.unwrap_or_default()).into());
    }

    let bytes = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
    Ok(LocalFile::from_name(name, bytes))
}

async fn show_progress(mut state: watch::Receiver<UploadState>) {
    while state.changed().await.is_ok() {
        let current = state.borrow_and_update().clone();
        match current.status {
            UploadStatus::Uploading => eprint!("\r{:>3}%", current.progress),
            UploadStatus::Done => {
                eprintln!("\r100%");
                break;
            }
            UploadStatus::Failed | UploadStatus::Idle => {
                eprintln!();
                break;
            }
        }
    }
}

async fn error_logs(app: &App, clear: bool) -> Result<()> {
    let records = app.reporter.recent().await?;
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            vec![
                record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                record.url.clone(),
                record.message.clone(),
                record.context.clone().unwrap_or_default(),
            ]
        })
        .collect();

    println!(
        "{}",
        render_table(&["الوقت", "المسار", "الخطأ", "السياق"], &rows)
    );

    if clear {
        app.reporter.clear().await?;
        app.toasts.info("تم مسح سجل الأخطاء");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_oversized_upload_rejected_from_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(6 * 1024 * 1024).unwrap();

        let error = read_upload(&UploadPolicy::default(), &path)
            .await
            .unwrap_err();

        match error.downcast_ref::<ApiError>() {
            Some(ApiError::Validation { message }) => assert!(message.contains("5 ميجابايت")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_within_limit_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, [7_u8; 32]).unwrap();

        let file = read_upload(&UploadPolicy::default(), &path).await.unwrap();

        assert_eq!(file.name(), "cover.png");
        assert_eq!(file.mime(), "image/png");
        assert_eq!(file.size(), 32);
    }

    #[tokio::test]
    async fn test_missing_upload_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.png");

        let error = read_upload(&UploadPolicy::default(), &path)
            .await
            .unwrap_err();

        assert!(error.to_string().contains("gone.png"));
    }
}
