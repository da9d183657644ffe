//! Subcommand handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate, NaiveTime};
use mailforge_core::{
    Document, DraftRepository, EditorSession, RenderOptions, ScheduleSpec, SqliteStore,
    TemplateLibrary, TracingSink, import_html, render as render_document, resolve_schedule,
};
use mailforge_markup::{compile_markup, to_plain_text};
use tracing::{info, warn};

use crate::settings::{Settings, save_settings};

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("invalid time {s:?}, expected HH:MM"))
}

async fn read_document(path: &Path) -> anyhow::Result<Document> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid document", path.display()))
}

fn print_document(document: &Document) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(document)?);
    Ok(())
}

async fn open_store(settings: &Settings) -> anyhow::Result<Arc<SqliteStore>> {
    let path = settings.database_path();
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let url = path.to_str().context("database path is not valid UTF-8")?;
    let store = SqliteStore::new(url)
        .await
        .with_context(|| format!("failed to open database {}", path.display()))?;
    Ok(Arc::new(store))
}

pub async fn render(
    settings: &Settings,
    document: &Path,
    html_out: Option<&Path>,
    text_out: Option<&Path>,
) -> anyhow::Result<()> {
    let document = read_document(document).await?;
    let options = RenderOptions {
        branding: settings.branding(),
        ..RenderOptions::default()
    };
    let email = render_document(&document, &options, &TracingSink);

    match html_out {
        Some(path) => {
            tokio::fs::write(path, &email.html)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote HTML to {}", path.display());
        }
        None => print!("{}", email.html),
    }
    if let Some(path) = text_out {
        tokio::fs::write(path, &email.text)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote plain text to {}", path.display());
    }
    Ok(())
}

pub async fn import(settings: &Settings, input: &Path) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;
    let document = import_html(&raw, &settings.import_options(), &TracingSink);
    if document.is_empty() {
        warn!("No importable content found in {}", input.display());
    }
    print_document(&document)
}

pub async fn markup(input: &Path, text: bool) -> anyhow::Result<()> {
    let source = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;
    if text {
        println!("{}", to_plain_text(&source));
    } else {
        println!("{}", compile_markup(&source));
    }
    Ok(())
}

pub fn schedule(
    preset: Option<&str>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> anyhow::Result<()> {
    let spec = match (date, time) {
        (Some(date), Some(time)) => ScheduleSpec::at(date, time),
        _ => ScheduleSpec::parse(preset.unwrap_or_default()),
    };

    match resolve_schedule(&spec, &Local::now()) {
        Some(at) => println!("{}", at.to_rfc3339()),
        None => {
            match &spec {
                ScheduleSpec::Unrecognized(input) => {
                    warn!("Unrecognized schedule {input:?}, sending immediately");
                }
                ScheduleSpec::At { date, time } => {
                    warn!("{date} {time} does not exist in the local time zone");
                }
                ScheduleSpec::Immediate | ScheduleSpec::Preset(_) => {}
            }
            println!("immediate");
        }
    }
    Ok(())
}

pub async fn draft_show(settings: &Settings, owner: &str) -> anyhow::Result<()> {
    let repository = DraftRepository::new(open_store(settings).await?);
    let Some(draft) = repository.load(owner).await? else {
        bail!("no draft saved for {owner:?}");
    };
    info!("Draft for {owner} saved at {}", draft.timestamp);

    let mut document = Document::new();
    draft.restore_into(&mut document);
    print_document(&document)
}

pub async fn draft_save(settings: &Settings, owner: &str, document: &Path) -> anyhow::Result<()> {
    let replacement = read_document(document).await?;
    let store = open_store(settings).await?;

    let mut session = EditorSession::start(store, owner, settings.autosave()).await;
    session.edit(|document| *document = replacement);
    session.close().await;
    info!("Saved draft for {owner}");
    Ok(())
}

pub async fn draft_clear(settings: &Settings, owner: &str) -> anyhow::Result<()> {
    let repository = DraftRepository::new(open_store(settings).await?);
    if repository.delete(owner).await? {
        info!("Deleted draft for {owner}");
    } else {
        warn!("No draft saved for {owner}");
    }
    Ok(())
}

pub async fn template_save(settings: &Settings, name: &str, document: &Path) -> anyhow::Result<()> {
    let document = read_document(document).await?;
    let library = TemplateLibrary::new(open_store(settings).await?);
    library.save(name, &document).await?;
    info!("Saved template {name:?}");
    Ok(())
}

pub async fn template_load(settings: &Settings, name: &str) -> anyhow::Result<()> {
    let library = TemplateLibrary::new(open_store(settings).await?);
    let Some(template) = library.load(name).await? else {
        bail!("no template named {name:?}");
    };
    print_document(&template.document)
}

pub async fn template_list(settings: &Settings) -> anyhow::Result<()> {
    let library = TemplateLibrary::new(open_store(settings).await?);
    for name in library.list().await? {
        println!("{name}");
    }
    Ok(())
}

pub async fn template_delete(settings: &Settings, name: &str) -> anyhow::Result<()> {
    let library = TemplateLibrary::new(open_store(settings).await?);
    if !library.delete(name).await? {
        bail!("no template named {name:?}");
    }
    info!("Deleted template {name:?}");
    Ok(())
}

pub async fn config(path: &Path, settings: &Settings, init: bool) -> anyhow::Result<()> {
    if init {
        if path.exists() {
            warn!("{} already exists, leaving it unchanged", path.display());
        } else {
            save_settings(path, settings).await?;
        }
    }
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(
            parse_time("14:05:10").unwrap(),
            NaiveTime::from_hms_opt(14, 5, 10).unwrap()
        );
        assert!(parse_time("9am").is_err());
        assert!(parse_time("25:00").is_err());
    }

    #[tokio::test]
    async fn test_read_document_reports_invalid_json() {
        let path = std::env::temp_dir().join(format!("mailforge-doc-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{"subject": "Hi", "elements": [{"type": "text"}]}"#)
            .await
            .unwrap();
        let document = read_document(&path).await.unwrap();
        assert_eq!(document.subject, "Hi");
        assert_eq!(document.elements.len(), 1);

        tokio::fs::write(&path, "not json").await.unwrap();
        let err = read_document(&path).await.unwrap_err();
        assert!(err.to_string().contains("is not a valid document"));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_drafts_and_templates_share_the_database() {
        let dir = std::env::temp_dir().join(format!("mailforge-db-{}", std::process::id()));
        let settings = Settings {
            database_path: Some(dir.join("test.db")),
            ..Settings::default()
        };
        let doc_path = dir.join("doc.json");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(&doc_path, r#"{"subject": "Launch", "elements": []}"#)
            .await
            .unwrap();

        draft_save(&settings, "alice", &doc_path).await.unwrap();
        template_save(&settings, "launch", &doc_path).await.unwrap();

        let store = open_store(&settings).await.unwrap();
        let draft = DraftRepository::new(Arc::clone(&store))
            .load("alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(draft.subject, "Launch");
        let names = TemplateLibrary::new(store).list().await.unwrap();
        assert_eq!(names, vec!["launch".to_string()]);

        draft_clear(&settings, "alice").await.unwrap();
        assert!(template_delete(&settings, "missing").await.is_err());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
