//! # mailforge-core
//!
//! Core library of the `MailForge` email builder.
//!
//! This crate provides:
//! - **Document model** - typed element tree with total mutation operations
//! - **Renderer** - document to HTML email plus plain text
//! - **Importer** - best-effort reconstruction of a document from HTML
//! - **Drafts** - debounced autosave and restore of documents being edited
//! - **Templates** - named documents kept in the same store as drafts
//! - **Scheduling** - symbolic send times resolved to timestamps
//!
//! ```
//! use mailforge_core::{
//!     Document, ElementPatch, ElementType, InsertTarget, NullSink, RenderOptions, render,
//! };
//!
//! let mut doc = Document::new().with_subject("Hello");
//! let id = doc.add_element(ElementType::Text, InsertTarget::Root).unwrap();
//! doc.update_element(id.as_str(), &ElementPatch::new().content("**Welcome** aboard"));
//!
//! let email = render(&doc, &RenderOptions::default(), &NullSink);
//! assert!(email.html.contains("<strong>Welcome</strong>"));
//! assert_eq!(email.text, "Welcome aboard");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod diagnostics;
pub mod document;
pub mod draft;
mod error;
pub mod import;
pub mod render;
pub mod schedule;
pub mod store;
pub mod template;

pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, NullSink, TracingSink,
};
pub use document::{
    ColumnPair, ColumnSide, Document, Element, ElementId, ElementKind, ElementPatch, ElementType,
    InsertTarget, MoveDirection,
};
pub use draft::{
    AutosaveConfig, Autosaver, Draft, DraftKey, DraftRepository, EditorSession,
    MIN_AUTOSAVE_INTERVAL,
};
pub use error::{Error, Result, ValidationError};
pub use import::{ImportOptions, import_html};
pub use render::{Branding, RenderOptions, RenderedEmail, render};
pub use schedule::{SchedulePreset, ScheduleSpec, resolve_schedule};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use template::{Template, TemplateLibrary};

pub use mailforge_markup::compile_markup;
