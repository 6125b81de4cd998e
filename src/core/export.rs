//! Page and folder export to downloadable files

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use pulldown_cmark::{html, Event, Options, Parser};
use serde::{Deserialize, Serialize};

use super::node::{Folder, Page, TIMESTAMP_FORMAT};

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Html,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Json,
        ExportFormat::Html,
        ExportFormat::Markdown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Html => "HTML",
            ExportFormat::Markdown => "Markdown",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Html => "text/html",
            ExportFormat::Markdown => "text/markdown",
        }
    }
}

/// Serialized form of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    pub content: String,
    /// Parent folder name, empty at the root
    pub folder: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

impl From<&Page> for PageRecord {
    fn from(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            content: page.content.clone(),
            folder: page.folder_name().to_string(),
            created_at: page.created_at(),
        }
    }
}

/// Serialized form of a folder and its direct pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub folder_name: String,
    pub pages: Vec<PageRecord>,
}

impl From<&Folder> for FolderRecord {
    fn from(folder: &Folder) -> Self {
        Self {
            folder_name: folder.name.clone(),
            pages: folder.pages().map(PageRecord::from).collect(),
        }
    }
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Converts pages and folders into bytes of one format
pub trait Exporter {
    fn format(&self) -> ExportFormat;

    fn export_page(&self, page: &Page) -> Result<Vec<u8>>;

    fn export_folder(&self, folder: &Folder) -> Result<Vec<u8>>;
}

/// Pretty-printed JSON
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn export_page(&self, page: &Page) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&PageRecord::from(page)).context("Failed to serialize page")
    }

    fn export_folder(&self, folder: &Folder) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&FolderRecord::from(folder))
            .context("Failed to serialize folder")
    }
}

/// Standalone HTML document with the content rendered from markdown
pub struct HtmlExporter;

impl HtmlExporter {
    /// Render markdown to HTML; raw HTML in the source is emitted as text
    fn render_markdown(markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut out = String::new();
        let events = Parser::new_ext(markdown, options).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
        html::push_html(&mut out, events);
        out
    }

    fn page_section(page: &Page) -> String {
        format!(
            "<article>\n<h1>{}</h1>\n\
             <p class=\"meta\">Folder: {} | Created at: {}</p>\n{}</article>\n",
            escape_html(&page.title),
            escape_html(folder_label(page)),
            page.created_at_display(),
            Self::render_markdown(&page.content)
        )
    }

    fn document(title: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
             <style>body {{ font-family: sans-serif; max-width: 48em; margin: 2em auto; }} \
             .meta {{ color: #666; }}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
            escape_html(title),
            body
        )
    }
}

impl Exporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn export_page(&self, page: &Page) -> Result<Vec<u8>> {
        Ok(Self::document(&page.title, &Self::page_section(page)).into_bytes())
    }

    fn export_folder(&self, folder: &Folder) -> Result<Vec<u8>> {
        let body = folder
            .pages()
            .map(Self::page_section)
            .collect::<Vec<_>>()
            .join("<hr>\n");
        Ok(Self::document(&folder.name, &body).into_bytes())
    }
}

/// Plain markdown with a heading and metadata line per page
pub struct MarkdownExporter;

impl MarkdownExporter {
    fn page_text(page: &Page) -> String {
        format!(
            "# {}\n\n_Folder: {} | Created at: {}_\n\n{}\n",
            page.title,
            folder_label(page),
            page.created_at_display(),
            page.content.trim_end()
        )
    }
}

impl Exporter for MarkdownExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn export_page(&self, page: &Page) -> Result<Vec<u8>> {
        Ok(Self::page_text(page).into_bytes())
    }

    fn export_folder(&self, folder: &Folder) -> Result<Vec<u8>> {
        let text = folder
            .pages()
            .map(Self::page_text)
            .collect::<Vec<_>>()
            .join("\n---\n\n");
        Ok(text.into_bytes())
    }
}

/// Exporter for a format
pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Json => Box::new(JsonExporter),
        ExportFormat::Html => Box::new(HtmlExporter),
        ExportFormat::Markdown => Box::new(MarkdownExporter),
    }
}

fn folder_label(page: &Page) -> &str {
    match page.folder_name() {
        "" => "None",
        name => name,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace characters that are unsafe in file names
pub fn sanitize_filename(name: &str) -> String {
    let re = regex_lite::Regex::new(r"[^A-Za-z0-9 ._-]").unwrap();
    let cleaned = re.replace_all(name.trim(), "_");
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Exported bytes ready to be written to a user-chosen file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn new(bytes: Vec<u8>, name: &str, format: ExportFormat) -> Self {
        Self {
            filename: format!("{}.{}", sanitize_filename(name), format.extension()),
            mime_type: format.mime_type(),
            bytes,
        }
    }

    /// Export a single page
    pub fn page(page: &Page, format: ExportFormat) -> Result<Self> {
        let exporter = exporter_for(format);
        let bytes = exporter.export_page(page)?;
        Ok(Self::new(bytes, &page.title, exporter.format()))
    }

    /// Export the direct pages of a folder
    pub fn folder(folder: &Folder, format: ExportFormat) -> Result<Self> {
        let exporter = exporter_for(format);
        let bytes = exporter.export_folder(folder)?;
        Ok(Self::new(bytes, &folder.name, exporter.format()))
    }

    /// Write the bytes to `path`
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("Failed to write export: {}", path.display()))?;
        tracing::info!(
            "Exported {} ({} bytes) to {}",
            self.filename,
            self.bytes.len(),
            path.display()
        );
        Ok(())
    }
}
