//! Main application state and UI coordination

use std::path::PathBuf;

use anyhow::Result;
use eframe::egui;

use crate::core::config::AppConfig;
use crate::core::export::{Download, ExportFormat};
use crate::core::navigator::Navigator;
use crate::core::node::Page;
use crate::core::store::{display_path, Store, StoreResult};
use crate::ui::browser::BrowserPanel;
use crate::ui::forms::{CreateFolderForm, CreatePageForm};
use crate::ui::sidebar::Sidebar;

/// Screen shown in the central panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainView {
    #[default]
    Browse,
    CreateFolder,
    CreatePage,
}

/// Feedback line shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct NotefoldApp {
    /// The notebook tree for this session
    pub store: Store,
    /// Folder being browsed
    pub navigator: Navigator,
    /// Page shown in the viewer, a child of the current folder
    pub selected_page: Option<String>,
    /// Current central view
    pub view: MainView,
    pub folder_form: CreateFolderForm,
    pub page_form: CreatePageForm,
    /// Format used by the download buttons
    pub export_format: ExportFormat,
    /// Application configuration
    pub config: AppConfig,
    /// Whether sidebar is visible
    pub sidebar_visible: bool,
    pub status: Option<StatusMessage>,
    /// Commonmark cache for the page viewer
    pub commonmark_cache: egui_commonmark::CommonMarkCache,
}

impl NotefoldApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = match AppConfig::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {:#}", e);
                AppConfig::default()
            }
        };

        Self::apply_theme(&cc.egui_ctx, &config);
        Self::with_config(config)
    }

    /// Create an application with an empty notebook
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            store: Store::new(),
            navigator: Navigator::new(),
            selected_page: None,
            view: MainView::default(),
            folder_form: CreateFolderForm::default(),
            page_form: CreatePageForm::default(),
            export_format: config.export.default_format,
            sidebar_visible: config.ui.show_hierarchy,
            config,
            status: None,
            commonmark_cache: egui_commonmark::CommonMarkCache::default(),
        }
    }

    fn apply_theme(ctx: &egui::Context, config: &AppConfig) {
        if config.ui.is_dark() {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!("{}", text);
        self.status = Some(StatusMessage { text, is_error: true });
    }

    /// Surface a store failure in the status bar. Returns true on success.
    fn report<T>(&mut self, result: StoreResult<T>, success: impl FnOnce() -> String) -> bool {
        match result {
            Ok(_) => {
                self.set_status(success());
                true
            }
            Err(e) => {
                self.set_error(e.to_string());
                false
            }
        }
    }

    /// Create a folder inside the current folder
    pub fn create_folder(&mut self, name: &str) -> bool {
        let path = self.navigator.current().to_vec();
        let result = self
            .store
            .create_folder(path.as_slice(), name)
            .map(|folder| folder.name.clone());
        let created = result.as_ref().ok().cloned();
        let ok = self.report(result, || {
            format!("Folder '{}' created successfully!", created.unwrap_or_default())
        });
        if ok {
            self.folder_form.clear();
        }
        ok
    }

    /// Create a page in the folder at `folder`
    pub fn create_page(&mut self, folder: &[String], title: &str, content: &str) -> bool {
        let result = self
            .store
            .create_page(folder, title, content)
            .map(|page| page.title.clone());
        let created = result.as_ref().ok().cloned();
        let ok = self.report(result, || {
            format!("Page '{}' created successfully!", created.clone().unwrap_or_default())
        });
        if ok {
            self.page_form.clear();
            if let Some(title) = created {
                if self.navigator.move_to(&self.store, folder).is_ok() {
                    self.selected_page = Some(title);
                    self.view = MainView::Browse;
                }
            }
        }
        ok
    }

    /// Enter a subfolder of the current folder
    pub fn open_folder(&mut self, name: &str) {
        match self.navigator.descend(&self.store, name) {
            Ok(_) => self.selected_page = None,
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Go to the parent folder
    pub fn go_up(&mut self) {
        match self.navigator.ascend() {
            Ok(_) => self.selected_page = None,
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Jump to any folder, optionally selecting one of its pages
    pub fn go_to(&mut self, path: &[String], page: Option<String>) {
        match self.navigator.move_to(&self.store, path) {
            Ok(_) => {
                self.selected_page = page;
                self.view = MainView::Browse;
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Show a page of the current folder in the viewer
    pub fn select_page(&mut self, title: &str) {
        let found = self
            .store
            .get_page(self.navigator.current(), title)
            .map(|_| ());
        if let Err(e) = found {
            self.set_error(e.to_string());
            return;
        }
        self.selected_page = Some(title.to_string());
    }

    /// The page shown in the viewer, if it still exists
    pub fn selected_page(&self) -> Option<&Page> {
        let title = self.selected_page.as_deref()?;
        self.store.get_page(self.navigator.current(), title).ok()
    }

    /// Remove a child of the current folder
    pub fn delete_entry(&mut self, name: &str) -> bool {
        let path = self.navigator.current().to_vec();
        let result = self.store.remove(path.as_slice(), name);
        let ok = self.report(result, || format!("Deleted '{}'", name));
        if ok && self.selected_page.as_deref() == Some(name) {
            self.selected_page = None;
        }
        if self.navigator.revalidate(&self.store) {
            self.selected_page = None;
        }
        ok
    }

    /// Export a page of the current folder
    pub fn page_download(&self, title: &str) -> Result<Download> {
        let page = self.store.get_page(self.navigator.current(), title)?;
        Download::page(page, self.export_format)
    }

    /// Export the direct pages of the current folder
    pub fn folder_download(&self) -> Result<Download> {
        let folder = self.store.resolve_folder(self.navigator.current())?;
        Download::folder(folder, self.export_format)
    }

    /// Export and ask the user where to save the result
    pub fn download(&mut self, prepared: Result<Download>) {
        let download = match prepared {
            Ok(download) => download,
            Err(e) => {
                self.set_error(format!("Export failed: {:#}", e));
                return;
            }
        };

        let Some(path) = self.pick_save_path(&download) else {
            return;
        };

        if let Err(e) = download.write_to(&path) {
            tracing::error!("{:#}", e);
            self.set_error(format!("{:#}", e));
            return;
        }

        self.set_status(format!("Saved {} ({})", path.display(), download.mime_type));
        self.config.remember_export_path(&path);
        self.save_config();

        if self.config.export.open_after_export {
            if let Err(e) = open::that(&path) {
                tracing::error!("Failed to open {}: {}", path.display(), e);
            }
        }
    }

    fn pick_save_path(&self, download: &Download) -> Option<PathBuf> {
        let format = self.export_format;
        let mut dialog = rfd::FileDialog::new()
            .set_file_name(download.filename.as_str())
            .add_filter(format.label(), &[format.extension()]);
        if let Some(dir) = &self.config.export.last_directory {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    }

    pub fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {:#}", e);
        }
    }

    /// Toggle between the light and dark theme
    pub fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.config.ui.theme = if self.config.ui.is_dark() {
            "light".to_string()
        } else {
            "dark".to_string()
        };
        Self::apply_theme(ctx, &self.config);
        self.save_config();
    }

    /// Location label for the current folder
    pub fn location(&self) -> String {
        display_path(self.navigator.current())
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Folder...").clicked() {
                        self.view = MainView::CreateFolder;
                        ui.close();
                    }
                    if ui.button("New Page...").clicked() {
                        self.page_form.folder = self.navigator.current().to_vec();
                        self.view = MainView::CreatePage;
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    let browsing = self.view == MainView::Browse;
                    if ui.selectable_label(browsing, "View Content").clicked() {
                        self.view = MainView::Browse;
                        ui.close();
                    }
                    if ui.button("Toggle Sidebar").clicked() {
                        self.sidebar_visible = !self.sidebar_visible;
                        ui.close();
                    }
                    let theme_label = if self.config.ui.is_dark() {
                        "Light Theme"
                    } else {
                        "Dark Theme"
                    };
                    if ui.button(theme_label).clicked() {
                        self.toggle_theme(ctx);
                        ui.close();
                    }
                });

                ui.menu_button("Export", |ui| {
                    if ui
                        .checkbox(&mut self.config.export.open_after_export, "Open after export")
                        .changed()
                    {
                        self.save_config();
                    }
                });
            });
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    let color = if status.is_error {
                        egui::Color32::from_rgb(224, 108, 117)
                    } else {
                        egui::Color32::from_rgb(152, 195, 121)
                    };
                    ui.colored_label(color, status.text.as_str());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!(
                        "{} folders, {} pages",
                        self.store.folder_count(),
                        self.store.page_count()
                    ));
                });
            });
        });
    }
}

impl eframe::App for NotefoldApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard shortcuts
        let (new_page, new_folder, toggle_sidebar, up) = ctx.input(|i| {
            let ctrl_n = i.modifiers.ctrl && i.key_pressed(egui::Key::N);
            (
                ctrl_n && !i.modifiers.shift,
                ctrl_n && i.modifiers.shift,
                i.modifiers.ctrl && i.key_pressed(egui::Key::B),
                i.modifiers.alt && i.key_pressed(egui::Key::ArrowUp),
            )
        });
        if new_page {
            self.page_form.folder = self.navigator.current().to_vec();
            self.view = MainView::CreatePage;
        }
        if new_folder {
            self.view = MainView::CreateFolder;
        }
        if toggle_sidebar {
            self.sidebar_visible = !self.sidebar_visible;
        }
        if up && !self.navigator.is_at_root() {
            self.go_up();
        }

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx);

        // Render sidebar with the folder and page hierarchy
        if self.sidebar_visible {
            egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(self.config.ui.sidebar_width)
                .min_width(150.0)
                .show(ctx, |ui| {
                    Sidebar::show(ui, self);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            MainView::Browse => BrowserPanel::show(ui, self),
            MainView::CreateFolder => {
                let location = self.location();
                if let Some(name) = self.folder_form.show(ui, &location) {
                    if self.create_folder(&name) {
                        self.view = MainView::Browse;
                    }
                }
            }
            MainView::CreatePage => {
                let folders = self.store.folder_paths();
                if let Some(request) = self.page_form.show(ui, &folders) {
                    self.create_page(&request.folder, &request.title, &request.content);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> NotefoldApp {
        NotefoldApp::with_config(AppConfig::default())
    }

    #[test]
    fn test_create_folder_in_current_folder() {
        let mut app = app();
        assert!(app.create_folder("Projects"));
        app.open_folder("Projects");
        assert!(app.create_folder("Rust"));

        assert!(app.store.resolve_folder(&["Projects", "Rust"]).is_ok());
        assert_eq!(app.location(), "/Projects");
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("Folder 'Rust' created successfully!")
        );
    }

    #[test]
    fn test_duplicate_reports_error_and_keeps_tree() {
        let mut app = app();
        app.create_folder("Projects");
        let before = app.store.clone();

        assert!(!app.create_page(&[], "Projects", "body"));
        assert!(app.status.as_ref().unwrap().is_error);
        assert_eq!(app.store, before);
    }

    #[test]
    fn test_create_page_selects_it() {
        let mut app = app();
        app.create_folder("Projects");
        let folder = vec!["Projects".to_string()];

        assert!(app.create_page(&folder, "Spec", "hello"));
        assert_eq!(app.navigator.current(), folder.as_slice());
        assert_eq!(app.selected_page().map(|p| p.content.as_str()), Some("hello"));
        assert_eq!(app.view, MainView::Browse);
    }

    #[test]
    fn test_go_up_from_root_is_an_error() {
        let mut app = app();
        app.go_up();
        assert!(app.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn test_delete_selected_page_clears_viewer() {
        let mut app = app();
        app.create_page(&[], "Draft", "");
        app.select_page("Draft");
        assert!(app.selected_page().is_some());

        assert!(app.delete_entry("Draft"));
        assert!(app.selected_page.is_none());
        assert!(!app.delete_entry("Draft"));
    }

    #[test]
    fn test_downloads_use_selected_format() {
        let mut app = app();
        app.create_page(&[], "Draft", "text");
        app.export_format = ExportFormat::Markdown;

        let page = app.page_download("Draft").unwrap();
        assert_eq!(page.filename, "Draft.md");

        let folder = app.folder_download().unwrap();
        assert_eq!(folder.filename, "root.md");

        assert!(app.page_download("Missing").is_err());
    }

    #[test]
    fn test_failed_export_reports_error() {
        let mut app = app();
        let prepared = app.page_download("Missing");
        app.download(prepared);
        assert!(app.status.as_ref().unwrap().text.starts_with("Export failed"));
    }
}
