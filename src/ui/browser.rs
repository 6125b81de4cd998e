//! Folder browser and page viewer

use eframe::egui;
use egui_commonmark::CommonMarkViewer;

use crate::app::{MainView, NotefoldApp};
use crate::core::export::ExportFormat;
use crate::core::node::NodeKind;

/// Click in the folder listing
enum ListingAction {
    Open(String, NodeKind),
    Delete(String),
}

/// Central panel listing the current folder and showing the selected page
pub struct BrowserPanel;

impl BrowserPanel {
    /// Show the browser panel
    pub fn show(ui: &mut egui::Ui, app: &mut NotefoldApp) {
        Self::show_toolbar(ui, app);
        ui.separator();

        let listing = match app.store.list(app.navigator.current()) {
            Ok(listing) => listing,
            Err(e) => {
                ui.label(e.to_string());
                return;
            }
        };

        let mut action = None;
        egui::ScrollArea::vertical()
            .id_salt("listing_scroll")
            .max_height(ui.available_height() * 0.35)
            .show(ui, |ui| {
                if listing.is_empty() {
                    ui.label("This folder is empty.");
                }
                for (name, kind) in &listing {
                    ui.horizontal(|ui| {
                        let icon = match kind {
                            NodeKind::Folder => "\u{1F4C1}",
                            NodeKind::Page => "\u{1F4C4}",
                        };
                        let active = *kind == NodeKind::Page
                            && app.selected_page.as_deref() == Some(name.as_str());
                        if ui.selectable_label(active, format!("{} {}", icon, name)).clicked() {
                            action = Some(ListingAction::Open(name.clone(), *kind));
                        }
                        if ui.small_button("\u{1F5D1}").on_hover_text("Delete").clicked() {
                            action = Some(ListingAction::Delete(name.clone()));
                        }
                    });
                }
            });

        match action {
            Some(ListingAction::Open(name, NodeKind::Folder)) => app.open_folder(&name),
            Some(ListingAction::Open(name, NodeKind::Page)) => app.select_page(&name),
            Some(ListingAction::Delete(name)) => {
                app.delete_entry(&name);
            }
            None => {}
        }

        ui.separator();
        Self::show_page(ui, app);
    }

    /// Navigation, creation and folder download controls
    fn show_toolbar(ui: &mut egui::Ui, app: &mut NotefoldApp) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!app.navigator.is_at_root(), egui::Button::new("\u{2B06} Up"))
                .clicked()
            {
                app.go_up();
            }
            ui.heading(app.location());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Download Folder").clicked() {
                    let prepared = app.folder_download();
                    app.download(prepared);
                }
                egui::ComboBox::from_id_salt("export_format")
                    .selected_text(app.export_format.label())
                    .show_ui(ui, |ui| {
                        for format in ExportFormat::ALL {
                            ui.selectable_value(&mut app.export_format, format, format.label());
                        }
                    });
                if ui.button("New Page").clicked() {
                    app.page_form.folder = app.navigator.current().to_vec();
                    app.view = MainView::CreatePage;
                }
                if ui.button("New Folder").clicked() {
                    app.view = MainView::CreateFolder;
                }
            });
        });
    }

    /// Show the selected page with its metadata
    fn show_page(ui: &mut egui::Ui, app: &mut NotefoldApp) {
        // Copy what is shown first to avoid borrow conflicts
        let Some((title, folder, created_at, content)) = app.selected_page().map(|page| {
            (
                page.title.clone(),
                page.folder_display(),
                page.created_at_display(),
                page.content.clone(),
            )
        }) else {
            Self::show_empty(ui);
            return;
        };

        ui.horizontal(|ui| {
            ui.heading(title.as_str());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Download Page").clicked() {
                    let prepared = app.page_download(&title);
                    app.download(prepared);
                }
            });
        });
        ui.label(format!("Folder: {}", folder));
        ui.label(format!("Created at: {}", created_at));
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("page_scroll")
            .show(ui, |ui| {
                CommonMarkViewer::new().show(ui, &mut app.commonmark_cache, &content);
            });
    }

    /// Show empty state
    fn show_empty(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label("No page selected");
            ui.label("Pick a page from the list or the sidebar to view it");
        });
    }
}
