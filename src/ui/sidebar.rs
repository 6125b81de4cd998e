//! Sidebar showing the folder and page hierarchy

use eframe::egui;

use crate::app::{MainView, NotefoldApp};
use crate::core::node::Folder;
use crate::core::store::Store;

/// Navigation requested by a click in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
enum SidebarAction {
    OpenFolder(Vec<String>),
    OpenPage(Vec<String>, String),
}

/// Sidebar with the folder tree and standalone pages
pub struct Sidebar;

impl Sidebar {
    /// Show the sidebar
    pub fn show(ui: &mut egui::Ui, app: &mut NotefoldApp) {
        let mut actions = Vec::new();

        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.heading("Hierarchy");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("+").on_hover_text("New folder").clicked() {
                        app.view = MainView::CreateFolder;
                    }
                });
            });

            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("hierarchy_scroll")
                .show(ui, |ui| {
                    let current = app.navigator.current();
                    let selected = app.selected_page.as_deref();
                    let root = app.store.root();

                    if root.subfolders().next().is_none() {
                        ui.label("No folders created yet.");
                    }
                    let mut path = Vec::new();
                    for folder in root.subfolders() {
                        path.push(folder.name.clone());
                        Self::show_folder(ui, folder, &mut path, current, selected, &mut actions);
                        path.pop();
                    }

                    // Pages that live directly in the root folder
                    let standalone: Vec<&str> = app
                        .store
                        .pages(Store::ROOT)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|p| p.title.as_str())
                        .collect();
                    if !standalone.is_empty() {
                        ui.add_space(8.0);
                        ui.strong("Standalone Pages");
                        for title in standalone {
                            let active = current.is_empty() && selected == Some(title);
                            if ui
                                .selectable_label(active, format!("\u{1F4C4} {}", title))
                                .clicked()
                            {
                                let open = SidebarAction::OpenPage(Vec::new(), title.to_string());
                                actions.push(open);
                            }
                        }
                    }
                });
        });

        for action in actions {
            match action {
                SidebarAction::OpenFolder(path) => app.go_to(&path, None),
                SidebarAction::OpenPage(path, title) => app.go_to(&path, Some(title)),
            }
        }
    }

    /// Recursively show a folder node
    fn show_folder(
        ui: &mut egui::Ui,
        folder: &Folder,
        path: &mut Vec<String>,
        current: &[String],
        selected: Option<&str>,
        actions: &mut Vec<SidebarAction>,
    ) {
        let id = ui.make_persistent_id(("folder", path.as_slice()));
        let is_current = current == path.as_slice();
        let open = current.starts_with(path.as_slice());

        egui::collapsing_header::CollapsingState::load_with_default_open(ui.ctx(), id, open)
            .show_header(ui, |ui| {
                let icon = if open { "\u{1F4C2}" } else { "\u{1F4C1}" };
                if ui
                    .selectable_label(is_current, format!("{} {}", icon, folder.name))
                    .clicked()
                {
                    actions.push(SidebarAction::OpenFolder(path.clone()));
                }
            })
            .body(|ui| {
                if !folder.has_pages() {
                    ui.weak("(No pages)");
                }
                for sub in folder.subfolders() {
                    path.push(sub.name.clone());
                    Self::show_folder(ui, sub, path, current, selected, actions);
                    path.pop();
                }
                for page in folder.pages() {
                    let active = is_current && selected == Some(page.title.as_str());
                    if ui
                        .selectable_label(active, format!("\u{1F4C4} {}", page.title))
                        .clicked()
                    {
                        actions.push(SidebarAction::OpenPage(path.clone(), page.title.clone()));
                    }
                }
            });
    }
}
