//! Forms for creating folders and pages

use eframe::egui;

use crate::core::store::display_path;

/// Form for creating a folder in the current folder
#[derive(Debug, Default)]
pub struct CreateFolderForm {
    pub name: String,
}

impl CreateFolderForm {
    /// Show the form. Returns the entered name when submitted.
    pub fn show(&mut self, ui: &mut egui::Ui, location: &str) -> Option<String> {
        let mut submitted = None;

        ui.heading("Create New Folder");
        ui.label(format!("Location: {}", location));
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Folder name:");
            let response = ui.text_edit_singleline(&mut self.name);
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submitted = Some(self.name.clone());
            }
        });

        ui.add_space(8.0);
        if ui.button("Create Folder").clicked() {
            submitted = Some(self.name.clone());
        }

        submitted
    }

    pub fn clear(&mut self) {
        self.name.clear();
    }
}

/// A page the user asked to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub folder: Vec<String>,
    pub title: String,
    pub content: String,
}

/// Form for creating a page in any folder
#[derive(Debug, Default)]
pub struct CreatePageForm {
    /// Target folder, the root when empty
    pub folder: Vec<String>,
    pub title: String,
    pub content: String,
}

impl CreatePageForm {
    /// Show the form. Returns the request when "Save Page" is pressed.
    pub fn show(&mut self, ui: &mut egui::Ui, folders: &[Vec<String>]) -> Option<PageRequest> {
        ui.heading("Create New Page");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Folder:");
            egui::ComboBox::from_id_salt("page_folder")
                .selected_text(Self::folder_label(&self.folder))
                .show_ui(ui, |ui| {
                    for folder in folders {
                        let label = Self::folder_label(folder);
                        ui.selectable_value(&mut self.folder, folder.clone(), label);
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label("Title:");
            ui.text_edit_singleline(&mut self.title);
        });

        ui.label("Content (markdown):");
        ui.add(
            egui::TextEdit::multiline(&mut self.content)
                .desired_width(f32::INFINITY)
                .desired_rows(16),
        );

        ui.add_space(8.0);
        if ui.button("Save Page").clicked() {
            return Some(PageRequest {
                folder: self.folder.clone(),
                title: self.title.clone(),
                content: self.content.clone(),
            });
        }

        None
    }

    fn folder_label(folder: &[String]) -> String {
        if folder.is_empty() {
            "(none)".to_string()
        } else {
            display_path(folder)
        }
    }

    /// Reset title and content, keeping the chosen folder
    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }
}
