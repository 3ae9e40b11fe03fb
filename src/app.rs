use crate::actions::open_path;
use crate::session::{CancelOutcome, SearchController, SearchRequest, StartOutcome};
use crate::ui_model::{display_path, KeywordHistory};
use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;

pub struct SherlockFilesApp {
    folder: Option<PathBuf>,
    keyword: String,
    controller: SearchController,
    results: Vec<PathBuf>,
    history: KeywordHistory,
    status_line: String,
    focus_keyword_requested: bool,
}

impl SherlockFilesApp {
    pub fn new(folder: Option<PathBuf>, keyword: String) -> Self {
        Self {
            folder,
            keyword,
            controller: SearchController::new(),
            results: Vec::new(),
            history: KeywordHistory::new(),
            status_line: "Pick a folder and enter a keyword".to_string(),
            focus_keyword_requested: true,
        }
    }

    fn folder_display_text(&self) -> String {
        self.folder
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "<no folder selected>".to_string())
    }

    fn trigger_search(&mut self) {
        let Some(folder) = self.folder.clone() else {
            self.status_line = "Pick a folder to search first".to_string();
            return;
        };

        match self.controller.start(SearchRequest {
            root: folder,
            keyword: self.keyword.clone(),
        }) {
            StartOutcome::Started(_) => {
                self.history.push(&self.keyword);
                self.results.clear();
                self.status_line = "Searching...".to_string();
            }
            StartOutcome::EmptyKeyword => {
                self.status_line = "Enter a keyword to search".to_string();
                self.focus_keyword_requested = true;
            }
        }
    }

    fn request_cancel(&mut self) {
        self.status_line = match self.controller.cancel() {
            CancelOutcome::Cancelling => "Cancelling...".to_string(),
            CancelOutcome::NoActiveSearch => "No active search to cancel".to_string(),
        };
    }

    fn poll_completion(&mut self) {
        if let Some(results) = self.controller.poll() {
            self.status_line = if results.is_empty() {
                "No files found".to_string()
            } else {
                format!("{} files found", results.len())
            };
            self.results = results;
        }
    }

    fn open_row(&mut self, row: usize) {
        let Some(path) = self.results.get(row) else {
            return;
        };
        if let Err(err) = open_path(path) {
            self.status_line = format!("Open failed: {}", err);
        }
    }

    fn browse_for_folder(&mut self) {
        let mut dialog = native_dialog::FileDialog::new();
        if let Some(current) = &self.folder {
            dialog = dialog.set_location(current);
        }
        match dialog.show_open_single_dir() {
            Ok(Some(dir)) => {
                self.folder = Some(dir);
                self.status_line = format!("Folder: {}", self.folder_display_text());
            }
            // Dialog dismissed; previous folder stays selected.
            Ok(None) => {}
            Err(err) => {
                self.status_line = format!("Browse failed: {}", err);
            }
        }
    }
}

impl eframe::App for SherlockFilesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_completion();
        if self.controller.is_active() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Folder:");
                ui.add(egui::Label::new(self.folder_display_text()).truncate());
                if ui.button("Browse...").clicked() {
                    self.browse_for_folder();
                }
            });

            ui.horizontal(|ui| {
                let keyword_id = ui.make_persistent_id("keyword-input");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.keyword)
                        .id(keyword_id)
                        .desired_width(ui.available_width() - 180.0)
                        .hint_text("Enter file name to search"),
                );
                if self.focus_keyword_requested {
                    response.request_focus();
                    self.focus_keyword_requested = false;
                }
                let enter_in_keyword =
                    response.lost_focus() && ctx.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Search").clicked() || enter_in_keyword {
                    self.trigger_search();
                    self.focus_keyword_requested = true;
                }
                if ui.button("Cancel").clicked() {
                    self.request_cancel();
                }
            });

            if !self.history.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    ui.label("Recent:");
                    let mut recalled: Option<String> = None;
                    for keyword in self.history.entries() {
                        if ui.small_button(keyword).clicked() {
                            recalled = Some(keyword.clone());
                        }
                    }
                    if let Some(keyword) = recalled {
                        self.keyword = keyword;
                        self.trigger_search();
                    }
                });
            }
        });

        egui::TopBottomPanel::bottom("status")
            .resizable(false)
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.add(egui::Label::new(&self.status_line).truncate());
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Search Results");
            egui::ScrollArea::both()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let mut activated_row: Option<usize> = None;
                    for (i, path) in self.results.iter().enumerate() {
                        let label = match &self.folder {
                            Some(root) => display_path(path, root),
                            None => path.to_string_lossy().to_string(),
                        };
                        let response = ui.add(
                            egui::Label::new(label)
                                .extend()
                                .sense(egui::Sense::click()),
                        );
                        if response.double_clicked() {
                            activated_row = Some(i);
                        }
                        response.on_hover_text(path.to_string_lossy().to_string());
                    }
                    if let Some(row) = activated_row {
                        self.open_row(row);
                    }
                });
        });
    }
}
