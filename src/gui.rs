use crate::{
    CellEditor, CellValue, ChoiceEditor, EditError, EditingSupport, FileDialogFilters, History,
    NodeKind, Operation, Record, RecordDocument, RecordId, RecordType, TreeNode,
    editing::record_type_choice_editor, statics,
};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
};

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 760.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| {
            Ok(Box::new(NdefedApp {
                theme_dark: true,
                ..Default::default()
            }))
        }),
    )
}

/// Identifies a tree position across frames (trees are rebuilt every frame).
type NodeKey = (RecordId, NodeKind, usize);

fn node_key(node: &TreeNode) -> NodeKey {
    (node.record(), node.kind(), node.parent_index())
}

/// A request collected while laying out the tree; applied once the frame's widgets are done.
#[derive(Clone, Debug)]
enum UiAction {
    Commit { node: TreeNode, value: CellValue },
    InsertItem(TreeNode),
    RemoveItem(TreeNode),
    PickFile {
        node: TreeNode,
        mime_type_hint: Option<String>,
    },
}

/// The main application state and GUI logic.
/// Owns the open document, its undo history and the per-node text buffers.
#[derive(Default)]
struct NdefedApp {
    doc: Option<RecordDocument>,
    editing: EditingSupport,
    history: History,
    dialog_filters: FileDialogFilters,
    dialog_dir: Option<PathBuf>,
    selected: Option<RecordId>,
    new_record_type: usize,
    status: String,
    last_error: Option<String>,
    window_title: String,

    // Uncommitted text per node; dropped whenever the document changes.
    text_buffers: HashMap<NodeKey, String>,
    // Nodes whose editor failed to resolve; reported once, not every frame.
    failed_nodes: HashSet<NodeKey>,

    changes_open: bool,
    about_open: bool,
    theme_dark: bool,
}

fn record_row_label(position: usize, record: &Record) -> String {
    if record.key().is_empty() {
        format!("{}. {}", position + 1, record.record_type())
    } else {
        format!("{}. {} '{}'", position + 1, record.record_type(), record.key())
    }
}

fn node_label(node: &TreeNode) -> String {
    match node.kind() {
        NodeKind::Record => format!("{} {}", node.label(), node.parent_index() + 1),
        NodeKind::PropertyListItem => format!("{} [{}]", node.label(), node.parent_index()),
        NodeKind::ParentProperty | NodeKind::Property | NodeKind::PropertyList => {
            node.label().to_string()
        }
    }
}

fn document_title(doc: Option<&RecordDocument>) -> String {
    let Some(doc) = doc else {
        return statics::EN_APP_TITLE.to_string();
    };
    let name = doc
        .source_path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| statics::EN_UNTITLED_DOCUMENT.to_string());
    let marker = if doc.dirty { "*" } else { "" };
    format!("{name}{marker} - {}", statics::EN_APP_TITLE)
}

impl UiAction {
    fn node(&self) -> &TreeNode {
        match self {
            UiAction::Commit { node, .. }
            | UiAction::InsertItem(node)
            | UiAction::RemoveItem(node)
            | UiAction::PickFile { node, .. } => node,
        }
    }
}

impl NdefedApp {
    fn selectable_row_left(
        ui: &mut egui::Ui,
        selected: bool,
        text: &str,
        row_h: f32,
    ) -> egui::Response {
        let w = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(egui::vec2(w, row_h), egui::Sense::click());
        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);

        let visuals = ui.style().interact_selectable(&response, selected);
        if ui.is_rect_visible(rect) {
            ui.painter()
                .rect_filled(rect, visuals.corner_radius, visuals.bg_fill);
            ui.painter().rect_stroke(
                rect,
                visuals.corner_radius,
                visuals.bg_stroke,
                egui::StrokeKind::Inside,
            );

            let font_id = egui::TextStyle::Button.resolve(ui.style());
            let text_pos = rect.left_center() + egui::vec2(6.0, 0.0);
            ui.painter().text(
                text_pos,
                egui::Align2::LEFT_CENTER,
                text,
                font_id,
                visuals.text_color(),
            );
        }

        response
    }

    /// Show an editing failure; contract violations are logged at error level.
    fn report(&mut self, e: &EditError) {
        if e.is_fatal() {
            tracing::error!(error = %e, "editing contract violated");
        } else {
            tracing::warn!(error = %e, "edit rejected");
        }
        self.last_error = Some(format!("{} {e}", statics::EN_LABEL_ERROR));
    }

    fn report_once(&mut self, node: &TreeNode, e: &EditError) {
        if self.failed_nodes.insert(node_key(node)) {
            self.report(e);
        }
    }

    fn document_dialog(&self) -> rfd::FileDialog {
        let mut dlg = rfd::FileDialog::new()
            .add_filter(statics::EN_FILTER_DOCUMENT, &statics::DOCUMENT_EXTENSIONS);
        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }
        dlg
    }

    fn set_document(&mut self, doc: RecordDocument) {
        self.selected = doc.records().next().map(Record::id);
        self.doc = Some(doc);
        self.text_buffers.clear();
        self.failed_nodes.clear();
        self.history.clear();
        self.changes_open = false;
        self.last_error = None;
    }

    fn new_document(&mut self) {
        self.set_document(RecordDocument::new());
        self.status = statics::EN_UNTITLED_DOCUMENT.to_string();
    }

    fn open_file(&mut self) {
        let Some(path) = self.document_dialog().pick_file() else {
            return;
        };

        match RecordDocument::load_path(&path) {
            Ok(doc) => {
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.set_document(doc);
                self.status = format!("Loaded {}", path.display());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "load failed");
                self.last_error = Some(format!("Failed to load: {e:#}"));
            }
        }
    }

    fn save_file_as(&mut self) {
        let mut dlg = self.document_dialog();
        let file_name = self
            .doc
            .as_ref()
            .and_then(|doc| doc.source_path.as_ref())
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| statics::EN_UNTITLED_DOCUMENT.to_string());
        dlg = dlg.set_file_name(file_name);

        let Some(path) = dlg.save_file() else {
            return;
        };

        let Some(doc) = self.doc.as_mut() else {
            return;
        };

        if let Err(e) = doc.save_to_path(&path) {
            tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "save failed");
            self.last_error = Some(format!("Failed to save: {e:#}"));
        } else {
            self.dialog_dir = path.parent().map(PathBuf::from);
            self.status = format!("Saved {}", path.display());
            self.last_error = None;
        }
    }

    fn add_record(&mut self) {
        let Some(doc) = self.doc.as_mut() else {
            return;
        };
        let Some(record_type) = RecordType::ALL.get(self.new_record_type).copied() else {
            return;
        };
        let id = doc.add_record(record_type);
        self.selected = Some(id);
        self.status = format!("Added {record_type}");
    }

    fn remove_selected_record(&mut self) {
        let (Some(doc), Some(id)) = (self.doc.as_mut(), self.selected) else {
            return;
        };
        let Some(removed) = doc.remove_record(id) else {
            return;
        };
        self.selected = doc.records().next().map(Record::id);
        // Undo entries may target the removed record.
        self.history.clear();
        self.text_buffers.clear();
        self.status = format!("Removed {}", removed.record_type());
    }

    fn submit(&mut self, op: Operation) {
        let Some(doc) = self.doc.as_mut() else {
            return;
        };
        match self.history.submit(doc, op) {
            Ok(description) => {
                self.status = description;
                self.last_error = None;
                self.text_buffers.clear();
            }
            Err(e) => self.report(&e),
        }
    }

    fn undo(&mut self) {
        let Some(doc) = self.doc.as_mut() else {
            return;
        };
        match self.history.undo(doc) {
            Ok(Some(description)) => {
                self.status = format!("{} {description}", statics::EN_PREFIX_UNDO);
                self.last_error = None;
                self.text_buffers.clear();
            }
            Ok(None) => {}
            Err(e) => self.report(&e),
        }
    }

    fn redo(&mut self) {
        let Some(doc) = self.doc.as_mut() else {
            return;
        };
        match self.history.redo(doc) {
            Ok(Some(description)) => {
                self.status = format!("{} {description}", statics::EN_PREFIX_REDO);
                self.last_error = None;
                self.text_buffers.clear();
            }
            Ok(None) => {}
            Err(e) => self.report(&e),
        }
    }

    fn pick_content_file(&mut self, mime_type_hint: Option<&str>) -> Option<PathBuf> {
        if let Some(hint) = mime_type_hint {
            self.dialog_filters.register_mime_type(hint);
        }
        let mut dlg = self
            .dialog_filters
            .apply_to(rfd::FileDialog::new(), mime_type_hint);
        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }
        let path = dlg.pick_file()?;
        self.dialog_filters.remember_path(&path);
        self.dialog_dir = path.parent().map(PathBuf::from);
        Some(path)
    }

    fn apply_action(&mut self, action: UiAction) {
        let action = match action {
            UiAction::PickFile {
                node,
                mime_type_hint,
            } => {
                let Some(path) = self.pick_content_file(mime_type_hint.as_deref()) else {
                    return;
                };
                UiAction::Commit {
                    node,
                    value: CellValue::Text(path.display().to_string()),
                }
            }
            other => other,
        };

        let target = action.node().record();
        let Some(record) = self.doc.as_ref().and_then(|doc| doc.record(target)) else {
            self.last_error = Some(statics::EN_ERR_NO_RECORD.to_string());
            return;
        };

        let built = match action {
            UiAction::Commit { node, value } => self.editing.set_value(record, &node, value),
            UiAction::InsertItem(node) => self
                .editing
                .insert_list_item(record, &node, String::new())
                .map(Some),
            UiAction::RemoveItem(node) => self.editing.remove_list_item(record, &node).map(Some),
            // Resolved into a commit above.
            UiAction::PickFile { .. } => return,
        };

        match built {
            Ok(Some(op)) => self.submit(op),
            Ok(None) => {
                // Nothing changed; resync the buffer with the stored value.
                self.text_buffers.clear();
            }
            Err(e) => self.report(&e),
        }
    }

    fn render_node(
        &mut self,
        ui: &mut egui::Ui,
        record: &Record,
        node: &TreeNode,
        actions: &mut Vec<UiAction>,
    ) {
        if node.children().is_empty() && node.kind() != NodeKind::PropertyList {
            ui.horizontal(|ui| {
                ui.label(node_label(node));
                self.render_cell(ui, record, node, actions);
            });
            return;
        }

        egui::CollapsingHeader::new(node_label(node))
            .id_salt(node_key(node))
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| self.render_cell(ui, record, node, actions));
                for child in node.children() {
                    self.render_node(ui, record, child, actions);
                }
            });
    }

    fn render_cell(
        &mut self,
        ui: &mut egui::Ui,
        record: &Record,
        node: &TreeNode,
        actions: &mut Vec<UiAction>,
    ) {
        let editor = if self.editing.can_edit(node) {
            match self.editing.cell_editor(record, node) {
                Ok(editor) => editor,
                Err(e) => {
                    ui.colored_label(egui::Color32::RED, e.to_string());
                    self.report_once(node, &e);
                    None
                }
            }
        } else {
            None
        };

        if let Some(editor) = editor {
            match self.editing.value(record, node) {
                Ok(value) => match editor {
                    CellEditor::Text => self.render_text_editor(ui, node, value, actions),
                    CellEditor::Choice(choice) => {
                        self.render_choice_editor(ui, node, &choice, value, actions)
                    }
                    CellEditor::File { mime_type_hint } => {
                        if let CellValue::Text(summary) = &value {
                            ui.monospace(summary.as_str());
                        }
                        if ui.small_button(statics::EN_BTN_LOAD_FILE).clicked() {
                            actions.push(UiAction::PickFile {
                                node: node.clone(),
                                mime_type_hint,
                            });
                        }
                    }
                },
                Err(e) => {
                    ui.colored_label(egui::Color32::RED, e.to_string());
                    self.report_once(node, &e);
                }
            }
        }

        match node.kind() {
            NodeKind::PropertyList => {
                if ui.small_button(statics::EN_BTN_ADD_ITEM).clicked() {
                    actions.push(UiAction::InsertItem(node.clone()));
                }
            }
            NodeKind::PropertyListItem => {
                if ui.small_button(statics::EN_BTN_ADD_ITEM).clicked() {
                    actions.push(UiAction::InsertItem(node.clone()));
                }
                if ui.small_button(statics::EN_BTN_REMOVE_ITEM).clicked() {
                    actions.push(UiAction::RemoveItem(node.clone()));
                }
            }
            NodeKind::Record | NodeKind::ParentProperty | NodeKind::Property => {}
        }
    }

    fn render_text_editor(
        &mut self,
        ui: &mut egui::Ui,
        node: &TreeNode,
        value: CellValue,
        actions: &mut Vec<UiAction>,
    ) {
        let current = match value {
            CellValue::Text(s) => s,
            CellValue::Choice(_) => String::new(),
        };
        let buffer = self.text_buffers.entry(node_key(node)).or_insert(current);
        let resp = ui.add(egui::TextEdit::singleline(buffer).desired_width(260.0));
        let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if enter || ui.small_button(statics::EN_BTN_APPLY).clicked() {
            actions.push(UiAction::Commit {
                node: node.clone(),
                value: CellValue::Text(buffer.clone()),
            });
        }
    }

    fn render_choice_editor(
        &mut self,
        ui: &mut egui::Ui,
        node: &TreeNode,
        choice: &ChoiceEditor,
        value: CellValue,
        actions: &mut Vec<UiAction>,
    ) {
        let CellValue::Choice(selection) = value else {
            return;
        };
        let current = choice.widget_index(selection);
        let mut picked = current;
        let selected_text = usize::try_from(current)
            .ok()
            .and_then(|i| choice.items().get(i))
            .map(String::as_str)
            .unwrap_or_default();

        egui::ComboBox::from_id_salt(node_key(node))
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for (i, item) in choice.items().iter().enumerate() {
                    let Ok(i) = i32::try_from(i) else {
                        break;
                    };
                    ui.selectable_value(&mut picked, i, item.as_str());
                }
            });

        if picked != current {
            match choice.selection(picked) {
                Ok(value) => actions.push(UiAction::Commit {
                    node: node.clone(),
                    value,
                }),
                Err(e) => self.report(&e),
            }
        }
    }
}

impl eframe::App for NdefedApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Undo/Redo shortcuts.
        // Consumed here so egui text editors don't apply their own undo to our buffers.
        let mut do_undo = false;
        let mut do_redo = false;
        ctx.input_mut(|i| {
            let ctrl_shift = egui::Modifiers {
                shift: true,
                ..egui::Modifiers::CTRL
            };
            if i.consume_key(ctrl_shift, egui::Key::Z) {
                do_redo = true;
            }
            if i.consume_key(egui::Modifiers::CTRL, egui::Key::Y) {
                do_redo = true;
            }
            if i.consume_key(egui::Modifiers::CTRL, egui::Key::Z) {
                do_undo = true;
            }
        });
        if do_undo {
            self.undo();
            ctx.request_repaint();
        }
        if do_redo {
            self.redo();
            ctx.request_repaint();
        }

        let title = document_title(self.doc.as_ref());
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_NEW).clicked() {
                    self.new_document();
                }
                if ui.button(statics::EN_BTN_OPEN).clicked() {
                    self.open_file();
                }

                let has_doc = self.doc.is_some();
                if ui
                    .add_enabled(has_doc, egui::Button::new(statics::EN_BTN_SAVE_AS))
                    .clicked()
                {
                    self.save_file_as();
                }

                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }

                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }

                ui.separator();
                let can_undo = has_doc && self.history.can_undo();
                let can_redo = has_doc && self.history.can_redo();
                if ui
                    .add_enabled(can_undo, egui::Button::new(statics::EN_BTN_UNDO))
                    .clicked()
                {
                    self.undo();
                }
                if ui
                    .add_enabled(can_redo, egui::Button::new(statics::EN_BTN_REDO))
                    .clicked()
                {
                    self.redo();
                }
                if ui
                    .add_enabled(has_doc, egui::Button::new(statics::EN_BTN_CHANGES))
                    .clicked()
                {
                    self.changes_open = true;
                }

                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        if self.changes_open {
            let mut open = self.changes_open;
            let descriptions: Vec<String> = self.history.descriptions().collect();

            egui::Window::new(statics::EN_WINDOW_CHANGES)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    if descriptions.is_empty() {
                        ui.label(statics::EN_CHANGES_NONE);
                        return;
                    }
                    let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
                    ui.push_id("changes_table", |ui| {
                        TableBuilder::new(ui)
                            .striped(true)
                            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                            .column(Column::initial(40.0).resizable(false))
                            .column(Column::remainder().resizable(true))
                            .header(row_h, |mut header| {
                                header.col(|ui| {
                                    ui.strong(statics::EN_COL_NUMBER);
                                });
                                header.col(|ui| {
                                    ui.strong(statics::EN_COL_CHANGE);
                                });
                            })
                            .body(|body| {
                                body.rows(row_h, descriptions.len(), |mut row| {
                                    let i = row.index();
                                    row.col(|ui| {
                                        ui.label(format!("{}.", i + 1));
                                    });
                                    row.col(|ui| {
                                        ui.label(descriptions[i].as_str());
                                    });
                                });
                            });
                    });
                });
            self.changes_open = open;
        }

        if self.about_open {
            let mut open = self.about_open;
            egui::Window::new(statics::EN_WINDOW_ABOUT)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(statics::EN_ABOUT_HEADING);
                    ui.label(format!(
                        "{} {}",
                        statics::EN_ABOUT_VERSION,
                        env!("CARGO_PKG_VERSION")
                    ));
                    ui.separator();
                    ui.label(statics::EN_ABOUT_SHORTCUTS);
                    ui.label(statics::EN_ABOUT_SHORTCUT_UNDO);
                    ui.label(statics::EN_ABOUT_SHORTCUT_REDO);
                });
            self.about_open = open;
        }

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        let Some(doc) = self.doc.take() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading(statics::EN_HOME_HEADING);
                ui.label(statics::EN_HOME_HINT);
            });
            return;
        };

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("format: {:?}", doc.format));
                ui.separator();
                ui.label(format!("{} {}", statics::EN_LABEL_RECORDS_COUNT, doc.len()));
                ui.separator();
                ui.label(format!(
                    "{} {}",
                    statics::EN_LABEL_CHANGES_COUNT,
                    self.history.len()
                ));
                if doc.dirty {
                    ui.separator();
                    ui.colored_label(egui::Color32::YELLOW, statics::EN_BADGE_DIRTY);
                }
            });
        });

        let mut add_record = false;
        let mut remove_record = false;
        egui::SidePanel::left("records_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading(statics::EN_HEADING_RECORDS);
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label(statics::EN_LABEL_RECORD_TYPE);
                    if let CellEditor::Choice(types) =
                        record_type_choice_editor(&RecordType::ALL, false)
                    {
                        let selected_text = types
                            .items()
                            .get(self.new_record_type)
                            .map(String::as_str)
                            .unwrap_or_default();
                        egui::ComboBox::from_id_salt("new_record_type")
                            .selected_text(selected_text)
                            .show_ui(ui, |ui| {
                                for (i, item) in types.items().iter().enumerate() {
                                    ui.selectable_value(&mut self.new_record_type, i, item.as_str());
                                }
                            });
                    }
                    if ui.button(statics::EN_BTN_ADD_RECORD).clicked() {
                        add_record = true;
                    }
                    if ui
                        .add_enabled(
                            self.selected.is_some(),
                            egui::Button::new(statics::EN_BTN_REMOVE_RECORD),
                        )
                        .clicked()
                    {
                        remove_record = true;
                    }
                });
                ui.separator();

                let row_h = ui.text_style_height(&egui::TextStyle::Body) + 4.0;
                ui.push_id("records_scroll", |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            for (position, record) in doc.records().enumerate() {
                                let selected = self.selected == Some(record.id());
                                let label = record_row_label(position, record);
                                let resp = Self::selectable_row_left(ui, selected, &label, row_h);
                                if resp.clicked() && !selected {
                                    self.selected = Some(record.id());
                                    self.text_buffers.clear();
                                }
                            }
                        });
                });
            });

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            let selection = self
                .selected
                .and_then(|id| Some((doc.record(id)?, doc.tree(id)?)));
            let Some((record, tree)) = selection else {
                ui.label(statics::EN_SELECT_RECORD_HINT);
                return;
            };
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.render_node(ui, record, &tree, &mut actions);
                });
        });

        self.doc = Some(doc);

        if add_record {
            self.add_record();
        }
        if remove_record {
            self.remove_selected_record();
        }
        for action in actions {
            self.apply_action(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NdefedApp, UiAction, document_title, node_label, record_row_label};
    use crate::{
        CellValue, NodeKind, Record, RecordBody, RecordDocument, RecordId, RecordType, build_tree,
        node::slot, statics,
    };

    fn app_with_record(record_type: RecordType) -> (NdefedApp, RecordId) {
        let mut app = NdefedApp::default();
        app.new_document();
        app.new_record_type = RecordType::ALL
            .iter()
            .position(|t| *t == record_type)
            .unwrap();
        app.add_record();
        let id = app.selected.unwrap();
        (app, id)
    }

    fn node(app: &NdefedApp, id: RecordId, kind: NodeKind, index: usize) -> crate::TreeNode {
        let tree = app.doc.as_ref().unwrap().tree(id).unwrap();
        tree.find(kind, index).unwrap().clone()
    }

    #[test]
    fn labels_show_position_type_and_key() {
        let record = Record::new(RecordId::new(1), "", RecordBody::empty(RecordType::Uri));
        assert_eq!(record_row_label(0, &record), "1. URI Record");
        let record = Record::new(RecordId::new(1), "home", RecordBody::empty(RecordType::Text));
        assert_eq!(record_row_label(2, &record), "3. Text Record 'home'");

        let mut ac = Record::new(
            RecordId::new(2),
            "",
            RecordBody::empty(RecordType::AlternativeCarrier),
        );
        ac.alternative_carrier_mut()
            .unwrap()
            .insert_auxiliary_data_reference(0, "x".to_string())
            .unwrap();
        let tree = build_tree(&ac, 0);
        let item = tree.find(NodeKind::PropertyListItem, 0).unwrap();
        assert_eq!(node_label(item), "Auxiliary data reference [0]");
        assert_eq!(node_label(&tree), "Alternative Carrier Record 1");
    }

    #[test]
    fn title_marks_unsaved_changes() {
        assert_eq!(document_title(None), statics::EN_APP_TITLE);
        let mut doc = RecordDocument::new();
        assert_eq!(
            document_title(Some(&doc)),
            format!("{} - {}", statics::EN_UNTITLED_DOCUMENT, statics::EN_APP_TITLE)
        );
        doc.add_record(RecordType::Action);
        assert!(document_title(Some(&doc)).starts_with(&format!(
            "{}*",
            statics::EN_UNTITLED_DOCUMENT
        )));
    }

    #[test]
    fn committed_text_goes_through_history() {
        let (mut app, id) = app_with_record(RecordType::Uri);
        let uri = node(&app, id, NodeKind::Property, slot::URI);

        app.apply_action(UiAction::Commit {
            node: uri.clone(),
            value: CellValue::Text("https://example.com".to_string()),
        });
        let record = app.doc.as_ref().unwrap().record(id).unwrap();
        assert_eq!(record.uri().unwrap().uri(), Some("https://example.com"));
        assert!(app.history.can_undo());
        assert!(app.last_error.is_none());

        app.undo();
        let record = app.doc.as_ref().unwrap().record(id).unwrap();
        assert!(!record.uri().unwrap().has_uri());
        assert!(app.status.starts_with(statics::EN_PREFIX_UNDO));

        // Empty text on an unset field changes nothing.
        app.apply_action(UiAction::Commit {
            node: uri,
            value: CellValue::Text(String::new()),
        });
        assert!(!app.history.can_undo());
    }

    #[test]
    fn list_buttons_insert_and_remove_items() {
        let (mut app, id) = app_with_record(RecordType::AlternativeCarrier);
        let list = node(&app, id, NodeKind::PropertyList, slot::AUXILIARY_DATA_REFERENCES);
        app.apply_action(UiAction::InsertItem(list.clone()));
        app.apply_action(UiAction::InsertItem(list));

        let item = node(&app, id, NodeKind::PropertyListItem, 1);
        app.apply_action(UiAction::Commit {
            node: item.clone(),
            value: CellValue::Text("b".to_string()),
        });
        let record = app.doc.as_ref().unwrap().record(id).unwrap();
        assert_eq!(
            record.alternative_carrier().unwrap().auxiliary_data_references(),
            ["", "b"]
        );

        app.apply_action(UiAction::RemoveItem(node(&app, id, NodeKind::PropertyListItem, 0)));
        let record = app.doc.as_ref().unwrap().record(id).unwrap();
        assert_eq!(
            record.alternative_carrier().unwrap().auxiliary_data_references(),
            ["b"]
        );
        assert_eq!(app.history.len(), 4);
    }

    #[test]
    fn wrong_value_type_is_reported_and_nothing_changes() {
        let (mut app, id) = app_with_record(RecordType::Text);
        let text = node(&app, id, NodeKind::Property, slot::TEXT);
        app.apply_action(UiAction::Commit {
            node: text,
            value: CellValue::Choice(Some(0)),
        });
        assert!(app.last_error.is_some());
        assert!(!app.history.can_undo());
    }

    #[test]
    fn removing_a_record_clears_history() {
        let (mut app, id) = app_with_record(RecordType::Action);
        let action = node(&app, id, NodeKind::Property, slot::ACTION);
        app.apply_action(UiAction::Commit {
            node: action,
            value: CellValue::from_choice_index(0).unwrap(),
        });
        assert!(app.history.can_undo());

        app.remove_selected_record();
        assert!(!app.history.can_undo());
        assert!(app.selected.is_none());
        assert!(app.doc.as_ref().unwrap().is_empty());
    }

    #[test]
    fn unresolvable_editor_is_reported_once() {
        let (mut app, id) = app_with_record(RecordType::Uri);
        let bogus = crate::TreeNode::new(id, RecordType::Uri, NodeKind::Property, 9, "bogus");
        let err = {
            let record = app.doc.as_ref().unwrap().record(id).unwrap();
            app.editing.cell_editor(record, &bogus).unwrap_err()
        };
        assert!(err.is_fatal());

        app.report_once(&bogus, &err);
        assert!(app.last_error.is_some());
        app.last_error = None;
        app.report_once(&bogus, &err);
        assert!(app.last_error.is_none());

        app.new_document();
        assert!(app.failed_nodes.is_empty());
    }
}
