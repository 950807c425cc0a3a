use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::style::Style;
use std::time::Instant;

use crate::store::SimStore;
use crate::ui::table::{SimulationsTable, SimulationsTableProps, TableAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    Confirm,
    EditForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Status,
}

pub struct App {
    pub store: SimStore,
    pub selected: Option<usize>,
    pub popup: Popup,
    pub table: SimulationsTable,

    // Edit form state (shared between edit and create)
    pub input_name: String,
    pub input_status: String,
    pub edit_field: EditField,
    pub edit_target: Option<u64>, // None = creating a new record

    // Record awaiting delete confirmation
    pub pending_delete: Option<u64>,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    status_message_time: Option<Instant>,
}

impl App {
    pub fn new(store: SimStore) -> Self {
        Self {
            store,
            selected: None,
            popup: Popup::None,
            table: SimulationsTable::default(),

            input_name: String::new(),
            input_status: String::new(),
            edit_field: EditField::Name,
            edit_target: None,

            pending_delete: None,

            status_message: None,
            status_message_time: None,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    fn current(&self) -> Option<&crate::models::Simulation> {
        self.selected.and_then(|i| self.store.simulations().get(i))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),

            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(i) = self.selected {
                    self.apply(TableAction::Select(i));
                } else if !self.store.is_empty() {
                    self.apply(TableAction::Select(0));
                }
            }

            KeyCode::Char('e') => {
                if let Some(id) = self.current().map(|s| s.id) {
                    self.apply(TableAction::Edit(id));
                }
            }

            KeyCode::Char('n') => self.start_create(),

            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.current().map(|s| s.id) {
                    self.apply(TableAction::Delete(id));
                }
            }

            KeyCode::Char('R') => self.reload()?,

            KeyCode::Esc => self.selected = None,

            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    /// Route a mouse event through the table component and apply whatever
    /// action it resolves to.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.popup != Popup::None {
            return;
        }

        let action = {
            let props = SimulationsTableProps {
                simulations: (!self.store.is_empty()).then(|| self.store.simulations()),
                selected: self.selected,
                block: None,
                style: Style::default(),
                on_select: TableAction::Select,
                on_edit: TableAction::Edit,
                on_delete: TableAction::Delete,
            };
            self.table.handle_mouse(&event, props)
        };

        if let Some(action) = action {
            self.apply(action);
        }
    }

    /// Apply a table action. Select carries the row's positional index;
    /// Edit and Delete carry the record's own id.
    pub fn apply(&mut self, action: TableAction) {
        match action {
            TableAction::Select(i) => {
                if let Some(sim) = self.store.simulations().get(i) {
                    let name = sim.name.clone();
                    self.selected = Some(i);
                    self.set_status(format!("Selected '{}'", name));
                }
            }
            TableAction::Edit(id) => self.open_edit(id),
            TableAction::Delete(id) => self.request_delete(id),
        }
    }

    fn open_edit(&mut self, id: u64) {
        if let Some(sim) = self.store.get(id) {
            self.input_name = sim.name.clone();
            self.input_status = sim.status.clone();
            self.edit_target = Some(id);
            self.edit_field = EditField::Name;
            self.popup = Popup::EditForm;
        }
    }

    fn start_create(&mut self) {
        self.input_name.clear();
        self.input_status = "ready".to_string();
        self.edit_target = None;
        self.edit_field = EditField::Name;
        self.popup = Popup::EditForm;
    }

    fn request_delete(&mut self, id: u64) {
        if let Some(sim) = self.store.get(id) {
            self.set_status(format!("Delete '{}'? (y/n)", sim.name));
            self.pending_delete = Some(id);
            self.popup = Popup::Confirm;
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc
                        | KeyCode::Char('?')
                        | KeyCode::Char('h')
                        | KeyCode::Enter
                        | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::Confirm => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => {
                        self.popup = Popup::None;
                        self.confirm_pending_delete();
                    }
                    KeyCode::Char('n') | KeyCode::Esc => {
                        self.pending_delete = None;
                        self.popup = Popup::None;
                    }
                    _ => {}
                }
                Ok(())
            }
            Popup::EditForm => {
                self.handle_edit_key(key);
                Ok(())
            }
            Popup::None => Ok(()),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.popup = Popup::None;
                self.input_name.clear();
                self.input_status.clear();
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.edit_field = match self.edit_field {
                    EditField::Name => EditField::Status,
                    EditField::Status => EditField::Name,
                };
            }
            KeyCode::Enter => {
                if self.edit_field == EditField::Name {
                    self.edit_field = EditField::Status;
                } else {
                    self.save_edit();
                }
            }
            KeyCode::Backspace => {
                match self.edit_field {
                    EditField::Name => self.input_name.pop(),
                    EditField::Status => self.input_status.pop(),
                };
            }
            KeyCode::Char(c) => {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                    match self.edit_field {
                        EditField::Name => self.input_name.push(c),
                        EditField::Status => self.input_status.push(c),
                    }
                }
            }
            _ => {}
        }
    }

    fn save_edit(&mut self) {
        let name = self.input_name.trim().to_string();
        if name.is_empty() {
            self.set_status("Enter a name first");
            return;
        }
        let status = {
            let s = self.input_status.trim();
            if s.is_empty() { "ready" } else { s }.to_string()
        };

        let result = match self.edit_target {
            Some(id) => self.store.update(id, name.clone(), status).map(|_| id),
            None => self.store.add(name.clone(), status),
        };

        match result {
            Ok(id) => {
                self.set_status(format!("Saved '{}'", name));
                self.selected = self.store.simulations().iter().position(|s| s.id == id);
                self.popup = Popup::None;
                self.input_name.clear();
                self.input_status.clear();
            }
            Err(e) => {
                // Keep the form open so nothing typed is lost
                self.set_status(format!("Save failed: {}", e));
            }
        }
    }

    fn confirm_pending_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };

        match self.store.remove(id) {
            Ok(removed) => {
                self.set_status(format!("Deleted '{}'", removed.name));
                // Keep the highlight on a valid row
                if self.store.is_empty() {
                    self.selected = None;
                } else if let Some(sel) = self.selected {
                    if sel >= self.store.len() {
                        self.selected = Some(self.store.len() - 1);
                    }
                }
            }
            Err(e) => self.set_status(format!("Delete failed: {}", e)),
        }
    }

    fn move_down(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.store.len(),
            None => 0,
        });
    }

    fn move_up(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let len = self.store.len();
        self.selected = Some(match self.selected {
            Some(i) => i.checked_sub(1).unwrap_or(len - 1),
            None => len - 1,
        });
    }

    fn reload(&mut self) -> Result<()> {
        self.store = SimStore::load(self.store.path().to_path_buf())?;
        if let Some(sel) = self.selected {
            if sel >= self.store.len() {
                self.selected = None;
            }
        }
        self.set_status("Reloaded");
        Ok(())
    }

    pub fn tick(&mut self) {
        // Clear status message after 3 seconds
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(names: &[&str]) -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SimStore::load(dir.path().join("simulations.toml")).unwrap();
        for name in names {
            store.add(*name, "ready").unwrap();
        }
        (dir, App::new(store))
    }

    #[test]
    fn test_navigation_wraps() {
        let (_dir, mut app) = app_with(&["a", "b"]);

        app.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected, Some(0));
        app.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected, Some(1));
        app.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected, Some(0));
        app.handle_key(key(KeyCode::Up)).unwrap();
        assert_eq!(app.selected, Some(1));
    }

    #[test]
    fn test_select_action_uses_row_index() {
        let (_dir, mut app) = app_with(&["a", "b"]);

        app.apply(TableAction::Select(1));
        assert_eq!(app.selected, Some(1));

        // Out-of-range indices are ignored
        app.apply(TableAction::Select(5));
        assert_eq!(app.selected, Some(1));
    }

    #[test]
    fn test_edit_action_opens_form_for_record_id() {
        let (_dir, mut app) = app_with(&["a", "b"]);

        app.apply(TableAction::Edit(2));
        assert_eq!(app.popup, Popup::EditForm);
        assert_eq!(app.edit_target, Some(2));
        assert_eq!(app.input_name, "b");
    }

    #[test]
    fn test_delete_flow_requires_confirmation() {
        let (_dir, mut app) = app_with(&["a", "b"]);
        app.selected = Some(1);

        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.popup, Popup::Confirm);
        assert_eq!(app.pending_delete, Some(2));
        assert_eq!(app.store.len(), 2);

        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.popup, Popup::None);
        // Selection clamped back onto a valid row
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_delete_can_be_cancelled() {
        let (_dir, mut app) = app_with(&["a"]);
        app.selected = Some(0);

        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        app.handle_key(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.pending_delete, None);
    }

    #[test]
    fn test_create_flow_adds_record() {
        let (_dir, mut app) = app_with(&[]);

        app.handle_key(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.popup, Popup::EditForm);
        assert_eq!(app.edit_target, None);

        for c in "run-7".chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        app.handle_key(key(KeyCode::Enter)).unwrap(); // name -> status field
        app.handle_key(key(KeyCode::Enter)).unwrap(); // save

        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.simulations()[0].name, "run-7");
        assert_eq!(app.store.simulations()[0].status, "ready");
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_edit_updates_in_place() {
        let (_dir, mut app) = app_with(&["a"]);

        app.apply(TableAction::Edit(1));
        app.handle_key(key(KeyCode::Backspace)).unwrap();
        app.handle_key(key(KeyCode::Char('z'))).unwrap();
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.store.simulations()[0].name, "z");
        assert_eq!(app.store.len(), 1);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let (_dir, mut app) = app_with(&[]);

        app.handle_key(key(KeyCode::Char('n'))).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.popup, Popup::EditForm);
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_escape_clears_selection() {
        let (_dir, mut app) = app_with(&["a"]);
        app.selected = Some(0);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.selected, None);
    }
}
