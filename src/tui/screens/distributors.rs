//! Distributors screen: supplier table with status, delete and the add form

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Clear,
    Frame,
};
use tracing::info;

use super::{table_feedback, Confirm};
use crate::billing::{add_distributor, DistributorDraft, FormError};
use crate::models::{Distributor, DistributorStatus, DATE_FORMAT};
use crate::store::DISTRIBUTORS_KEY;
use crate::table::{RowAction, TableEvent};
use crate::tables::distributor_table;
use crate::tui::app::{AppContext, Screen};
use crate::tui::components::{DataTable, Form, FormField, FormFieldType, FormInput};
use crate::tui::traits::{Screen as ScreenTrait, ScreenAction};
use crate::tui::ui::{centered_rect, render_cards, render_confirm};

fn add_form(today: chrono::NaiveDate) -> Form {
    Form::new(
        "Add Distributor",
        vec![
            FormField::new("Company Name", FormFieldType::Text),
            FormField::new("Mobile", FormFieldType::Text).with_placeholder("10 digits"),
            FormField::new("Email", FormFieldType::Text),
            FormField::new("Date", FormFieldType::Date).with_value(&today.format(DATE_FORMAT).to_string()),
            FormField::new("Address", FormFieldType::Text),
        ],
    )
}

fn draft_from(form: &Form) -> DistributorDraft {
    DistributorDraft {
        company_name: form.value(0).to_string(),
        mobile: form.value(1).to_string(),
        email: form.value(2).to_string(),
        date: form.value(3).to_string(),
        address: form.value(4).to_string(),
    }
}

fn error_label(error: &FormError) -> Option<&'static str> {
    match error {
        FormError::Required(field) => Some(*field),
        FormError::InvalidEmail(_) | FormError::DuplicateEmail(_) => Some("Email"),
        FormError::InvalidMobile(_) => Some("Mobile"),
        FormError::InvalidDate(_) => Some("Date"),
        _ => None,
    }
}

enum Mode {
    Browse,
    Add(Form),
    ConfirmDelete(Confirm<String>),
}

pub struct DistributorsScreen {
    pub distributors: Vec<Distributor>,
    pub table: DataTable<Distributor, String>,
    mode: Mode,
}

impl DistributorsScreen {
    pub fn new(ctx: &AppContext) -> Result<Self> {
        let distributors = ctx.store.load_or_seed(DISTRIBUTORS_KEY, Vec::new)?;
        let view = distributor_table(distributors.clone(), ctx.config.page_size)?;
        Ok(Self {
            distributors,
            table: DataTable::new(view, "Distributors", &ctx.config.export_dir, "distributors"),
            mode: Mode::Browse,
        })
    }

    fn save_and_refresh(&mut self, ctx: &AppContext) -> Result<()> {
        ctx.store.save(DISTRIBUTORS_KEY, &self.distributors)?;
        self.table.view.replace_records(self.distributors.clone());
        Ok(())
    }

    fn remove(&mut self, emails: &[String], ctx: &AppContext) -> Result<usize> {
        let before = self.distributors.len();
        self.distributors.retain(|d| !emails.contains(&d.email));
        let removed = before - self.distributors.len();
        self.save_and_refresh(ctx)?;
        info!("Deleted {} distributors", removed);
        Ok(removed)
    }

    pub fn is_adding(&self) -> bool {
        matches!(self.mode, Mode::Add(_))
    }

    pub fn pending_delete(&self) -> Option<&Confirm<String>> {
        match self.mode {
            Mode::ConfirmDelete(ref confirm) => Some(confirm),
            _ => None,
        }
    }

    fn handle_table_event(&mut self, event: TableEvent<Distributor>, ctx: &AppContext) -> Result<ScreenAction> {
        match event {
            TableEvent::DropdownChanged { row, value } => {
                let Some(status) = DistributorStatus::parse(&value) else {
                    return Ok(ScreenAction::SetError(format!("Unknown status '{}'", value)));
                };
                if let Some(d) = self.distributors.iter_mut().find(|d| d.email == row.email) {
                    d.status = status;
                }
                self.table.view.edit_record(&row.email, |d| d.status = status)?;
                ctx.store.save(DISTRIBUTORS_KEY, &self.distributors)?;
                Ok(ScreenAction::SetStatus(format!("{} is now {}", row.company_name, value)))
            }
            TableEvent::RowAction {
                action: RowAction::Delete,
                row,
            } => {
                self.remove(&[row.email], ctx)?;
                Ok(ScreenAction::SetStatus("Data deleted successfully".to_string()))
            }
            TableEvent::BulkDelete(rows) => {
                let ids = rows.into_iter().map(|r| r.email).collect();
                self.mode = Mode::ConfirmDelete(Confirm::delete(ids, "distributor"));
                Ok(ScreenAction::None)
            }
            TableEvent::RowAction { .. } | TableEvent::SelectionChanged(_) => Ok(ScreenAction::None),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        if !self.table.searching {
            match key.code {
                KeyCode::Esc => return Ok(ScreenAction::NavigateTo(Screen::MainMenu)),
                KeyCode::Char('n') => {
                    self.mode = Mode::Add(add_form(ctx.today));
                    return Ok(ScreenAction::ClearMessages);
                }
                _ => {}
            }
        }

        let mut events: Vec<TableEvent<Distributor>> = Vec::new();
        let input = self.table.handle_key(key, &mut events);
        let mut action = table_feedback(input);
        for event in events {
            match self.handle_table_event(event, ctx)? {
                ScreenAction::None => {}
                other => action = other,
            }
        }
        Ok(action)
    }

    fn handle_form_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        let Mode::Add(ref mut form) = self.mode else {
            return Ok(ScreenAction::None);
        };
        match form.handle_key(key) {
            FormInput::Cancel => {
                self.mode = Mode::Browse;
                Ok(ScreenAction::None)
            }
            FormInput::Submit => {
                form.clear_errors();
                let draft = draft_from(form);
                let name = draft.company_name.trim().to_string();
                match add_distributor(&mut self.distributors, draft) {
                    Ok(()) => {
                        self.mode = Mode::Browse;
                        self.save_and_refresh(ctx)?;
                        Ok(ScreenAction::SetStatus(format!("{} saved", name)))
                    }
                    Err(e) => {
                        form.set_error(error_label(&e), e.to_string());
                        Ok(ScreenAction::None)
                    }
                }
            }
            FormInput::Handled | FormInput::Ignored => Ok(ScreenAction::None),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let Mode::ConfirmDelete(confirm) = std::mem::replace(&mut self.mode, Mode::Browse) else {
                    return Ok(ScreenAction::None);
                };
                let removed = self.remove(&confirm.ids, ctx)?;
                Ok(ScreenAction::SetStatus(format!("Deleted {} distributor(s)", removed)))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Browse;
                Ok(ScreenAction::SetStatus("Delete cancelled".to_string()))
            }
            _ => Ok(ScreenAction::None),
        }
    }
}

impl ScreenTrait for DistributorsScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let active = self
            .distributors
            .iter()
            .filter(|d| d.status == DistributorStatus::Active)
            .count();
        render_cards(
            f,
            chunks[0],
            &[
                ("Total Distributors", self.distributors.len().to_string()),
                ("Active", active.to_string()),
                ("Inactive", (self.distributors.len() - active).to_string()),
            ],
        );
        self.table.render(f, chunks[1]);

        match self.mode {
            Mode::Browse => {}
            Mode::Add(ref form) => {
                let popup = centered_rect(60, 80, area);
                f.render_widget(Clear, popup);
                form.render(f, popup, &[]);
            }
            Mode::ConfirmDelete(ref confirm) => render_confirm(f, area, &confirm.message),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key, ctx),
            Mode::Add(_) => self.handle_form_key(key, ctx),
            Mode::ConfirmDelete(_) => self.handle_confirm_key(key, ctx),
        }
    }

    fn help_text(&self) -> &'static str {
        "Distributors:\n\
        ↑/↓ - Row, ←/→ - Page\n\
        / - Search\n\
        Space - Select row, a - Select all, x - Delete selected\n\
        s - Toggle Active/Inactive\n\
        1 - Delete row\n\
        e - Export CSV, J - Export JSON\n\
        n - Add distributor\n\
        Esc - Main menu"
    }

    fn captures_input(&self) -> bool {
        self.table.searching || !matches!(self.mode, Mode::Browse)
    }

    fn on_enter(&mut self, ctx: &mut AppContext) -> Result<()> {
        if let Some(distributors) = ctx.store.load(DISTRIBUTORS_KEY)? {
            self.distributors = distributors;
            self.table.view.replace_records(self.distributors.clone());
        }
        Ok(())
    }
}
