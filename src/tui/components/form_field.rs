//! Editable form fields and the popup form that stacks them

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::{traits::FormHandler, ui::Styles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFieldType {
    Text,
    Date,
    Number,
    /// Fixed choice list, cycled with ←/→
    Dropdown,
}

/// One labelled input. Text kinds keep a char cursor; drop-downs only
/// move between their options.
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub kind: FormFieldType,
    pub options: Vec<String>,
    pub error: Option<String>,
    cursor: usize,
}

impl FormField {
    pub fn new(label: &str, kind: FormFieldType) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            kind,
            options: Vec::new(),
            error: None,
            cursor: 0,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    /// Restrict the field to `options`; an empty value becomes the first one
    pub fn with_dropdown_options(mut self, options: Vec<String>) -> Self {
        if self.value.is_empty() {
            self.value = options.first().cloned().unwrap_or_default();
        }
        self.options = options;
        self
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
        self.error = None;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn is_choice(&self) -> bool {
        self.kind == FormFieldType::Dropdown
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// Byte offset of char `pos`, or the end of the value
    fn offset(&self, pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(pos)
            .map_or(self.value.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, c: char) {
        if self.is_choice() {
            return;
        }
        let at = self.offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if self.is_choice() || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.offset(self.cursor);
        self.value.remove(at);
        self.error = None;
    }

    pub fn delete_forward(&mut self) {
        if self.is_choice() || self.cursor >= self.char_count() {
            return;
        }
        let at = self.offset(self.cursor);
        self.value.remove(at);
        self.error = None;
    }

    pub fn left(&mut self) {
        if self.is_choice() {
            self.step_option(-1);
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn right(&mut self) {
        if self.is_choice() {
            self.step_option(1);
        } else {
            self.cursor = (self.cursor + 1).min(self.char_count());
        }
    }

    fn step_option(&mut self, delta: isize) {
        let len = self.options.len() as isize;
        if len == 0 {
            return;
        }
        let current = self.options.iter().position(|o| *o == self.value).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.value = self.options[next].clone();
        self.error = None;
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool) {
        let border_style = match (focused, &self.error) {
            (true, _) => Styles::active_border(),
            (false, Some(_)) => Styles::error(),
            (false, None) => Styles::inactive_border(),
        };
        let title = match &self.error {
            Some(error) => format!("{} - Error: {}", self.label, error),
            None => self.label.clone(),
        };

        let line = if self.is_choice() {
            Line::from(vec![
                Span::styled("‹ ", Styles::inactive()),
                Span::styled(self.value.clone(), Styles::status(&self.value)),
                Span::styled(" ›", Styles::inactive()),
            ])
        } else if self.value.is_empty() {
            Line::from(Span::styled(self.placeholder.clone(), Styles::inactive()))
        } else {
            Line::from(self.value.clone())
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);
        f.render_widget(Paragraph::new(line).block(block), area);

        if focused && !self.is_choice() {
            let typed: String = self.value.chars().take(self.cursor).collect();
            let x = area.x + 1 + typed.width() as u16;
            if x < area.right().saturating_sub(1) {
                f.set_cursor(x, area.y + 1);
            }
        }
    }
}

/// What a key press did to a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Handled,
    Submit,
    Cancel,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub title: String,
    pub fields: Vec<FormField>,
    /// Form-level error shown under the fields
    pub error: Option<String>,
    focus: usize,
}

impl Form {
    pub fn new(title: &str, fields: Vec<FormField>) -> Self {
        Self {
            title: title.to_string(),
            fields,
            error: None,
            focus: 0,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut FormField> {
        self.fields.get_mut(index)
    }

    fn focused_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focus)
    }

    /// Attach an error to the field labelled `label` (if any) and to the form
    pub fn set_error(&mut self, label: Option<&str>, message: String) {
        if let Some(field) = label.and_then(|l| self.fields.iter_mut().find(|f| f.label == l)) {
            field.error = Some(message.clone());
        }
        self.error = Some(message);
    }

    pub fn clear_errors(&mut self) {
        self.error = None;
        self.fields.iter_mut().for_each(|f| f.error = None);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        match key.code {
            KeyCode::Esc => return FormInput::Cancel,
            KeyCode::Enter => return FormInput::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_previous(),
            KeyCode::Left => self.focused_mut().into_iter().for_each(FormField::left),
            KeyCode::Right => self.focused_mut().into_iter().for_each(FormField::right),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert_char(c),
            _ => return FormInput::Ignored,
        }
        FormInput::Handled
    }

    /// Fields stacked in a bordered popup, with `extra` lines and the key
    /// hints underneath
    pub fn render(&self, f: &mut Frame, area: Rect, extra: &[Line]) {
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let constraints = self
            .fields
            .iter()
            .map(|_| Constraint::Length(3))
            .chain(std::iter::once(Constraint::Min(0)));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints.collect::<Vec<_>>())
            .split(inner);

        for (i, (field, chunk)) in self.fields.iter().zip(chunks.iter()).enumerate() {
            field.render(f, *chunk, i == self.focus);
        }

        let mut footer = extra.to_vec();
        if let Some(error) = &self.error {
            footer.push(Line::from(Span::styled(error.clone(), Styles::error())));
        }
        footer.push(Line::from(Span::styled(
            "Tab/↑↓: field  ←/→: cursor or option  Enter: submit  Esc: cancel",
            Styles::inactive(),
        )));
        if let Some(last) = chunks.last() {
            f.render_widget(Paragraph::new(footer), *last);
        }
    }
}

impl FormHandler for Form {
    fn focused(&self) -> usize {
        self.focus
    }

    fn focus(&mut self, field: usize) {
        if field < self.fields.len() {
            self.focus = field;
        }
    }

    fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn insert_char(&mut self, c: char) {
        if let Some(field) = self.focused_mut() {
            field.insert(c);
        }
    }

    fn backspace(&mut self) {
        if let Some(field) = self.focused_mut() {
            field.backspace();
        }
    }

    fn delete_forward(&mut self) {
        if let Some(field) = self.focused_mut() {
            field.delete_forward();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_text_editing_handles_multibyte_chars() {
        let mut field = FormField::new("Patient", FormFieldType::Text).with_value("Ré");
        field.insert('x');
        assert_eq!(field.value, "Réx");
        field.left();
        field.left();
        field.backspace();
        assert_eq!(field.value, "éx");
        field.delete_forward();
        assert_eq!(field.value, "x");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_dropdown_field_cycles_and_ignores_typing() {
        let mut field = FormField::new("Status", FormFieldType::Dropdown)
            .with_dropdown_options(vec!["Paid".into(), "Pending".into(), "Overdue".into()]);
        assert_eq!(field.value, "Paid");
        field.insert('z');
        assert_eq!(field.value, "Paid");
        field.left();
        assert_eq!(field.value, "Overdue");
        field.right();
        assert_eq!(field.value, "Paid");
    }

    #[test]
    fn test_form_navigation_wraps() {
        let mut form = Form::new(
            "Test",
            vec![
                FormField::new("A", FormFieldType::Text),
                FormField::new("B", FormFieldType::Text),
            ],
        );
        assert_eq!(form.handle_key(key(KeyCode::BackTab)), FormInput::Handled);
        assert_eq!(form.focused(), 1);
        form.handle_key(key(KeyCode::Char('q')));
        assert_eq!(form.value(1), "q");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormInput::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormInput::Cancel);
        assert_eq!(form.handle_key(key(KeyCode::F(5))), FormInput::Ignored);
    }

    #[test]
    fn test_set_error_marks_field() {
        let mut form = Form::new("Test", vec![FormField::new("Email", FormFieldType::Text)]);
        form.set_error(Some("Email"), "bad".to_string());
        assert_eq!(form.fields[0].error.as_deref(), Some("bad"));
        form.clear_errors();
        assert!(form.error.is_none());
        assert!(form.fields[0].error.is_none());
    }
}
