//! Main TUI application state and logic

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use super::events::{spawn_input_reader, AppEvent};
use super::screens::*;
use super::traits::{Screen as ScreenTrait, ScreenAction};
use super::ui::{centered_rect, Styles};
use crate::config::Config;
use crate::store::JsonStore;

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Dashboard,
    Invoices,
    InvoiceView,
    Distributors,
    Inventory,
    Help,
}

impl Screen {
    pub fn title(&self) -> &str {
        match self {
            Screen::MainMenu => "Main Menu",
            Screen::Dashboard => "Dashboard",
            Screen::Invoices => "Invoices",
            Screen::InvoiceView => "Tax Invoice",
            Screen::Distributors => "Distributors",
            Screen::Inventory => "Inventory",
            Screen::Help => "Help",
        }
    }
}

/// State shared by all screens
pub struct AppContext {
    pub config: Config,
    pub store: JsonStore,
    /// Reference date for period filters
    pub today: NaiveDate,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let store = JsonStore::open(&config.data_dir)?;
        Ok(Self {
            config,
            store,
            today: Local::now().date_naive(),
        })
    }
}

pub struct Screens {
    pub main_menu: MainMenuScreen,
    pub dashboard: DashboardScreen,
    pub invoices: InvoicesScreen,
    pub invoice_view: InvoiceViewScreen,
    pub distributors: DistributorsScreen,
    pub inventory: InventoryScreen,
    pub help: HelpScreen,
}

impl Screens {
    fn get(&mut self, screen: Screen) -> &mut dyn ScreenTrait {
        match screen {
            Screen::MainMenu => &mut self.main_menu,
            Screen::Dashboard => &mut self.dashboard,
            Screen::Invoices => &mut self.invoices,
            Screen::InvoiceView => &mut self.invoice_view,
            Screen::Distributors => &mut self.distributors,
            Screen::Inventory => &mut self.inventory,
            Screen::Help => &mut self.help,
        }
    }
}

/// Message in the bottom bar; replaces the key hints until cleared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Info(String),
    Error(String),
}

pub struct App {
    pub current_screen: Screen,
    pub ctx: AppContext,
    pub screens: Screens,
    pub should_quit: bool,
    pub show_help_popup: bool,
    pub status: Option<StatusLine>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let ctx = AppContext::new(config)?;
        Ok(Self {
            current_screen: Screen::MainMenu,
            screens: Screens {
                main_menu: MainMenuScreen::new().with_store_name(&ctx.config.store_name),
                dashboard: DashboardScreen::new(&ctx)?,
                invoices: InvoicesScreen::new(&ctx)?,
                invoice_view: InvoiceViewScreen::new(&ctx),
                distributors: DistributorsScreen::new(&ctx)?,
                inventory: InventoryScreen::new(&ctx)?,
                help: HelpScreen::new(),
            },
            ctx,
            should_quit: false,
            show_help_popup: false,
            status: None,
        })
    }

    /// Draw, then wait for a key or a chart tick, until quit
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reader = spawn_input_reader(tx);
        let mut ticker = tokio::time::interval(self.ctx.config.chart_tick());
        self.status = Some(StatusLine::Info(format!(
            "Ready - data in {}",
            self.ctx.store.dir().display()
        )));

        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                event = rx.recv() => match event {
                    Some(AppEvent::Key(key)) => self.handle_key_event(key)?,
                    Some(AppEvent::Resize(..)) => {}
                    None => break,
                },
                _ = ticker.tick() => self.on_tick(),
            }
        }

        drop(rx);
        if reader.join().is_err() {
            error!("Input reader thread panicked");
        }
        Ok(())
    }

    pub fn on_tick(&mut self) {
        self.screens.get(self.current_screen).on_tick();
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if self.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help_popup = false;
            }
            return Ok(());
        }

        // Global keys, unless the screen is taking text input
        let captures = self.screens.get(self.current_screen).captures_input();
        match key.code {
            KeyCode::F(1) => self.show_help_popup = true,
            KeyCode::Char('?') if !captures => self.show_help_popup = true,
            KeyCode::Char('q') if !captures => self.should_quit = true,
            _ => {
                let result = self
                    .screens
                    .get(self.current_screen)
                    .handle_key_event(key, &mut self.ctx);
                match result {
                    Ok(action) => return self.apply(action),
                    Err(e) => {
                        error!("{} screen failed: {:#}", self.current_screen.title(), e);
                        self.status = Some(StatusLine::Error(format!("{:#}", e)));
                    }
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, action: ScreenAction) -> Result<()> {
        match action {
            ScreenAction::NavigateTo(screen) => self.navigate_to_screen(screen)?,
            ScreenAction::OpenInvoice(invoice) => {
                self.screens.invoice_view.set_invoice(*invoice);
                self.navigate_to_screen(Screen::InvoiceView)?;
            }
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::SetStatus(message) => self.status = Some(StatusLine::Info(message)),
            ScreenAction::SetError(message) => self.status = Some(StatusLine::Error(message)),
            ScreenAction::ClearMessages => self.status = None,
            ScreenAction::None => {}
        }
        Ok(())
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.screens.get(self.current_screen).draw(f, chunks[0]);
        self.draw_status_bar(f, chunks[1]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let (text, style) = match &self.status {
            Some(StatusLine::Error(err)) => (format!("Error: {}", err), Styles::error()),
            Some(StatusLine::Info(msg)) => (format!("Status: {}", msg), Styles::success()),
            None => (
                format!(
                    "PharmaBill - {} | ESC: Back | Q: Quit | F1/?: Help",
                    self.current_screen.title()
                ),
                Styles::inactive(),
            ),
        };

        let status_bar = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(status_bar, area);
    }

    /// Global keys followed by the current screen's own shortcuts
    fn draw_help_popup(&mut self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(80, 70, area);
        f.render_widget(Clear, popup_area);

        let global_help = "Global Shortcuts:\n\
            ESC - Go back\n\
            Q - Quit application\n\
            F1 / ? - Toggle this help\n\n";
        let content = format!(
            "{}{}",
            global_help,
            self.screens.get(self.current_screen).help_text()
        );

        let help_popup = Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Styles::warning()),
            );
        f.render_widget(help_popup, popup_area);
    }

    pub fn navigate_to_screen(&mut self, screen: Screen) -> Result<()> {
        info!("Navigating to {}", screen.title());
        self.current_screen = screen;
        self.status = None;
        self.screens.get(screen).on_enter(&mut self.ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App {
        let config = Config {
            data_dir: dir.path().join("data"),
            log_dir: dir.path().to_path_buf(),
            export_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        App::new(config).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    #[test]
    fn test_menu_shortcut_navigates_and_esc_returns() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.current_screen, Screen::Invoices);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_screen, Screen::MainMenu);
    }

    #[test]
    fn test_table_feedback_reaches_status_line() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.status, Some(StatusLine::Info("No rows selected".to_string())));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_help_popup_toggles() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help_popup);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help_popup);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_search_mode_swallows_quit_key() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.current_screen, Screen::Inventory);
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.screens.inventory.table.view.search(), "q");
    }

    #[test]
    fn test_draw_shows_status_bar() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.width)
            .map(|x| buffer.get(x, buffer.area.height - 2).symbol().to_string())
            .collect();
        assert!(text.contains("PharmaBill - Main Menu"));
    }
}
