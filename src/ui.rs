use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use simple_bank::{
    format_money, parse_account_id, parse_amount, Account, AccountRepository, BankError,
    ErrorKind, Palette, Rgb, ThemeMode,
};
use std::io;
use tracing::{error, info, warn};

pub const WINDOW_TITLE: &str = "Simple Banking System";

// ============================================================================
// MENU
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    CreateAccount,
    Deposit,
    Withdraw,
    CheckBalance,
    ListAccounts,
    ToggleTheme,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 7] = [
        MenuAction::CreateAccount,
        MenuAction::Deposit,
        MenuAction::Withdraw,
        MenuAction::CheckBalance,
        MenuAction::ListAccounts,
        MenuAction::ToggleTheme,
        MenuAction::Exit,
    ];

    pub fn label(&self, theme: ThemeMode) -> &'static str {
        match self {
            MenuAction::CreateAccount => "Create Account",
            MenuAction::Deposit => "Deposit Money",
            MenuAction::Withdraw => "Withdraw Money",
            MenuAction::CheckBalance => "Check Balance",
            MenuAction::ListAccounts => "View All Accounts",
            MenuAction::ToggleTheme => theme.toggle_label(),
            MenuAction::Exit => "Exit",
        }
    }

    /// Number key that activates this entry ('1'..='7')
    pub fn shortcut(&self) -> char {
        let index = Self::ALL.iter().position(|a| a == self).unwrap_or(0);
        char::from(b'1' + index as u8)
    }

    fn from_shortcut(c: char) -> Option<Self> {
        let index = c.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }
}

// ============================================================================
// DIALOGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Deposit,
    Withdraw,
}

impl TransferKind {
    pub fn title(&self) -> &'static str {
        match self {
            TransferKind::Deposit => "Deposit",
            TransferKind::Withdraw => "Withdraw",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            TransferKind::Deposit => "deposited",
            TransferKind::Withdraw => "withdrawn",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
}

impl TextInput {
    fn push(&mut self, c: char) {
        self.value.push(c);
    }

    fn backspace(&mut self) {
        self.value.pop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AccountId,
    Amount,
}

#[derive(Debug)]
pub enum Dialog {
    CreateAccount {
        name: TextInput,
    },
    Transfer {
        kind: TransferKind,
        account_id: TextInput,
        amount: TextInput,
        focus: Field,
    },
    CheckBalance {
        account_id: TextInput,
    },
    AccountList {
        accounts: Vec<Account>,
        state: TableState,
    },
}

impl Dialog {
    fn transfer(kind: TransferKind) -> Self {
        Dialog::Transfer {
            kind,
            account_id: TextInput::default(),
            amount: TextInput::default(),
            focus: Field::AccountId,
        }
    }

    fn account_list(accounts: Vec<Account>) -> Self {
        let mut state = TableState::default();
        if !accounts.is_empty() {
            state.select(Some(0));
        }
        Dialog::AccountList { accounts, state }
    }

    pub fn title(&self) -> String {
        match self {
            Dialog::CreateAccount { .. } => " Create Account ".to_string(),
            Dialog::Transfer { kind, .. } => format!(" {} Funds ", kind.title()),
            Dialog::CheckBalance { .. } => " Check Balance ".to_string(),
            Dialog::AccountList { .. } => " All Accounts ".to_string(),
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self {
            Dialog::CreateAccount { name } => Some(name),
            Dialog::Transfer { account_id, amount, focus, .. } => match focus {
                Field::AccountId => Some(account_id),
                Field::Amount => Some(amount),
            },
            Dialog::CheckBalance { account_id } => Some(account_id),
            Dialog::AccountList { .. } => None,
        }
    }
}

/// Blocking message shown over everything else
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub message: String,
    pub is_error: bool,
    /// Close the dialog underneath once this popup is dismissed
    close_dialog: bool,
}

impl Popup {
    fn success(title: &str, message: String) -> Self {
        Self {
            title: title.to_string(),
            message,
            is_error: false,
            close_dialog: true,
        }
    }

    fn failure(err: &BankError) -> Self {
        Self {
            title: err.title().to_string(),
            message: err.to_string(),
            is_error: true,
            // Bad input and refused requests leave the form open for correction
            close_dialog: err.kind() == ErrorKind::Storage,
        }
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

pub struct App<R: AccountRepository> {
    repo: R,
    pub theme: ThemeMode,
    pub menu_state: ListState,
    pub dialog: Option<Dialog>,
    pub popup: Option<Popup>,
    pub should_quit: bool,
}

impl<R: AccountRepository> App<R> {
    pub fn new(repo: R, theme: ThemeMode) -> Self {
        let mut menu_state = ListState::default();
        menu_state.select(Some(0));

        Self {
            repo,
            theme,
            menu_state,
            dialog: None,
            popup: None,
            should_quit: false,
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        let index = self.menu_state.selected().unwrap_or(0);
        MenuAction::ALL[index.min(MenuAction::ALL.len() - 1)]
    }

    pub fn next(&mut self) {
        let i = (self.menu_state.selected().unwrap_or(0) + 1) % MenuAction::ALL.len();
        self.menu_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let i = match self.menu_state.selected().unwrap_or(0) {
            0 => MenuAction::ALL.len() - 1,
            i => i - 1,
        };
        self.menu_state.select(Some(i));
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        info!(theme = ?self.theme, "theme toggled");
    }

    pub fn activate(&mut self, action: MenuAction) {
        match action {
            MenuAction::CreateAccount => {
                self.dialog = Some(Dialog::CreateAccount { name: TextInput::default() });
            }
            MenuAction::Deposit => self.dialog = Some(Dialog::transfer(TransferKind::Deposit)),
            MenuAction::Withdraw => self.dialog = Some(Dialog::transfer(TransferKind::Withdraw)),
            MenuAction::CheckBalance => {
                self.dialog = Some(Dialog::CheckBalance { account_id: TextInput::default() });
            }
            MenuAction::ListAccounts => match self.repo.list_accounts() {
                Ok(accounts) => self.dialog = Some(Dialog::account_list(accounts)),
                Err(err) => self.show_error(&err),
            },
            MenuAction::ToggleTheme => self.toggle_theme(),
            MenuAction::Exit => self.should_quit = true,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.popup.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dismiss_popup();
            }
            return;
        }

        if self.dialog.is_some() {
            self.handle_dialog_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Enter => self.activate(self.selected_action()),
            KeyCode::Char(c) => {
                if let Some(action) = MenuAction::from_shortcut(c) {
                    self.menu_state.select(MenuAction::ALL.iter().position(|a| *a == action));
                    self.activate(action);
                }
            }
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };

        if let Dialog::AccountList { accounts, state } = dialog {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.dialog = None,
                KeyCode::Down | KeyCode::Char('j') => scroll(state, accounts.len(), 1),
                KeyCode::Up | KeyCode::Char('k') => scroll(state, accounts.len(), -1),
                KeyCode::PageDown => scroll(state, accounts.len(), 10),
                KeyCode::PageUp => scroll(state, accounts.len(), -10),
                _ => {}
            }
            return;
        }

        match key.code {
            // Closing without submitting changes nothing
            KeyCode::Esc => self.dialog = None,
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                if let Dialog::Transfer { focus, .. } = dialog {
                    *focus = match focus {
                        Field::AccountId => Field::Amount,
                        Field::Amount => Field::AccountId,
                    };
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = dialog.focused_input() {
                    input.backspace();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(input) = dialog.focused_input() {
                    input.push(c);
                }
            }
            _ => {}
        }
    }

    /// Run the dialog's single store operation and show the outcome
    pub fn submit(&mut self) {
        let outcome = match &self.dialog {
            Some(Dialog::CreateAccount { name }) => create_account(&self.repo, &name.value),
            Some(Dialog::Transfer { kind, account_id, amount, .. }) => {
                transfer(&self.repo, *kind, &account_id.value, &amount.value)
            }
            Some(Dialog::CheckBalance { account_id }) => check_balance(&self.repo, &account_id.value),
            Some(Dialog::AccountList { .. }) | None => return,
        };

        match outcome {
            Ok(popup) => self.popup = Some(popup),
            Err(err) => self.show_error(&err),
        }
    }

    fn show_error(&mut self, err: &BankError) {
        match err.kind() {
            ErrorKind::Storage => error!(error = %err, "store operation failed"),
            ErrorKind::Domain => warn!(error = %err, "request refused"),
            ErrorKind::Validation => info!(error = %err, "invalid input"),
        }
        self.popup = Some(Popup::failure(err));
    }

    fn dismiss_popup(&mut self) {
        if let Some(popup) = self.popup.take() {
            if popup.close_dialog {
                self.dialog = None;
            }
        }
    }
}

fn create_account<R: AccountRepository>(repo: &R, name: &str) -> Result<Popup, BankError> {
    let account = repo.create_account(name)?;
    Ok(Popup::success(
        "Success",
        format!("Account created!\nName: {}\nAccount ID: {}", account.name, account.id),
    ))
}

fn transfer<R: AccountRepository>(
    repo: &R,
    kind: TransferKind,
    account_id: &str,
    amount: &str,
) -> Result<Popup, BankError> {
    let id = parse_account_id(account_id)?;
    let amount = parse_amount(amount)?;

    let account = match kind {
        TransferKind::Deposit => repo.deposit(id, amount)?,
        TransferKind::Withdraw => repo.withdraw(id, amount)?,
    };

    Ok(Popup::success(
        "Success",
        format!(
            "${:.2} {}!\nNew balance: {}",
            amount,
            kind.past_tense(),
            account.balance_display()
        ),
    ))
}

fn check_balance<R: AccountRepository>(repo: &R, account_id: &str) -> Result<Popup, BankError> {
    let id = parse_account_id(account_id)?;
    let account = repo.get_account(id)?;
    Ok(Popup::success(
        "Balance Info",
        format!(
            "Account ID: {}\nName: {}\nBalance: {}",
            account.id,
            account.name,
            account.balance_display()
        ),
    ))
}

fn scroll(state: &mut TableState, len: usize, delta: i64) {
    if len == 0 {
        return;
    }
    let current = state.selected().unwrap_or(0) as i64;
    let next = (current + delta).clamp(0, len as i64 - 1);
    state.select(Some(next as usize));
}

// ============================================================================
// TERMINAL LOOP
// ============================================================================

pub fn run_ui<R: AccountRepository>(app: &mut App<R>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend, R: AccountRepository>(
    terminal: &mut Terminal<B>,
    app: &mut App<R>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn base_style(palette: &Palette) -> Style {
    Style::default()
        .bg(color(palette.background))
        .fg(color(palette.foreground))
}

pub fn ui<R: AccountRepository>(f: &mut Frame, app: &mut App<R>) {
    let palette = app.theme.palette();
    let area = f.size();

    f.render_widget(Block::default().style(base_style(&palette)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Menu
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    render_title(f, chunks[0], &palette);
    render_menu(f, chunks[1], app, &palette);
    render_status_bar(f, chunks[2], app, &palette);

    if let Some(dialog) = app.dialog.as_mut() {
        render_dialog(f, area, dialog, &palette);
    }

    if let Some(popup) = &app.popup {
        render_popup(f, area, popup, &palette);
    }
}

fn render_title(f: &mut Frame, area: Rect, palette: &Palette) {
    let title = Paragraph::new(Line::from(Span::styled(
        WINDOW_TITLE,
        base_style(palette).add_modifier(Modifier::BOLD),
    )))
    .alignment(ratatui::layout::Alignment::Center)
    .block(Block::default().borders(Borders::ALL).style(base_style(palette)));

    f.render_widget(title, area);
}

fn render_menu<R: AccountRepository>(f: &mut Frame, area: Rect, app: &mut App<R>, palette: &Palette) {
    let items: Vec<ListItem> = MenuAction::ALL
        .iter()
        .map(|action| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", action.shortcut()), Style::default().fg(Color::Yellow)),
                Span::raw(action.label(app.theme)),
            ]))
            .style(Style::default().bg(color(palette.button)).fg(color(palette.foreground)))
        })
        .collect();

    let width = 40.min(area.width);
    let menu_area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    };

    let menu = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Menu ").style(base_style(palette)))
        .highlight_style(
            Style::default()
                .bg(color(palette.button_active))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(menu, menu_area, &mut app.menu_state);
}

fn render_status_bar<R: AccountRepository>(f: &mut Frame, area: Rect, app: &App<R>, palette: &Palette) {
    let hint = if app.popup.is_some() {
        vec![Span::styled("Enter", Style::default().fg(Color::Yellow)), Span::raw(" Dismiss")]
    } else if app.dialog.is_some() {
        vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Submit | "),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" Next field | "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" Cancel"),
        ]
    } else {
        vec![
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::raw(" Nav | "),
            Span::styled("Enter/1-7", Style::default().fg(Color::Yellow)),
            Span::raw(" Select | "),
            Span::styled("t", Style::default().fg(Color::Yellow)),
            Span::raw(" Theme | "),
            Span::styled("q", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ]
    };

    let status_bar = Paragraph::new(Line::from(hint))
        .block(Block::default().borders(Borders::ALL).style(base_style(palette)));

    f.render_widget(status_bar, area);
}

fn input_line<'a>(input: &'a TextInput, focused: bool, palette: &Palette) -> Line<'a> {
    let mut style = Style::default()
        .bg(color(palette.field))
        .fg(color(palette.foreground));
    if focused {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    let cursor = if focused { "_" } else { " " };

    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!(" {}{} ", input.value, cursor), style),
    ])
}

fn render_dialog(f: &mut Frame, area: Rect, dialog: &mut Dialog, palette: &Palette) {
    let title = dialog.title();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .style(base_style(palette));

    if let Dialog::AccountList { accounts, state } = dialog {
        let dialog_area = centered_rect(70, 18, area);
        f.render_widget(Clear, dialog_area);
        render_account_table(f, dialog_area, accounts, state, block, palette);
        return;
    }

    let lines = match dialog {
        Dialog::CreateAccount { name } => vec![
            Line::from(""),
            Line::from("  Enter your full name:"),
            input_line(name, true, palette),
        ],
        Dialog::Transfer { kind, account_id, amount, focus } => vec![
            Line::from(""),
            Line::from("  Account ID:"),
            input_line(account_id, *focus == Field::AccountId, palette),
            Line::from(""),
            Line::from(format!("  Amount to {} ($):", kind.title().to_lowercase())),
            input_line(amount, *focus == Field::Amount, palette),
        ],
        Dialog::CheckBalance { account_id } => vec![
            Line::from(""),
            Line::from("  Enter Account ID:"),
            input_line(account_id, true, palette),
        ],
        Dialog::AccountList { .. } => Vec::new(),
    };

    let dialog_area = centered_rect(44, lines.len() as u16 + 4, area);
    f.render_widget(Clear, dialog_area);
    f.render_widget(Paragraph::new(lines).block(block), dialog_area);
}

fn render_account_table(
    f: &mut Frame,
    area: Rect,
    accounts: &[Account],
    state: &mut TableState,
    block: Block,
    palette: &Palette,
) {
    let header = Row::new(["Account ID", "Name", "Balance ($)"].iter().map(|h| {
        Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))
    }))
    .style(Style::default().bg(color(palette.heading)))
    .height(1);

    let rows = accounts.iter().map(|account| {
        Row::new(vec![
            Cell::from(account.id.to_string()),
            Cell::from(account.name.clone()),
            Cell::from(format_money(account.balance)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(
        Style::default()
            .bg(color(palette.button_active))
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, state);
}

fn render_popup(f: &mut Frame, area: Rect, popup: &Popup, palette: &Palette) {
    let border = if popup.is_error { Color::Red } else { Color::Green };

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(popup.message.lines().map(|l| Line::from(format!("  {}", l))));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press Enter to close",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let popup_area = centered_rect(50, lines.len() as u16 + 2, area);
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {} ", popup.title))
                .style(base_style(palette)),
        );

    f.render_widget(Clear, popup_area);
    f.render_widget(widget, popup_area);
}

/// Rect of at most `width` x `height` centred in `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
