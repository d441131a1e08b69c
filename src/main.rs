use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use parla::api::{OfflineBackend, PracticeBackend};
use parla::app::{App, AppScreen};
use parla::config::Config;
use parla::event::{AppEvent, EventHandler};
use parla::logging;
use parla::session::setup::SetupFocus;
use parla::store::SessionStore;
use parla::store::json_store::JsonStore;
use parla::store::schema::UserDescriptor;
use parla::ui::components::dialog::Dialog;
use parla::ui::components::input_bar::InputBar;
use parla::ui::components::session_list::SessionList;
use parla::ui::components::setup_form::SetupForm;
use parla::ui::components::transcript_view::TranscriptView;
use parla::ui::layout::{ChatLayout, centered_rect, pack_hint_lines};
use parla::ui::line_input::InputResult;

#[derive(Parser)]
#[command(name = "parla", version, about = "Terminal client for AI language practice sessions")]
struct Cli {
    #[arg(long, help = "Base URL of the practice API")]
    api_url: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Keep user and session only in memory for this run")]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Save the signed-in user used by the practice screens
    Login {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Forget the saved user and any active practice
    Logout,
    /// Print the saved user and active practice
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|err| {
        eprintln!("warning: could not read {}: {err}", Config::config_path().display());
        Config::default()
    });
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    config.validate();

    if let Err(err) = logging::init(&config.log_level) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let mut store = if cli.ephemeral {
        SessionStore::in_memory()
    } else {
        SessionStore::new(JsonStore::new()?)
    };

    match cli.command {
        Some(Command::Login { id, name, email }) => {
            let user = UserDescriptor { id, name, email };
            store.set_user(&user)?;
            tracing::info!(user_id = %user.id, "user saved");
            println!("Signed in as {} ({})", user.name, user.id);
            return Ok(());
        }
        Some(Command::Logout) => {
            store.clear_session()?;
            store.clear_user()?;
            tracing::info!("user cleared");
            println!("Signed out");
            return Ok(());
        }
        Some(Command::Status) => {
            print_status(&store, &config);
            return Ok(());
        }
        None => {}
    }

    let backend = build_backend(&config);
    let mut app = App::new(config, store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events, &backend);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "ui loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn print_status(store: &SessionStore, config: &Config) {
    println!("API:     {}", config.api_base_url);
    match store.user() {
        Some(user) if user.email.is_empty() => println!("User:    {} ({})", user.name, user.id),
        Some(user) => println!("User:    {} <{}> ({})", user.name, user.email, user.id),
        None => println!("User:    not signed in"),
    }
    match store.session() {
        Some(session) => println!(
            "Session: {} ({} {})",
            session.session_id,
            session.language.to_uppercase(),
            session.level
        ),
        None => println!("Session: none"),
    }
}

fn build_backend(config: &Config) -> Arc<dyn PracticeBackend> {
    #[cfg(feature = "network")]
    {
        match parla::api::http::HttpBackend::new(&config.api_base_url, config.request_timeout()) {
            Ok(backend) => return Arc::new(backend),
            Err(err) => tracing::error!(error = %err, "falling back to offline mode"),
        }
    }
    #[cfg(not(feature = "network"))]
    let _ = config;
    Arc::new(OfflineBackend)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    backend: &Arc<dyn PracticeBackend>,
) -> Result<()> {
    loop {
        for pending in app.take_requests() {
            events.dispatch(Arc::clone(backend), pending);
        }

        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => handle_paste(app, &text),
            AppEvent::Api(reply) => app.apply(reply),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.alert.is_some() {
        app.dismiss_alert();
        return;
    }

    match app.screen {
        AppScreen::SignedOut => handle_signed_out_key(app, key),
        AppScreen::Setup => handle_setup_key(app, key),
        AppScreen::Chat => handle_chat_key(app, key),
    }
}

fn handle_signed_out_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        // Pick up a login made from another terminal
        KeyCode::Char('r') => app.enter(AppScreen::Chat),
        _ => {}
    }
}

fn handle_setup_key(app: &mut App, key: KeyEvent) {
    // Confirmation dialog takes priority
    if app.setup.confirm_delete.is_some() {
        match key.code {
            KeyCode::Char('y') => app.answer_delete(true),
            KeyCode::Char('n') | KeyCode::Esc => app.answer_delete(false),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab => app.setup.toggle_focus(),
        KeyCode::Up | KeyCode::Char('k') => app.setup.prev_row(),
        KeyCode::Down | KeyCode::Char('j') => app.setup.next_row(),
        KeyCode::Left | KeyCode::Char('h') => app.setup.cycle(false),
        KeyCode::Right | KeyCode::Char('l') => app.setup.cycle(true),
        KeyCode::Enter => match app.setup.focus {
            SetupFocus::Form => app.start_practice(),
            SetupFocus::Sessions => app.continue_selected(),
        },
        KeyCode::Char('x') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('r') => app.refresh_sessions(),
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.close_practice();
        return;
    }
    let Some(chat) = app.chat.as_mut() else {
        return;
    };
    if chat.is_loading() {
        return;
    }
    match chat.input.handle(key) {
        InputResult::Submit => app.submit_message(),
        InputResult::Cancel => app.close_practice(),
        InputResult::Continue => {}
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if app.alert.is_some() || app.screen != AppScreen::Chat {
        return;
    }
    if let Some(chat) = app.chat.as_mut() {
        if !chat.is_loading() {
            chat.input.insert_str(text);
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::SignedOut => render_signed_out(frame, app),
        AppScreen::Setup => render_setup(frame, app),
        AppScreen::Chat => render_chat(frame, app),
    }

    if app.screen == AppScreen::Setup && app.setup.confirm_delete.is_some() {
        frame.render_widget(
            Dialog::confirm("Delete this practice? This cannot be undone.", app.theme),
            area,
        );
    }
    if let Some(ref alert) = app.alert {
        frame.render_widget(Dialog::alert(alert, app.theme), area);
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let mut who = match app.user {
        Some(ref user) if user.email.is_empty() => format!(" {}", user.name),
        Some(ref user) => format!(" {} <{}>", user.name, user.email),
        None => String::new(),
    };
    if let Some(ref chat) = app.chat {
        who.push_str(&format!(" | {}", chat.title()));
    }
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " parla ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            who,
            Style::default().fg(colors.text_muted()).bg(colors.header_bg()),
        ),
    ]))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|line| {
            Line::from(Span::styled(
                line,
                Style::default().fg(app.theme.colors.text_muted()),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_signed_out(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let centered = centered_rect(60, 40, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "You are not signed in.",
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Run `parla login --id <id> --name <name>`",
            Style::default().fg(colors.text_muted()),
        )),
        Line::from(Span::styled(
            "then press [r] to reload.",
            Style::default().fg(colors.text_muted()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[r] Reload  [q] Quit",
            Style::default().fg(colors.accent()),
        )),
    ];
    let panel = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::bordered()
            .title(" parla ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg())),
    );
    frame.render_widget(panel, centered);
}

fn render_setup(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let hints = [
        "[Tab] Switch panel",
        "[Up/Down] Move",
        "[Left/Right] Change",
        "[Enter] Start/Continue",
        "[x] Delete",
        "[r] Refresh",
        "[L] Log out",
        "[q] Quit",
    ];
    let footer_rows = pack_hint_lines(&hints, area.width as usize).len().clamp(1, 2) as u16;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(footer_rows),
        ])
        .split(area);

    render_header(frame, app, layout[0]);

    let body = if area.width >= 80 {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(layout[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(4)])
            .split(layout[1])
    };
    frame.render_widget(SetupForm::new(&app.setup, app.theme), body[0]);
    frame.render_widget(SessionList::new(&app.setup, app.theme), body[1]);

    render_footer(frame, app, layout[2], &hints);
}

fn render_chat(frame: &mut ratatui::Frame, app: &App) {
    let Some(ref chat) = app.chat else {
        return;
    };
    let layout = ChatLayout::new(frame.area());

    render_header(frame, app, layout.header);
    frame.render_widget(TranscriptView::new(chat, app.theme), layout.transcript);
    frame.render_widget(
        InputBar::new(&chat.input, chat.is_loading(), app.theme),
        layout.input,
    );
    render_footer(
        frame,
        app,
        layout.footer,
        &["[Enter] Send", "[Esc] End practice", "[Ctrl-C] Quit"],
    );
}
