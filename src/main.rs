use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use cluegrid::app::App;
use cluegrid::config::Config;
use cluegrid::event::{AppEvent, EventHandler};
use cluegrid::puzzle::{Puzzle, loader};
use cluegrid::session::keymap;
use cluegrid::trainer::protocol::{StepInput, StepStatus, TrainerRender};
use cluegrid::trainer::session::Focus;
use cluegrid::trainer::transport::{Dispatcher, HttpTransport};
use cluegrid::ui::components::clue_list::CluePanel;
use cluegrid::ui::components::grid::GridWidget;
use cluegrid::ui::components::progress_bar::FillBar;
use cluegrid::ui::components::trainer_panel::TrainerPanel;
use cluegrid::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use cluegrid::ui::theme::Theme;
use cluegrid::ui::view_model;

#[derive(Parser)]
#[command(name = "cluegrid", version, about = "Terminal crossword solver with a clue trainer")]
struct Cli {
    #[arg(help = "Puzzle JSON file")]
    file: Option<PathBuf>,

    #[arg(short, long, help = "Puzzle series to fetch from the server")]
    series: Option<String>,

    #[arg(short, long, help = "Puzzle number within the series")]
    number: Option<u32>,

    #[arg(long, help = "Trainer and puzzle server URL")]
    server: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_puzzle(cli: &Cli, config: &Config) -> Result<Puzzle> {
    match (&cli.file, &cli.series, cli.number) {
        (Some(path), _, _) => loader::load_file(path),
        (None, Some(series), Some(number)) => loader::fetch(
            &config.server_url,
            series,
            number,
            config.request_timeout(),
        ),
        _ => bail!("pass a puzzle file, or --series and --number"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(server) = &cli.server {
        config.server_url = server.clone();
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    config.validate(&Theme::available_themes());

    if let Err(e) = init_logging(Path::new(&config.log_file)) {
        eprintln!("Logging disabled: {e:#}");
    }

    let puzzle = load_puzzle(&cli, &config)?;
    log::info!("opened puzzle {}", puzzle.id());

    let theme: &'static Theme = Box::leak(Box::new(Theme::load(&config.theme).unwrap_or_default()));
    let mut app = App::new(puzzle, config, theme);

    let events = EventHandler::new(Duration::from_millis(100));
    match HttpTransport::new(&app.config.server_url, app.config.request_timeout()) {
        Ok(transport) => app.set_dispatcher(Dispatcher::new(Arc::new(transport), events.sender())),
        Err(e) => log::warn!("trainer disabled: {e}"),
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            app.terminal_size = frame.area();
            render(frame, app);
        })?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Trainer(reply) => app.on_trainer_reply(reply, Instant::now()),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // The panel covers the grid while it is open.
    if app.trainer.is_open() {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        app.click(mouse.column, mouse.row);
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only process Press events; Repeat would double-type letters
    if key.kind != KeyEventKind::Press {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        app.should_quit = true;
        return;
    }

    if app.trainer.is_open() {
        handle_trainer_key(app, key);
    } else {
        handle_grid_key(app, key);
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('t') if ctrl => app.open_trainer(),
        KeyCode::Char('x') if ctrl => app.clear_progress(),
        KeyCode::Enter => app.open_trainer(),
        _ => {
            if let Some(command) = keymap::nav_command(&key) {
                app.status = None;
                app.handle_nav(command);
            }
        }
    }
}

fn handle_trainer_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        let outgoing = match key.code {
            KeyCode::Char('h') => app.trainer.toggle_hint(),
            KeyCode::Char('n') => app.trainer.reveal_step(),
            KeyCode::Char('r') => app.trainer.reveal_full(),
            KeyCode::Char('k') => app.trainer.check_answer(),
            KeyCode::Char('y') => app.trainer.hypothesis(),
            KeyCode::Char('o') => app.trainer.continue_step(),
            KeyCode::Char('e') => match last_completed_step(app) {
                Some(index) => app.trainer.expand_step(index),
                None => None,
            },
            _ => None,
        };
        app.send(outgoing);
        return;
    }

    let on_answer = app.trainer.local().focus == Focus::Answer;
    match key.code {
        KeyCode::Esc => app.close_trainer(),
        KeyCode::Tab | KeyCode::BackTab => app.trainer.toggle_focus(),
        KeyCode::Enter => app.trainer_enter(),
        KeyCode::Left if on_answer => app.trainer.move_answer_focus(false),
        KeyCode::Right if on_answer => app.trainer.move_answer_focus(true),
        KeyCode::Left => app.trainer.move_word_focus(false),
        KeyCode::Right => app.trainer.move_word_focus(true),
        KeyCode::Up => app.trainer.move_choice(false),
        KeyCode::Down => app.trainer.move_choice(true),
        KeyCode::Backspace if on_answer => {
            let outgoing = app.trainer.erase_answer_letter();
            app.send(outgoing);
        }
        KeyCode::Backspace => app.trainer.pop_step_char(),
        KeyCode::Char(ch) if on_answer => {
            let outgoing = app.trainer.type_focused_letter(ch);
            app.send(outgoing);
        }
        KeyCode::Char(' ') if is_tap_words(app) => {
            let outgoing = app.trainer.select_focused_word();
            app.send(outgoing);
        }
        KeyCode::Char(ch) => app.trainer.push_step_char(ch),
        _ => {}
    }
}

fn last_completed_step(app: &App) -> Option<usize> {
    app.trainer
        .render()?
        .steps()
        .iter()
        .rev()
        .find(|s| s.status == StepStatus::Completed)
        .map(|s| s.index)
}

fn is_tap_words(app: &App) -> bool {
    matches!(
        app.trainer.render(),
        Some(TrainerRender::InProgress(active))
            if matches!(active.step_input, StepInput::TapWords { .. })
    )
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    if area.width < 60 || area.height < 16 {
        let msg = Paragraph::new("Terminal too small (need 60x16)")
            .style(Style::default().fg(colors.warning()));
        frame.render_widget(msg, area);
        return;
    }

    let layout = AppLayout::new(area);
    let grid = view_model::grid_view(&app.navigator);

    render_header(frame, app, &grid, layout.header);

    let title = format!(" {} ", app.puzzle_id());
    frame.render_widget(GridWidget::new(&grid, &title, app.theme), layout.grid);

    if let Some(clue_area) = layout.clues {
        let clues = view_model::clue_list_view(&app.navigator);
        frame.render_widget(CluePanel::new(&clues, app.theme), clue_area);
    }

    render_footer(frame, app, layout.footer);

    if let Some(view) = view_model::trainer_view(&app.trainer, Instant::now()) {
        let popup = centered_rect(80, 80, area);
        frame.render_widget(TrainerPanel::new(&view, app.theme), popup);
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, grid: &view_model::GridView, area: Rect) {
    let colors = &app.theme.colors;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(18)])
        .split(area);

    let block = Block::bordered().border_style(Style::default().fg(colors.border()));
    let label = grid.clue_label.as_deref().unwrap_or("No clue selected");
    let header = Paragraph::new(Line::from(Span::styled(
        label.to_string(),
        Style::default()
            .fg(colors.header_fg())
            .add_modifier(Modifier::BOLD),
    )))
    .block(block);
    frame.render_widget(header, columns[0]);
    frame.render_widget(FillBar::new(grid.filled, grid.open, app.theme), columns[1]);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let hints = [
        "[Arrows] move",
        "[Space] direction",
        "[Tab] next clue",
        "[Enter] trainer",
        "[^X] clear",
        "[^Q] quit",
    ];
    let width = usize::from(area.width.saturating_sub(2));
    let mut lines: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(colors.accent()),
        )));
    } else {
        lines.extend(
            pack_hint_lines(&hints, width)
                .into_iter()
                .take(1)
                .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_muted())))),
        );
    }
    let footer = Paragraph::new(lines)
        .block(Block::bordered().border_style(Style::default().fg(colors.border())));
    frame.render_widget(footer, area);
}
