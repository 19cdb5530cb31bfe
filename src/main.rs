use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error, info, warn};
use rand::Rng;
use ratatui::{
    prelude::*,
    style::{Style, Stylize},
    widgets::*,
};
use simplelog::{Config, LevelFilter, WriteLogger};
use snekboard::{
    ButtonLevels, Buttons, Buzzer, Clock, Direction, FileFlash, Pos, PersistentStore, Screen,
    SnekGame, StorageRegion, SystemClock, TickDriver,
};
use std::fs::File;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const FLASH_IMAGE_FILE: &str = ".snekboard_flash.bin";
const LOG_FILE: &str = "snekboard.log";

// 60 Hz, the rate the difficulty table is calibrated for
const FRAME: Duration = Duration::from_micros(16_667);
// Terminals only report presses, so a press counts as held this long
const BUTTON_HOLD: Duration = Duration::from_millis(50);

const FOOD_BEEP_MS: u64 = 100;
const BONUS_BEEP_MS: u64 = 300;
const GAME_OVER_BEEP_MS: u64 = 1000;

type Driver = TickDriver<SystemClock, FileFlash, TerminalBuzzer>;

enum Command {
    Confirm,
    CycleDifficulty,
    EraseRecords,
    Quit,
}

fn main() -> Result<(), io::Error> {
    // Set up logging before anything else
    WriteLogger::init(LevelFilter::Info, Config::default(), File::create(LOG_FILE)?)
        .expect("Failed to initialize logger");

    info!("Starting snekboard");

    let region = StorageRegion::LAST_SECTOR;
    let flash = FileFlash::open(FLASH_IMAGE_FILE, region).map_err(io::Error::other)?;
    let store = PersistentStore::new(flash, region);
    let game = SnekGame::with_seed(SystemClock::new(), rand::thread_rng().gen());
    let buttons = Arc::new(Buttons::new());
    let mut driver = TickDriver::new(game, store, TerminalBuzzer::default(), buttons.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (commands, inbox) = mpsc::channel();
    thread::spawn(move || {
        if let Err(e) = poll_input(&buttons, &commands) {
            error!("Input poller stopped: {}", e);
        }
    });

    let result = run(&mut terminal, &mut driver, &inbox);

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Exiting snekboard");
    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    driver: &mut Driver,
    inbox: &Receiver<Command>,
) -> io::Result<()> {
    let mut next_frame = Instant::now();
    loop {
        loop {
            match inbox.try_recv() {
                Ok(Command::Quit) | Err(TryRecvError::Disconnected) => return Ok(()),
                Ok(command) => handle_command(driver, command),
                Err(TryRecvError::Empty) => break,
            }
        }

        driver.tick();
        terminal.draw(|f| render(f, driver))?;

        next_frame += FRAME;
        let now = Instant::now();
        if next_frame > now {
            thread::sleep(next_frame - now);
        } else {
            next_frame = now;
        }
    }
}

fn handle_command(driver: &mut Driver, command: Command) {
    match (command, driver.screen()) {
        (Command::Confirm, Screen::Menu) => driver.start_game(),
        (Command::Confirm, Screen::Results { .. }) => driver.return_to_menu(),
        (Command::CycleDifficulty, Screen::Menu) => {
            let difficulty = driver.cycle_difficulty();
            debug!("Difficulty set to {}", difficulty.name());
        }
        (Command::EraseRecords, Screen::Menu) => {
            if let Err(e) = driver.erase_records() {
                warn!("Records not erased: {}", e);
            }
        }
        _ => {}
    }
}

// Stands in for the device's button poller: turns key presses into levels
// on the shared Buttons and forwards the menu keys.
fn poll_input(buttons: &Buttons, commands: &Sender<Command>) -> io::Result<()> {
    loop {
        if !event::poll(BUTTON_HOLD)? {
            buttons.store(ButtonLevels::default());
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        let command = match key.code {
            KeyCode::Up | KeyCode::Char('w') => {
                buttons.store(ButtonLevels::only(Direction::Up));
                continue;
            }
            KeyCode::Down | KeyCode::Char('s') => {
                buttons.store(ButtonLevels::only(Direction::Down));
                continue;
            }
            KeyCode::Left | KeyCode::Char('a') => {
                buttons.store(ButtonLevels::only(Direction::Left));
                continue;
            }
            KeyCode::Right | KeyCode::Char('d') => {
                buttons.store(ButtonLevels::only(Direction::Right));
                continue;
            }
            KeyCode::Char(' ') | KeyCode::Enter => Command::Confirm,
            KeyCode::Tab => Command::CycleDifficulty,
            KeyCode::Char('x') => Command::EraseRecords,
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            _ => continue,
        };
        if commands.send(command).is_err() {
            return Ok(());
        }
    }
}

#[derive(Debug, Default)]
struct TerminalBuzzer {
    beep: Option<(&'static str, Instant)>,
}

impl TerminalBuzzer {
    fn sound(&mut self, label: &'static str, ms: u64) {
        debug!("Beep '{}' for {}ms", label, ms);
        self.beep = Some((label, Instant::now() + Duration::from_millis(ms)));
    }

    fn current(&self) -> Option<&'static str> {
        self.beep
            .filter(|(_, until)| Instant::now() < *until)
            .map(|(label, _)| label)
    }
}

impl Buzzer for TerminalBuzzer {
    fn short_beep(&mut self) {
        self.sound("nom", FOOD_BEEP_MS);
    }

    fn medium_beep(&mut self) {
        self.sound("NOM!", BONUS_BEEP_MS);
    }

    fn long_beep(&mut self) {
        self.sound("BZZZT", GAME_OVER_BEEP_MS);
    }
}

fn render(frame: &mut Frame, driver: &mut Driver) {
    let play_count = driver.play_count();
    let game = driver.game();

    let mut header = format!(
        "SNEK    High Score: {}    Games: {}    {}",
        driver.high_score(),
        play_count,
        game.difficulty().name()
    );
    if let Screen::Playing { .. } = driver.screen() {
        header.push_str(&format!("    Score: {}", game.score()));
        if game.is_bonus_active() {
            header.push_str(&format!(
                "    Bonus: {:.1}s",
                game.bonus_time_left_ms() as f32 / 1000.0
            ));
        }
    }
    if let Some(beep) = driver.buzzer().current() {
        header.push_str(&format!("    *{}*", beep));
    }

    let size = frame.area();
    let layout = Layout::default()
        .direction(layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + scores
            Constraint::Min(0),    // Game area
        ])
        .split(size);

    frame.render_widget(
        Paragraph::new(header)
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::ALL)),
        layout[0],
    );

    match driver.screen() {
        Screen::Menu => {
            frame.render_widget(
                Paragraph::new(format!(
                    "Difficulty: {}\n\nSPACE start    TAB difficulty    X erase records    Q quit",
                    game.difficulty().name()
                ))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
                layout[1],
            );
        }
        Screen::Playing { .. } => {
            let title = if game.is_game_over() {
                "GAME OVER".red().bold()
            } else {
                "Playing".into()
            };
            let block = Block::default().title(title).borders(Borders::ALL);
            let inner_area = block.inner(layout[1]);

            frame.render_widget(block, layout[1]);
            frame.render_widget(Board(game), inner_area);
        }
        Screen::Results { last_score } => {
            frame.render_widget(
                Paragraph::new(format!(
                    "GAME OVER\nScore: {}\nHigh Score: {}\nPress SPACE for the menu",
                    last_score,
                    driver.high_score()
                ))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
                layout[1],
            );
        }
    }
}

// The playfield, two terminal columns per cell so cells look square.
struct Board<'a, C: Clock>(&'a SnekGame<C>);

impl<C: Clock> Board<'_, C> {
    fn paint(area: Rect, buf: &mut Buffer, pos: Pos, symbol: &str, style: Style) {
        let x = area.x + pos.x * 2;
        let y = area.y + pos.y;
        if x + 1 >= area.right() || y >= area.bottom() {
            return;
        }
        buf[(x, y)].set_symbol(symbol).set_style(style);
        buf[(x + 1, y)].set_symbol(" ").set_style(style);
    }
}

impl<C: Clock> Widget for Board<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = self.0;

        if let Some(bonus) = game.bonus() {
            for cell in bonus.cells() {
                Self::paint(area, buf, cell, "$", Style::default().fg(Color::Black).bg(Color::Magenta));
            }
        }

        Self::paint(area, buf, game.food(), "●", Style::default().fg(Color::LightRed));

        let body = Style::default().bg(Color::Green);
        for pos in game.snek().iter().skip(1) {
            Self::paint(area, buf, pos, " ", body);
        }

        // Add snake head (different symbol/color)
        let head = match game.segment_direction(0) {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Left => "◀",
            Direction::Right => "▶",
        };
        Self::paint(
            area,
            buf,
            game.snek_head(),
            head,
            Style::default().fg(Color::Yellow).bg(Color::Green),
        );
    }
}
