use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pomodoro::{
    app::App,
    app_dirs::AppDirs,
    logging::init_logging,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, Runner, TickLoop, Ticker},
    timer::{Durations, DEFAULT_BREAK_MINUTES, DEFAULT_FOCUS_MINUTES, MAX_MINUTES},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const POLL_INTERVAL_MS: u64 = 100;

/// focus/break pomodoro timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A pomodoro timer that alternates focus and break intervals over four cycles, with a live countdown and colour-coded modes."
)]
pub struct Cli {
    /// minutes per focus interval
    #[clap(
        short = 'f',
        long = "focus",
        default_value_t = DEFAULT_FOCUS_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..=MAX_MINUTES as i64)
    )]
    focus_minutes: u32,

    /// minutes per break interval
    #[clap(
        short = 'b',
        long = "break",
        default_value_t = DEFAULT_BREAK_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..=MAX_MINUTES as i64)
    )]
    break_minutes: u32,

    /// file to append logs to (filter with POMODORO_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// length of one countdown tick in milliseconds
    #[clap(long, default_value_t = 1000, hide = true)]
    tick_ms: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        // no logging is better than no timer
        let _ = init_logging(&path);
    }

    let durations = Durations::from_minutes(cli.focus_minutes, cli.break_minutes)?;

    let events = CrosstermEventSource::new();
    let ticker = FixedTicker::new(Duration::from_millis(cli.tick_ms.max(1)));
    let ticks = TickLoop::new(&ticker, events.sender());
    let runner = Runner::new(
        events,
        FixedTicker::new(Duration::from_millis(POLL_INTERVAL_MS)),
    );
    let mut app = App::new(durations, ticks);
    tracing::info!(?cli, "pomodoro starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(%err, "tui loop failed");
    }
    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        if let Some(event) = runner.step() {
            app.handle_event(event);
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["pomodoro"]);

        assert_eq!(cli.focus_minutes, 25);
        assert_eq!(cli.break_minutes, 5);
        assert_eq!(cli.log_file, None);
        assert_eq!(cli.tick_ms, 1000);
    }

    #[test]
    fn test_cli_durations() {
        let cli = Cli::parse_from(["pomodoro", "-f", "50", "-b", "10"]);
        assert_eq!(cli.focus_minutes, 50);
        assert_eq!(cli.break_minutes, 10);

        let cli = Cli::parse_from(["pomodoro", "--focus", "1", "--break", "999"]);
        assert_eq!(cli.focus_minutes, 1);
        assert_eq!(cli.break_minutes, 999);
    }

    #[test]
    fn test_cli_rejects_out_of_range_durations() {
        assert!(Cli::try_parse_from(["pomodoro", "-f", "0"]).is_err());
        assert!(Cli::try_parse_from(["pomodoro", "-b", "1000"]).is_err());
        assert!(Cli::try_parse_from(["pomodoro", "-f", "abc"]).is_err());
    }

    #[test]
    fn test_cli_log_file_and_tick() {
        let cli = Cli::parse_from(["pomodoro", "--log-file", "/tmp/p.log", "--tick-ms", "5"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/p.log")));
        assert_eq!(cli.tick_ms, 5);
    }

    #[test]
    fn test_cli_durations_are_valid_session_input() {
        let cli = Cli::parse_from(["pomodoro", "-f", "999", "-b", "1"]);
        let durations = Durations::from_minutes(cli.focus_minutes, cli.break_minutes).unwrap();
        assert_eq!(durations.focus_secs(), 999 * 60);
        assert_eq!(durations.break_secs(), 60);
    }
}
