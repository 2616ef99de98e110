use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tokio::runtime::Runtime;
use tracing::info;

use pidash::api::{ApiClient, Loader};
use pidash::app::{App, View};
use pidash::logging::{self, LogTarget};
use pidash::settings::{Overrides, Settings};
use pidash::state::{AppState, StateStore};
use pidash::stream::StreamClient;
use pidash::ui::{self, Theme};
use pidash::{events, export};

#[derive(Parser, Debug)]
#[command(name = "pidash")]
#[command(about = "Terminal dashboard for a DNS-filtering server")]
struct Args {
    /// Server host name or address
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Settings file (defaults to ./pidash.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dashboard refresh interval (e.g., "60s", "2m")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Delay between push channel reconnect attempts (e.g., "5s")
    #[arg(long)]
    reconnect: Option<String>,

    /// Initial report window in days: 1, 3, 7 or 14
    #[arg(short, long)]
    days: Option<String>,

    /// Initial query log size: 100, 200, 300, 400 or 500
    #[arg(short = 'n', long)]
    query_size: Option<u32>,

    /// Fetch dashboard, queries and health once, write them to a JSON file
    /// and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            refresh: self.refresh.clone(),
            reconnect: self.reconnect.clone(),
            days: self.days.clone(),
            query_size: self.query_size,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;

    let target = match args.export {
        Some(_) => LogTarget::Stderr,
        None => LogTarget::File(&settings.log.file),
    };
    logging::init(&settings.log.level, target)?;
    info!(server = %settings.http_base(), "Starting pidash");

    let rt = Runtime::new()?;
    let api = ApiClient::builder()
        .endpoint(settings.http_base())
        .timeout(settings.timing.request_timeout)
        .build()?;

    let mut store = StateStore::new(AppState {
        days: settings.defaults.days,
        clicked_days: settings.defaults.days,
        query_size: settings.defaults.query_size,
        ..AppState::default()
    });
    let loader = Loader::new(api, store.dispatcher());

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        let statuses = rt.block_on(export::load_all(
            &loader,
            &mut store,
            settings.defaults.days,
            settings.defaults.query_size,
        ));
        info!(?statuses, "Loaded state for export");
        export::write_state(store.state(), &export_path)?;
        println!("Exported state to: {}", export_path.display());
        return Ok(());
    }

    let stream = StreamClient::websocket(settings.ws_url(), settings.timing.reconnect);
    {
        let _guard = rt.enter();
        stream.init(store.dispatcher());
    }

    let app = App::new(
        store,
        loader,
        stream.clone(),
        rt.handle().clone(),
        settings.timing.refresh,
        Theme::auto_detect(),
    );
    let result = run_tui(app);

    stream.shutdown();
    rt.shutdown_timeout(Duration::from_secs(1));
    result
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        app.tick();

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered =
                    ratatui::layout::Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5)
                        .intersection(area);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(12),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Dashboard => ui::dashboard::render(frame, app, chunks[2]),
                View::Queries => ui::queries::render(frame, app, chunks[2]),
                View::Health => ui::health::render(frame, app, chunks[2]),
                View::Config => ui::config::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
        }
    }

    info!("Shutting down");
    Ok(())
}
