use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pingplot::export::{self, ImageOptions, ImageStyle};
use pingplot::{
    events, ui, App, Sampler, SamplerEvent, SamplerOptions, Series, Settings, SystemPing,
};

/// How often the UI polls for input and sampler events.
const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "pingplot")]
#[command(about = "Ping a host, chart the latency live, and export it as PNG or CSV")]
struct Args {
    /// Host name or IP address to ping
    #[arg(short, long)]
    target: Option<String>,

    /// Seconds between pings (fractions allowed, e.g. "0.5")
    #[arg(short, long)]
    interval: Option<String>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Directory for time-stamped exports
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Start pinging as soon as the UI opens
    #[arg(short, long)]
    autostart: bool,

    /// Run without the terminal UI, printing each sample
    #[arg(long)]
    headless: bool,

    /// Stop after this many samples (headless mode; default: until Ctrl-C)
    #[arg(short = 'n', long, requires = "headless")]
    samples: Option<usize>,

    /// Write the samples as CSV to this path on exit (headless mode)
    #[arg(long, requires = "headless")]
    csv: Option<PathBuf>,

    /// Write the chart as PNG to this path on exit (headless mode)
    #[arg(long, requires = "headless")]
    png: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(ref target) = args.target {
        settings.target = target.clone();
    }
    if let Some(ref dir) = args.export_dir {
        settings.export_dir = dir.clone();
    }
    if args.log_file.is_some() {
        settings.log_file = args.log_file.clone();
    }
    let interval_text = args.interval.clone().unwrap_or_else(|| settings.interval_text());

    init_logging(&settings, args.headless)?;

    let rt = Runtime::new()?;
    let prober = Arc::new(SystemPing::new(settings.ping_wait, settings.probe_timeout()));
    let (sampler, sampler_events) = Sampler::new(
        prober,
        Series::new(),
        SamplerOptions::from(&settings),
        rt.handle().clone(),
    );

    if args.headless {
        return rt.block_on(run_headless(
            sampler,
            sampler_events,
            &settings,
            &interval_text,
            &args,
        ));
    }

    let mut app = App::new(sampler, sampler_events, &settings, ui::Theme::auto_detect());
    app.interval_input = interval_text;
    if args.autostart {
        app.start();
    }

    let result = run_tui(&mut app);

    // The loop must be gone before the process exits
    rt.block_on(app.sampler_mut().shutdown());
    result
}

/// Set up tracing; the TUI owns the terminal, so interactive runs only log to a file.
fn init_logging(settings: &Settings, headless: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pingplot=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if let Some(ref path) = settings.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.with_ansi(false).with_writer(std::sync::Mutex::new(file)).init();
    } else if headless {
        builder.with_writer(io::stderr).init();
    }
    Ok(())
}

/// Sample without a UI until `--samples` is reached or Ctrl-C, then export.
async fn run_headless(
    mut sampler: Sampler,
    mut sampler_events: tokio::sync::mpsc::UnboundedReceiver<SamplerEvent>,
    settings: &Settings,
    interval_text: &str,
    args: &Args,
) -> Result<()> {
    sampler.start(&settings.target, interval_text)?;
    println!("Pinging {} every {}s (Ctrl-C to stop)", settings.target, interval_text.trim());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = sampler_events.recv() => match event {
                Some(SamplerEvent::Sample { index, value }) => {
                    if value == pingplot::FAILED_SAMPLE {
                        println!("{:>5}  failed", index + 1);
                    } else {
                        println!("{:>5}  {} ms", index + 1, value);
                    }
                    if args.samples.is_some_and(|n| index + 1 >= n) {
                        break;
                    }
                }
                Some(SamplerEvent::Alert { failures }) => {
                    println!("ALERT: {} consecutive ping failures", failures);
                }
                None => break,
            },
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
        }
    }
    sampler.shutdown().await;

    let samples = sampler.series().snapshot();
    let stats = pingplot::SeriesStats::from_samples(&samples);
    println!(
        "{} samples, {} failed ({:.0}% loss)",
        stats.count, stats.failures, stats.loss_percent
    );

    if let Some(ref path) = args.csv {
        export::export_table(&samples, path)
            .with_context(|| format!("Failed to export CSV to {}", path.display()))?;
        println!("Exported CSV to {}", path.display());
    }
    if let Some(ref path) = args.png {
        let options = ImageOptions {
            width: settings.image_width,
            height: settings.image_height,
            style: ImageStyle::light(),
        };
        export::export_image(&samples, path, &options)
            .with_context(|| format!("Failed to export PNG to {}", path.display()))?;
        println!("Exported PNG to {}", path.display());
    }
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_draw = Instant::now();
    let mut dirty = true;

    while app.running {
        // Redraw after every sample, input, or once per second for the "ago" counter
        if dirty || last_draw.elapsed() >= Duration::from_secs(1) {
            terminal.draw(|frame| ui::draw(frame, app))?;
            last_draw = Instant::now();
            dirty = false;
        }

        if let Some(event) = events::poll_event(TICK_RATE)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {}
                _ => {}
            }
            dirty = true;
        }

        if app.poll_events() {
            dirty = true;
        }
    }

    Ok(())
}
