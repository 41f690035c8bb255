//! MAIDR console driver
//!
//! Loads a chart and navigates it from standard input, one key chord per
//! line (`right`, `ctrl+shift+left`, `esc`, ...). Output events are printed
//! as they are produced.
//!
//! ```text
//! maidr-rs <chart.json> [--settings <settings.toml>] [--log-dir <dir>]
//! ```
//!
//! Lines starting with `:` are driver commands: `:focus`, `:blur`, `:quit`.

use anyhow::{bail, Context};
use crossbeam_channel::{select, unbounded};
use maidr_rs::{config, config::Settings, model::Maidr, ChartController, OutputEvent};
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct Args {
    chart: PathBuf,
    settings: Option<PathBuf>,
    log_dir: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut chart = None;
    let mut settings = None;
    let mut log_dir = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => settings = Some(args.next().context("--settings needs a path")?.into()),
            "--log-dir" => log_dir = Some(args.next().context("--log-dir needs a path")?.into()),
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            _ if chart.is_none() => chart = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument {}", arg),
        }
    }

    Ok(Args {
        chart: chart.context("usage: maidr-rs <chart.json> [--settings <file>] [--log-dir <dir>]")?,
        settings,
        log_dir,
    })
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;

    // Initialize logging; stdout is reserved for output events
    let (file_layer, _guard) = match &args.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "maidr-rs.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,maidr_rs=debug")),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    let settings = match args.settings.clone().or_else(config::settings_path) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let chart = Maidr::load(&args.chart)
        .with_context(|| format!("Failed to load chart {:?}", args.chart))?;
    let mut controller = ChartController::new(&chart, settings)?;

    // Stdin is read on its own thread so autoplay ticks keep flowing
    let (line_tx, line_rx) = unbounded::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("{}", controller.focus_in());
    print_events(&controller);

    let mut running = true;
    while running {
        let ticker = controller.ticker();
        select! {
            recv(line_rx) -> line => {
                running = match line {
                    Ok(line) => handle_line(&mut controller, &line),
                    Err(_) => false,
                };
            }
            recv(ticker) -> _ => {
                controller.on_tick();
            }
        }
        print_events(&controller);
    }

    controller.focus_out();
    print_events(&controller);
    tracing::info!("Shutting down...");
    Ok(())
}

/// Run one input line; returns false when the driver should exit
fn handle_line(controller: &mut ChartController, line: &str) -> bool {
    match line.trim() {
        ":quit" => return false,
        ":focus" => println!("{}", controller.focus_in()),
        ":blur" => controller.focus_out(),
        "" => {}
        chord => {
            if controller.handle_key(chord).is_none() {
                tracing::debug!("no binding for '{}'", chord);
            }
        }
    }
    true
}

fn print_events(controller: &ChartController) {
    for event in controller.drain() {
        match event {
            OutputEvent::Text { value, .. } => println!("text: {}", value),
            OutputEvent::Notification(message) => println!("notice: {}", message),
            OutputEvent::Braille { text, caret } => {
                println!("braille (caret {}):\n{}", caret, text.trim_end())
            }
            OutputEvent::Review(value) => println!("review: {}", value),
            other => println!("{:?}", other),
        }
    }
}
