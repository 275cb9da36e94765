use affirm::config::{Config, validate_affirmations};
use affirm::matcher::SpeechProgressMatcher;
use affirm::render::{RenderOptions, Renderer, Ui, UiEvent};
use affirm::repl::{self, TranscriptEvent};
use affirm::session::PracticeSession;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "affirm", version, about = "Speak your affirmations, word by word")]
struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Practice affirmations, reading recognizer events from stdin
    Practice {
        /// Affirmation to practice (repeatable; overrides the config list)
        #[arg(long = "phrase")]
        phrases: Vec<String>,
        /// Emit progress as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Match hypotheses against one phrase and exit (status 0 if spoken in full)
    Check {
        #[arg(long)]
        phrase: String,
        /// Treat each hypothesis as a cumulative transcript
        #[arg(long)]
        window: bool,
        /// Emit progress as JSON
        #[arg(long)]
        json: bool,
        /// Recognizer hypotheses, in arrival order
        heard: Vec<String>,
    },
}

const TICK: Duration = Duration::from_millis(100);

#[hotpath::main]
fn main() -> anyhow::Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_path(path),
        None => Config::load(),
    }
    .context("failed to load config")?;

    match cli.command.unwrap_or(Command::Practice {
        phrases: Vec::new(),
        json: false,
    }) {
        Command::Practice { phrases, json } => {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(run_practice(config, phrases, json))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            phrase,
            window,
            json,
            heard,
        } => run_check(&config, &phrase, window, json, &heard),
    }
}

fn init_logging() {
    let filter = std::env::var("AFFIRM_LOG").unwrap_or_else(|_| "warn".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run_check(
    config: &Config,
    phrase: &str,
    window: bool,
    json: bool,
    heard: &[String],
) -> anyhow::Result<ExitCode> {
    let mut matcher = SpeechProgressMatcher::new(&config.matcher);
    matcher.reset_for_text(phrase);

    for hypothesis in heard {
        let tokens = if window {
            matcher.tokenize_for_current_window(hypothesis)
        } else {
            matcher.tokenize_for_matching(hypothesis)
        };
        let fresh = matcher.diff_against_last(tokens);
        matcher.feed(&fresh);
    }

    let progress = matcher.progress();
    if json {
        println!("{}", serde_json::to_string(&progress)?);
    } else {
        println!(
            "{}/{} {} | {}",
            progress.active,
            progress.total,
            progress.spoken.join(" "),
            progress.pending.join(" ")
        );
    }

    Ok(if progress.complete {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_practice(config: Config, phrases: Vec<String>, json: bool) -> anyhow::Result<()> {
    let phrases = if phrases.is_empty() {
        config.affirmations.clone()
    } else {
        validate_affirmations(&phrases).context("invalid --phrase")?;
        phrases
    };

    let options = RenderOptions {
        color: config.ui.color && io::stdout().is_terminal() && !json,
        show_heard: config.ui.show_heard,
        json,
    };
    let (ui, ui_rx) = Ui::new();
    let mut renderer = Renderer::stdout(options);
    let mut session = PracticeSession::new(phrases, &config.matcher);

    // Ctrl+C ends the session and prints the summary
    let (shutdown_tx, shutdown_rx) = flume::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .context("failed to install Ctrl+C handler")?;

    // Stdin reader thread
    let (input_tx, input_rx) = flume::unbounded::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(line).is_err() {
                break;
            }
        }
    });

    // Animation tick for the spinner
    if options.color {
        let ui_tick = ui.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            loop {
                interval.tick().await;
                ui_tick.tick();
            }
        });
    }

    if !json {
        eprintln!(
            "Say each affirmation aloud. Feed recognizer events as `partial: ...` or `final: ...`, \
             `reset` to start a phrase over, `skip` to move on. Ctrl+C to stop."
        );
    }
    repl::announce_current(&session, &ui);

    while !session.is_finished() {
        tokio::select! {
            biased;

            _ = shutdown_rx.recv_async() => break,

            Ok(event) = ui_rx.recv_async() => {
                renderer.handle(event)?;
            }

            line = input_rx.recv_async() => {
                let Ok(line) = line else { break };
                if let Some(event) = TranscriptEvent::parse(&line) {
                    repl::handle_transcript(event, &mut session, &ui);
                }
            }
        }
    }

    for event in ui_rx.drain() {
        renderer.handle(event)?;
    }
    if !session.is_finished() {
        renderer.handle(UiEvent::Finished(session.summary()))?;
    }
    Ok(())
}
