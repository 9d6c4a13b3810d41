use anyhow::Result;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxmail::integration::{ControllerEvent, Orchestrator, OrchestratorHandle, VoxmailConfig};
use voxmail::mailbox::{HttpTransport, InMemoryMailbox, MailboxTransport};
use voxmail::speech::{ConsoleSpeech, Scenario, ScriptedSpeech};

#[derive(Parser)]
#[command(name = "voxmail")]
#[command(about = "Operate an email mailbox by voice", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use a built-in sample mailbox instead of the mail service
    #[arg(long)]
    demo: bool,

    /// Replay a recognition scenario instead of reading stdin
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so spoken output stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxmail=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => VoxmailConfig::load(path)?,
        None => VoxmailConfig::default(),
    }
    .apply_env();

    info!("Starting Voxmail (mail service: {})", config.mailbox.base_url);

    match (&cli.script, cli.demo) {
        (Some(path), true) => run_scripted(config, Scenario::load(path)?, InMemoryMailbox::sample()),
        (Some(path), false) => {
            let transport = HttpTransport::new(&config.mailbox)?;
            run_scripted(config, Scenario::load(path)?, transport)
        }
        (None, true) => run_console(config, InMemoryMailbox::sample()),
        (None, false) => {
            let transport = HttpTransport::new(&config.mailbox)?;
            run_console(config, transport)
        }
    }
}

/// Interactive session: stdin lines are transcripts
fn run_console<T: MailboxTransport + 'static>(config: VoxmailConfig, transport: T) -> Result<()> {
    let (speech, feed) = ConsoleSpeech::new(config.speech.clone());
    let (orchestrator, handle) = Orchestrator::new(config, Arc::new(speech), transport)?;
    let worker = orchestrator.start()?;

    let events = handle.event_receiver();
    let printer = thread::spawn(move || {
        for event in events.iter() {
            match event {
                ControllerEvent::Status(status) => println!("» {}", status),
                ControllerEvent::Fatal(message) => println!("✖ {}", message),
                ControllerEvent::Shutdown => break,
                ControllerEvent::StateChanged(_) | ControllerEvent::Heard(_) => {}
            }
        }
    });

    println!("Press Enter to start. Type what you would say; '!' interrupts speech, ':quit' exits.");

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        match line.trim() {
            ":quit" => break,
            ":stop" | "!" => handle.interrupt(),
            "" | ":start" if !handle.is_armed() => handle.activate()?,
            "" | ":start" => {}
            text if handle.is_armed() => feed.send(text)?,
            _ => println!("» {}", handle.status()),
        }
    }

    shutdown(handle, worker)?;
    printer
        .join()
        .map_err(|_| anyhow::anyhow!("Event printer panicked"))?;
    Ok(())
}

/// Non-interactive session replaying a scenario
fn run_scripted<T: MailboxTransport + 'static>(
    config: VoxmailConfig,
    scenario: Scenario,
    transport: T,
) -> Result<()> {
    let speech = Arc::new(ScriptedSpeech::from_scenario(scenario));
    let (orchestrator, handle) = Orchestrator::new(config, Arc::clone(&speech), transport)?;
    let worker = orchestrator.start()?;

    handle.activate()?;
    loop {
        match handle.recv_event_timeout(Duration::from_millis(300)) {
            Some(ControllerEvent::Heard(text)) => println!("🎤 {}", text),
            Some(ControllerEvent::Fatal(message)) => {
                warn!("{}", message);
                break;
            }
            Some(ControllerEvent::StateChanged(state)) if state.is_idle() => break,
            Some(ControllerEvent::Shutdown) => break,
            Some(_) => {}
            None if speech.remaining() == 0 => break,
            None => {}
        }
    }

    // The last event is finished before shutdown is seen
    shutdown(handle, worker)?;
    for utterance in speech.spoken() {
        println!("🔊 {}", utterance.text);
    }
    Ok(())
}

fn shutdown(handle: OrchestratorHandle, worker: thread::JoinHandle<()>) -> Result<()> {
    handle.shutdown()?;
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("Dialogue thread panicked"))?;
    Ok(())
}
