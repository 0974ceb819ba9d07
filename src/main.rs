use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use asr_bridge::{
    Config, EventKind, RecognitionEvent, Script, ScriptedEngine, SpeechRecognition,
};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

/// Run a scripted recognition session and print every emitted event.
#[derive(Debug, Parser)]
#[command(name = "asr-bridge")]
struct Args {
    /// Configuration file (extension resolved by the config loader).
    #[arg(long, default_value = "config/asr-bridge")]
    config: String,

    /// JSON capture script to replay instead of the built-in utterance.
    #[arg(long)]
    script: Option<String>,

    /// Final transcript for the built-in utterance script.
    #[arg(long, default_value = "turn on the lights")]
    transcript: String,
}

const ALL_EVENTS: [EventKind; 11] = [
    EventKind::AudioStart,
    EventKind::SoundStart,
    EventKind::SpeechStart,
    EventKind::SpeechEnd,
    EventKind::SoundEnd,
    EventKind::AudioEnd,
    EventKind::Result,
    EventKind::NoMatch,
    EventKind::Error,
    EventKind::Start,
    EventKind::End,
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("asr-bridge demo");
    info!("ASR server: {}", cfg.server.server_url);
    info!("Negotiated language: {}", cfg.asr.language);

    let script = match &args.script {
        Some(path) => Script::from_json(&std::fs::read_to_string(path)?)?,
        None => {
            let half = args.transcript.chars().count() / 2;
            let interim: String = args.transcript.chars().take(half).collect();
            Script::utterance(&interim, &args.transcript, 0.92)
        }
    };

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let engine = Arc::new(ScriptedEngine::new(events_tx, script));
    let recognition = SpeechRecognition::new(&cfg, engine, events_rx);

    for kind in ALL_EVENTS {
        recognition.add_event_listener(kind, |event| match event {
            RecognitionEvent::Result { results, .. } => {
                if let Some(best) = results.get(0).and_then(|r| r.best()) {
                    info!(
                        "event 'result': \"{}\" (confidence {:.2}, final: {})",
                        best.transcript,
                        best.confidence,
                        results.get(0).map(|r| r.is_final).unwrap_or(false)
                    );
                }
            }
            RecognitionEvent::Error { error, message } => {
                info!("event 'error': {} ({})", error, message);
            }
            other => info!("event '{}'", other.kind()),
        });
    }

    recognition.start().await?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    recognition.stop().await?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    let stats = recognition.stats().await;
    info!(
        "Session {} finished in state '{:?}': {} event(s) emitted, {} timer(s) armed",
        stats.session_id, stats.state, stats.events_emitted, stats.fallback_timers_armed
    );

    Ok(())
}
