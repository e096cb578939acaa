use std::sync::Arc;

use clap::{Arg, Command};
use quick_translator::{
    MockLookup, MockMode, MockTranslator, Orchestrator, ProviderKind, Settings, SettingsStore,
    TranslationRequest, TranslationResult, format_entry, is_single_word,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = Command::new("quick-translator")
        .version("0.1.0")
        .about("Translate text or look up single words from the terminal")
        .arg(
            Arg::new("text")
                .help("Text to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target")
                .help("Target language code (e.g. zh, en, fr)")
                .index(2),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .short('p')
                .help("Backend: default-free, alt-free, or ai"),
        )
        .arg(
            Arg::new("lookup")
                .long("lookup")
                .short('l')
                .help("Stream an AI dictionary entry for a single word")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use deterministic mock providers instead of the network")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show streaming progress and request details")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let text = matches.get_one::<String>("text").unwrap();
    let use_mock = matches.get_flag("mock");
    let verbose = matches.get_flag("verbose");

    let settings = load_settings();
    let target = matches
        .get_one::<String>("target")
        .cloned()
        .unwrap_or_else(|| settings.target_language.clone());
    let provider = match matches.get_one::<String>("provider") {
        Some(raw) => raw.parse::<ProviderKind>().map_err(|e| {
            eprintln!("❌ {}", e);
            e
        })?,
        None => settings.provider,
    };

    if verbose {
        println!("📝 Source: \"{}\"", text);
        println!("🌍 → {}", target);
        println!("🔌 Provider: {}", provider);
        println!();
    }

    let orchestrator = if use_mock {
        mock_orchestrator()
    } else {
        Orchestrator::from_settings(&settings)?
    };

    if matches.get_flag("lookup") {
        if !is_single_word(text) {
            eprintln!("❌ --lookup expects a single word, got a phrase");
            std::process::exit(2);
        }
        let entry = orchestrator
            .lookup_stream(text, &target, &move |partial: &str| {
                if verbose {
                    println!("… {} bytes buffered", partial.len());
                }
            })
            .await?;
        println!("{}", format_entry(&entry));
        return Ok(());
    }

    let request = TranslationRequest::new(text.clone(), target).with_provider(provider);
    match orchestrator.resolve(&request).await? {
        TranslationResult::Plain { translation } => println!("{}", translation),
        TranslationResult::WordLookup { entry } => println!("{}", format_entry(&entry)),
    }

    Ok(())
}

/// Read the persisted settings, falling back to defaults if the store is
/// unavailable (fresh machine, unwritable config directory).
fn load_settings() -> Settings {
    SettingsStore::default_path()
        .and_then(|path| SettingsStore::open(path))
        .map(|store| store.get())
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "settings unavailable, using defaults");
            Settings::default()
        })
}

/// Deterministic offline providers for trying out the CLI.
fn mock_orchestrator() -> Orchestrator {
    let entry = serde_json::json!({
        "word": "hello",
        "phonetic": "/həˈləʊ/",
        "part_of_speech": [
            {
                "pos": "interjection",
                "definitions": ["used as a greeting"],
                "examples": ["Hello, how are you?"]
            }
        ],
        "translations": { "zh-CN": ["你好"] },
        "frequency": "high",
        "tags": ["greeting"]
    });
    let entry = serde_json::from_value(entry).expect("mock entry is valid");
    Orchestrator::new(
        Arc::new(MockTranslator::new("default-free", MockMode::Suffix)),
        Arc::new(MockTranslator::new("alt-free", MockMode::Suffix)),
        Arc::new(MockLookup::streaming_entry("ai", MockMode::Suffix, &entry)),
    )
}
