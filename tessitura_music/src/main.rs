// Tessitura command-line generator.
//
// Generates one composition (a melody with a harmonizing progression, or a
// named ensemble recipe) and writes it as a MIDI file plus a text log next
// to it. The pipeline: config → seed data → orchestrator → timeline → SMF.
//
// Usage:
//   cargo run -p tessitura_music -- [output.mid] [--seed N] [--tempo BPM]
//     [--ensemble NAME] [--config PATH] [--json]
//     [--seed-ints 1,2,3 | --seed-floats 1.5,2.7 | --seed-chars TEXT | --seed-hex #RRGGBB]
//
// Ensembles: solo-piano, piano-duet, string-trio, string-quartet, wind-quintet
//
// Without --config, `tessitura.json` in the working directory is used when
// present. Log verbosity follows RUST_LOG (default `tessitura_music=info`).

use std::path::Path;
use std::process::ExitCode;
use tessitura_music::config::GeneratorConfig;
use tessitura_music::ensemble::{ENSEMBLES, by_name, compose_ensemble};
use tessitura_music::generate::generate_composition;
use tessitura_music::midi::write_midi;
use tessitura_music::seed::SeedData;
use tessitura_music::{MusicError, Prng, Result, report};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG: &str = "tessitura.json";

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tessitura_music=info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("output.mid");
    let seed: u64 = parse_flag(&args, "--seed").unwrap_or_else(|| Prng::from_time().next_u64());
    let tempo: Option<f64> = parse_flag(&args, "--tempo");
    let ensemble_name: Option<String> = parse_flag(&args, "--ensemble");
    let config_path: Option<String> = parse_flag(&args, "--config");
    let dump_json = args.iter().any(|a| a == "--json");

    let config = load_config(config_path.as_deref())?;
    let seed_data = parse_seed_data(&args)?;

    info!(
        output = output_path,
        seed,
        tempo,
        ensemble = ensemble_name.as_deref(),
        seed_data = seed_data.as_ref().map(SeedData::kind),
        "generating"
    );

    let mut rng = Prng::new(seed);
    let piece = match ensemble_name.as_deref() {
        Some(name) => {
            let ensemble = by_name(name).inspect_err(|_| {
                let known: Vec<&str> = ENSEMBLES.iter().map(|e| e.name).collect();
                warn!("known ensembles: {}", known.join(", "));
            })?;
            compose_ensemble(ensemble, &config, tempo, seed_data.as_ref(), &mut rng)?
        }
        None => generate_composition(&config, tempo, seed_data.as_ref(), &mut rng)?,
    };

    let output = Path::new(output_path);
    write_midi(&piece, output)?;
    report::write(&piece, &output.with_extension("txt"))?;
    if dump_json {
        let json_path = output.with_extension("json");
        std::fs::write(&json_path, serde_json::to_string_pretty(&piece)?)?;
        info!(path = %json_path.display(), "wrote composition JSON");
    }

    info!(
        title = %piece.title,
        voices = piece.voice_count(),
        duration = piece.duration(),
        "done"
    );
    Ok(())
}

fn load_config(explicit: Option<&str>) -> Result<GeneratorConfig> {
    if let Some(path) = explicit {
        return GeneratorConfig::load(Path::new(path));
    }
    let path = Path::new(DEFAULT_CONFIG);
    if !path.exists() {
        info!("no {DEFAULT_CONFIG}, using default config");
        return Ok(GeneratorConfig::default());
    }
    match GeneratorConfig::load(path) {
        Ok(config) => {
            info!("loaded {DEFAULT_CONFIG}");
            Ok(config)
        }
        Err(e) => {
            warn!("failed to load {DEFAULT_CONFIG}: {e}; using defaults");
            Ok(GeneratorConfig::default())
        }
    }
}

/// At most one seed flag may be given.
fn parse_seed_data(args: &[String]) -> Result<Option<SeedData>> {
    let mut found = Vec::new();
    if let Some(values) = parse_list::<i64>(args, "--seed-ints")? {
        found.push(SeedData::Ints(values));
    }
    if let Some(values) = parse_list::<f64>(args, "--seed-floats")? {
        found.push(SeedData::Floats(values));
    }
    if let Some(text) = parse_flag::<String>(args, "--seed-chars") {
        found.push(SeedData::from_text(&text));
    }
    if let Some(hex) = parse_flag::<String>(args, "--seed-hex") {
        found.push(SeedData::Hex(hex));
    }
    if found.len() > 1 {
        return Err(MusicError::InputShape(
            "only one --seed-* flag may be given".into(),
        ));
    }
    Ok(found.pop())
}

fn parse_list<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<Vec<T>>> {
    let Some(raw) = parse_flag::<String>(args, flag) else {
        return Ok(None);
    };
    raw.split(',')
        .map(|item| {
            item.trim()
                .parse()
                .map_err(|_| MusicError::InputShape(format!("{flag}: cannot parse {item:?}")))
        })
        .collect::<Result<Vec<T>>>()
        .map(Some)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
