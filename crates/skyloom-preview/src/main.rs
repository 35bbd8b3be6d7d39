use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use skyloom_core::{Identifier, SkyConfig, Weather};
use skyloom_preview::report;
use skyloom_preview::runner::{load_catalog, read_documents, simulate};
use skyloom_preview::scenario::Scenario;
use skyloom_preview::PreviewError;
use skyloom_rules::{builtin_registry, load_sky_config};

const ALPHA_TOLERANCE: f32 = 1e-3;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut dir: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut compare_path: Option<PathBuf> = None;
    let mut scenario = Scenario::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--dir" => dir = Some(PathBuf::from(value(&args, &mut i, flag))),
            "--config" => config_path = Some(PathBuf::from(value(&args, &mut i, flag))),
            "--output" => output_path = Some(PathBuf::from(value(&args, &mut i, flag))),
            "--compare" => compare_path = Some(PathBuf::from(value(&args, &mut i, flag))),
            "--step" => scenario.step = parse(value(&args, &mut i, flag), flag),
            "--days" => scenario.days = parse(value(&args, &mut i, flag), flag),
            "--start" => scenario.start_tick = parse(value(&args, &mut i, flag), flag),
            "--height" => scenario.height = parse(value(&args, &mut i, flag), flag),
            "--weather" => scenario.weather = parse::<Weather>(value(&args, &mut i, flag), flag),
            "--biome" => scenario.biome = parse::<Identifier>(value(&args, &mut i, flag), flag),
            "--world" => scenario.world = parse::<Identifier>(value(&args, &mut i, flag), flag),
            "--help" | "-h" => {
                eprintln!("Usage: sky-preview --dir <path> [OPTIONS]");
                eprintln!("  --dir <path>        Directory of skybox JSON documents");
                eprintln!("  --config <path>     RON sky config (default: built-in)");
                eprintln!("  --step <ticks>      Ticks between samples (default: 500)");
                eprintln!("  --days <n>          Days to simulate (default: 1)");
                eprintln!("  --start <tick>      First sampled tick (default: 0)");
                eprintln!("  --weather <w>       clear | rain | snow | thunder (default: clear)");
                eprintln!("  --biome <id>        Biome the player stands in (default: minecraft:plains)");
                eprintln!("  --world <id>        Current world (default: minecraft:overworld)");
                eprintln!("  --height <y>        Player height (default: 64)");
                eprintln!("  --output <path>     Save the timeline as JSON");
                eprintln!("  --compare <path>    Compare alphas against a saved timeline");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(dir) = dir else {
        eprintln!("Missing required --dir <path>");
        process::exit(1);
    };

    let paths = Paths {
        dir,
        config: config_path,
        output: output_path,
        compare: compare_path,
    };
    match run(&paths, &scenario) {
        Ok(0) => {}
        Ok(changes) => {
            eprintln!("ERROR: {} alpha changes against the saved run, exiting with code 1", changes);
            process::exit(1);
        }
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}

struct Paths {
    dir: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    compare: Option<PathBuf>,
}

/// Returns the number of alpha changes found by `--compare`.
fn run(paths: &Paths, scenario: &Scenario) -> Result<usize, PreviewError> {
    let config = match &paths.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| PreviewError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            load_sky_config(&text)?
        }
        None => SkyConfig::default(),
    };

    let registry = builtin_registry()?;
    let files = read_documents(&paths.dir)?;
    let mut loaded = load_catalog(&files, &registry, config);

    println!("\n## Decode\n");
    println!("{}", report::format_skipped(&loaded.skipped));

    let timeline = simulate(&mut loaded, scenario);
    println!("## Alpha timeline\n");
    println!("{}", report::format_markdown(&timeline));

    if let Some(path) = &paths.output {
        report::save_timeline(path, &timeline).map_err(|source| PreviewError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("Saved timeline to {}", path.display());
    }

    let mut changed = 0;
    if let Some(path) = &paths.compare {
        if let Some(saved) = report::load_timeline(path) {
            let changes = report::compare(&timeline, &saved, ALPHA_TOLERANCE);
            println!("{}", report::format_comparison(&changes));
            changed = changes.len();
        } else {
            log::warn!("Saved timeline not found: {}", path.display());
        }
    }
    Ok(changed)
}

/// Advance past a flag and return its value, exiting if it is missing.
fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(v) => v,
        None => {
            eprintln!("Missing value for {}", flag);
            process::exit(1);
        }
    }
}

fn parse<T: FromStr>(raw: &str, flag: &str) -> T {
    match raw.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid {} value: {}", flag, raw);
            process::exit(1);
        }
    }
}
