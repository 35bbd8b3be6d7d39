use std::path::Path;

use serde::{Deserialize, Serialize};
use skyloom_core::SkyConfig;
use skyloom_render::{EntryId, RecordingBackend, SkyboxCatalog};
use skyloom_rules::{decode_all, SkippedDocument, SkyboxDocument, TypeRegistry};

use crate::scenario::Scenario;
use crate::PreviewError;

/// One JSON document read from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
}

/// Read every `*.json` file in `dir`, sorted by file name.
///
/// Only a failure to list `dir` is an error. A file that cannot be read
/// (I/O error, invalid UTF-8) is logged and left out of the batch.
pub fn read_documents(dir: &Path) -> Result<Vec<SourceFile>, PreviewError> {
    let io_err = |source| PreviewError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                log::error!("Skipping skybox '{}': {}", path.display(), e);
                continue;
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(SourceFile { name, contents });
    }
    log::info!("Read {} skybox document(s) from {}", files.len(), dir.display());
    Ok(files)
}

/// A catalog populated from one reload batch.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub catalog: SkyboxCatalog,
    /// Catalog handle and source name per decoded entry.
    pub names: Vec<(EntryId, String)>,
    pub skipped: Vec<SkippedDocument>,
}

pub fn load_catalog(files: &[SourceFile], registry: &TypeRegistry, config: SkyConfig) -> LoadedCatalog {
    let documents: Vec<SkyboxDocument<'_>> = files
        .iter()
        .map(|file| SkyboxDocument {
            id: &file.name,
            contents: &file.contents,
        })
        .collect();
    let report = decode_all(registry, &documents);

    let mut catalog = SkyboxCatalog::new(config);
    let (names, entries): (Vec<String>, Vec<_>) = report
        .entries
        .into_iter()
        .map(|loaded| (loaded.id, loaded.entry))
        .unzip();
    let ids = catalog.replace_reloadable(entries);

    LoadedCatalog {
        catalog,
        names: ids.into_iter().zip(names).collect(),
        skipped: report.skipped,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSample {
    pub tick: i64,
    /// Alpha per entry, in [`Timeline::entries`] order.
    pub alphas: Vec<f32>,
    pub drawn: usize,
    pub skip_default_sky: bool,
    pub fog_override: Option<[f32; 4]>,
    pub sun_sky_tint: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub entries: Vec<String>,
    pub samples: Vec<TimelineSample>,
}

/// Step the catalog through every tick of the scenario, one frame per
/// sample, drawing into a recording backend.
pub fn simulate(loaded: &mut LoadedCatalog, scenario: &Scenario) -> Timeline {
    let mut backend = RecordingBackend::new();
    let mut samples = Vec::new();

    for tick in scenario.ticks() {
        backend.clear();
        let env = scenario.environment_at(tick);
        let frame = scenario.frame_at(tick);
        let output = loaded.catalog.render_frame(&env, &frame, &mut backend);

        let alphas = loaded
            .names
            .iter()
            .map(|(id, _)| loaded.catalog.get(*id).map_or(0.0, |e| e.alpha()))
            .collect();
        samples.push(TimelineSample {
            tick,
            alphas,
            drawn: output.drawn,
            skip_default_sky: output.skip_default_sky,
            fog_override: output.signals.fog_override.map(|c| c.to_array()),
            sun_sky_tint: output.signals.render_sun_sky_tint,
        });
        log::debug!(
            "tick {}: {} drawn, {} draw calls",
            tick,
            output.drawn,
            backend.draw_count()
        );
    }

    Timeline {
        entries: loaded.names.iter().map(|(_, name)| name.clone()).collect(),
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyloom_core::Weather;
    use skyloom_rules::builtin_registry;

    fn file(name: &str, contents: &str) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            contents: contents.to_string(),
        }
    }

    fn day_sky() -> SourceFile {
        file(
            "day.json",
            r#"{
                "type": "monocolor", "schemaVersion": 2,
                "properties": {
                    "fade": { "startFadeIn": 0, "endFadeIn": 2000, "startFadeOut": 10000, "endFadeOut": 12000 }
                },
                "color": { "red": 0.4, "green": 0.6, "blue": 1.0 }
            }"#,
        )
    }

    fn storm_sky() -> SourceFile {
        file(
            "storm.json",
            r#"{
                "type": "monocolor", "schemaVersion": 2,
                "properties": {
                    "fade": { "startFadeIn": 0, "endFadeIn": 1000, "startFadeOut": 12000, "endFadeOut": 13000 },
                    "changeFog": true,
                    "fogColors": { "red": 0.2, "green": 0.2, "blue": 0.2 }
                },
                "conditions": { "weather": ["thunder"] }
            }"#,
        )
    }

    #[test]
    fn test_load_skips_bad_documents() {
        let registry = builtin_registry().expect("builtins register");
        let files = [day_sky(), file("broken.json", "{"), storm_sky()];
        let loaded = load_catalog(&files, &registry, SkyConfig::default());
        assert_eq!(loaded.catalog.len(), 2);
        assert_eq!(loaded.names[0].1, "day.json");
        assert_eq!(loaded.names[1].1, "storm.json");
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.skipped[0].id, "broken.json");
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = std::env::temp_dir().join(format!("sky-preview-read-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create dir");
        std::fs::write(dir.join("a.json"), &day_sky().contents).expect("write a");
        std::fs::write(dir.join("b.json"), [0xffu8, 0xfe, 0x7b]).expect("write b");
        std::fs::write(dir.join("notes.txt"), "ignored").expect("write txt");

        let files = read_documents(&dir).expect("directory lists");
        let _ = std::fs::remove_dir_all(&dir);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.json");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = std::env::temp_dir().join("sky-preview-does-not-exist");
        assert!(matches!(
            read_documents(&dir),
            Err(PreviewError::Io { .. })
        ));
    }

    #[test]
    fn test_simulate_day_cycle() {
        let registry = builtin_registry().expect("builtins register");
        let mut loaded = load_catalog(&[day_sky(), storm_sky()], &registry, SkyConfig::default());
        let timeline = simulate(&mut loaded, &Scenario::default());

        assert_eq!(timeline.entries, vec!["day.json", "storm.json"]);
        assert_eq!(timeline.samples.len(), 48);
        let at = |tick: i64| {
            timeline
                .samples
                .iter()
                .find(|s| s.tick == tick)
                .expect("sampled tick")
        };
        assert_eq!(at(6000).alphas[0], 1.0);
        assert!(at(6000).skip_default_sky);
        assert_eq!(at(18000).alphas[0], 0.0);
        assert!(!at(18000).skip_default_sky);
        // Clear weather: the storm sky never shows
        assert!(timeline.samples.iter().all(|s| s.alphas[1] == 0.0));
        assert!(timeline.samples.iter().all(|s| s.fog_override.is_none()));
    }

    #[test]
    fn test_simulate_thunder() {
        let registry = builtin_registry().expect("builtins register");
        let mut loaded = load_catalog(&[storm_sky()], &registry, SkyConfig::default());
        let scenario = Scenario {
            weather: Weather::Thunder,
            ..Default::default()
        };
        let timeline = simulate(&mut loaded, &scenario);
        let noon = timeline
            .samples
            .iter()
            .find(|s| s.tick == 6000)
            .expect("sampled tick");
        assert_eq!(noon.alphas, vec![1.0]);
        assert_eq!(noon.fog_override, Some([0.2, 0.2, 0.2, 1.0]));
        assert_eq!(noon.drawn, 1);
        assert!(timeline.samples[0].fog_override.is_none());
    }
}
