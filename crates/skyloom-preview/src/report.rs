use std::path::Path;

use skyloom_rules::SkippedDocument;

use crate::runner::Timeline;

/// Load a saved timeline. Returns None if the file is missing or unreadable.
pub fn load_timeline(path: &Path) -> Option<Timeline> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a timeline as pretty JSON, creating parent directories.
pub fn save_timeline(path: &Path, timeline: &Timeline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(timeline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// One entry whose alpha at a sampled tick moved away from the saved run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaChange {
    pub entry: String,
    pub tick: i64,
    pub before: f32,
    pub after: f32,
}

/// Compare a timeline against a saved one. Entries are matched by name and
/// samples by tick; anything present in only one run is ignored.
pub fn compare(current: &Timeline, baseline: &Timeline, tolerance: f32) -> Vec<AlphaChange> {
    let mut changes = Vec::new();

    for (col, name) in current.entries.iter().enumerate() {
        let Some(base_col) = baseline.entries.iter().position(|n| n == name) else {
            continue;
        };
        for sample in &current.samples {
            let Some(base) = baseline.samples.iter().find(|b| b.tick == sample.tick) else {
                continue;
            };
            let (Some(&after), Some(&before)) = (sample.alphas.get(col), base.alphas.get(base_col))
            else {
                continue;
            };
            if (after - before).abs() > tolerance {
                changes.push(AlphaChange {
                    entry: name.clone(),
                    tick: sample.tick,
                    before,
                    after,
                });
            }
        }
    }

    changes
}

pub fn format_comparison(changes: &[AlphaChange]) -> String {
    if changes.is_empty() {
        return "Timeline matches the saved run.\n".to_string();
    }
    let mut out = format!("ALPHA CHANGES ({}):\n", changes.len());
    for c in changes {
        out.push_str(&format!(
            "  - {} @ {}: {:.3} -> {:.3}\n",
            c.entry, c.tick, c.before, c.after
        ));
    }
    out
}

/// Format the timeline as a markdown table, one row per sample.
pub fn format_markdown(timeline: &Timeline) -> String {
    let mut out = String::new();
    out.push_str("| Tick |");
    for name in &timeline.entries {
        out.push_str(&format!(" {} |", name));
    }
    out.push_str(" Drawn | Skip default | Fog |\n");
    out.push_str("|------|");
    for _ in &timeline.entries {
        out.push_str("------|");
    }
    out.push_str("-------|--------------|-----|\n");

    for sample in &timeline.samples {
        out.push_str(&format!("| {} |", sample.tick));
        for alpha in &sample.alphas {
            out.push_str(&format!(" {:.3} |", alpha));
        }
        let fog = match sample.fog_override {
            Some([r, g, b, _]) => format!("{:.2},{:.2},{:.2}", r, g, b),
            None => "-".to_string(),
        };
        out.push_str(&format!(
            " {} | {} | {} |\n",
            sample.drawn,
            if sample.skip_default_sky { "yes" } else { "no" },
            fog
        ));
    }
    out
}

/// Format the documents a reload skipped, or an all-clear line.
pub fn format_skipped(skipped: &[SkippedDocument]) -> String {
    if skipped.is_empty() {
        return "All documents decoded.\n".to_string();
    }
    let mut out = format!("SKIPPED {} document(s):\n", skipped.len());
    for doc in skipped {
        out.push_str(&format!("  - {}: {}\n", doc.id, doc.error));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::TimelineSample;
    use skyloom_rules::DecodeError;

    fn timeline() -> Timeline {
        Timeline {
            entries: vec!["day.json".to_string(), "night.json".to_string()],
            samples: vec![
                TimelineSample {
                    tick: 0,
                    alphas: vec![0.5, 0.0],
                    drawn: 1,
                    skip_default_sky: true,
                    fog_override: Some([0.1, 0.2, 0.3, 1.0]),
                    sun_sky_tint: true,
                },
                TimelineSample {
                    tick: 500,
                    alphas: vec![1.0, 0.0],
                    drawn: 1,
                    skip_default_sky: true,
                    fog_override: None,
                    sun_sky_tint: false,
                },
            ],
        }
    }

    #[test]
    fn test_markdown_table() {
        let md = format_markdown(&timeline());
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("day.json") && lines[0].contains("night.json"));
        assert_eq!(lines[2], "| 0 | 0.500 | 0.000 | 1 | yes | 0.10,0.20,0.30 |");
        assert!(lines[3].ends_with("| - |"));
    }

    #[test]
    fn test_skipped_summary() {
        assert_eq!(format_skipped(&[]), "All documents decoded.\n");
        let skipped = [SkippedDocument {
            id: "bad.json".to_string(),
            error: DecodeError::UnknownSkyboxType("aurora".to_string()),
        }];
        let text = format_skipped(&skipped);
        assert!(text.starts_with("SKIPPED 1 document(s)"));
        assert!(text.contains("bad.json: Unknown skybox type 'aurora'"));
    }

    #[test]
    fn test_compare_reports_changed_alphas() {
        let baseline = timeline();
        assert!(compare(&baseline, &baseline, 1e-3).is_empty());
        assert_eq!(
            format_comparison(&[]),
            "Timeline matches the saved run.\n"
        );

        let mut current = baseline.clone();
        // Reordered entries are matched by name
        current.entries.reverse();
        for sample in &mut current.samples {
            sample.alphas.reverse();
        }
        current.samples[1].alphas[1] = 0.8;
        let changes = compare(&current, &baseline, 1e-3);
        assert_eq!(
            changes,
            vec![AlphaChange {
                entry: "day.json".to_string(),
                tick: 500,
                before: 1.0,
                after: 0.8,
            }]
        );
        assert!(format_comparison(&changes).contains("day.json @ 500: 1.000 -> 0.800"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("sky-preview-{}", std::process::id()));
        let path = dir.join("timeline.json");
        save_timeline(&path, &timeline()).expect("save");
        assert_eq!(load_timeline(&path), Some(timeline()));
        let _ = std::fs::remove_dir_all(&dir);
        assert!(load_timeline(&path).is_none());
    }
}
