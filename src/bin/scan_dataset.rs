use serde::Serialize;
use watermarkd::models::{CharDiff, Sample, ScanReport};
use watermarkd::services::config_store::ConfigStore;
use watermarkd::services::dataset::load_samples;
use watermarkd::services::detection::{
    aggregate_samples, compare_codepoints, detect_in_text, first_divergence, FailurePolicy,
    SignalRegistry, SubjectResolver,
};

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_indices(spec: &str) -> Vec<i32> {
    spec.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

fn codepoint_cell(c: Option<char>) -> String {
    match c {
        Some(c) if c.is_control() || c.is_whitespace() => format!("U+{:04X}", c as u32),
        Some(c) => format!("U+{:04X} '{}'", c as u32, c),
        None => "-".to_string(),
    }
}

fn print_inspection(sample: &Sample, registry: &SignalRegistry, max_chars: usize) {
    println!("Sample {} ({}):", sample.id, sample.label);

    let Some(watermarked) = sample.text_watermarked.as_deref() else {
        println!("  (no watermarked text to compare)");
        return;
    };

    for (name, hit) in detect_in_text(watermarked, registry) {
        println!("  {:<18} {}", name, if hit { "present" } else { "absent" });
    }

    println!("  Codepoints (first {} chars, plain | watermarked):", max_chars);
    for diff in compare_codepoints(&sample.text_plain, watermarked, max_chars) {
        let mark = if diff.is_mismatch() { "  <-- diverges" } else { "" };
        println!(
            "  [{:04}] {:<14} | {:<14}{}",
            diff.index,
            codepoint_cell(diff.plain),
            codepoint_cell(diff.watermarked),
            mark
        );
    }

    match first_divergence(&sample.text_plain, watermarked, usize::MAX) {
        Some(diff) => println!("  First divergence at index {}", diff.index),
        None => println!("  No divergence found"),
    }
}

fn print_report(report: &ScanReport) {
    println!("{:<16} {:<18} {:>8} {:>8}", "Label", "Signal", "Rate", "Samples");
    for row in &report.rates {
        println!(
            "{:<16} {:<18} {:>8.4} {:>8}",
            row.label, row.signal, row.rate, row.sample_count
        );
    }
    println!();
    println!(
        "Samples: {} total, {} analyzed, {} skipped",
        report.sample_count, report.analyzed_count, report.skipped_count
    );
    for skip in &report.skipped {
        println!("  skipped sample {}: {}", skip.id, skip.reason);
    }
}

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin scan_dataset -- <path.csv> [--label <fallback>] [--policy <abort|skip>] [--inspect <i,j,k>] [--max-chars <n>] [--out <json_path>]\n\nNotes:\n  - Rows without a Label column value take the --label fallback.\n  - `--inspect` prints an aligned codepoint diff for the given sample ids.\n  - Column names and recognized labels come from the config file when present."
        );
        return Ok(());
    }

    watermarkd::init_logging();

    let path = std::path::PathBuf::from(&args[1]);
    let fallback_label = parse_arg_value(&args, "--label");
    let inspect_ids = parse_arg_value(&args, "--inspect")
        .map(|spec| parse_indices(&spec))
        .unwrap_or_default();
    let max_chars: usize = parse_arg_value(&args, "--max-chars")
        .and_then(|s| s.parse().ok())
        .unwrap_or(50);
    let out_path = parse_arg_value(&args, "--out");

    let config = match ConfigStore::default_config_dir() {
        Some(dir) => ConfigStore::new(dir).load()?,
        None => Default::default(),
    };
    let policy = parse_arg_value(&args, "--policy")
        .map(|p| FailurePolicy::from_str(&p))
        .unwrap_or_else(|| FailurePolicy::from_str(&config.detection.failure_policy));

    let registry = SignalRegistry::default_signals();
    let resolver = SubjectResolver::new(
        config.detection.watermarked_labels.clone(),
        config.detection.plain_labels.clone(),
    )
    .map_err(|e| e.to_string())?;

    let samples = load_samples(&path, &config.dataset, fallback_label.as_deref())
        .map_err(|e| format!("{:#}", e))?;

    println!("File: {}", path.display());
    println!("Rows: {}", samples.len());
    println!("Signals: {}", registry.names().join(", "));
    println!("Policy: {}", policy.as_str());
    println!();

    let report = aggregate_samples(&samples, &resolver, &registry, policy)
        .map_err(|e| e.to_string())?;
    print_report(&report);

    for id in &inspect_ids {
        println!();
        match samples.iter().find(|s| s.id == *id) {
            Some(sample) => print_inspection(sample, &registry, max_chars),
            None => println!("Sample {} not found", id),
        }
    }

    if let Some(out_path) = out_path {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Inspection {
            id: i32,
            first_divergence: Option<CharDiff>,
            diffs: Vec<CharDiff>,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output {
            file: String,
            policy: String,
            report: ScanReport,
            inspections: Vec<Inspection>,
        }

        let inspections = inspect_ids
            .iter()
            .filter_map(|id| samples.iter().find(|s| s.id == *id))
            .filter_map(|s| {
                let watermarked = s.text_watermarked.as_deref()?;
                Some(Inspection {
                    id: s.id,
                    first_divergence: first_divergence(&s.text_plain, watermarked, usize::MAX),
                    diffs: compare_codepoints(&s.text_plain, watermarked, max_chars).collect(),
                })
            })
            .collect();

        let out = Output {
            file: path.display().to_string(),
            policy: policy.as_str().to_string(),
            report,
            inspections,
        };

        let json = serde_json::to_string_pretty(&out).map_err(|e| e.to_string())?;
        std::fs::write(&out_path, json).map_err(|e| format!("write out failed: {}", e))?;
        println!();
        println!("Wrote JSON: {}", out_path);
    }

    Ok(())
}
