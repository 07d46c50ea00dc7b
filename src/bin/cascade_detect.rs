use cascade_detector::config::detect::{load_config, DetectToolConfig};
use cascade_detector::diagnostics::DetectionReport;
use cascade_detector::image::io::{load_cascade, load_rgba_image, write_json_file};
use cascade_detector::Detector;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: cascade_detect <config.json>".to_string()
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let image = load_rgba_image(&config.input)?;
    let mut cascade = load_cascade(&config.cascade)?;
    if config.mirror {
        cascade = cascade.mirrored();
    }
    let [width, height] = config
        .canvas
        .unwrap_or([image.width(), image.height()]);

    let mut detector = Detector::new(width, height, config.params.clone(), &cascade)
        .map_err(|e| format!("Failed to build detector: {e}"))?;
    let report = detector
        .detect_with_diagnostics(image.as_view())
        .map_err(|e| format!("Detection failed: {e}"))?;

    print_summary(&config, &report);
    write_report(&config, &report)
}

/// Summary goes to stderr when the JSON report occupies stdout.
fn print_summary(config: &DetectToolConfig, report: &DetectionReport) {
    let mut lines = vec![format!(
        "{} -> {} rectangles ({} raw) in {:.3} ms over {} scales",
        config.input.display(),
        report.rectangles.len(),
        report.raw_detections,
        report.timing.total_ms,
        report.scales.len()
    )];
    for r in &report.rectangles {
        lines.push(format!(
            "  x={:.1} y={:.1} w={:.1} h={:.1} neighbors={}",
            r.x, r.y, r.width, r.height, r.neighbors
        ));
    }
    for line in lines {
        if config.output.json_out.is_some() {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }
}

fn write_report(config: &DetectToolConfig, report: &DetectionReport) -> Result<(), String> {
    let json = if config.output.diagnostics {
        serde_json::to_value(report)
    } else {
        serde_json::to_value(&report.rectangles)
    }
    .map_err(|e| format!("Failed to serialize JSON: {e}"))?;

    match &config.output.json_out {
        Some(path) => {
            write_json_file(path, &json)?;
            println!("JSON report written to {}", path.display());
        }
        None => {
            let text = serde_json::to_string_pretty(&json)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{text}");
        }
    }
    Ok(())
}
