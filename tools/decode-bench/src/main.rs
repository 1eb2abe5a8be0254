//! QR decode benchmark CLI for QR Snap.
//!
//! Runs the same decoder the tray and crop overlay use.
//!
//! Usage:
//!   cargo run -p decode-bench -- <image.png>                   Single image
//!   cargo run -p decode-bench -- <image.png> --max-dim 1280    Downsample first
//!   cargo run -p decode-bench -- --batch <directory>           All images → CSV output

use qrsnap_lib::decode::find_qr_codes;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage:");
        eprintln!("  decode-bench <image.png> [--max-dim N]");
        eprintln!("  decode-bench --batch <directory> [--max-dim N]");
        std::process::exit(1);
    }

    let max_dim = parse_max_dim(&args).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    match parse_mode(&args) {
        Ok(Mode::Batch(dir)) => run_batch(dir, max_dim),
        Ok(Mode::Single(path)) => run_single(path, max_dim),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

#[derive(Debug, PartialEq)]
enum Mode<'a> {
    Single(&'a str),
    Batch(&'a str),
}

/// Picks the mode from the arguments in any order. Flag values are never
/// taken for the image path.
fn parse_mode(args: &[String]) -> Result<Mode<'_>, String> {
    let mut image = None;
    let mut rest = args.iter().skip(1);

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--batch" => {
                let dir = rest
                    .next()
                    .ok_or_else(|| "--batch requires a directory path".to_string())?;
                return Ok(Mode::Batch(dir));
            }
            "--max-dim" => {
                rest.next();
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option '{}'", flag)),
            path => {
                image.get_or_insert(path);
            }
        }
    }

    image
        .map(Mode::Single)
        .ok_or_else(|| "Missing image path".to_string())
}

/// Reads `--max-dim N`; 0 (no downsampling) when absent.
fn parse_max_dim(args: &[String]) -> Result<u32, String> {
    match args.iter().position(|a| a == "--max-dim") {
        None => Ok(0),
        Some(i) => args
            .get(i + 1)
            .ok_or_else(|| "--max-dim requires a value".to_string())?
            .parse()
            .map_err(|_| format!("--max-dim expects a number, got '{}'", args[i + 1])),
    }
}

struct DecodeResult {
    codes: Vec<String>,
    latency_ms: f64,
}

fn decode_file(path: &Path, max_dim: u32) -> Result<DecodeResult, String> {
    let image = image::open(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?
        .to_rgba8();

    let start = Instant::now();
    let codes = find_qr_codes(&image, max_dim);
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(DecodeResult { codes, latency_ms })
}

/// Decodes a single image and prints each payload.
fn run_single(image_path: &str, max_dim: u32) {
    match decode_file(Path::new(image_path), max_dim) {
        Ok(result) => {
            for code in &result.codes {
                println!("{}", code);
            }
            eprintln!(
                "--- {} code(s) in {:.1}ms ---",
                result.codes.len(),
                result.latency_ms
            );
        }
        Err(e) => {
            eprintln!("Decode failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Decodes all images in a directory, outputs CSV.
fn run_batch(dir_path: &str, max_dim: u32) {
    let dir = Path::new(dir_path);
    if !dir.is_dir() {
        eprintln!("Not a directory: {}", dir_path);
        std::process::exit(1);
    }

    let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(read) => read
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "png" || ext == "jpg" || ext == "jpeg")
                    .unwrap_or(false)
            })
            .collect(),
        Err(e) => {
            eprintln!("Failed to read {}: {}", dir_path, e);
            std::process::exit(1);
        }
    };
    entries.sort();

    if entries.is_empty() {
        eprintln!("No image files found in {}", dir_path);
        std::process::exit(1);
    }

    println!("filename,code_count,latency_ms,first_code");

    let mut latencies: Vec<f64> = Vec::new();

    for image_path in &entries {
        let filename = image_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match decode_file(image_path, max_dim) {
            Ok(result) => {
                println!(
                    "{},{},{:.1},{}",
                    filename,
                    result.codes.len(),
                    result.latency_ms,
                    csv_field(result.codes.first().map(String::as_str).unwrap_or(""))
                );
                latencies.push(result.latency_ms);
                std::io::stdout().flush().ok();
            }
            Err(e) => eprintln!("  WARNING: {}", e),
        }
    }

    if let Some(summary) = summarize(&mut latencies) {
        eprintln!("\n--- Benchmark Summary ---");
        eprintln!("  Images processed: {}", latencies.len());
        eprintln!("  Median latency:   {:.1}ms", summary.median);
        eprintln!("  Average latency:  {:.1}ms", summary.average);
        eprintln!("  P99 latency:      {:.1}ms", summary.p99);
    }
}

struct Summary {
    median: f64,
    average: f64,
    p99: f64,
}

fn summarize(latencies: &mut [f64]) -> Option<Summary> {
    if latencies.is_empty() {
        return None;
    }
    latencies.sort_by(|a, b| a.total_cmp(b));
    let p99_idx = ((latencies.len() as f64 * 0.99).ceil() as usize).min(latencies.len() - 1);

    Some(Summary {
        median: latencies[latencies.len() / 2],
        average: latencies.iter().sum::<f64>() / latencies.len() as f64,
        p99: latencies[p99_idx],
    })
}

/// Quotes a payload for CSV when it contains separators or quotes.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn max_dim_defaults_to_zero() {
        assert_eq!(parse_max_dim(&args(&["bench", "a.png"])), Ok(0));
        assert_eq!(parse_max_dim(&args(&["bench", "a.png", "--max-dim", "640"])), Ok(640));
        assert!(parse_max_dim(&args(&["bench", "a.png", "--max-dim"])).is_err());
        assert!(parse_max_dim(&args(&["bench", "a.png", "--max-dim", "big"])).is_err());
    }

    #[test]
    fn image_path_can_follow_flags() {
        assert_eq!(
            parse_mode(&args(&["bench", "--max-dim", "100", "img.png"])),
            Ok(Mode::Single("img.png"))
        );
        assert_eq!(
            parse_mode(&args(&["bench", "img.png", "--max-dim", "100"])),
            Ok(Mode::Single("img.png"))
        );
        assert_eq!(
            parse_mode(&args(&["bench", "--max-dim", "100", "--batch", "shots"])),
            Ok(Mode::Batch("shots"))
        );
        assert!(parse_mode(&args(&["bench", "--max-dim", "100"])).is_err());
        assert!(parse_mode(&args(&["bench", "--batch"])).is_err());
    }

    #[test]
    fn summary_of_latencies() {
        let mut latencies = vec![30.0, 10.0, 20.0];
        let s = summarize(&mut latencies).unwrap();
        assert_eq!(s.median, 20.0);
        assert_eq!(s.average, 20.0);
        assert_eq!(s.p99, 30.0);
        assert!(summarize(&mut []).is_none());
    }

    #[test]
    fn csv_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
