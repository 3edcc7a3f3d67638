// File: crates/demo/src/main.rs
// Summary: Demo loads series from CSV (or synthesizes them), runs the reduction pipeline and prints before/after counts.
//
// Usage: series-reduce-demo [path.csv|-] [threshold] [smoothing] [granularity] [simplifier]
//   CSV columns: series,timestamp,value  or  timestamp,value
//   timestamp: epoch ms, epoch seconds, or RFC 3339

use anyhow::{Context, Result};
use series_reduce::{
    total_samples, CancelToken, ComputeParams, Engine, EngineConfig, Granularity, Series, SimplifierKind, SmoothingType,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let params = parse_params(&args)?;

    let mut series = match args.first().map(String::as_str) {
        None | Some("-") => {
            println!("No input file given; using synthetic data");
            synthetic_series(4, 50_000)
        }
        Some(raw) => {
            let (path, used_alt) = resolve_path(raw)?;
            println!("Using input file: {}", path.display());
            if used_alt {
                println!("  (extension swapped between .csv/.cvs)");
            }
            load_series_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?
        }
    };
    if series.is_empty() {
        anyhow::bail!("no samples loaded; check headers/delimiter.");
    }

    println!(
        "Loaded {} series, {} samples; threshold={} smoothing={} granularity={} simplifier={}",
        series.len(),
        total_samples(&series),
        params.threshold,
        params.smoothing,
        params.granularity,
        params.simplifier
    );
    let before: Vec<usize> = series.iter().map(Series::len).collect();

    let engine = Engine::new(EngineConfig::default()).context("building reduction engine")?;
    let started = Instant::now();
    engine.compute(&mut series, &params, &CancelToken::new())?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "pipeline finished");

    for (s, n) in series.iter().zip(before) {
        let range = s
            .time_range()
            .map(|(a, b)| format!("[{a}, {b}]"))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<24} {:>9} -> {:<9} {}", s.name, n, s.len(), range);
    }
    println!("Total samples after reduction: {}", total_samples(&series));
    Ok(())
}

/// Positional parameters after the input path; missing ones keep their defaults.
fn parse_params(args: &[String]) -> Result<ComputeParams> {
    let mut params = ComputeParams::default();
    if let Some(t) = args.get(1) {
        params.threshold = t.parse().with_context(|| format!("invalid threshold '{t}'"))?;
    }
    if let Some(s) = args.get(2) {
        params.smoothing = s.parse::<SmoothingType>()?;
    }
    if let Some(g) = args.get(3) {
        params.granularity = g.parse::<Granularity>()?;
    }
    if let Some(k) = args.get(4) {
        params.simplifier = k.parse::<SimplifierKind>()?;
    }
    Ok(params)
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => alt.set_extension("csv"),
        "csv" => alt.set_extension("cvs"),
        _ => return None,
    };
    Some(alt)
}

/// Load `series,timestamp,value` (or `timestamp,value`) rows, grouped by
/// series in order of first appearance and sorted by time.
fn load_series_csv(path: &Path) -> Result<Vec<Series>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    let idx = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));

    let i_series = idx(&["series", "name", "metric", "id"]);
    let i_time = idx(&["timestamp", "time", "ts", "date", "datetime"])
        .context("no timestamp column (timestamp/time/ts/date)")?;
    let i_value = idx(&["value", "val", "y", "close"]).context("no value column (value/val/y)")?;

    let default_name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("series").to_string();
    let mut order: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Series> = Vec::new();
    let mut skipped = 0usize;

    for rec in rdr.records() {
        let rec = rec?;
        let ts = rec.get(i_time).and_then(parse_time_ms);
        let value = rec.get(i_value).and_then(|s| s.trim().parse::<f64>().ok());
        let (Some(ts), Some(value)) = (ts, value) else {
            skipped += 1;
            continue;
        };
        let name = i_series
            .and_then(|i| rec.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| default_name.clone());
        let slot = *order.entry(name.clone()).or_insert_with(|| {
            out.push(Series::new(name));
            out.len() - 1
        });
        out[slot].samples.push(series_reduce::Sample::new(ts, value));
    }
    if skipped > 0 {
        warn!(skipped, "rows without a parsable timestamp/value were ignored");
    }

    for s in &mut out {
        s.samples.sort_by_key(|p| p.timestamp);
    }
    Ok(out)
}

/// Epoch milliseconds from epoch ms, epoch seconds or an RFC 3339 string.
fn parse_time_ms(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        // below 10^11 the value can only be seconds for any date after 1973
        return Some(if n.abs() < 100_000_000_000 { n * 1_000 } else { n });
    }
    chrono::DateTime::parse_from_rfc3339(s).ok().map(|d| d.timestamp_millis())
}

/// Noisy waves with flat stretches, one sample per second.
fn synthetic_series(count: usize, n: usize) -> Vec<Series> {
    let start = 1_700_000_000_000i64;
    (0..count)
        .map(|k| {
            let pairs = (0..n).map(move |i| {
                let x = i as f64;
                let wave = (x * 0.002 * (k + 1) as f64).sin() * 100.0;
                let step = if (i / 5_000) % 2 == 0 { 0.0 } else { 25.0 };
                let noise = ((i * 7_919 + k * 104_729) % 17) as f64 * 0.1;
                (start + i as i64 * 1_000, (wave + step + noise).round())
            });
            Series::from_pairs(format!("synthetic-{k}"), pairs)
        })
        .collect()
}
