//! Batch dumping: concurrent extraction with progress and ordered streaming output.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use glimpse_core::{ExtractionStats, FileMetadata, Glimpse, OutputWriter};

use super::super::types::OutputFormat;
use super::{open_output, DumpContext};

/// Extract many files, `ctx.parallel` at a time, writing results in input order.
pub async fn dump_batch(
    ctx: DumpContext,
    files: Vec<PathBuf>,
    output: &Option<PathBuf>,
) -> anyhow::Result<()> {
    let glimpse = Arc::new(Glimpse::new(ctx.config.clone()));

    let total = files.len() as u64;
    let progress = create_progress_bar(total);
    let start_time = std::time::Instant::now();

    let mut stats = ExtractionStats::default();
    let mut writer = OutputWriter::new(open_output(output)?, ctx.format.into(), ctx.pretty);
    // A JSON array needs every item before anything is written.
    let mut collected: Vec<FileMetadata> = Vec::new();

    let mut results = stream::iter(files)
        .map(|path| {
            let glimpse = Arc::clone(&glimpse);
            async move {
                let task_path = path.clone();
                let result =
                    tokio::task::spawn_blocking(move || glimpse.extract(&task_path)).await;
                (path, result)
            }
        })
        .buffered(ctx.parallel);

    while let Some((path, result)) = results.next().await {
        match result {
            Ok(Ok(file)) => {
                stats.succeeded += 1;
                stats.total_bytes += file.file_size;
                if file.directories.has_errors() {
                    tracing::warn!("{:?}: some tags could not be decoded", path);
                }
                if ctx.format == OutputFormat::Json {
                    collected.push(file);
                } else {
                    writer.write(&file)?;
                }
            }
            Ok(Err(e)) => {
                stats.failed += 1;
                tracing::error!("Failed: {:?} - {}", path, e);
            }
            Err(e) => {
                stats.failed += 1;
                tracing::error!("Worker for {:?} stopped: {}", path, e);
            }
        }

        progress.inc(1);
        let elapsed = start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            progress.set_message(format!("{:.1} files/sec", stats.total() as f64 / elapsed));
        }
    }

    if !collected.is_empty() {
        writer.write_all(&collected)?;
    }
    writer.flush()?;
    if let Some(path) = output {
        tracing::info!("Output written to {:?}", path);
    }

    progress.finish_and_clear();
    print_summary(&stats, start_time.elapsed());

    Ok(())
}

/// Create a progress bar for batch extraction.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .map(|style| style.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after a batch dump.
fn print_summary(stats: &ExtractionStats, elapsed: std::time::Duration) {
    let seconds = elapsed.as_secs_f64();
    let rate = if seconds > 0.0 {
        stats.succeeded as f64 / seconds
    } else {
        0.0
    };
    let mb_read = stats.total_bytes as f64 / 1_000_000.0;

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", stats.succeeded);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", stats.total());
    eprintln!("    Read:         {:>7.1} MB", mb_read);
    eprintln!("    Duration:     {:>7.1}s", seconds);
    eprintln!("    Rate:         {:>7.1} files/sec", rate);
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_core::Config;

    fn jpeg_with_comment(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xFE];
        bytes.extend_from_slice(&((text.len() + 2) as u16).to_be_bytes());
        bytes.extend_from_slice(text.as_bytes());
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }

    fn context(format: OutputFormat) -> DumpContext {
        DumpContext {
            format,
            parallel: 2,
            pretty: false,
            config: Config::default(),
        }
    }

    #[tokio::test]
    async fn batch_keeps_input_order_and_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = Vec::new();
        for name in ["one", "two", "three"] {
            let path = dir.path().join(format!("{name}.jpg"));
            std::fs::write(&path, jpeg_with_comment(name)).unwrap();
            files.push(path);
        }
        let broken = dir.path().join("broken.jpg");
        std::fs::write(&broken, b"not a jpeg").unwrap();
        files.insert(1, broken);
        let out = dir.path().join("out.jsonl");

        dump_batch(context(OutputFormat::Jsonl), files, &Some(out.clone()))
            .await
            .unwrap();

        let content = std::fs::read_to_string(out).unwrap();
        let names: Vec<String> = content
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["file_name"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(names, vec!["one.jpg", "two.jpg", "three.jpg"]);
    }

    #[tokio::test]
    async fn batch_json_is_one_array() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = ["a", "b"]
            .iter()
            .map(|name| {
                let path = dir.path().join(format!("{name}.jpg"));
                std::fs::write(&path, jpeg_with_comment(name)).unwrap();
                path
            })
            .collect();
        let out = dir.path().join("out.json");

        dump_batch(context(OutputFormat::Json), files, &Some(out.clone()))
            .await
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }
}
