//! The `glimpse dump` command: print every decoded tag of JPEG files.

mod batch;

use clap::Args;
use glimpse_core::{Config, Glimpse, OutputWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use super::types::OutputFormat;
use batch::dump_batch;

/// Arguments for the `dump` command.
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// JPEG files or directories to read
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to `output.format` from the config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Number of files read concurrently (defaults to `processing.parallel_workers`)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Maximum file size in megabytes
    #[arg(long)]
    pub max_file_size: Option<u64>,
}

/// Settings resolved from the arguments and the config file.
pub(crate) struct DumpContext {
    pub format: OutputFormat,
    pub parallel: usize,
    pub pretty: bool,
    pub config: Config,
}

impl DumpContext {
    fn new(args: &DumpArgs, mut config: Config) -> Self {
        if let Some(max) = args.max_file_size {
            config.limits.max_file_size_mb = max.max(1);
        }
        Self {
            format: args
                .format
                .unwrap_or_else(|| OutputFormat::from_config(&config.output.format)),
            parallel: args.parallel.unwrap_or(config.processing.parallel_workers).max(1),
            pretty: config.output.pretty,
            config,
        }
    }
}

/// Open the output destination: the given file, or stdout.
pub(crate) fn open_output(output: &Option<PathBuf>) -> anyhow::Result<Box<dyn Write + Send>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    })
}

/// Execute the dump command.
pub async fn execute(args: DumpArgs, config: Config) -> anyhow::Result<()> {
    let ctx = DumpContext::new(&args, config);

    let files = super::collect_files(&ctx.config, &args.inputs);
    if files.is_empty() {
        tracing::warn!("Nothing to dump");
        return Ok(());
    }
    tracing::info!("Found {} JPEG file(s)", files.len());

    if let [only] = files.as_slice() {
        dump_single(&ctx, only.clone(), &args.output).await
    } else {
        dump_batch(ctx, files, &args.output).await
    }
}

/// Dump one file. Errors are returned rather than counted.
async fn dump_single(
    ctx: &DumpContext,
    path: PathBuf,
    output: &Option<PathBuf>,
) -> anyhow::Result<()> {
    let glimpse = Glimpse::new(ctx.config.clone());
    let result = tokio::task::spawn_blocking(move || glimpse.extract(&path)).await??;

    let mut writer = OutputWriter::new(open_output(output)?, ctx.format.into(), ctx.pretty);
    writer.write(&result)?;
    writer.flush()?;
    if let Some(path) = output {
        tracing::info!("Output written to {:?}", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> DumpArgs {
        DumpArgs {
            inputs: vec![PathBuf::from("photos")],
            output: None,
            format: None,
            parallel: None,
            max_file_size: None,
        }
    }

    #[test]
    fn context_uses_config_defaults() {
        let ctx = DumpContext::new(&args(), Config::default());
        assert_eq!(ctx.format, OutputFormat::Text);
        assert_eq!(ctx.parallel, 4);
        assert!(!ctx.pretty);
    }

    #[test]
    fn arguments_override_config() {
        let args = DumpArgs {
            format: Some(OutputFormat::Jsonl),
            parallel: Some(0),
            max_file_size: Some(5),
            ..args()
        };
        let ctx = DumpContext::new(&args, Config::default());
        assert_eq!(ctx.format, OutputFormat::Jsonl);
        assert_eq!(ctx.parallel, 1);
        assert_eq!(ctx.config.limits.max_file_size_mb, 5);
    }

    #[test]
    fn zero_file_size_limit_is_clamped() {
        let args = DumpArgs {
            max_file_size: Some(0),
            ..args()
        };
        let ctx = DumpContext::new(&args, Config::default());
        assert_eq!(ctx.config.limits.max_file_size_mb, 1);
    }

    #[tokio::test]
    async fn single_file_dump_writes_text() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("note.jpg");
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xFE, 0x00, 0x07];
        bytes.extend_from_slice(b"hello");
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        std::fs::write(&image, &bytes).unwrap();
        let out = dir.path().join("out.txt");

        let ctx = DumpContext::new(&args(), Config::default());
        dump_single(&ctx, image, &Some(out.clone())).await.unwrap();

        let text = std::fs::read_to_string(out).unwrap();
        assert!(text.contains("[JpegComment] Jpeg Comment = hello"));
    }
}
