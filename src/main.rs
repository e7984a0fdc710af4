use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

use fhr_udf::batch::RowErrorPolicy;
use fhr_udf::config::{JobConfig, OutputFormat};
use fhr_udf::job;
use fhr_udf::payload::{open_input, FieldPath};

#[derive(Parser)]
#[command(name = "fhr-udf")]
#[command(about = "Convert FHR profile creation days into millisecond timestamps")]
#[command(after_help = "\
--on-error only covers rows that fail to convert. A payload line that isn't valid JSON, \
or that holds an integer outside the signed 64-bit range, stops the run whatever the policy.")]
struct Cli {
    /// Job config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field to project into the row, as `/`-separated keys; repeat for more columns
    #[arg(long = "field")]
    fields: Vec<FieldPath>,

    /// What to do with rows that fail to convert
    #[arg(long, value_enum)]
    on_error: Option<RowErrorPolicy>,

    /// Output representation
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Prefix each output line with the record key
    #[arg(long)]
    with_key: bool,

    /// Payload file, `-` for stdin; `.gz` files are decompressed
    #[arg(default_value = "-")]
    input: PathBuf,
}

impl Cli {
    fn job_config(&self) -> anyhow::Result<JobConfig> {
        let mut config = match &self.config {
            Some(path) => JobConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => JobConfig::default(),
        };
        if !self.fields.is_empty() {
            config.fields = self.fields.clone();
        }
        if let Some(on_error) = self.on_error {
            config.on_error = on_error;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.job_config()?;

    let input = open_input(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?;
    let out = BufWriter::new(std::io::stdout().lock());

    job::run(input, &config, cli.with_key, out)
        .with_context(|| format!("converting {}", cli.input.display()))?;
    Ok(())
}
