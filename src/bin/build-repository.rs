use anyhow::Context;
use apt_repo::{DpkgScanPackages, RepoConfig, Repository};
use clap::Parser;

#[derive(Parser)]
#[command(name = "build-repository", about = "Build the APT repository index")]
struct Args {
    /// Base repository directory containing dists/.
    base: std::path::PathBuf,

    #[clap(long)]
    /// Repository configuration (TOML). Without it the built-in release
    /// mapping is used.
    config: Option<std::path::PathBuf>,

    #[clap(long, default_value = "dpkg-scanpackages")]
    /// Package scanning command.
    scanner: String,

    #[clap(flatten)]
    logging: release_tools::logging::LoggingArgs,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    args.logging.init();

    let config = match &args.config {
        Some(path) => RepoConfig::from_toml_file(path)?,
        None => RepoConfig::default(),
    };
    let scanner = DpkgScanPackages {
        command: args.scanner,
    };

    let summaries = Repository::new(&config, &scanner)
        .build(&args.base, chrono::Utc::now())
        .with_context(|| format!("Failed to build repository at {}", args.base.display()))?;

    log::info!("Built {} distributions", summaries.len());
    Ok(())
}
