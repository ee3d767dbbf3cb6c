use anyhow::Context;
use clap::Parser;
use release_tools::remote::{self, mirror_tree};

#[derive(Parser)]
#[command(
    name = "upload-repository",
    about = "Mirror a built package repository to the distribution server"
)]
struct Args {
    /// Local repository tree to mirror.
    local_dir: std::path::PathBuf,

    #[clap(long, required_unless_present = "local")]
    /// Credentials file with server, user, password and remoteDir keys.
    credentials: Option<std::path::PathBuf>,

    #[clap(long, default_value = "apt")]
    /// Remote directory to mirror into.
    remote_base: String,

    #[clap(long)]
    /// Mirror into a local directory instead of the FTP server.
    local: Option<std::path::PathBuf>,

    #[clap(flatten)]
    logging: release_tools::logging::LoggingArgs,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    args.logging.init();

    let mut store = remote::open_store(args.credentials.as_deref(), args.local.as_deref())?;
    mirror_tree(store.as_mut(), &args.remote_base, &args.local_dir)
        .with_context(|| format!("Failed to mirror {}", args.local_dir.display()))?;
    store.finish()?;

    log::info!("Mirrored {} to {}", args.local_dir.display(), args.remote_base);
    Ok(())
}
