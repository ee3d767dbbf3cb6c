use anyhow::Context;
use clap::Parser;
use release_tools::layouts::upload_layouts;
use release_tools::remote;

#[derive(Parser)]
#[command(
    name = "upload-layouts",
    about = "Upload memory-layout files to the distribution server"
)]
struct Args {
    #[clap(long, required_unless_present = "local")]
    /// Credentials file with server, user, password and remoteDir keys.
    credentials: Option<std::path::PathBuf>,

    #[clap(long, default_value = "etc/memory_layouts")]
    /// Directory holding per-platform layout files.
    layouts_dir: std::path::PathBuf,

    #[clap(long, default_value = "memory_layouts")]
    /// Remote directory to upload into.
    remote_base: String,

    #[clap(long)]
    /// Upload into a local directory instead of the FTP server.
    local: Option<std::path::PathBuf>,

    #[clap(flatten)]
    logging: release_tools::logging::LoggingArgs,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    args.logging.init();

    let mut store = remote::open_store(args.credentials.as_deref(), args.local.as_deref())?;
    let uploaded = upload_layouts(store.as_mut(), &args.remote_base, &args.layouts_dir)
        .with_context(|| format!("Failed to upload layouts from {}", args.layouts_dir.display()))?;
    store.finish()?;

    log::info!("Uploaded {} layout files", uploaded);
    Ok(())
}
