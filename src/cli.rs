use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hlsfront",
    about = "Status page and M3U playlist for an HLS capture daemon's output directory",
    long_about = None,
    version = env!("GIT_VERSION"),
)]
pub struct Args {
    /// Directory the capture daemon writes manifests and the channel index into
    /// [default: /run/shm/dvb_hls]
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// HTTP port to listen on [default: 8350]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Server name shown in the status page title [default: hlsfront]
    #[arg(short, long)]
    pub name: Option<String>,

    /// Advertised host for playlist URLs (default: taken from the request's Host header)
    #[arg(long)]
    pub host: Option<String>,

    /// Path to TOML config file (overrides default search: ./hlsfront.toml, ~/.config/hlsfront/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bind to localhost only (127.0.0.1) instead of all interfaces (0.0.0.0 + :::)
    #[arg(long)]
    pub localhost: bool,
}
