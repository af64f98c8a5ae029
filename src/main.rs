use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use genrescope::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List your playlists
    Playlists(PlaylistsOptions),

    /// Rank the genres of a playlist
    Analyze(AnalyzeOptions),

    /// Show an artist's top tracks
    TopTracks(TopTracksOptions),

    /// Drop a playlist and its tracks from the local cache
    Forget(ForgetOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Show the playlists stored by the last run instead of asking Spotify
    #[clap(long)]
    pub cached: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeOptions {
    /// Playlist id as shown by `playlists`
    pub playlist_id: String,

    /// Only show the N most frequent genres
    #[clap(long)]
    pub top: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct TopTracksOptions {
    /// Artist name (as listed by `analyze`) or Spotify artist id with --id
    pub artist: String,

    /// Treat the argument as an artist id
    #[clap(long)]
    pub id: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ForgetOptions {
    pub playlist_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Playlists(opt) => cli::playlists(opt.cached).await,
        Command::Analyze(opt) => cli::analyze(opt.playlist_id, opt.top).await,
        Command::TopTracks(opt) => cli::top_tracks(opt.artist, opt.id).await,
        Command::Forget(opt) => cli::forget(opt.playlist_id).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
