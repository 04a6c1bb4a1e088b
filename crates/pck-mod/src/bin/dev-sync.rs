use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser};
use miette::Result;
use pck_mod::commands::{sync_dev_mod, SyncDevModArgs};
use pck_mod::{cli_styles, utils};

/// Sync changed game files into the dev-mod overlay.
///
/// On first run the base archive is extracted and a baseline is recorded.
/// Afterwards every edit under the extracted game files is mirrored into the
/// dev-mod directory.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the game files and pck-mod.toml (defaults to the current directory)
    #[arg(short, long)]
    root: Option<String>,
}

fn parse_args() -> Args {
    let matches = Args::command()
        .styles(cli_styles())
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn main() -> Result<()> {
    let args = parse_args();
    utils::init_logging();

    sync_dev_mod(SyncDevModArgs { root: args.root })?;
    Ok(())
}
