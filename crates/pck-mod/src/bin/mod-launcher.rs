use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser};
use miette::Result;
use pck_mod::commands::{merge_and_launch, MergeAndLaunchArgs};
use pck_mod::{cli_styles, utils};

/// Merge every mod under mods/ into a patched archive and launch the game with it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the game, the mods folder and pck-mod.toml (defaults to the current directory)
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

    merge_and_launch(MergeAndLaunchArgs { root: args.root })?;
    Ok(())
}
