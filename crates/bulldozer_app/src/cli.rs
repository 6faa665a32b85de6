use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Writes ArcGIS Server logs to a CSV with frequencies.
#[derive(Debug, Parser)]
#[command(name = "bulldozer", version)]
pub struct Cli {
    /// Server and email settings.
    #[arg(long, global = true, default_value = "servers.ron")]
    pub config: PathBuf,

    /// Log debug output.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Also write the log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Harvest, summarize and optionally remove the logs of one machine.
    Ship(ShipArgs),
}

#[derive(Debug, Args)]
pub struct ShipArgs {
    /// The ArcGIS Server machine key.
    pub machine: String,

    /// Delete the logs that have been read.
    #[arg(long)]
    pub clean: bool,

    /// Email the log results.
    #[arg(long)]
    pub email: bool,

    /// Directory the `<machine>.csv` report is written to.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_flags_parse() {
        let cli = Cli::try_parse_from(["bulldozer", "ship", "key", "--clean", "--email"]).unwrap();
        let Command::Ship(args) = cli.command;
        assert_eq!(args.machine, "key");
        assert!(args.clean);
        assert!(args.email);
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(cli.config, PathBuf::from("servers.ron"));
    }

    #[test]
    fn machine_is_required() {
        assert!(Cli::try_parse_from(["bulldozer", "ship"]).is_err());
    }
}
