//! QINCM CLI - Quick Inland Navigation Cost Model.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "qincm",
    version,
    about = "Costs of restricted navigation depth on inland waterway routes"
)]
struct Cli {
    #[command(subcommand)]
    command: qincm_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    qincm_cmd::run(cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["qincm", "run", "data/test1.json", "-o", "out.json"]).unwrap();
        match cli.command {
            qincm_cmd::Command::Run { input, output } => {
                assert_eq!(input.to_str(), Some("data/test1.json"));
                assert_eq!(output.as_deref().and_then(|p| p.to_str()), Some("out.json"));
            }
        }
    }

    #[test]
    fn test_help() {
        let err = Cli::try_parse_from(["qincm", "--help"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
