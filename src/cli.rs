use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "css-ctrl")]
#[command(about = "Compiles css-ctrl sources to CSS")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write log lines to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile source units; each gets a sibling `.css` file
    Build {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// JSON theme file
        #[arg(short, long)]
        theme: Option<PathBuf>,

        /// Directory for the generated files
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print all CSS to stdout instead of writing files
        #[arg(long, conflicts_with = "out_dir")]
        stdout: bool,
    },

    /// Emit the palette, variables and keyframes of a theme file
    Theme {
        theme: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_arguments() {
        let cli = Cli::parse_from([
            "css-ctrl", "-vv", "build", "a.ctrl.ts", "b.ctrl.ts", "--theme", "theme.json",
            "--stdout",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Build {
            inputs,
            theme,
            out_dir,
            stdout,
        } = cli.command
        else {
            panic!("expected build");
        };
        assert_eq!(inputs, vec![PathBuf::from("a.ctrl.ts"), PathBuf::from("b.ctrl.ts")]);
        assert_eq!(theme, Some(PathBuf::from("theme.json")));
        assert!(out_dir.is_none());
        assert!(stdout);
    }

    #[test]
    fn test_stdout_conflicts_with_out_dir() {
        let result = Cli::try_parse_from(["css-ctrl", "build", "a.ts", "--stdout", "--out-dir", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_needs_inputs() {
        assert!(Cli::try_parse_from(["css-ctrl", "build"]).is_err());
    }
}
