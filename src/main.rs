use std::fs;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use css_ctrl::build::{Output, build, theme_css};
use css_ctrl::cli::{Cli, Commands};
use css_ctrl::log_init::init_logger;
use css_ctrl::{Result, Theme, ThemeFile};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logger(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            inputs,
            theme,
            out_dir,
            stdout,
        } => {
            let theme = match theme {
                Some(path) => ThemeFile::load(&path)?.theme()?,
                None => Theme::standard(),
            };
            let output = match (stdout, out_dir) {
                (true, _) => Output::Stdout,
                (false, Some(dir)) => Output::Dir(dir),
                (false, None) => Output::Sibling,
            };

            let css = build(&inputs, &theme, &output)?;
            if output == Output::Stdout {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{}", css)?;
            }
        }
        Commands::Theme { theme, output } => {
            let css = theme_css(&theme)?;
            match output {
                Some(path) => fs::write(path, css)?,
                None => println!("{}", css),
            }
        }
    }
    Ok(())
}
