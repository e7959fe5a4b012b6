use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;
use svn_navigator::commands::{execute_log, execute_status};
use svn_navigator::core::{
    dirs::{get_cache_directory, get_log_file},
    error::{Result, SvnNavigatorError},
    print_error, CommandRunner, Config, Credentials, SvnModel,
};
use svn_navigator::tui::{run_app, App};

#[derive(Parser)]
#[command(name = "svn-navigator")]
#[command(about = "A terminal client for Subversion working copies")]
#[command(version = "0.1.0")]
struct Cli {
    /// Working copy to open
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Username passed to svn
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Password passed to svn; never written to disk or shown
    #[arg(short, long, global = true)]
    password: Option<String>,

    /// svn executable to run
    #[arg(long, global = true)]
    svn_binary: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print unstaged and staged changes
    Status {
        /// Include unversioned files
        #[arg(short, long)]
        all: bool,
    },
    /// Print the most recent revisions
    Log {
        /// Number of revisions to print
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

/// Log records go to a file; the interactive client owns the terminal
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    let log_file = get_cache_directory()
        .and_then(|dir| {
            std::fs::create_dir_all(&dir)?;
            get_log_file()
        })
        .and_then(|path| {
            Ok(OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?)
        });

    match log_file {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_create()
        .unwrap_or_else(|e| {
            log::warn!("Using default settings, config could not be loaded: {e}");
            Config::default()
        })
        .with_overrides(cli.svn_binary, cli.username);

    let credentials = Credentials::new(config.username.clone(), cli.password);
    let runner = CommandRunner::new(config.svn_binary.clone(), credentials);
    let mut model = SvnModel::open(runner, &cli.path)?;
    model.set_hide_unversioned(config.hide_unversioned);

    match cli.command {
        None => run_app(App::new(model, &config)),
        Some(Commands::Status { all }) => execute_status(&mut model, all),
        Some(Commands::Log { limit }) => {
            execute_log(&mut model, limit.unwrap_or(config.log_page_size))
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        log::error!("{e}");
        if let SvnNavigatorError::Spawn { program, .. } = &e {
            print_error(&format!("Could not run '{program}'. Is Subversion installed?"));
        } else {
            print_error(&e.to_string());
        }
        std::process::exit(1);
    }
}
