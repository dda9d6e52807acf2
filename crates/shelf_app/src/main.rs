mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use shelf_logging::shelf_error;

use crate::commands::{BookInput, Session};
use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::logging::LogDestination;

/// Command-line client for the bookshelf service.
#[derive(Debug, Parser)]
#[command(name = "shelf", version)]
struct Cli {
    /// RON config file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Overrides the service host, e.g. `books.example.com:3000`.
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    scheme: Option<String>,
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Login {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
        confirm_password: String,
    },
    Logout,
    /// List books, one page at a time.
    List {
        #[arg(long, default_value_t = 1)]
        pages: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    Add(BookArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        book: BookArgs,
    },
}

/// Fields left out keep their stored value on `edit`.
#[derive(Debug, Args)]
struct BookArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    purchase_date: Option<String>,
    /// Cover image to download and upload with the book.
    #[arg(long)]
    image_url: Option<String>,
}

impl From<BookArgs> for BookInput {
    fn from(args: BookArgs) -> Self {
        Self {
            name: args.name,
            price: args.price,
            purchase_date: args.purchase_date,
            image_url: args.image_url,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            shelf_error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(host) = cli.host {
        config.client.host = host;
    }
    if let Some(scheme) = cli.scheme {
        config.client.scheme = scheme;
    }
    if let Command::List {
        limit: Some(limit), ..
    } = cli.command
    {
        anyhow::ensure!(limit > 0, "--limit must be greater than zero");
        config.page_limit = limit;
    }

    let session = Session::start(&config)?;
    match cli.command {
        Command::Login { email, password } => session.login(email, password),
        Command::SignUp {
            email,
            password,
            confirm_password,
        } => session.sign_up(email, password, confirm_password),
        Command::Logout => session.logout(),
        Command::List { pages, .. } => session.list(pages),
        Command::Add(book) => session.add(book.into()),
        Command::Edit { id, book } => session.edit(id, book.into()),
    }
}
