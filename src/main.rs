use apivault::cli::{commands, output, Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Log to stderr.  `RUST_LOG` wins; otherwise `-v`/`-vv` raise the level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("apivault={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::List { show } => commands::list::execute(&cli, show),
        Commands::Get { ref name } => commands::get::execute(&cli, name),
        Commands::Add {
            ref name,
            ref tools,
            ref value,
            no_sync,
        } => commands::add::execute(&cli, name, tools, value.as_deref(), no_sync),
        Commands::Set {
            ref name,
            ref value,
            no_sync,
        } => commands::set::execute(&cli, name, value.as_deref(), no_sync),
        Commands::Tools {
            ref name,
            ref tools,
            no_sync,
        } => commands::tools::execute(&cli, name, tools, no_sync),
        Commands::Remove { ref entry, force } => commands::remove::execute(&cli, entry, force),
        Commands::Wipe { force } => commands::wipe::execute(&cli, force),
        Commands::Sync => commands::sync::execute(&cli),
        Commands::RotateKey => commands::rotate::execute(&cli),
        Commands::SupportedTools => commands::supported_tools::execute(&cli),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
