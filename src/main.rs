use clap::Parser;
use miette::Result;
use pulse::cli::commands;
use pulse::cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Reset SIGPIPE so piping to `head` and friends ends quietly instead of panicking
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_tracing(global.verbose);

    match cli.command {
        Commands::Analytics(cmd) => commands::analytics::run(cmd, &global).await,
        Commands::Process(cmd) => commands::process::run(cmd, &global).await,
        Commands::Team(cmd) => commands::team::run(cmd, &global).await,
        Commands::Gov(cmd) => commands::gov::run(cmd, &global).await,
        Commands::Meetings(cmd) => commands::meetings::run(cmd, &global).await,
        Commands::Admin(cmd) => commands::admin::run(cmd, &global).await,
        Commands::Lss(cmd) => commands::lss::run(cmd, &global).await,
        Commands::Parse(args) => commands::parse::run(args, &global),
        Commands::Rating(cmd) => commands::rating::run(cmd, &global),
        Commands::Config(cmd) => commands::config::run(cmd, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "pulse=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .with(filter)
        .init();
}
