use clap::Parser;
use color_eyre::Result;
use lifelog::cli::{Cli, Commands};
use lifelog::{logging, utils, Backend, Config, MemoryStore, Profile, SqliteStore, Store};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config {
        Some(ref path) => Config::load_from_path(&utils::expand_path(&path.to_string_lossy()), profile)?,
        None => Config::load_with_profile(profile)?,
    };

    // A broken log directory should not keep the app from starting
    if let Some(log_dir) = utils::get_log_dir(profile) {
        if let Err(e) = logging::init_logging(&config.log_level, &log_dir) {
            eprintln!("Logging disabled: {}", e);
        }
    }

    let backend = if cli.ephemeral {
        log::info!("Using in-memory storage");
        Backend::Memory(MemoryStore::new())
    } else {
        let db_path = config.get_database_path();
        let db_path = db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?;
        Backend::Sqlite(SqliteStore::new(db_path)?)
    };
    let mut store = Store::open(backend);

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = lifelog::tui::App::new(config, store);
            lifelog::tui::run_event_loop(app)?;
        }
        command => {
            let mut stdout = std::io::stdout().lock();
            lifelog::cli::run_command(command, &mut store, &mut stdout)?;
        }
    }

    Ok(())
}
