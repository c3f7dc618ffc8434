//! pkgfav CLI: search the npm registry and keep a list of favorite packages

mod tui;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use pkgfav::favorites::FavoritesStore;
use pkgfav::kv::KeyValueStore;
use pkgfav::types::FavoriteFilter;
use pkgfav_app::app::{AppState, SearchController};
use pkgfav_app::config::app::LOG_FILE;
use pkgfav_app::config::ui::{EMPTY_FAVORITES_TEXT, FETCH_ERROR_TEXT};
use pkgfav_app::data::{self, FileStore, Settings};
use pkgfav_app::error::{AppError, Result};
use pkgfav_app::providers::{NpmsProvider, PackageProvider};

#[derive(Parser)]
#[command(
    name = "pkgfav",
    about = "Search npm packages and keep favorites with reasons",
    version
)]
struct Cli {
    /// Key-value store file (defaults to the config directory)
    #[arg(long, global = true, env = "PKGFAV_STORE")]
    store: Option<PathBuf>,

    /// Package-search service base URL
    #[arg(long, global = true, env = "PKGFAV_REGISTRY_URL")]
    registry_url: Option<String>,

    /// Settings file (defaults to the config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Search the registry
    Search {
        /// Search term, sent as typed
        term: String,
    },
    /// List favorites in the order they were added
    List {
        /// Only names containing this text
        #[arg(long)]
        name: Option<String>,
        /// Only reasons containing this text
        #[arg(long)]
        reason: Option<String>,
    },
    /// Add a package to favorites
    Add {
        name: String,
        /// Why the package is a favorite
        #[arg(long, short)]
        reason: Option<String>,
    },
    /// Remove a package (and its reason) from favorites
    Remove { name: String },
    /// Print the reason stored for a package
    Reason { name: String },
    /// Replace the reason stored for a package
    Edit { name: String, reason: String },
    /// Delete reasons left behind by packages that are no longer favorites
    Prune,
    /// Remove every favorite and reason
    Clear {
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
    /// Print the effective settings as JSON
    Settings {
        /// Also write them to the settings file
        #[arg(long)]
        save: bool,
    },
    /// Interactive terminal UI (default)
    Tui {
        /// Screen to open: "/" or "/favorites"
        #[arg(long, default_value = "/")]
        route: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Command::Tui { .. }));
    init_tracing(interactive);

    if let Err(e) = run(cli) {
        tracing::debug!("Command failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Install the tracing subscriber
///
/// Level comes from RUST_LOG (default: warn). Subcommands log to stderr; the
/// terminal UI logs to a file so it does not draw over the screen.
fn init_tracing(interactive: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
            .ok();
        return;
    }

    let file = data::ensure_config_dir().and_then(|dir| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
            .map_err(AppError::from)
    });
    match file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .compact()
                .try_init()
                .ok();
        }
        // Without a log file the UI runs silent
        Err(e) => eprintln!("Logging disabled: {e}"),
    }
}

fn run(mut cli: Cli) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(url) = &cli.registry_url {
        settings.registry_url = url.clone();
    }
    if let Some(path) = &cli.store {
        settings.store_path = Some(path.clone());
    }

    let command = cli.command.take().unwrap_or(Command::Tui {
        route: "/".to_string(),
    });

    if let Command::Settings { save } = &command {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        if *save {
            match &cli.settings {
                Some(path) => settings.save_to(path)?,
                None => settings.save()?,
            }
        }
        return Ok(());
    }

    if let Command::Search { term } = &command {
        let provider = NpmsProvider::with_base_url(settings.registry_base())?;
        return Ok(cmd_search(&provider, term)?);
    }

    let adapter = match &settings.store_path {
        Some(path) => FileStore::open(path.clone())?,
        None => FileStore::open_default()?,
    };
    let mut store = FavoritesStore::new(adapter);

    match command {
        Command::Search { .. } | Command::Settings { .. } => Ok(()),
        Command::List { name, reason } => {
            let mut filter = FavoriteFilter::new();
            filter.search = name;
            filter.reason = reason;
            cmd_list(&store, &filter);
            Ok(())
        }
        Command::Add { name, reason } => Ok(cmd_add(&mut store, &name, reason.as_deref())?),
        Command::Remove { name } => Ok(cmd_remove(&mut store, &name)?),
        Command::Reason { name } => Ok(cmd_reason(&store, &name)?),
        Command::Edit { name, reason } => {
            store.set_reason(&name, &reason).map_err(AppError::from)?;
            println!("Updated reason for {name}");
            Ok(())
        }
        Command::Prune => {
            let pruned = store.prune_orphaned_reasons().map_err(AppError::from)?;
            println!("Removed {pruned} orphaned reason(s)");
            Ok(())
        }
        Command::Clear { yes } => {
            if let Err(e) = require_confirmation(yes) {
                e.exit();
            }
            store.clear().map_err(AppError::from)?;
            println!("Cleared all favorites");
            Ok(())
        }
        Command::Tui { route } => {
            let provider = NpmsProvider::with_base_url(settings.registry_base())?;
            let controller = SearchController::new(Arc::new(provider));
            let mut state = AppState::new(store, settings.add_delay());
            state.navigate_path(&route);
            tui::run(state, controller)?;
            Ok(())
        }
    }
}

fn cmd_search(provider: &dyn PackageProvider, term: &str) -> Result<()> {
    if term.is_empty() {
        return Ok(());
    }
    match provider.search(term) {
        Ok(results) => {
            for item in &results.items {
                if item.description.is_empty() {
                    println!("{}", item.name);
                } else {
                    println!("{}  {}", item.name, item.description);
                }
            }
            Ok(())
        }
        Err(e) => {
            tracing::warn!("Search via {} failed: {e}", provider.name());
            Err(AppError::RemoteFetch(format!("{FETCH_ERROR_TEXT}: {e}")))
        }
    }
}

fn cmd_list<S: KeyValueStore>(store: &FavoritesStore<S>, filter: &FavoriteFilter) {
    let entries = store.filtered(filter);
    if entries.is_empty() {
        println!("{EMPTY_FAVORITES_TEXT}");
        return;
    }
    let width = entries
        .iter()
        .map(|e| e.package_name.chars().count())
        .max()
        .unwrap_or(0);
    for entry in &entries {
        println!(
            "{:<width$}  {}",
            entry.package_name,
            entry.reason_or_empty(),
            width = width
        );
    }
}

fn cmd_add<S: KeyValueStore>(
    store: &mut FavoritesStore<S>,
    name: &str,
    reason: Option<&str>,
) -> Result<()> {
    if store.add_favorite(name, reason)? {
        println!("Added {name} to favorites");
    } else {
        println!("{name} is already a favorite");
    }
    Ok(())
}

/// Usage error for destructive commands run without `--yes`
fn require_confirmation(yes: bool) -> std::result::Result<(), clap::Error> {
    if yes {
        return Ok(());
    }
    Err(Cli::command().error(
        ErrorKind::MissingRequiredArgument,
        "clearing favorites cannot be undone; pass --yes",
    ))
}

/// Remove a listed favorite; an unlisted name is reported and nothing is written
fn cmd_remove<S: KeyValueStore>(store: &mut FavoritesStore<S>, name: &str) -> Result<()> {
    if !store.is_favorite(name) {
        return Err(AppError::NotFound(format!("{name} is not a favorite")));
    }
    store.remove_favorite(name)?;
    println!("Removed {name} from favorites");
    Ok(())
}

fn cmd_reason<S: KeyValueStore>(store: &FavoritesStore<S>, name: &str) -> Result<()> {
    match store.get_reason(name) {
        Some(reason) => {
            println!("{reason}");
            Ok(())
        }
        None => Err(AppError::NotFound(format!("no reason stored for {name}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgfav::kv::MemoryStore;

    fn store() -> FavoritesStore<MemoryStore> {
        FavoritesStore::new(MemoryStore::new())
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["pkgfav", "add", "lodash", "--reason", "utils"]).unwrap();
        match cli.command {
            Some(Command::Add { name, reason }) => {
                assert_eq!(name, "lodash");
                assert_eq!(reason.as_deref(), Some("utils"));
            }
            _ => panic!("expected add"),
        }

        let cli = Cli::try_parse_from(["pkgfav", "--store", "/tmp/s.json", "list"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.json")));
        assert!(matches!(cli.command, Some(Command::List { .. })));
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["pkgfav"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_add_twice_keeps_first_reason() {
        let mut store = store();
        cmd_add(&mut store, "lodash", Some("utils")).unwrap();
        cmd_add(&mut store, "lodash", Some("other")).unwrap();

        assert_eq!(store.list_favorites(), vec!["lodash"]);
        assert_eq!(store.get_reason("lodash").as_deref(), Some("utils"));
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut store = store();
        let err = cmd_remove(&mut store, "left-pad").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_remove_unlisted_name_writes_nothing() {
        let mut store = store();
        store.set_reason("left-pad", "orphan").unwrap();

        assert!(cmd_remove(&mut store, "left-pad").is_err());
        // Orphans are left for `prune`
        assert_eq!(store.get_reason("left-pad").as_deref(), Some("orphan"));
    }

    #[test]
    fn test_remove_listed_name_drops_reason() {
        let mut store = store();
        cmd_add(&mut store, "lodash", Some("utils")).unwrap();
        cmd_remove(&mut store, "lodash").unwrap();

        assert!(store.is_empty());
        assert!(store.get_reason("lodash").is_none());
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let err = require_confirmation(false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(require_confirmation(true).is_ok());
    }

    #[test]
    fn test_reason_lookup() {
        let mut store = store();
        cmd_add(&mut store, "react", Some("ui")).unwrap();
        assert!(cmd_reason(&store, "react").is_ok());
        assert!(matches!(cmd_reason(&store, "vue"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_storage_failure_surfaces() {
        let mut store = store();
        store.adapter_mut().set_available(false);
        let err = cmd_add(&mut store, "react", None).unwrap_err();
        assert!(err.is_storage_unavailable());
    }
}
