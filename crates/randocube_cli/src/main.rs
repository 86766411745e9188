//! Command-line front end for the RandoCube catalog.
//!
//! # Responsibility
//! - Map subcommands onto `RandoCubeApi` calls.
//! - Print every response envelope as JSON; exit non-zero when it carries an error.

use clap::{Parser, Subcommand};
use randocube_api::{
    open_api, AddCategoryRequest, ApiConfig, EditCategoryRequest, ItemInput,
    MarkCompletedRequest, RemoveCategoryRequest, RemoveItemRequest, SaveItemRequest,
};
use randocube_core::{ItemId, Priority};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "randocube: weighted random picks from your to-do catalog",
    long_about = None
)]
struct Cli {
    /// Catalog file; `.json` uses the save-file format, anything else SQLite.
    #[arg(long, global = true, env = "RANDOCUBE_DATA_PATH")]
    data: Option<PathBuf>,

    /// Directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true, env = "RANDOCUBE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (`trace|debug|info|warn|error`).
    #[arg(long, global = true, env = "RANDOCUBE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> ApiConfig {
        let mut config = ApiConfig::default();
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config.log_dir = self.log_dir.clone();
        config
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report liveness and version.
    Health,
    /// Re-read the catalog from storage.
    Reload,
    /// List categories in stored order.
    Categories,
    /// Add a category.
    AddCategory { name: String },
    /// Rename a category; items follow the new name.
    RenameCategory { old: String, new: String },
    /// Remove a category, deleting or migrating its items.
    RemoveCategory {
        name: String,
        #[arg(long)]
        migrate_to: Option<String>,
    },
    /// Draw a weighted random set from a category.
    Random {
        category: String,
        /// Draw a fresh set instead of reusing the last one.
        #[arg(long)]
        fresh: bool,
    },
    /// List active items, or completed items with `--completed`.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        completed: bool,
    },
    /// Create an item, or update one with `--id`.
    Save {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long, value_parser = parse_priority)]
        priority: Priority,
        #[arg(long)]
        id: Option<ItemId>,
        #[arg(long)]
        ignore_duplicate: bool,
    },
    /// Delete an item (active or completed).
    Remove { id: ItemId },
    /// Mark an item completed, or move it back with `--unmark`.
    Complete {
        id: ItemId,
        #[arg(long)]
        unmark: bool,
    },
    /// Change how many items a random set holds.
    SetSize { size: usize },
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    Priority::parse(raw).ok_or_else(|| format!("unknown priority `{raw}` (low|medium|high)"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Commands::Health = cli.command {
        println!("{} (core {})", randocube_core::health(), randocube_core::core_version());
        return ExitCode::SUCCESS;
    }

    let api = match open_api(&cli.config()) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("randocube: {err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Health => ExitCode::SUCCESS,
        Commands::Reload => emit(&api.reload(), |r| r.error.is_none()),
        Commands::Categories => emit(&api.get_categories(), |r| r.error.is_none()),
        Commands::AddCategory { name } => emit(
            &api.add_category(&AddCategoryRequest {
                category: Some(name),
            }),
            |r| r.error.is_none(),
        ),
        Commands::RenameCategory { old, new } => emit(
            &api.edit_category(&EditCategoryRequest {
                old_category: Some(old),
                new_category: Some(new),
            }),
            |r| r.error.is_none(),
        ),
        Commands::RemoveCategory { name, migrate_to } => emit(
            &api.remove_category(&RemoveCategoryRequest {
                category: Some(name),
                migrate_to,
            }),
            |r| r.error.is_none(),
        ),
        Commands::Random { category, fresh } => emit(
            &api.get_random_set(Some(category.as_str()), Some(!fresh)),
            |r| r.error.is_none(),
        ),
        Commands::List {
            category,
            completed,
        } => {
            let response = if completed {
                api.get_completed_list(category.as_deref())
            } else {
                api.get_full_list(category.as_deref())
            };
            emit(&response, |r| r.error.is_none())
        }
        Commands::Save {
            title,
            category,
            priority,
            id,
            ignore_duplicate,
        } => emit(
            &api.save_item(&SaveItemRequest {
                item: Some(ItemInput {
                    id,
                    title: Some(title),
                    category: Some(category),
                    priority: Some(priority),
                }),
                ignore_duplicate: Some(ignore_duplicate),
            }),
            |r| r.error.is_none(),
        ),
        Commands::Remove { id } => emit(
            &api.remove_item(&RemoveItemRequest { id: Some(id) }),
            |r| r.error.is_none(),
        ),
        Commands::Complete { id, unmark } => emit(
            &api.mark_completed(&MarkCompletedRequest {
                id: Some(id),
                unmark: Some(unmark),
            }),
            |r| r.error.is_none(),
        ),
        Commands::SetSize { size } => emit(&api.set_default_set_size(size), |r| r.error.is_none()),
    }
}

fn emit<T: Serialize>(response: &T, succeeded: impl Fn(&T) -> bool) -> ExitCode {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("randocube: could not encode response: {err}");
            return ExitCode::FAILURE;
        }
    }
    if succeeded(response) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
