use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

mod cli;
mod error;
mod exec;
mod git;
mod menu;
mod profile;
mod ssh;
mod storage;
mod switcher;
mod validation;

use cli::{Cli, Commands};
use error::AppError;
use git::GitCli;
use profile::{Profile, ProfileStore};
use ssh::SshCli;
use storage::Storage;
use switcher::Switcher;
use validation::{validate_email, validate_name, validate_username};

/// Menu entry for backing out of a selection; profile names may not collide
/// with it
pub(crate) const BACK_OPTION: &str = "back";

// Main
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Switch { name }) => cli_switch_profile(&name),
        Some(Commands::Add { name, username, email, branch, ssh_key, auto_push, sign_commits }) => {
            add_profile(&name, &username, &email, &branch, ssh_key, auto_push, sign_commits)
        }
        Some(Commands::Update { name, username, email, branch, ssh_key }) => {
            update_profile(&name, username, email, branch, ssh_key)
        }
        Some(Commands::Remove { name }) => remove_profile(&name),
        Some(Commands::Current) => show_current_profile(),
        Some(Commands::List) => list_profiles(),
        Some(Commands::Export { file }) => export_store(&file),
        Some(Commands::Import { file }) => import_store(&file),
        Some(Commands::TestSsh) => test_ssh(),
        None => menu::run_menu(),
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red());
        std::process::exit(1);
    }
}

/// Switch handler for the CLI: a failed save after the git calls prints a
/// hint instead of prompting
fn cli_switch_profile(name: &str) -> Result<(), AppError> {
    switch_profile(name, |_| {
        eprintln!(
            "{}",
            "git identity is already applied; fix the profiles file and rerun the switch"
                .yellow()
        );
        Ok(false)
    })
}

/// Switches profiles under the store lock.
///
/// `retry_save` decides what to do when the save fails after the git
/// identity has been applied: return true to retry only the save (the menu
/// asks the user), false to surface `InconsistentState`.
pub(crate) fn switch_profile<F>(name: &str, mut retry_save: F) -> Result<(), AppError>
where
    F: FnMut(&AppError) -> Result<bool, AppError>,
{
    let storage = Storage::new()?;
    let _lock = storage.lock()?;
    let mut store = storage.load()?;

    let switcher = Switcher::new(&storage, &GitCli, &SshCli);
    match switcher.switch_to(&mut store, name) {
        Ok(outcome) => {
            println!("{} {}", "switched to profile:".green(), outcome.profile.name);
            println!("  {} <{}>", outcome.profile.username, outcome.profile.email);
            if let Some(warning) = outcome.warning {
                println!("{} {warning}", "warning:".yellow());
            }
            Ok(())
        }
        // store already carries the new current_profile; only the save needs
        // retrying, the git identity is in place
        Err(e @ AppError::InconsistentState(_)) => {
            let mut last = e;
            loop {
                if !retry_save(&last)? {
                    return Err(last);
                }
                match storage.save(&store) {
                    Ok(()) => {
                        println!("{} {name}", "switched to profile:".green());
                        return Ok(());
                    }
                    Err(err) => last = AppError::InconsistentState(Box::new(err)),
                }
            }
        }
        Err(e) => Err(e),
    }
}

/// Adds a new profile to the store
pub(crate) fn add_profile(
    name: &str,
    username: &str,
    email: &str,
    branch: &str,
    ssh_key: Option<PathBuf>,
    auto_push: bool,
    sign_commits: bool,
) -> Result<(), AppError> {
    validate_name(name)?;
    validate_username(username)?;
    validate_email(email)?;

    let storage = Storage::new()?;
    let _lock = storage.lock()?;
    let mut store = storage.load()?;

    store.add(Profile {
        name: name.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        default_branch: branch.to_string(),
        // existence is checked lazily at switch time
        ssh_key_path: ssh_key,
        auto_push,
        sign_commits,
    })?;
    storage.save(&store)?;

    println!("{} {name}", "added profile:".green());
    Ok(())
}

/// Updates fields of an existing profile; absent fields are left alone
pub(crate) fn update_profile(
    name: &str,
    username: Option<String>,
    email: Option<String>,
    branch: Option<String>,
    ssh_key: Option<PathBuf>,
) -> Result<(), AppError> {
    let storage = Storage::new()?;
    let _lock = storage.lock()?;
    let mut store = storage.load()?;

    let profile = store.get_mut(name)?;
    if let Some(username) = username {
        validate_username(&username)?;
        profile.username = username;
    }
    if let Some(email) = email {
        validate_email(&email)?;
        profile.email = email;
    }
    if let Some(branch) = branch {
        profile.default_branch = branch;
    }
    if let Some(ssh_key) = ssh_key {
        profile.ssh_key_path = Some(ssh_key);
    }
    storage.save(&store)?;

    println!("{} {name}", "updated profile:".green());
    Ok(())
}

/// Deletes a profile, clearing the active pointer if it was active
pub(crate) fn remove_profile(name: &str) -> Result<(), AppError> {
    let storage = Storage::new()?;
    let _lock = storage.lock()?;
    let mut store = storage.load()?;

    store.remove(name)?;
    storage.save(&store)?;

    println!("{} {name}", "removed profile:".green());
    Ok(())
}

/// Shows the active profile alongside what git config actually reports
pub(crate) fn show_current_profile() -> Result<(), AppError> {
    let storage = Storage::new()?;
    let store = storage.load()?;

    match store.current() {
        Some(profile) => {
            println!("{} {}", "current profile:".blue(), profile.name);
            println!("  username: {}", profile.username);
            println!("  email: {}", profile.email);
            println!("  default branch: {}", profile.default_branch);
            if let Some(key) = &profile.ssh_key_path {
                println!("  ssh key: {}", key.display());
            }
        }
        None => println!("{}", "no active profile".yellow()),
    }

    let git = GitCli;
    let git_name = git.get_global("user.name")?.unwrap_or_else(|| "unset".to_string());
    let git_email = git.get_global("user.email")?.unwrap_or_else(|| "unset".to_string());
    println!("{} {git_name} <{git_email}>", "git reports:".blue());

    Ok(())
}

/// Lists all stored profiles, marking the active one
pub(crate) fn list_profiles() -> Result<(), AppError> {
    let storage = Storage::new()?;
    let store = storage.load()?;

    if store.is_empty() {
        println!("{}", "no profiles to show".red());
        return Ok(());
    }

    for profile in store.list() {
        let active = store.current_profile.as_deref() == Some(profile.name.as_str());
        let marker = if active { "*".green().to_string() } else { " ".to_string() };
        println!(
            "{marker} {} {} <{}> [{}]",
            profile.name.bold(),
            profile.username,
            profile.email,
            profile.default_branch,
        );
        if let Some(key) = &profile.ssh_key_path {
            println!("    ssh key: {}", key.display());
        }
    }
    Ok(())
}

/// Writes the whole store to a JSON file
pub(crate) fn export_store(file: &Path) -> Result<(), AppError> {
    let storage = Storage::new()?;
    let store = storage.load()?;

    let json = serde_json::to_string_pretty(&store)
        .map_err(|e| AppError::Validation(format!("failed to serialize profiles: {e}")))?;
    fs::write(file, json)?;

    println!("{} {}", "exported profiles to:".green(), file.display());
    Ok(())
}

/// Replaces the store with the contents of a JSON file
pub(crate) fn import_store(file: &Path) -> Result<(), AppError> {
    let storage = Storage::new()?;
    let _lock = storage.lock()?;

    let contents = fs::read_to_string(file)?;
    let store: ProfileStore = serde_json::from_str(&contents).map_err(AppError::CorruptStore)?;
    store.verify_names()?;
    storage.save(&store)?;

    println!("{} {}", "imported profiles from:".green(), file.display());
    Ok(())
}

/// Probes SSH authentication against github.com
pub(crate) fn test_ssh() -> Result<(), AppError> {
    let (ok, message) = ssh::test_github_connection()?;
    if ok {
        println!("{}", "ssh connection to github.com succeeded".green());
    } else {
        println!("{} {message}", "ssh connection failed:".red());
    }
    Ok(())
}
