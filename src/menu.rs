use colored::Colorize;
use inquire::{Confirm, Select};

use crate::error::AppError;
use crate::profile::ProfileStore;
use crate::storage::Storage;
use crate::validation::{
    prompt_until_valid, validate_email, validate_name, validate_username,
};
use crate::{
    BACK_OPTION, add_profile, list_profiles, remove_profile, show_current_profile,
    switch_profile,
};

/// Runs interactive menu interface
pub fn run_menu() -> Result<(), AppError> {
    loop {
        let actions: Vec<&'static str> = vec![
            "switch profile",
            "add profile",
            "remove profile",
            "show current profile",
            "list profiles",
            "quit",
        ];

        let action_selected: &'static str =
            Select::new(&format!("{}", "select action".blue()), actions).prompt()?;

        match action_selected {
            "switch profile" => menu_switch_profile()?,
            "add profile" => menu_add_profile()?,
            "remove profile" => menu_remove_profile()?,
            "show current profile" => show_current_profile()?,
            "list profiles" => list_profiles()?,
            "quit" => {
                println!("{}", "quitting".yellow());
                break Ok(());
            }
            _ => unreachable!("unexpected input"),
        }
    }
}

/// Menu for switching profiles; on a failed save after the git identity was
/// applied, offers to retry only the save
fn menu_switch_profile() -> Result<(), AppError> {
    let store = load_store()?;
    if check_if_profiles_exist(&store) {
        return Ok(());
    }

    let names: Vec<String> = build_name_list(&store);
    let name_to_switch: String =
        Select::new(&format!("{}", "select profile to switch to:".blue()), names).prompt()?;

    if name_to_switch != BACK_OPTION {
        switch_profile(&name_to_switch, |err| {
            println!("{} {err}", "warning:".yellow());
            Ok(Confirm::new("retry saving the profiles file?")
                .with_default(true)
                .prompt()?)
        })?;
    }

    Ok(())
}

/// Menu for adding a new profile
fn menu_add_profile() -> Result<(), AppError> {
    // Input validation
    let name: String = prompt_until_valid(
        &format!("{}", "enter profile name:".blue()),
        validate_name,
    )?;

    let username: String = prompt_until_valid(
        &format!("{}", "enter git username:".blue()),
        validate_username,
    )?;

    let email: String = prompt_until_valid(
        &format!("{}", "enter git email:".blue()),
        validate_email,
    )?;

    add_profile(&name, &username, &email, "main", None, false, false)?;
    Ok(())
}

/// Menu for removing a profile
fn menu_remove_profile() -> Result<(), AppError> {
    let store = load_store()?;
    if check_if_profiles_exist(&store) {
        return Ok(());
    }

    let names: Vec<String> = build_name_list(&store);
    let name_to_remove: String =
        Select::new(&format!("{}", "select profile to remove:".blue()), names).prompt()?;

    if name_to_remove != BACK_OPTION {
        remove_profile(&name_to_remove)?;
    }

    Ok(())
}

fn load_store() -> Result<ProfileStore, AppError> {
    Storage::new()?.load()
}

/// Reports an empty store; returns true when there is nothing to select
fn check_if_profiles_exist(store: &ProfileStore) -> bool {
    if store.is_empty() {
        println!("{}", "no profiles found".red());
        return true;
    }
    false
}

/// Builds list of profile names for menu to display
fn build_name_list(store: &ProfileStore) -> Vec<String> {
    let mut names: Vec<String> = store.list().map(|p| p.name.clone()).collect();
    names.push(BACK_OPTION.to_string());
    names
}
