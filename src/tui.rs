use std::path::{Path, PathBuf};

use colored::Colorize;
use inquire::{error::InquireResult, InquireError, Text};

/// Asks for a server name. An empty answer cancels the add flow.
pub fn prompt_server_name() -> InquireResult<String> {
    Text::new("Enter the server name")
        .with_help_message("Leave empty to cancel.")
        .prompt()
}

pub fn prompt_exe_path() -> InquireResult<PathBuf> {
    let exe_path = Text::new("Enter the path to the server's executable")
        .with_help_message("This is the .exe of the server, e.g. ~/Games/GDPS/GDPS.exe. Press ESC to cancel.")
        .with_validator(|input: &str| {
            if input.is_empty() {
                return Ok(inquire::validator::Validation::Invalid(inquire::validator::ErrorMessage::Custom("Please enter a path!".to_string())));
            }
            let expanded = shellexpand::tilde(input).to_string();
            if !std::path::Path::new(&expanded).is_file() {
                return Ok(inquire::validator::Validation::Invalid(inquire::validator::ErrorMessage::Custom("The path you entered is not a file!".to_string())));
            }
            Ok(inquire::validator::Validation::Valid)
        })
        .prompt()?;
    let exe_path = shellexpand::tilde(&exe_path).to_string();
    let exe_path = std::path::Path::new(&exe_path).to_path_buf();
    // the folder is derived from the parent, so store it absolute
    Ok(std::fs::canonicalize(&exe_path).unwrap_or(exe_path))
}

pub fn prompt_confirm_overwrite(name: &str) -> InquireResult<bool> {
    inquire::Confirm::new(&format!("A server named \"{name}\" already exists. Replace it?"))
        .with_default(false)
        .prompt()
}

pub fn prompt_select_server(names: Vec<String>) -> InquireResult<String> {
    inquire::Select::new("Select a server to launch", names).prompt()
}

pub fn prompt_reset_config(path: &Path) -> InquireResult<bool> {
    inquire::Confirm::new(&format!(
        "Do you want to reset {}?",
        path.display()
    ))
    .with_help_message("All registered servers will be lost. Answering no will quit the launcher.")
    .with_default(false)
    .prompt()
}

pub fn print_selected(name: Option<&str>) {
    println!();
    println!(
        "{} {}",
        "Selected Server:".cyan(),
        name.unwrap_or("None").white().bold()
    );
    println!();
}

pub fn print_exit_after_launch(enabled: bool) {
    println!();
    if enabled {
        println!("{}", "The launcher will exit when launching a server.".cyan());
    } else {
        println!("{}", "The launcher will stay open when launching a server.".cyan());
    }
    println!();
}

pub fn print_server_added(name: &str) {
    println!();
    println!(
        "{} {}",
        "Added server".bright_green(),
        name.white().bold()
    );
    println!();
}

pub fn print_discovered(path: &Path) {
    println!();
    println!(
        "{} {}",
        "Found Geometry Dash at".bright_green(),
        path.display().to_string().white().bold()
    );
    println!();
}

pub fn print_not_discovered() {
    println!();
    println!(
        "{}",
        "Geometry Dash was not found or is already registered.".yellow()
    );
    println!();
}

pub fn print_launched(name: &str, pid: u32) {
    println!();
    println!(
        "{} {} {}",
        "Launched".bright_green(),
        name.white().bold(),
        format!("(pid {pid})").bright_green()
    );
    println!();
}

pub fn print_servers(servers: &[(String, PathBuf)]) {
    println!();
    for (name, exe_path) in servers {
        println!("{}\t{}", name.white().bold(), exe_path.display());
    }
    println!();
}

pub fn print_no_servers() {
    println!();
    println!(
        "{}",
        "No servers registered yet. Add one first!".bright_red()
    );
    println!();
}

pub fn print_empty_name() {
    println!();
    println!("{}", "The server name must not be empty.".bright_red());
    println!();
}

pub fn print_target_missing(name: &str) {
    println!();
    println!(
        "{}",
        format!("Server \"{name}\" not found, please re-add it.").bright_red()
    );
    println!();
}

pub fn print_config_deserialization_error(path: &Path) {
    println!();
    println!(
        "{}",
        format!(
            "Could not deserialize the configuration file at {}. Please make sure it is valid and try again.",
            path.display()
        )
        .bright_red()
    );
    println!();
}

pub fn print_error(error: InquireError) {
    println!();
    println!("{}", format!("An error occurred: {error}").bright_red());
    println!();
}
