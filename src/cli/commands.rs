//! Non-interactive CLI command handlers.

use crate::cli::args::Commands;
use crate::store;

/// Executes a subcommand and returns once it is done.
pub fn run(command: &Commands) -> color_eyre::Result<()> {
    match command {
        Commands::Profiles => list_profiles(),
    }
    Ok(())
}

fn list_profiles() {
    let profiles = store::load_profiles();
    if profiles.is_empty() {
        println!("No profiles configured.");
        return;
    }

    println!("{:<10} {:<20} {}", "ID", "NAME", "ENDPOINT");
    for profile in profiles {
        println!("{:<10} {:<20} {}", profile.id, profile.name, profile.endpoint);
    }
}
