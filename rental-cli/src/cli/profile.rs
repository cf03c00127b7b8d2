use clap::{Args, Subcommand};
use rental_client::views::{CustomerDashboard, ProfileEditor};
use shared::models::Profile;

use super::{Session, ensure_loaded, parse_assignment};
use crate::output;

#[derive(Debug, Args)]
pub(crate) struct ProfileCommand {
    #[command(subcommand)]
    action: Option<ProfileAction>,
}

#[derive(Debug, Subcommand)]
enum ProfileAction {
    /// Update fields, e.g. `phone=555-0100 address.city=Austin`
    Set {
        #[arg(required = true, value_name = "PATH=VALUE", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
}

fn print_profile(profile: &Profile) {
    println!("{} <{}>", profile.full_name(), profile.email);
    if !profile.phone.is_empty() {
        println!("Phone: {}", profile.phone);
    }
    let address = &profile.address;
    let parts = [&address.street, &address.city, &address.state, &address.zip_code, &address.country]
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>();
    if !parts.is_empty() {
        println!("Address: {}", parts.join(", "));
    }
    let license = &profile.driver_license;
    if !license.number.is_empty() {
        println!(
            "License: {} {} (expires {})",
            license.number,
            license.state,
            license.expiry_day().unwrap_or("n/a")
        );
    }
    println!("Loyalty points: {}", profile.loyalty_points);
}

pub(crate) async fn run(session: &Session, command: ProfileCommand) -> anyhow::Result<()> {
    let mut editor = ProfileEditor::new();
    editor.load(&session.api).await;
    ensure_loaded(editor.load_error())?;

    match command.action {
        None => {
            if let Some(profile) = editor.profile() {
                print_profile(profile);
            }
        }
        Some(ProfileAction::Set { fields }) => {
            for (path, value) in fields {
                editor.set_path(&path, value)?;
            }
            if !editor.is_dirty() {
                println!("Nothing changed");
                return Ok(());
            }
            let profile = editor.save(&session.api).await?.clone();
            if let Some(notice) = editor.notice() {
                println!("{}", notice);
            }
            print_profile(&profile);
        }
    }
    Ok(())
}

pub(crate) async fn dashboard(session: &Session) -> anyhow::Result<()> {
    let mut view = CustomerDashboard::new();
    view.load(&session.api).await;
    ensure_loaded(view.error())?;

    let Some(overview) = view.overview() else {
        return Ok(());
    };
    println!("Welcome back, {}", overview.profile.full_name());
    println!(
        "Bookings: {}  Upcoming: {}  Loyalty points: {}",
        overview.total_bookings(),
        overview.upcoming(),
        overview.profile.loyalty_points
    );
    println!();
    println!("Recent bookings:");
    if overview.recent.is_empty() {
        println!("  none yet");
    }
    for booking in &overview.recent {
        println!("  {}", output::booking_line(booking));
    }
    Ok(())
}
