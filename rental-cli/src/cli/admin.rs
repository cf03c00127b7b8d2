use std::path::PathBuf;

use clap::{Args, Subcommand};
use futures::future::try_join_all;
use rental_client::UploadFile;
use rental_client::views::{AdminDashboard, BookingBoard, BookingTab, FleetManager, UserDirectory};
use shared::models::{BookingStatus, VehicleInput};
use shared::util::format_price;

use super::bookings::print_board;
use super::{Session, ensure_loaded, parse_tab};
use crate::output;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    action: AdminAction,
}

#[derive(Debug, Subcommand)]
enum AdminAction {
    /// Totals, revenue, popular vehicles and latest bookings
    Dashboard,
    /// Manage the fleet
    Cars(CarsCommand),
    /// Every customer's bookings
    Bookings {
        /// all, pending, confirmed, completed or cancelled
        #[arg(long, default_value = "all", value_parser = parse_tab)]
        tab: BookingTab,
    },
    /// Move a booking to a new status
    Status {
        /// Booking id
        id: String,
        /// pending, confirmed, completed or cancelled
        status: BookingStatus,
    },
    /// Registered users
    Users {
        /// Filter by name or email
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Args)]
struct CarsCommand {
    #[command(subcommand)]
    action: Option<CarsAction>,
}

#[derive(Debug, Subcommand)]
enum CarsAction {
    /// Add a vehicle
    Add(VehicleArgs),
    /// Change fields of an existing vehicle
    Edit {
        id: String,
        #[command(flatten)]
        fields: VehicleArgs,
    },
    /// Delete a vehicle
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Upload images and attach them to a vehicle
    Upload {
        id: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Vehicle form fields; omitted flags leave the current value
#[derive(Debug, Default, Args)]
struct VehicleArgs {
    #[arg(long)]
    make: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long = "type", value_name = "TYPE")]
    vehicle_type: Option<String>,
    #[arg(long)]
    transmission: Option<String>,
    #[arg(long)]
    fuel_type: Option<String>,
    #[arg(long)]
    seats: Option<u32>,
    #[arg(long)]
    price_per_day: Option<f64>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    available: Option<bool>,
    #[arg(long)]
    featured: Option<bool>,
    #[arg(long)]
    discount: Option<f64>,
    #[arg(long)]
    description: Option<String>,
    /// Image URL, repeatable; replaces the current images
    #[arg(long = "image", value_name = "URL")]
    images: Vec<String>,
}

impl VehicleArgs {
    fn apply(self, input: &mut VehicleInput) {
        fn assign<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        assign(&mut input.make, self.make);
        assign(&mut input.model, self.model);
        assign(&mut input.year, self.year);
        assign(&mut input.vehicle_type, self.vehicle_type);
        assign(&mut input.transmission, self.transmission);
        assign(&mut input.fuel_type, self.fuel_type);
        assign(&mut input.seats, self.seats);
        assign(&mut input.price_per_day, self.price_per_day);
        assign(&mut input.location, self.location);
        assign(&mut input.available, self.available);
        assign(&mut input.featured, self.featured);
        assign(&mut input.discount, self.discount);
        assign(&mut input.description, self.description);
        if !self.images.is_empty() {
            input.images = self.images;
        }
    }
}

pub(crate) async fn run(session: &Session, command: AdminCommand) -> anyhow::Result<()> {
    match command.action {
        AdminAction::Dashboard => dashboard(session).await,
        AdminAction::Cars(command) => cars(session, command).await,
        AdminAction::Bookings { tab } => {
            let mut board = BookingBoard::admin();
            board.load(&session.api).await;
            ensure_loaded(board.load_error())?;
            print_board(&mut board, tab)
        }
        AdminAction::Status { id, status } => {
            let mut board = BookingBoard::admin();
            board.load(&session.api).await;
            ensure_loaded(board.load_error())?;
            board.change_status(&session.api, &id, status).await?;
            if let Some(notice) = board.notice() {
                println!("{}", notice);
            }
            Ok(())
        }
        AdminAction::Users { search } => {
            let mut directory = UserDirectory::new();
            directory.load(&session.api).await;
            ensure_loaded(directory.error())?;
            if let Some(search) = search {
                directory.set_search(search);
            }
            let visible = directory.visible();
            println!("{} of {} users", visible.len(), directory.total());
            for profile in visible {
                println!("{}", output::profile_line(profile));
            }
            Ok(())
        }
    }
}

async fn dashboard(session: &Session) -> anyhow::Result<()> {
    let mut view = AdminDashboard::new();
    view.load(&session.api).await;
    ensure_loaded(view.error())?;

    let Some(stats) = view.stats() else {
        return Ok(());
    };
    println!(
        "Users: {}  Cars: {}  Bookings: {}  Active: {}  Revenue: {}",
        stats.total_users,
        stats.total_cars,
        stats.total_bookings,
        stats.active_bookings,
        format_price(stats.revenue)
    );
    println!();
    println!("Popular cars:");
    for car in &stats.popular {
        println!("  {:<26} {}  {} bookings", car.car_id, car.name, car.bookings);
    }
    println!();
    println!("Recent bookings:");
    for booking in &stats.recent {
        println!("  {}", output::booking_line(booking));
    }
    Ok(())
}

async fn cars(session: &Session, command: CarsCommand) -> anyhow::Result<()> {
    let mut fleet = FleetManager::new();
    fleet.load(&session.api).await;
    ensure_loaded(fleet.load_error())?;

    match command.action {
        None => {
            println!("{} cars", fleet.cars().len());
            for car in fleet.cars() {
                println!("{}", output::vehicle_line(car));
            }
            return Ok(());
        }
        Some(CarsAction::Add(fields)) => {
            fleet.open_new();
            fleet.edit(|input| fields.apply(input));
            let vehicle = fleet.save(&session.api).await?;
            println!("{}", output::vehicle_line(&vehicle));
        }
        Some(CarsAction::Edit { id, fields }) => {
            if !fleet.open_edit(&id) {
                anyhow::bail!("no car with id {id}");
            }
            fleet.edit(|input| fields.apply(input));
            let vehicle = fleet.save(&session.api).await?;
            println!("{}", output::vehicle_line(&vehicle));
        }
        Some(CarsAction::Delete { id, yes }) => {
            if !yes {
                anyhow::bail!("deleting {id} cannot be undone; pass --yes to confirm");
            }
            fleet.delete(&session.api, &id).await?;
        }
        Some(CarsAction::Upload { id, files }) => {
            if !fleet.open_edit(&id) {
                anyhow::bail!("no car with id {id}");
            }
            let files = try_join_all(files.iter().map(UploadFile::from_path)).await?;
            let added = fleet.upload(&session.api, files).await?;
            tracing::info!(car_id = %id, added, "Attaching uploaded images");
            fleet.save(&session.api).await?;
        }
    }
    if let Some(notice) = fleet.notice() {
        println!("{}", notice);
    }
    Ok(())
}
