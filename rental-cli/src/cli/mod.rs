use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use rental_client::views::BookingTab;
use rental_client::{ClientConfig, HttpClient};

mod admin;
mod book;
mod bookings;
mod cars;
mod profile;

#[derive(Debug, Parser)]
#[command(name = "rental", about = "Car rental command-line client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the vehicle catalog
    Cars(cars::ListArgs),
    /// Featured vehicles from the home page
    Featured,
    /// Vehicle details, reviews and availability
    Car(cars::ShowArgs),
    /// Book a vehicle
    Book(book::BookArgs),
    /// Your bookings
    Bookings(bookings::BookingsCommand),
    /// Your profile
    Profile(profile::ProfileCommand),
    /// Your dashboard
    Dashboard,
    /// Fleet, bookings and users administration
    Admin(admin::AdminCommand),
}

/// API location and credentials; flags override `RENTAL_API_*` variables
#[derive(Debug, Args)]
struct ConnectionArgs {
    /// API root, e.g. http://localhost:5000/api
    #[arg(long, global = true, env = "RENTAL_API_URL")]
    api_url: Option<String>,

    /// Bearer token for signed-in requests
    #[arg(long, global = true, env = "RENTAL_API_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl ConnectionArgs {
    fn config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::from_env().context("invalid client configuration")?;
        if let Some(url) = self.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config = ClientConfig {
                base_url: ClientConfig::new(url).base_url,
                ..config
            };
        }
        if let Some(token) = self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            config = config.with_token(token);
        }
        Ok(config)
    }
}

/// Connected client plus whether a token was supplied
pub(crate) struct Session {
    pub api: HttpClient,
    pub signed_in: bool,
}

impl Cli {
    pub(crate) async fn run(self) -> anyhow::Result<()> {
        let config = self.connection.config()?;
        tracing::debug!(base_url = %config.base_url, signed_in = config.token.is_some(), "Client configured");
        let session = Session {
            signed_in: config.token.is_some(),
            api: config.build_http_client().context("failed to build HTTP client")?,
        };

        match self.command {
            Commands::Cars(args) => cars::list(&session, args).await,
            Commands::Featured => cars::featured(&session).await,
            Commands::Car(args) => cars::show(&session, args).await,
            Commands::Book(args) => book::run(&session, args).await,
            Commands::Bookings(command) => bookings::run(&session, command).await,
            Commands::Profile(command) => profile::run(&session, command).await,
            Commands::Dashboard => profile::dashboard(&session).await,
            Commands::Admin(command) => admin::run(&session, command).await,
        }
    }
}

/// Calendar day at 00:00 UTC
pub(crate) fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub(crate) fn parse_tab(value: &str) -> Result<BookingTab, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(BookingTab::All),
        "active" => Ok(BookingTab::Active),
        "pending" => Ok(BookingTab::Pending),
        "confirmed" => Ok(BookingTab::Confirmed),
        "completed" => Ok(BookingTab::Completed),
        "cancelled" | "canceled" => Ok(BookingTab::Cancelled),
        other => Err(format!("unknown tab: {other}")),
    }
}

/// `path=value`
pub(crate) fn parse_assignment(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected path=value, got {value:?}"))
}

/// Exit with the view's error message when it has one
pub(crate) fn ensure_loaded(error: Option<&str>) -> anyhow::Result<()> {
    match error {
        Some(message) => anyhow::bail!("{message}"),
        None => Ok(()),
    }
}
