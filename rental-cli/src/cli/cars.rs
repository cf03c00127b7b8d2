use chrono::NaiveDate;
use clap::Args;
use rental_client::views::{CatalogView, DetailView, HomeView};
use shared::request::SortOption;
use shared::util::format_price;

use super::{Session, day_start, ensure_loaded};
use crate::output;

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    /// Vehicle type, repeatable (Sedan, SUV, ...)
    #[arg(long = "type", value_name = "TYPE")]
    types: Vec<String>,

    /// Make, repeatable
    #[arg(long = "make", value_name = "MAKE")]
    makes: Vec<String>,

    /// Transmission, repeatable
    #[arg(long = "transmission", value_name = "TRANSMISSION")]
    transmissions: Vec<String>,

    #[arg(long)]
    min_price: Option<f64>,

    #[arg(long)]
    max_price: Option<f64>,

    #[arg(long)]
    min_year: Option<i32>,

    #[arg(long)]
    max_year: Option<i32>,

    /// City or free-text location
    #[arg(long)]
    location: Option<String>,

    /// Only featured vehicles
    #[arg(long)]
    featured: bool,

    #[arg(long)]
    limit: Option<u32>,

    /// recommended, priceAsc, priceDesc, ratingDesc or yearDesc
    #[arg(long, default_value = "recommended")]
    sort: SortOption,
}

impl ListArgs {
    fn apply(&self, view: &mut CatalogView) {
        for value in &self.types {
            view.toggle_type(value);
        }
        for value in &self.makes {
            view.toggle_make(value);
        }
        for value in &self.transmissions {
            view.toggle_transmission(value);
        }
        view.set_price_range(self.min_price, self.max_price);
        view.set_year_range(self.min_year, self.max_year);
        view.set_location(self.location.clone());
        view.set_featured(self.featured.then_some(true));
        view.set_limit(self.limit);
        view.set_sort(self.sort);
    }
}

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// Vehicle id
    id: String,

    /// Pick-up day (YYYY-MM-DD); checks availability together with --end
    #[arg(long, requires = "end")]
    start: Option<NaiveDate>,

    /// Return day (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,
}

pub(crate) async fn list(session: &Session, args: ListArgs) -> anyhow::Result<()> {
    let mut view = CatalogView::new();
    args.apply(&mut view);
    view.refresh(&session.api).await;
    ensure_loaded(view.error())?;

    println!("{} cars found (sorted by {})", view.total(), args.sort.label());
    for car in view.cars() {
        println!("{}", output::vehicle_line(car));
    }
    Ok(())
}

pub(crate) async fn featured(session: &Session) -> anyhow::Result<()> {
    let mut view = HomeView::new();
    view.load(&session.api).await;
    ensure_loaded(view.error())?;

    if view.featured().is_empty() {
        println!("No featured cars");
    }
    for car in view.featured() {
        println!("{}", output::vehicle_line(car));
    }
    Ok(())
}

pub(crate) async fn show(session: &Session, args: ShowArgs) -> anyhow::Result<()> {
    let mut view = DetailView::new(&args.id);
    view.load(&session.api).await;
    ensure_loaded(view.error())?;

    if let Some(vehicle) = view.vehicle() {
        for line in output::vehicle_details(vehicle) {
            println!("{}", line);
        }
    }

    if let (Some(start), Some(end)) = (args.start, args.end) {
        view.set_dates(Some(day_start(start)), Some(day_start(end)));
        let available = view.check_availability(&session.api).await?;
        let (start, end) = view.dates();
        if let (Some(start), Some(end)) = (start, end) {
            println!();
            println!(
                "{}: {}",
                output::range(start, end),
                if available { "available" } else { "not available" }
            );
        }
        if let Some(days) = view.rental_days() {
            println!("Estimate: {} for {} days", format_price(view.estimate()), days);
        }
    }

    if !view.similar().is_empty() {
        println!();
        println!("Similar cars:");
        for car in view.similar() {
            println!("  {}", output::vehicle_line(car));
        }
    }

    println!();
    if view.reviews().is_empty() {
        println!("No reviews yet");
    } else {
        println!("Reviews:");
        for review in view.reviews() {
            println!("  {}", output::review_line(review));
        }
    }
    Ok(())
}
