use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use rental_client::views::DetailView;
use rental_client::FormAction;
use shared::models::{AddOnService, PaymentMethod};

use super::{Session, day_start, ensure_loaded, parse_assignment};
use crate::output;

#[derive(Debug, Args)]
pub(crate) struct BookArgs {
    /// Vehicle id
    id: String,

    /// Pick-up day (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Return day (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,

    /// Form field as path=value, e.g. phone=555-0100 or pickupLocation.city=Austin
    #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
    fields: Vec<(String, String)>,

    /// Add-on service by id or name (insurance, childSeat, gps, additionalDriver)
    #[arg(long = "add-on", value_name = "SERVICE")]
    add_ons: Vec<String>,

    /// credit_card, debit_card or paypal
    #[arg(long, default_value = "credit_card")]
    payment: PaymentMethod,

    #[arg(long)]
    special_requests: Option<String>,
}

impl BookArgs {
    /// Form edits in the order they are applied
    fn actions(&self) -> anyhow::Result<Vec<FormAction>> {
        let mut actions = Vec::new();
        for (path, value) in &self.fields {
            actions.push(FormAction::from_path(path, value.clone())?);
        }
        for key in &self.add_ons {
            let service = AddOnService::find(key).with_context(|| format!("unknown add-on service: {key}"))?;
            actions.push(FormAction::ToggleAddOn(service, true));
        }
        actions.push(FormAction::PaymentMethod(self.payment));
        if let Some(requests) = &self.special_requests {
            actions.push(FormAction::SpecialRequests(requests.clone()));
        }
        Ok(actions)
    }
}

pub(crate) async fn run(session: &Session, args: BookArgs) -> anyhow::Result<()> {
    let actions = args.actions()?;

    let mut detail = DetailView::new(&args.id);
    detail.load(&session.api).await;
    ensure_loaded(detail.error())?;

    detail.set_dates(Some(day_start(args.start)), Some(day_start(args.end)));
    if !detail.check_availability(&session.api).await? {
        anyhow::bail!("{} is not available for these dates", args.id);
    }

    let mut flow = detail.begin_booking()?;
    flow.load(&session.api, session.signed_in).await;
    ensure_loaded(flow.load_error())?;

    for action in actions {
        flow.dispatch(action);
    }
    flow.next()?;

    let summary = flow.submit(&session.api).await?;
    println!("Booking {} confirmed", summary.booking_id);
    println!("{}  {}", summary.vehicle_name, output::range(summary.start, summary.end));
    println!("Payment: {}", summary.payment_method.label());
    for line in output::quote_lines(&summary.quote) {
        println!("{}", line);
    }
    Ok(())
}
