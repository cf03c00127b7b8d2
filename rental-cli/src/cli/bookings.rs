use clap::{Args, Subcommand};
use rental_client::views::{BookingBoard, BookingTab, StatusScope};

use super::{Session, ensure_loaded, parse_tab};
use crate::output;

#[derive(Debug, Args)]
pub(crate) struct BookingsCommand {
    #[command(subcommand)]
    action: Option<BookingsAction>,

    /// all, active, completed or cancelled
    #[arg(long, default_value = "all", value_parser = parse_tab)]
    tab: BookingTab,
}

#[derive(Debug, Subcommand)]
enum BookingsAction {
    /// Cancel an active booking
    Cancel {
        /// Booking id
        id: String,
    },
}

pub(crate) async fn run(session: &Session, command: BookingsCommand) -> anyhow::Result<()> {
    let mut board = BookingBoard::customer();
    board.load(&session.api).await;
    ensure_loaded(board.load_error())?;

    match command.action {
        Some(BookingsAction::Cancel { id }) => {
            board.cancel(&session.api, &id).await?;
            if let Some(notice) = board.notice() {
                println!("{}", notice);
            }
            Ok(())
        }
        None => print_board(&mut board, command.tab),
    }
}

/// Tab counts followed by the bookings on `tab`
pub(crate) fn print_board<S: StatusScope>(board: &mut BookingBoard<S>, tab: BookingTab) -> anyhow::Result<()> {
    if !board.set_tab(tab) {
        anyhow::bail!("the {} tab is not available here", tab.label());
    }
    let counts = board
        .tabs()
        .iter()
        .map(|t| format!("{} ({})", t.label(), board.count(*t)))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", counts);

    let visible = board.visible();
    if visible.is_empty() {
        println!("No bookings");
    }
    for booking in visible {
        let actions = board
            .actions(booking)
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>();
        match actions.is_empty() {
            true => println!("{}", output::booking_line(booking)),
            false => println!("{}  [{}]", output::booking_line(booking), actions.join("|")),
        }
    }
    Ok(())
}
