//! View state
//!
//! One struct per screen. Each view owns its task slots and a
//! `CancellationToken`; dropping or tearing down the view cancels anything
//! still in flight.

pub mod bookings;
pub mod catalog;
pub mod dashboard;
pub mod detail;
pub mod fleet;
pub mod profile;

pub use bookings::{AdminScope, BookingBoard, BookingTab, CustomerScope, StatusScope};
pub use catalog::{CatalogView, HomeView};
pub use dashboard::{AdminDashboard, AdminStats, CustomerDashboard, PopularVehicle, UserDirectory};
pub use detail::DetailView;
pub use fleet::FleetManager;
pub use profile::{ProfileEditor, ProfileField};

/// Navigation target handed back to the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Catalog,
    CarDetail(String),
    Booking(String),
    MyBookings,
}
