//! Customer and admin dashboards, admin user directory

use crate::task::{TaskSlot, guarded};
use crate::RentalApi;
use shared::models::{Booking, BookingStatus, Profile, Vehicle};
use shared::pricing::sum_amounts;
use shared::request::BookingListQuery;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

pub const MSG_LOAD_USER_DATA_FAILED: &str = "Failed to load user data";
pub const MSG_LOAD_DASHBOARD_FAILED: &str = "Failed to load dashboard data";
pub const MSG_LOAD_USERS_FAILED: &str = "Failed to load users";

const POPULAR_LIMIT: usize = 4;
const RECENT_LIMIT: usize = 5;

/// Profile and the three latest bookings
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerOverview {
    pub profile: Profile,
    pub recent: Vec<Booking>,
}

impl CustomerOverview {
    pub fn total_bookings(&self) -> usize {
        self.profile.bookings.len()
    }

    /// Confirmed bookings among the recent ones
    pub fn upcoming(&self) -> usize {
        self.recent
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .count()
    }
}

#[derive(Debug, Default)]
pub struct CustomerDashboard {
    data: TaskSlot<CustomerOverview>,
    cancel: CancellationToken,
}

impl CustomerDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<A>(&mut self, api: &A)
    where
        A: RentalApi + ?Sized,
    {
        let ticket = self.data.begin();
        let (profile, recent) = tokio::join!(
            guarded(&self.cancel, api.get_profile()),
            guarded(&self.cancel, api.my_bookings(BookingListQuery::recent())),
        );
        let result = match (profile, recent) {
            (Ok(profile), Ok(recent)) => Ok(CustomerOverview { profile, recent }),
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Error fetching user data");
        }
        self.data.finish_with(ticket, result, MSG_LOAD_USER_DATA_FAILED);
    }

    pub fn overview(&self) -> Option<&CustomerOverview> {
        self.data.value()
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.data.error()
    }

    /// Token another task can cancel to tear the view down mid-request
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.data.invalidate();
    }
}

impl Drop for CustomerDashboard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// A vehicle ranked by how often it was booked
#[derive(Debug, Clone, PartialEq)]
pub struct PopularVehicle {
    pub car_id: String,
    pub name: String,
    pub image: Option<String>,
    pub bookings: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminStats {
    pub total_users: usize,
    pub total_cars: usize,
    pub total_bookings: usize,
    /// Pending plus confirmed
    pub active_bookings: usize,
    /// Confirmed plus completed totals
    pub revenue: f64,
    pub popular: Vec<PopularVehicle>,
    pub recent: Vec<Booking>,
}

impl AdminStats {
    pub fn compute(cars: &[Vehicle], bookings: &[Booking], users: &[Profile]) -> Self {
        let active_bookings = bookings.iter().filter(|b| b.status.is_active()).count();
        let revenue = sum_amounts(
            bookings
                .iter()
                .filter(|b| matches!(b.status, BookingStatus::Confirmed | BookingStatus::Completed))
                .map(|b| b.total_price),
        );

        Self {
            total_users: users.len(),
            total_cars: cars.len(),
            total_bookings: bookings.len(),
            active_bookings,
            revenue,
            popular: popular_vehicles(cars, bookings),
            recent: recent_bookings(bookings),
        }
    }
}

fn popular_vehicles(cars: &[Vehicle], bookings: &[Booking]) -> Vec<PopularVehicle> {
    // First-seen order breaks ties
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for booking in bookings {
        let id = booking.car.id();
        match index.get(id) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(id, counts.len());
                counts.push((id, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(POPULAR_LIMIT)
        .map(|(id, bookings_count)| {
            let vehicle = cars.iter().find(|c| c.id == id).or_else(|| {
                bookings
                    .iter()
                    .find_map(|b| b.car.vehicle().filter(|v| v.id == id))
            });
            PopularVehicle {
                car_id: id.to_string(),
                name: vehicle.map(Vehicle::display_name).unwrap_or_else(|| id.to_string()),
                image: vehicle.and_then(Vehicle::cover_image).map(str::to_string),
                bookings: bookings_count,
            }
        })
        .collect()
}

fn recent_bookings(bookings: &[Booking]) -> Vec<Booking> {
    let mut recent: Vec<&Booking> = bookings.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.into_iter().take(RECENT_LIMIT).cloned().collect()
}

#[derive(Debug, Default)]
pub struct AdminDashboard {
    stats: TaskSlot<AdminStats>,
    cancel: CancellationToken,
}

impl AdminDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch cars, bookings and users concurrently; any failure fails the whole
    pub async fn load<A>(&mut self, api: &A)
    where
        A: RentalApi + ?Sized,
    {
        let ticket = self.stats.begin();
        let (cars, bookings, users) = tokio::join!(
            guarded(&self.cancel, api.admin_cars()),
            guarded(&self.cancel, api.admin_bookings()),
            guarded(&self.cancel, api.admin_users()),
        );
        let result = match (cars, bookings, users) {
            (Ok(cars), Ok(bookings), Ok(users)) => Ok(AdminStats::compute(&cars, &bookings, &users)),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => Err(e),
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Error fetching dashboard data");
        }
        self.stats.finish_with(ticket, result, MSG_LOAD_DASHBOARD_FAILED);
    }

    pub fn stats(&self) -> Option<&AdminStats> {
        self.stats.value()
    }

    pub fn is_loading(&self) -> bool {
        self.stats.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.stats.error()
    }

    /// Token another task can cancel to tear the view down mid-request
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.stats.invalidate();
    }
}

impl Drop for AdminDashboard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Admin user list with search
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: TaskSlot<Vec<Profile>>,
    search: String,
    cancel: CancellationToken,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<A>(&mut self, api: &A)
    where
        A: RentalApi + ?Sized,
    {
        let ticket = self.users.begin();
        let result = guarded(&self.cancel, api.admin_users()).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Error fetching users");
        }
        self.users.finish_with(ticket, result, MSG_LOAD_USERS_FAILED);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Users whose name or email contains the search text, ignoring case
    pub fn visible(&self) -> Vec<&Profile> {
        self.users
            .value()
            .map(|users| users.iter().filter(|u| u.matches(&self.search)).collect())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.users.value().map(Vec::len).unwrap_or(0)
    }

    pub fn is_loading(&self) -> bool {
        self.users.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.users.error()
    }

    /// Token another task can cancel to tear the view down mid-request
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.users.invalidate();
    }
}

impl Drop for UserDirectory {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, booking, profile, vehicle};

    fn fleet() -> Vec<Vehicle> {
        vec![
            vehicle("c1", "Toyota", "Camry", 50.0, 0.0),
            vehicle("c2", "Honda", "Accord", 55.0, 0.0),
            vehicle("c3", "BMW", "X5", 120.0, 0.0),
            vehicle("c4", "Tesla", "Model 3", 90.0, 0.0),
            vehicle("c5", "Audi", "A4", 80.0, 0.0),
        ]
    }

    fn history(cars: &[Vehicle]) -> Vec<Booking> {
        use BookingStatus::*;
        let plan = [
            ("b1", 2, Pending, 165.0),
            ("b2", 2, Confirmed, 220.5),
            ("b3", 0, Completed, 150.0),
            ("b4", 2, Cancelled, 110.0),
            ("b5", 1, Completed, 99.5),
            ("b6", 0, Confirmed, 100.0),
            ("b7", 3, Pending, 270.0),
            ("b8", 4, Cancelled, 80.0),
        ];
        plan.iter()
            .enumerate()
            .map(|(i, (id, car, status, total))| {
                booking(id, cars[*car].clone(), *status, *total, i as u32 + 1)
            })
            .collect()
    }

    #[test]
    fn test_admin_stats() {
        let cars = fleet();
        let bookings = history(&cars);
        let users = vec![profile("u1", "Ada", "Lovelace", "ada@example.com")];
        let stats = AdminStats::compute(&cars, &bookings, &users);

        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_cars, 5);
        assert_eq!(stats.total_bookings, 8);
        assert_eq!(stats.active_bookings, 4);
        assert_eq!(stats.revenue, 570.0);

        let popular: Vec<(&str, usize)> = stats
            .popular
            .iter()
            .map(|p| (p.car_id.as_str(), p.bookings))
            .collect();
        assert_eq!(popular, vec![("c3", 3), ("c1", 2), ("c2", 1), ("c4", 1)]);
        assert_eq!(stats.popular[0].name, "BMW X5");

        let recent: Vec<&str> = stats.recent.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(recent, vec!["b8", "b7", "b6", "b5", "b4"]);
    }

    #[tokio::test]
    async fn test_admin_dashboard_load() {
        let cars = fleet();
        let api = FakeApi::new()
            .with_admin_bookings(history(&cars))
            .with_cars(cars)
            .with_users(vec![profile("u1", "Ada", "Lovelace", "ada@example.com")]);
        let mut dashboard = AdminDashboard::new();
        dashboard.load(&api).await;
        assert_eq!(dashboard.stats().unwrap().total_bookings, 8);

        api.fail("admin_users", None);
        dashboard.load(&api).await;
        assert_eq!(dashboard.error(), Some(MSG_LOAD_DASHBOARD_FAILED));
        assert!(dashboard.stats().is_none());
        assert_eq!(api.calls("admin_cars"), 2);
    }

    #[tokio::test]
    async fn test_customer_dashboard() {
        let cars = fleet();
        let mut me = profile("u1", "Ada", "Lovelace", "ada@example.com");
        me.bookings = vec!["b1".into(), "b2".into(), "b3".into(), "b4".into()];
        let api = FakeApi::new().with_profile(me).with_bookings(history(&cars));
        let mut dashboard = CustomerDashboard::new();
        dashboard.load(&api).await;

        let overview = dashboard.overview().unwrap();
        assert_eq!(overview.recent.len(), 3);
        assert_eq!(overview.total_bookings(), 4);
        assert_eq!(overview.upcoming(), 1);
        assert_eq!(api.booking_queries(), vec![BookingListQuery::recent()]);

        api.fail("my_bookings", None);
        dashboard.load(&api).await;
        assert_eq!(dashboard.error(), Some(MSG_LOAD_USER_DATA_FAILED));
    }

    #[tokio::test]
    async fn test_user_search() {
        let api = FakeApi::new().with_users(vec![
            profile("u1", "Ada", "Lovelace", "ada@example.com"),
            profile("u2", "Grace", "Hopper", "grace@navy.mil"),
        ]);
        let mut directory = UserDirectory::new();
        directory.load(&api).await;
        assert_eq!(directory.visible().len(), 2);

        directory.set_search("HOPPER");
        let names: Vec<String> = directory.visible().iter().map(|u| u.full_name()).collect();
        assert_eq!(names, vec!["Grace Hopper".to_string()]);

        directory.set_search("example.com");
        assert_eq!(directory.visible()[0].id, "u1");
        assert_eq!(directory.total(), 2);
    }
}
