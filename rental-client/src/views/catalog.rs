//! Vehicle catalog and home page

use crate::task::{TaskSlot, guarded};
use crate::RentalApi;
use shared::client::CarListResponse;
use shared::models::Vehicle;
use shared::request::{CarQuery, SortOption};
use tokio_util::sync::CancellationToken;

pub const MSG_LOAD_CARS_FAILED: &str = "Failed to load cars";
pub const MSG_LOAD_FEATURED_FAILED: &str = "Failed to load featured cars";

/// Filter choices offered by the catalog
pub const CAR_TYPES: [&str; 6] = ["Sedan", "SUV", "Hatchback", "Convertible", "Luxury", "Van"];
pub const CAR_MAKES: [&str; 8] = [
    "Toyota",
    "Honda",
    "Ford",
    "BMW",
    "Mercedes",
    "Audi",
    "Nissan",
    "Chevrolet",
];
pub const TRANSMISSIONS: [&str; 2] = ["Automatic", "Manual"];

fn toggle(values: &mut Vec<String>, value: &str) {
    match values.iter().position(|v| v == value) {
        Some(i) => {
            values.remove(i);
        }
        None => values.push(value.to_string()),
    }
}

/// Catalog filter/sort state and the fetched page
#[derive(Debug)]
pub struct CatalogView {
    query: CarQuery,
    cars: TaskSlot<CarListResponse>,
    cancel: CancellationToken,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self {
            query: CarQuery {
                sort: Some(SortOption::Recommended),
                ..Default::default()
            },
            cars: TaskSlot::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Query that the next refresh will send
    pub fn query(&self) -> &CarQuery {
        &self.query
    }

    pub fn toggle_type(&mut self, value: &str) {
        toggle(&mut self.query.types, value);
    }

    pub fn toggle_make(&mut self, value: &str) {
        toggle(&mut self.query.makes, value);
    }

    pub fn toggle_transmission(&mut self, value: &str) {
        toggle(&mut self.query.transmissions, value);
    }

    pub fn set_price_range(&mut self, min: Option<f64>, max: Option<f64>) {
        self.query.min_price = min;
        self.query.max_price = max;
    }

    pub fn set_year_range(&mut self, min: Option<i32>, max: Option<i32>) {
        self.query.min_year = min;
        self.query.max_year = max;
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.query.location = location;
    }

    pub fn set_featured(&mut self, featured: Option<bool>) {
        self.query.featured = featured;
    }

    pub fn set_limit(&mut self, limit: Option<u32>) {
        self.query.limit = limit;
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.query.sort = Some(sort);
    }

    /// Drop every filter; the sort order is kept
    pub fn clear_filters(&mut self) {
        self.query = CarQuery {
            sort: self.query.sort,
            ..Default::default()
        };
    }

    pub fn has_filters(&self) -> bool {
        self.query != CarQuery {
            sort: self.query.sort,
            ..Default::default()
        }
    }

    pub async fn refresh<A>(&mut self, api: &A)
    where
        A: RentalApi + ?Sized,
    {
        let ticket = self.cars.begin();
        let result = guarded(&self.cancel, api.list_cars(&self.query)).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Error fetching cars");
        }
        self.cars.finish_with(ticket, result, MSG_LOAD_CARS_FAILED);
    }

    pub fn cars(&self) -> &[Vehicle] {
        self.cars.value().map(|r| r.cars.as_slice()).unwrap_or_default()
    }

    pub fn total(&self) -> u64 {
        self.cars.value().map(CarListResponse::total).unwrap_or(0)
    }

    pub fn is_loading(&self) -> bool {
        self.cars.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.cars.error()
    }

    /// Token another task can cancel to tear the view down mid-request
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.cars.invalidate();
    }
}

impl Drop for CatalogView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Home page: four featured vehicles
#[derive(Debug, Default)]
pub struct HomeView {
    featured: TaskSlot<Vec<Vehicle>>,
}

impl HomeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<A>(&mut self, api: &A)
    where
        A: RentalApi + ?Sized,
    {
        let ticket = self.featured.begin();
        let result = api.list_cars(&CarQuery::featured_home()).await.map(|r| r.cars);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Error fetching featured cars");
        }
        self.featured.finish_with(ticket, result, MSG_LOAD_FEATURED_FAILED);
    }

    pub fn featured(&self) -> &[Vehicle] {
        self.featured.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn error(&self) -> Option<&str> {
        self.featured.error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, vehicle};
    use std::time::Duration;

    #[test]
    fn test_toggle_filters() {
        let mut view = CatalogView::new();
        assert!(!view.has_filters());

        view.toggle_type("SUV");
        view.toggle_type("Sedan");
        view.toggle_make("BMW");
        view.toggle_type("SUV");
        assert_eq!(view.query().types, vec!["Sedan".to_string()]);
        assert!(view.has_filters());

        view.set_sort(SortOption::PriceDesc);
        view.set_price_range(Some(20.0), None);
        let pairs = view.query().to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("type", "Sedan".to_string()),
                ("make", "BMW".to_string()),
                ("minPrice", "20".to_string()),
                ("sortBy", "priceDesc".to_string()),
            ]
        );

        view.clear_filters();
        assert!(!view.has_filters());
        assert_eq!(view.query().sort, Some(SortOption::PriceDesc));
    }

    #[test]
    fn test_default_sends_recommended() {
        let view = CatalogView::new();
        assert_eq!(
            view.query().to_query_pairs(),
            vec![("sortBy", "recommended".to_string())]
        );
    }

    #[tokio::test]
    async fn test_refresh() {
        let api = FakeApi::new().with_cars(vec![
            vehicle("c1", "Toyota", "Camry", 50.0, 0.0),
            vehicle("c2", "Honda", "Civic", 40.0, 0.0),
        ]);
        let mut view = CatalogView::new();
        view.toggle_transmission("Manual");
        view.refresh(&api).await;

        assert_eq!(view.cars().len(), 2);
        assert_eq!(view.total(), 2);
        assert!(view.error().is_none());
        assert_eq!(api.car_queries()[0].transmissions, vec!["Manual".to_string()]);

        api.fail("list_cars", None);
        view.refresh(&api).await;
        assert_eq!(view.error(), Some(MSG_LOAD_CARS_FAILED));
        assert!(view.cars().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_cancels() {
        let api = FakeApi::new().with_cars(vec![vehicle("c1", "Toyota", "Camry", 50.0, 0.0)]);
        let mut view = CatalogView::new();
        view.teardown();
        view.refresh(&api).await;
        assert!(view.cars().is_empty());
        assert!(view.error().is_none());
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_cancel_mid_request() {
        let api = FakeApi::new().with_cars(vec![vehicle("c1", "Toyota", "Camry", 50.0, 0.0)]);
        api.delay("list_cars", Duration::from_secs(5));
        let mut view = CatalogView::new();
        let handle = view.cancel_handle();

        let cancel = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
        };
        tokio::join!(view.refresh(&api), cancel);

        assert!(view.cars().is_empty());
        assert!(view.error().is_none());
        assert!(!view.is_loading());
        assert_eq!(api.calls("list_cars"), 0);
    }

    #[tokio::test]
    async fn test_home_featured() {
        let mut featured = vehicle("c1", "Tesla", "Model 3", 90.0, 0.0);
        featured.featured = true;
        let api = FakeApi::new().with_cars(vec![featured, vehicle("c2", "Kia", "Rio", 25.0, 0.0)]);
        let mut home = HomeView::new();
        home.load(&api).await;

        assert_eq!(home.featured().len(), 1);
        assert_eq!(api.car_queries()[0], CarQuery::featured_home());
    }
}
