//! Booking lists with status changes
//!
//! One [`BookingBoard`] serves both roles. The [`StatusScope`] decides which
//! transitions are offered and which endpoint performs them: customers may
//! only cancel their own active bookings, administrators may confirm,
//! complete or cancel any booking. Local state changes only after the API
//! acknowledges the change.

use crate::task::{TaskSlot, guarded};
use crate::{ClientResult, RentalApi};
use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{Booking, BookingStatus};
use shared::request::BookingListQuery;
use tokio_util::sync::CancellationToken;

pub const MSG_LOAD_BOOKINGS_FAILED: &str = "Failed to load bookings";
pub const MSG_CANCEL_FAILED: &str = "Failed to cancel booking";
pub const MSG_STATUS_FAILED: &str = "Failed to update booking status";

/// List filter tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingTab {
    All,
    /// Pending or confirmed
    Active,
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingTab {
    pub fn matches(&self, status: BookingStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status.is_active(),
            Self::Pending => status == BookingStatus::Pending,
            Self::Confirmed => status == BookingStatus::Confirmed,
            Self::Completed => status == BookingStatus::Completed,
            Self::Cancelled => status == BookingStatus::Cancelled,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Role-specific half of the status contract
#[async_trait]
pub trait StatusScope: Send + Sync {
    fn tabs(&self) -> &'static [BookingTab];

    /// Targets this role may request from `current`
    fn allowed(&self, current: BookingStatus) -> &'static [BookingStatus];

    fn update_failed(&self) -> &'static str;

    fn update_succeeded(&self, target: BookingStatus) -> String;

    async fn fetch<A>(&self, api: &A) -> ClientResult<Vec<Booking>>
    where
        A: RentalApi + ?Sized;

    async fn send<A>(&self, api: &A, id: &str, target: BookingStatus) -> ClientResult<()>
    where
        A: RentalApi + ?Sized;
}

/// The signed-in customer's bookings (`/bookings/user`)
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerScope;

/// Every booking (`/admin/bookings`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminScope;

#[async_trait]
impl StatusScope for CustomerScope {
    fn tabs(&self) -> &'static [BookingTab] {
        &[
            BookingTab::All,
            BookingTab::Active,
            BookingTab::Completed,
            BookingTab::Cancelled,
        ]
    }

    fn allowed(&self, current: BookingStatus) -> &'static [BookingStatus] {
        if current.is_active() {
            &[BookingStatus::Cancelled]
        } else {
            &[]
        }
    }

    fn update_failed(&self) -> &'static str {
        MSG_CANCEL_FAILED
    }

    fn update_succeeded(&self, _target: BookingStatus) -> String {
        "Booking cancelled successfully".to_string()
    }

    async fn fetch<A>(&self, api: &A) -> ClientResult<Vec<Booking>>
    where
        A: RentalApi + ?Sized,
    {
        api.my_bookings(BookingListQuery::default()).await
    }

    async fn send<A>(&self, api: &A, id: &str, _target: BookingStatus) -> ClientResult<()>
    where
        A: RentalApi + ?Sized,
    {
        api.cancel_booking(id).await
    }
}

#[async_trait]
impl StatusScope for AdminScope {
    fn tabs(&self) -> &'static [BookingTab] {
        &[
            BookingTab::All,
            BookingTab::Pending,
            BookingTab::Confirmed,
            BookingTab::Completed,
            BookingTab::Cancelled,
        ]
    }

    fn allowed(&self, current: BookingStatus) -> &'static [BookingStatus] {
        current.next_statuses()
    }

    fn update_failed(&self) -> &'static str {
        MSG_STATUS_FAILED
    }

    fn update_succeeded(&self, target: BookingStatus) -> String {
        format!("Booking status updated to {}", target)
    }

    async fn fetch<A>(&self, api: &A) -> ClientResult<Vec<Booking>>
    where
        A: RentalApi + ?Sized,
    {
        api.admin_bookings().await
    }

    async fn send<A>(&self, api: &A, id: &str, target: BookingStatus) -> ClientResult<()>
    where
        A: RentalApi + ?Sized,
    {
        api.set_booking_status(id, target).await
    }
}

#[derive(Debug)]
pub struct BookingBoard<S> {
    scope: S,
    bookings: TaskSlot<Vec<Booking>>,
    tab: BookingTab,
    updating: Option<String>,
    error: Option<String>,
    notice: Option<String>,
    cancel: CancellationToken,
}

impl BookingBoard<CustomerScope> {
    pub fn customer() -> Self {
        Self::new(CustomerScope)
    }

    pub async fn cancel<A>(&mut self, api: &A, id: &str) -> ClientResult<()>
    where
        A: RentalApi + ?Sized,
    {
        self.change_status(api, id, BookingStatus::Cancelled).await
    }
}

impl BookingBoard<AdminScope> {
    pub fn admin() -> Self {
        Self::new(AdminScope)
    }
}

impl<S: StatusScope> BookingBoard<S> {
    pub fn new(scope: S) -> Self {
        Self {
            scope,
            bookings: TaskSlot::new(),
            tab: BookingTab::All,
            updating: None,
            error: None,
            notice: None,
            cancel: CancellationToken::new(),
        }
    }

    pub async fn load<A>(&mut self, api: &A)
    where
        A: RentalApi + ?Sized,
    {
        let ticket = self.bookings.begin();
        let result = guarded(&self.cancel, self.scope.fetch(api)).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Error fetching bookings");
        }
        self.bookings.finish_with(ticket, result, MSG_LOAD_BOOKINGS_FAILED);
    }

    pub fn tabs(&self) -> &'static [BookingTab] {
        self.scope.tabs()
    }

    pub fn tab(&self) -> BookingTab {
        self.tab
    }

    /// Switch tabs; tabs this role does not offer are ignored
    pub fn set_tab(&mut self, tab: BookingTab) -> bool {
        if self.scope.tabs().contains(&tab) {
            self.tab = tab;
            true
        } else {
            false
        }
    }

    pub fn all(&self) -> &[Booking] {
        self.bookings.value().map(Vec::as_slice).unwrap_or_default()
    }

    /// Bookings on the current tab
    pub fn visible(&self) -> Vec<&Booking> {
        self.all().iter().filter(|b| self.tab.matches(b.status)).collect()
    }

    pub fn count(&self, tab: BookingTab) -> usize {
        self.all().iter().filter(|b| tab.matches(b.status)).count()
    }

    pub fn get(&self, id: &str) -> Option<&Booking> {
        self.all().iter().find(|b| b.id == id)
    }

    /// Status changes offered for a booking
    pub fn actions(&self, booking: &Booking) -> &'static [BookingStatus] {
        self.scope.allowed(booking.status)
    }

    pub fn is_loading(&self) -> bool {
        self.bookings.is_loading()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.bookings.error()
    }

    /// Last status-change error
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last status-change confirmation
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Id of the booking whose change is in flight
    pub fn updating(&self) -> Option<&str> {
        self.updating.as_deref()
    }

    /// Request `target` for booking `id`. The list changes only on success.
    pub async fn change_status<A>(&mut self, api: &A, id: &str, target: BookingStatus) -> ClientResult<()>
    where
        A: RentalApi + ?Sized,
    {
        let Some(current) = self.get(id).map(|b| b.status) else {
            return Err(AppError::new(ErrorCode::BookingNotFound).with_detail("id", id).into());
        };
        current.validate_transition(target)?;
        if !self.scope.allowed(current).contains(&target) {
            return Err(AppError::new(ErrorCode::PermissionDenied).into());
        }

        self.updating = Some(id.to_string());
        self.error = None;
        self.notice = None;
        let result = guarded(&self.cancel, self.scope.send(api, id, target)).await;
        self.updating = None;

        match result {
            Ok(()) => {
                if let Some(booking) = self
                    .bookings
                    .value_mut()
                    .and_then(|list| list.iter_mut().find(|b| b.id == id))
                {
                    booking.status = target;
                }
                self.notice = Some(self.scope.update_succeeded(target));
                tracing::info!(booking_id = id, from = %current, to = %target, "Booking status updated");
                Ok(())
            }
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::warn!(booking_id = id, error = %e, "Error updating booking status");
                    self.error = Some(e.user_message(self.scope.update_failed()));
                }
                Err(e)
            }
        }
    }

    /// Token another task can cancel to tear the view down mid-request
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.bookings.invalidate();
    }
}

impl<S> Drop for BookingBoard<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
