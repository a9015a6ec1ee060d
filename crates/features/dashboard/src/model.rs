use autoims_customers::Customer;
use autoims_identity::User;
use autoims_inventory::InventoryItem;
use autoims_kernel::prelude::api_model;
use autoims_requests::ServiceRequestDetails;
use autoims_vehicles::VehicleDetails;
use autoims_workshop::billing::model::BillDetails;
use autoims_workshop::jobs::model::JobDetails;

/// Counters and money totals shown on the dashboard.
///
/// All zero when the figures cannot be read.
#[api_model(response)]
#[derive(Default, Clone, PartialEq)]
pub struct DashboardStats {
    pub customers_count: i64,
    pub vehicles_count: i64,
    /// Requests still "Pending"
    pub pending_requests: i64,
    /// Jobs "In Progress"
    pub active_jobs: i64,
    /// Items at or below their reorder level
    pub low_stock_items: i64,
    pub unpaid_total: f64,
    pub total_revenue: f64,
}

#[api_model(response)]
pub struct DashboardOverview {
    pub message: &'static str,
    pub user: User,
    pub stats: DashboardStats,
}

#[api_model(response)]
pub struct CustomersView {
    pub message: &'static str,
    pub customers: Vec<Customer>,
}

#[api_model(response)]
pub struct VehiclesView {
    pub message: &'static str,
    pub vehicles: Vec<VehicleDetails>,
}

#[api_model(response)]
pub struct RequestsView {
    pub message: &'static str,
    pub service_requests: Vec<ServiceRequestDetails>,
}

#[api_model(response)]
pub struct JobsView {
    pub message: &'static str,
    pub service_jobs: Vec<JobDetails>,
}

#[api_model(response)]
pub struct InventoryView {
    pub message: &'static str,
    pub inventory: Vec<InventoryItem>,
}

#[api_model(response)]
pub struct BillingView {
    pub message: &'static str,
    pub billing: Vec<BillDetails>,
}
