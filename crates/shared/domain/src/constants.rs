//! Names shared between slices: `OpenAPI` tags and table names.

pub const SYSTEM_TAG: &str = "System";
pub const IDENTITY_TAG: &str = "Identity";
pub const CUSTOMERS_TAG: &str = "Customers";
pub const VEHICLES_TAG: &str = "Vehicles";
pub const SERVICE_REQUESTS_TAG: &str = "Service Requests";
pub const INVENTORY_TAG: &str = "Inventory";
pub const SERVICE_JOBS_TAG: &str = "Service Jobs";
pub const JOB_PARTS_TAG: &str = "Job Parts";
pub const BILLING_TAG: &str = "Billing";
pub const EMPLOYEES_TAG: &str = "Employees";
pub const DASHBOARD_TAG: &str = "Dashboard";

pub const USERS: &str = "users";
pub const CUSTOMERS: &str = "customers";
pub const VEHICLES: &str = "vehicles";
pub const SERVICE_REQUESTS: &str = "service_requests";
pub const EMPLOYEES: &str = "employees";
pub const INVENTORY: &str = "inventory";
pub const SERVICE_JOBS: &str = "service_jobs";
pub const JOB_PARTS_USED: &str = "job_parts_used";
pub const BILLING: &str = "billing";

/// Name of the bearer scheme in the generated `OpenAPI` document.
pub const BEARER_SCHEME: &str = "bearer";
