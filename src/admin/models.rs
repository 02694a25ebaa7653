// src/admin/models.rs

use serde::Serialize;
use std::collections::BTreeMap;

/// Counts shown on the admin dashboard
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_found_items: i64,
    pub found_items_at_office: i64,
    pub total_lost_items: i64,
    pub total_claims: i64,
    pub pending_claims: i64,
    pub total_users: i64,
    pub admin_users: i64,
    pub last_updated: String,

    // Breakdowns for charts
    pub found_items_by_status: BTreeMap<String, i64>,
    pub lost_items_by_status: BTreeMap<String, i64>,
    pub claims_by_status: BTreeMap<String, i64>,
}
