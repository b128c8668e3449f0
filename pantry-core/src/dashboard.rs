//! Pantry summary figures for the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::expiry::{days_until_expiry, ExpiryStatus, DEFAULT_LOW_STOCK_THRESHOLD};
use crate::types::PantryItem;

/// Number of entries shown on the expiry timeline.
pub const TIMELINE_LENGTH: usize = 8;

/// Number of recently added items shown on the dashboard.
pub const RECENT_ITEMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_items: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub low_stock: usize,
    /// Sum of item prices; items without a price count as zero.
    pub total_value: f64,
}

impl DashboardStats {
    pub fn compute(items: &[PantryItem], now: DateTime<Utc>) -> Self {
        let mut stats = DashboardStats {
            total_items: items.len(),
            expiring_soon: 0,
            expired: 0,
            low_stock: 0,
            total_value: 0.0,
        };

        for item in items {
            match ExpiryStatus::of(item.expiry_date, now) {
                ExpiryStatus::Expired => stats.expired += 1,
                ExpiryStatus::ExpiringSoon => stats.expiring_soon += 1,
                ExpiryStatus::Fresh | ExpiryStatus::NoExpiry => {}
            }
            if item.quantity <= DEFAULT_LOW_STOCK_THRESHOLD {
                stats.low_stock += 1;
            }
            stats.total_value += item.price.unwrap_or(0.0);
        }

        stats
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimelineEntry {
    pub item_id: Uuid,
    pub name: String,
    pub expiry_date: DateTime<Utc>,
    pub days_until_expiry: i64,
    pub status: ExpiryStatus,
}

/// Items with an expiry date, soonest first, capped at `limit`.
pub fn expiry_timeline(items: &[PantryItem], now: DateTime<Utc>, limit: usize) -> Vec<TimelineEntry> {
    let mut dated: Vec<(&PantryItem, DateTime<Utc>)> = items
        .iter()
        .filter_map(|item| item.expiry_date.map(|d| (item, d)))
        .collect();
    dated.sort_by_key(|(_, expiry)| *expiry);

    dated
        .into_iter()
        .take(limit)
        .map(|(item, expiry)| TimelineEntry {
            item_id: item.id,
            name: item.name.clone(),
            expiry_date: expiry,
            days_until_expiry: days_until_expiry(expiry, now),
            status: ExpiryStatus::of(Some(expiry), now),
        })
        .collect()
}

/// Most recently added items first, capped at `limit`.
pub fn recent_items(items: &[PantryItem], limit: usize) -> Vec<PantryItem> {
    let mut recent: Vec<&PantryItem> = items.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.into_iter().take(limit).cloned().collect()
}
