//! Expiry status and the rules for raising expiry and low-stock alerts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::{AlertPriority, AlertType, PantryItem};

/// Items expiring within this many days count as "expiring soon".
pub const EXPIRING_SOON_DAYS: i64 = 3;

/// Quantity at or below which an item is low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 1.0;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days until `expiry`, rounded up. Negative once a full day has passed.
pub fn days_until_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expiry - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    Fresh,
    NoExpiry,
}

impl ExpiryStatus {
    pub fn of(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(expiry) = expiry else {
            return ExpiryStatus::NoExpiry;
        };
        match days_until_expiry(expiry, now) {
            d if d < 0 => ExpiryStatus::Expired,
            d if d <= EXPIRING_SOON_DAYS => ExpiryStatus::ExpiringSoon,
            _ => ExpiryStatus::Fresh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "expired",
            ExpiryStatus::ExpiringSoon => "expiring-soon",
            ExpiryStatus::Fresh => "fresh",
            ExpiryStatus::NoExpiry => "none",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "expired" => Some(ExpiryStatus::Expired),
            "expiring-soon" => Some(ExpiryStatus::ExpiringSoon),
            "fresh" => Some(ExpiryStatus::Fresh),
            "none" => Some(ExpiryStatus::NoExpiry),
            _ => None,
        }
    }
}

/// When an expiry alert fires and how long it suppresses repeats.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryRule {
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    /// Items expiring between now and now + horizon qualify.
    pub horizon: Duration,
    /// An alert of the same type for the same item within this window blocks a new one.
    pub dedupe_window: Duration,
}

pub fn expiry_rules() -> [ExpiryRule; 2] {
    [
        ExpiryRule {
            alert_type: AlertType::ExpiryWarning,
            priority: AlertPriority::Medium,
            horizon: Duration::days(3),
            dedupe_window: Duration::hours(24),
        },
        ExpiryRule {
            alert_type: AlertType::ExpiryUrgent,
            priority: AlertPriority::High,
            horizon: Duration::days(1),
            dedupe_window: Duration::hours(12),
        },
    ]
}

/// An alert that already exists, as needed for deduplication.
#[derive(Debug, Clone)]
pub struct ExistingAlert {
    pub item_id: Uuid,
    pub alert_type: AlertType,
    pub created_at: DateTime<Utc>,
}

/// An alert to be stored for a user.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AlertDraft {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub title: String,
    pub message: String,
}

fn expiry_draft(item: &PantryItem, rule: &ExpiryRule, now: DateTime<Utc>) -> Option<AlertDraft> {
    let expiry = item.expiry_date?;
    let days = days_until_expiry(expiry, now);

    let (title, message) = match rule.alert_type {
        AlertType::ExpiryUrgent => (
            format!("{} expires tomorrow!", item.name),
            format!(
                "Your {} expires tomorrow. Use it soon or consider adding it to a recipe!",
                item.name
            ),
        ),
        _ => (
            format!("{} expires in {}", item.name, plural_days(days)),
            format!(
                "Your {} expires in {}. Plan to use it soon.",
                item.name,
                plural_days(days)
            ),
        ),
    };

    Some(AlertDraft {
        user_id: item.user_id,
        item_id: item.id,
        alert_type: rule.alert_type,
        priority: rule.priority,
        title,
        message,
    })
}

fn plural_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Result of one pass over the pantry.
#[derive(Debug, Clone, Default)]
pub struct ExpiryScan {
    /// Items inside a rule's horizon, counted once per rule.
    pub processed: usize,
    pub alerts: Vec<AlertDraft>,
}

/// Decide which expiry alerts to raise at `now`.
///
/// Every rule is checked independently, so an item expiring within a day can
/// get both a warning and an urgent alert. `recent` should hold alerts created
/// within the longest dedupe window.
pub fn plan_expiry_alerts(
    items: &[PantryItem],
    recent: &[ExistingAlert],
    now: DateTime<Utc>,
) -> ExpiryScan {
    let mut scan = ExpiryScan::default();

    for rule in expiry_rules() {
        let cutoff = now - rule.dedupe_window;
        let blocked: HashSet<Uuid> = recent
            .iter()
            .filter(|a| a.alert_type == rule.alert_type && a.created_at >= cutoff)
            .map(|a| a.item_id)
            .collect();

        for item in items {
            let Some(expiry) = item.expiry_date else {
                continue;
            };
            if expiry < now || expiry > now + rule.horizon {
                continue;
            }
            scan.processed += 1;
            if blocked.contains(&item.id) {
                continue;
            }
            if let Some(draft) = expiry_draft(item, &rule, now) {
                scan.alerts.push(draft);
            }
        }
    }

    scan
}

/// A low-stock alert for `item`, or `None` if it is above `threshold`.
pub fn low_stock_alert(item: &PantryItem, threshold: f64) -> Option<AlertDraft> {
    if item.quantity > threshold {
        return None;
    }
    Some(AlertDraft {
        user_id: item.user_id,
        item_id: item.id,
        alert_type: AlertType::LowStock,
        priority: AlertPriority::Medium,
        title: format!("Low stock: {}", item.name),
        message: format!(
            "You're running low on {}. Consider adding it to your shopping list.",
            item.name
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn item(name: &str, expiry: Option<DateTime<Utc>>) -> PantryItem {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "category": "DAIRY",
            "quantity": 2.0,
            "expiry_date": expiry,
        }))
        .unwrap()
    }

    #[test]
    fn test_days_until_expiry_rounds_up() {
        assert_eq!(days_until_expiry(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_until_expiry(now() + Duration::hours(24), now()), 1);
        assert_eq!(days_until_expiry(now() + Duration::hours(25), now()), 2);
        assert_eq!(days_until_expiry(now(), now()), 0);
        assert_eq!(days_until_expiry(now() - Duration::hours(1), now()), 0);
        assert_eq!(days_until_expiry(now() - Duration::hours(36), now()), -1);
    }

    #[test]
    fn test_expiry_status() {
        assert_eq!(ExpiryStatus::of(None, now()), ExpiryStatus::NoExpiry);
        assert_eq!(
            ExpiryStatus::of(Some(now() - Duration::days(2)), now()),
            ExpiryStatus::Expired
        );
        assert_eq!(
            ExpiryStatus::of(Some(now() + Duration::days(3)), now()),
            ExpiryStatus::ExpiringSoon
        );
        assert_eq!(
            ExpiryStatus::of(Some(now() + Duration::days(5)), now()),
            ExpiryStatus::Fresh
        );
    }

    #[test]
    fn test_expired_means_a_whole_day_past() {
        // Earlier today still rounds up to day 0.
        assert_eq!(
            ExpiryStatus::of(Some(now() - Duration::hours(1)), now()),
            ExpiryStatus::ExpiringSoon
        );
        assert_eq!(
            ExpiryStatus::of(Some(now() - Duration::hours(25)), now()),
            ExpiryStatus::Expired
        );
    }

    #[test]
    fn test_warning_and_urgent_windows() {
        let items = vec![
            item("yogurt", Some(now() + Duration::hours(20))),
            item("cheese", Some(now() + Duration::days(2))),
            item("butter", Some(now() + Duration::days(10))),
            item("old milk", Some(now() - Duration::hours(2))),
            item("salt", None),
        ];
        let scan = plan_expiry_alerts(&items, &[], now());

        let titles: Vec<&str> = scan.alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "yogurt expires in 1 day",
                "cheese expires in 2 days",
                "yogurt expires tomorrow!"
            ]
        );
        assert_eq!(scan.processed, 3);
        assert_eq!(scan.alerts[2].priority, AlertPriority::High);
        assert_eq!(scan.alerts[1].priority, AlertPriority::Medium);
    }

    #[test]
    fn test_recent_alert_suppresses_repeat() {
        let cheese = item("cheese", Some(now() + Duration::days(2)));
        let recent = vec![ExistingAlert {
            item_id: cheese.id,
            alert_type: AlertType::ExpiryWarning,
            created_at: now() - Duration::hours(23),
        }];
        let scan = plan_expiry_alerts(std::slice::from_ref(&cheese), &recent, now());
        assert!(scan.alerts.is_empty());
        assert_eq!(scan.processed, 1);
    }

    #[test]
    fn test_old_alert_does_not_suppress() {
        let cheese = item("cheese", Some(now() + Duration::days(2)));
        let recent = vec![ExistingAlert {
            item_id: cheese.id,
            alert_type: AlertType::ExpiryWarning,
            created_at: now() - Duration::hours(25),
        }];
        let scan = plan_expiry_alerts(std::slice::from_ref(&cheese), &recent, now());
        assert_eq!(scan.alerts.len(), 1);
    }

    #[test]
    fn test_urgent_window_is_twelve_hours() {
        let yogurt = item("yogurt", Some(now() + Duration::hours(10)));
        let recent = vec![
            ExistingAlert {
                item_id: yogurt.id,
                alert_type: AlertType::ExpiryUrgent,
                created_at: now() - Duration::hours(13),
            },
            ExistingAlert {
                item_id: yogurt.id,
                alert_type: AlertType::ExpiryWarning,
                created_at: now() - Duration::hours(1),
            },
        ];
        let scan = plan_expiry_alerts(std::slice::from_ref(&yogurt), &recent, now());
        assert_eq!(scan.alerts.len(), 1);
        assert_eq!(scan.alerts[0].alert_type, AlertType::ExpiryUrgent);
    }

    #[test]
    fn test_low_stock_alert() {
        let mut flour = item("flour", None);
        flour.quantity = 1.0;
        let alert = low_stock_alert(&flour, DEFAULT_LOW_STOCK_THRESHOLD).unwrap();
        assert_eq!(alert.alert_type, AlertType::LowStock);
        assert_eq!(alert.title, "Low stock: flour");

        flour.quantity = 1.5;
        assert!(low_stock_alert(&flour, DEFAULT_LOW_STOCK_THRESHOLD).is_none());
    }
}
