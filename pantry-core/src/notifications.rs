//! Email notifications: message rendering and a pluggable delivery trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::NotifyError;
use crate::expiry::days_until_expiry;
use crate::ranker::RecipeMatch;
use crate::types::PantryItem;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers rendered messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

/// Writes messages to the log instead of sending them.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        tracing::info!(to = %message.to, subject = %message.subject, "Email notification");
        Ok(())
    }
}

/// Send `message`, logging instead of failing when delivery does not work.
pub async fn send_best_effort(notifier: &dyn Notifier, message: &EmailMessage) -> bool {
    match notifier.send(message).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(to = %message.to, "Failed to send notification: {}", e);
            false
        }
    }
}

pub fn expiry_alert_email(to: &str, item: &PantryItem, now: DateTime<Utc>) -> Option<EmailMessage> {
    let expiry = item.expiry_date?;
    let days = days_until_expiry(expiry, now);

    let subject = if days <= 1 {
        format!("{} expires soon!", item.name)
    } else {
        format!("{} expires in {} days", item.name, days)
    };

    let mut lines = vec![item.name.clone()];
    if let Some(brand) = &item.brand {
        lines.push(format!("Brand: {}", brand));
    }
    lines.push(format!("Expires: {}", expiry.format("%Y-%m-%d")));
    lines.push(format!("Quantity: {} {}", item.quantity, item.unit));
    lines.push(format!("Location: {}", item.location));
    lines.push(String::new());
    lines.push(if days <= 1 {
        "This item expires tomorrow! Consider using it in a recipe or consuming it soon."
            .to_string()
    } else {
        format!(
            "This item will expire in {} days. Plan to use it soon to avoid waste.",
            days
        )
    });

    Some(EmailMessage {
        to: to.to_string(),
        subject,
        body: lines.join("\n"),
    })
}

pub fn recipe_suggestion_email(to: &str, recipe_match: &RecipeMatch) -> EmailMessage {
    let recipe = &recipe_match.recipe;
    let percent = recipe_match.match_percentage.round();

    let mut lines = vec![recipe.name.clone()];
    lines.extend(recipe.description.clone());
    if let Some(prep) = recipe.prep_time {
        lines.push(format!("Prep: {} min", prep));
    }
    lines.push(format!("Difficulty: {}", recipe.difficulty));
    lines.push(String::new());
    lines.push(format!(
        "Based on your current pantry items, you can make this recipe with {}% of the ingredients you already have!",
        percent
    ));
    if !recipe_match.missing_ingredients.is_empty() {
        let missing: Vec<&str> = recipe_match
            .missing_ingredients
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        lines.push(format!("Still needed: {}", missing.join(", ")));
    }

    EmailMessage {
        to: to.to_string(),
        subject: format!("Recipe suggestion: {} ({}% match)", recipe.name, percent),
        body: lines.join("\n"),
    }
}

/// One shopping list entry as shown in a reminder.
#[derive(Debug, Clone, Copy)]
pub struct ReminderItem<'a> {
    pub name: &'a str,
    pub quantity: f64,
    pub unit: Option<&'a str>,
    pub is_completed: bool,
}

/// Reminder listing the entries still to buy. Ticked-off entries are left out.
pub fn shopping_list_reminder_email(
    to: &str,
    list_name: &str,
    items: &[ReminderItem<'_>],
) -> EmailMessage {
    let open: Vec<String> = items
        .iter()
        .filter(|item| !item.is_completed)
        .map(|item| match item.unit {
            Some(unit) => format!("- {} {} {}", item.quantity, unit, item.name),
            None => format!("- {} {}", item.quantity, item.name),
        })
        .collect();

    let mut lines = vec![
        list_name.to_string(),
        format!("{} items to buy:", open.len()),
    ];
    lines.extend(open);
    lines.push(String::new());
    lines.push("Happy shopping!".to_string());

    EmailMessage {
        to: to.to_string(),
        subject: format!("Shopping reminder: {}", list_name),
        body: lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingConfig;
    use crate::matcher::normalize_names;
    use crate::ranker::match_recipe;
    use crate::types::Recipe;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn item(days: i64) -> PantryItem {
        serde_json::from_value(serde_json::json!({
            "name": "Yogurt",
            "brand": "Acme",
            "category": "DAIRY",
            "quantity": 2.0,
            "unit": "cup",
            "location": "FRIDGE",
            "expiry_date": now() + Duration::days(days),
        }))
        .unwrap()
    }

    #[test]
    fn test_expiry_email_urgent() {
        let email = expiry_alert_email("a@b.test", &item(1), now()).unwrap();
        assert_eq!(email.subject, "Yogurt expires soon!");
        assert!(email.body.contains("Brand: Acme"));
        assert!(email.body.contains("Location: FRIDGE"));
        assert!(email.body.contains("expires tomorrow"));
    }

    #[test]
    fn test_expiry_email_warning() {
        let email = expiry_alert_email("a@b.test", &item(3), now()).unwrap();
        assert_eq!(email.subject, "Yogurt expires in 3 days");
        assert!(email.body.contains("Quantity: 2 cup"));
    }

    #[test]
    fn test_expiry_email_needs_date() {
        let mut undated = item(1);
        undated.expiry_date = None;
        assert!(expiry_alert_email("a@b.test", &undated, now()).is_none());
    }

    #[test]
    fn test_recipe_suggestion_subject() {
        let recipe: Recipe = serde_json::from_value(serde_json::json!({
            "name": "Pesto",
            "category": "MAIN_COURSE",
            "ingredients": [{ "name": "basil" }, { "name": "garlic" }, { "name": "pine nuts" }],
        }))
        .unwrap();
        let m = match_recipe(
            &recipe,
            &normalize_names(["basil", "garlic"]),
            &MatchingConfig::default(),
        );
        let email = recipe_suggestion_email("a@b.test", &m);
        assert_eq!(email.subject, "Recipe suggestion: Pesto (67% match)");
        assert!(email.body.contains("Still needed: pine nuts"));
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _message: &EmailMessage) -> Result<(), NotifyError> {
            Err(NotifyError::SendFailed("smtp down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_send_best_effort() {
        let message = recipe_suggestion_email(
            "a@b.test",
            &match_recipe(
                &serde_json::from_value(serde_json::json!({
                    "name": "Toast",
                    "category": "BREAKFAST",
                }))
                .unwrap(),
                &[],
                &MatchingConfig::default(),
            ),
        );
        assert!(send_best_effort(&LogNotifier, &message).await);
        assert!(!send_best_effort(&FailingNotifier, &message).await);
    }

    #[test]
    fn test_shopping_reminder_skips_completed_entries() {
        let items = [
            ReminderItem {
                name: "Milk",
                quantity: 2.0,
                unit: Some("l"),
                is_completed: false,
            },
            ReminderItem {
                name: "Bread",
                quantity: 1.0,
                unit: None,
                is_completed: true,
            },
            ReminderItem {
                name: "Apples",
                quantity: 6.0,
                unit: None,
                is_completed: false,
            },
        ];
        let email = shopping_list_reminder_email("a@b.test", "Shopping List", &items);

        assert_eq!(email.subject, "Shopping reminder: Shopping List");
        assert!(email.body.contains("2 items to buy:"));
        assert!(email.body.contains("- 2 l Milk"));
        assert!(email.body.contains("- 6 Apples"));
        assert!(!email.body.contains("Bread"));
    }
}
