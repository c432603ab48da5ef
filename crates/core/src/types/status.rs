//! Status enums shown in the storefront, with their Persian labels.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Just placed; the status the backend gives a new order.
    #[default]
    Created,
    Pending,
    Processing,
    Completed,
    Delivered,
    Cancelled,
    Refunded,
    /// Anything this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Wire name, as the backend spells it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Unknown => "unknown",
        }
    }

    /// Persian label.
    #[must_use]
    pub const fn label_fa(&self) -> &'static str {
        match self {
            Self::Created => "ثبت شده",
            Self::Pending => "در انتظار",
            Self::Processing => "در حال پردازش",
            Self::Completed => "تکمیل شده",
            Self::Delivered => "تحویل داده شده",
            Self::Cancelled => "لغو شده",
            Self::Refunded => "بازپرداخت شده",
            Self::Unknown => "نامشخص",
        }
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

impl UserRole {
    /// Persian label.
    #[must_use]
    pub const fn label_fa(&self) -> &'static str {
        match self {
            Self::User => "کاربر",
            Self::Admin => "مدیر",
            Self::SuperAdmin => "مدیر ارشد",
        }
    }
}

/// Persian label for a raw status string, falling back to the input when the
/// status is unknown.
#[must_use]
pub fn persian_status(status: &str) -> &str {
    match status {
        "created" => OrderStatus::Created.label_fa(),
        "pending" => OrderStatus::Pending.label_fa(),
        "processing" => OrderStatus::Processing.label_fa(),
        "completed" => OrderStatus::Completed.label_fa(),
        "delivered" => OrderStatus::Delivered.label_fa(),
        "cancelled" => OrderStatus::Cancelled.label_fa(),
        "refunded" => OrderStatus::Refunded.label_fa(),
        "user" => UserRole::User.label_fa(),
        "admin" => UserRole::Admin.label_fa(),
        "super_admin" => UserRole::SuperAdmin.label_fa(),
        "active" => "فعال",
        "inactive" => "غیرفعال",
        "draft" => "پیش‌نویس",
        "published" => "منتشر شده",
        _ => status,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_persian_status() {
        assert_eq!(persian_status("pending"), "در انتظار");
        assert_eq!(persian_status("super_admin"), "مدیر ارشد");
        assert_eq!(persian_status("published"), "منتشر شده");
        assert_eq!(persian_status("mystery"), "mystery");
    }

    #[test]
    fn test_order_status_wire_format() {
        let status: OrderStatus = serde_json::from_str("\"delivered\"").unwrap();
        assert_eq!(status, OrderStatus::Delivered);

        let status: OrderStatus = serde_json::from_str("\"created\"").unwrap();
        assert_eq!(status.label_fa(), "ثبت شده");

        let status: OrderStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);
        assert_eq!(status.as_str(), "unknown");
    }

    #[test]
    fn test_user_role_wire_format() {
        let role: UserRole = serde_json::from_str("\"super_admin\"").unwrap();
        assert_eq!(role, UserRole::SuperAdmin);
        assert_eq!(role.label_fa(), "مدیر ارشد");
    }
}
