//! HTML bodies of the transactional emails.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::Email;

const SIGNATURE: &str = "<br/><p>Best regards,</p><p>The Storefront Team</p>";

pub fn welcome(to: &str, full_name: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Welcome to Storefront!".to_string(),
        html_body: format!(
            "<h2>Welcome {}!</h2>\
             <p>Thank you for registering with Storefront.</p>\
             <p>You can now start shopping for your favorite products!</p>{}",
            escape(full_name),
            SIGNATURE
        ),
    }
}

pub fn password_reset(to: &str, reset_url: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Reset Your Password".to_string(),
        html_body: format!(
            "<h2>Password Reset Request</h2>\
             <p>Click the link below to reset your password:</p>\
             <p><a href='{}'>Reset Password</a></p>\
             <p>This link will expire in 1 hour.</p>\
             <p>If you didn't request this, please ignore this email.</p>{}",
            reset_url, SIGNATURE
        ),
    }
}

pub fn order_confirmation(to: &str, order_number: &str, total_amount: Decimal) -> Email {
    Email {
        to: to.to_string(),
        subject: format!("Order Confirmation - {}", order_number),
        html_body: format!(
            "<h2>Order Confirmed!</h2>\
             <p>Thank you for your order.</p>\
             <p><strong>Order Number:</strong> {}</p>\
             <p><strong>Total Amount:</strong> ${:.2}</p>\
             <p>We'll send you another email when your order ships.</p>{}",
            order_number, total_amount, SIGNATURE
        ),
    }
}

pub fn password_changed(to: &str, full_name: &str, at: DateTime<Utc>) -> Email {
    Email {
        to: to.to_string(),
        subject: "Password Changed Successfully".to_string(),
        html_body: format!(
            "<h2>Hello {},</h2>\
             <p>Your password has been changed successfully.</p>\
             <p>If you did not make this change, please contact us immediately.</p>\
             <p><strong>Time:</strong> {} UTC</p>{}",
            escape(full_name),
            at.format("%Y-%m-%d %H:%M:%S"),
            SIGNATURE
        ),
    }
}

/// Escapes user supplied text for inclusion in HTML.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_escapes_name() {
        let email = welcome("a@example.com", "<b>Eve</b>");

        assert!(email.html_body.contains("&lt;b&gt;Eve&lt;/b&gt;"));
        assert!(!email.html_body.contains("<b>Eve"));
    }

    #[test]
    fn order_total_has_two_decimals() {
        let email = order_confirmation("a@example.com", "ORD-1", Decimal::new(5, 0));

        assert!(email.html_body.contains("$5.00"));
    }
}
