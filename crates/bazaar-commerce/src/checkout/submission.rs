//! Interpretation of the `createOrder` reply.

use crate::checkout::Order;
use crate::error::RemoteError;
use crate::remote::CreateOrderPayload;

/// Where a submission attempt leaves the checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The store created the order.
    Placed(Order),
    /// The store refused the order; the message is shown verbatim.
    Rejected(String),
    /// No usable answer: transport failure or an unexpected response shape.
    Failed(String),
}

impl SubmissionOutcome {
    /// Map a store reply onto an outcome. Never fails.
    ///
    /// `generic` is shown when there is nothing better to say.
    pub fn interpret(result: Result<CreateOrderPayload, RemoteError>, generic: &str) -> Self {
        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "order submission failed");
                return SubmissionOutcome::Failed(generic.to_string());
            }
        };

        match payload {
            CreateOrderPayload {
                success: Some(true),
                order: Some(order),
                ..
            } => SubmissionOutcome::Placed(order),
            CreateOrderPayload {
                success: Some(false),
                message,
                ..
            } => SubmissionOutcome::Rejected(
                message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| generic.to_string()),
            ),
            other => {
                tracing::warn!(
                    success = ?other.success,
                    has_order = other.order.is_some(),
                    "malformed createOrder response"
                );
                SubmissionOutcome::Failed(generic.to_string())
            }
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, SubmissionOutcome::Placed(_))
    }

    pub fn order(&self) -> Option<&Order> {
        match self {
            SubmissionOutcome::Placed(order) => Some(order),
            _ => None,
        }
    }

    /// Text for the blocking failure notice.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Placed(_) => None,
            SubmissionOutcome::Rejected(message) | SubmissionOutcome::Failed(message) => {
                Some(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::OrderId;
    use crate::money::Price;
    use chrono::Utc;

    const GENERIC: &str = "Error placing order";

    fn order() -> Order {
        Order {
            id: OrderId::new("o1"),
            total_price: Price::from_cents(2000),
            created_at: Utc::now(),
            items: Vec::new(),
        }
    }

    #[test]
    fn test_placed() {
        let outcome =
            SubmissionOutcome::interpret(Ok(CreateOrderPayload::placed(order(), "ok")), GENERIC);
        assert!(outcome.is_placed());
        assert_eq!(outcome.order().unwrap().id.as_str(), "o1");
        assert_eq!(outcome.error_message(), None);
    }

    #[test]
    fn test_rejected_message_is_verbatim() {
        let outcome = SubmissionOutcome::interpret(
            Ok(CreateOrderPayload::rejected("Card declined")),
            GENERIC,
        );
        assert_eq!(outcome, SubmissionOutcome::Rejected("Card declined".to_string()));
    }

    #[test]
    fn test_rejected_without_message_uses_generic() {
        let payload = CreateOrderPayload {
            success: Some(false),
            ..Default::default()
        };
        let outcome = SubmissionOutcome::interpret(Ok(payload), GENERIC);
        assert_eq!(outcome.error_message(), Some(GENERIC));
    }

    #[test]
    fn test_success_without_order_is_malformed() {
        let payload = CreateOrderPayload {
            success: Some(true),
            message: Some("Order created successfully".to_string()),
            order: None,
        };
        let outcome = SubmissionOutcome::interpret(Ok(payload), GENERIC);
        assert_eq!(outcome, SubmissionOutcome::Failed(GENERIC.to_string()));
    }

    #[test]
    fn test_empty_payload_and_transport_error() {
        assert_eq!(
            SubmissionOutcome::interpret(Ok(CreateOrderPayload::default()), GENERIC),
            SubmissionOutcome::Failed(GENERIC.to_string())
        );
        assert_eq!(
            SubmissionOutcome::interpret(Err(RemoteError::Transport("reset".into())), GENERIC),
            SubmissionOutcome::Failed(GENERIC.to_string())
        );
    }
}
