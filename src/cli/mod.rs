//! Terminal front end over the core components

pub mod chart;
pub mod coins;
pub mod returns;
pub mod setup;
pub mod ui;

use crate::core::QueryError;

/// Message shown to the user for a failed request.
pub fn user_message(err: &QueryError) -> String {
    match err {
        QueryError::InvalidInput(field) => {
            format!("{} Missing or invalid {field}.", returns::MISSING_FIELDS)
        }
        QueryError::PriceUnavailable { .. } => returns::PRICE_UNAVAILABLE.to_string(),
        QueryError::UnknownCoin(_) | QueryError::UnsupportedChartKind(_) => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InputField;

    #[test]
    fn maps_errors_to_user_messages() {
        assert_eq!(
            user_message(&QueryError::InvalidInput(InputField::Amount)),
            "Please fill in all fields. Missing or invalid amount."
        );
        assert_eq!(
            user_message(&QueryError::PriceUnavailable {
                coin: "BTC-USD".to_string(),
                year: 2019
            }),
            returns::PRICE_UNAVAILABLE
        );
        assert_eq!(
            user_message(&QueryError::UnsupportedChartKind("pie".to_string())),
            "Unsupported chart kind: pie"
        );
    }
}
