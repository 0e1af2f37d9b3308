use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::reservations::model::random_code;

/// Free allowance per checked bag, in kilograms.
pub const FREE_WEIGHT_KG: f64 = 20.0;
/// Charged per kilogram above the allowance.
pub const EXTRA_FEE_PER_KG: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "baggage_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BaggageStatus {
    #[default]
    Checked,
    Loaded,
    Delivered,
}

impl std::str::FromStr for BaggageStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checked" => Ok(Self::Checked),
            "loaded" => Ok(Self::Loaded),
            "delivered" => Ok(Self::Delivered),
            other => Err(AppError::Validation(format!("Invalid baggage status: {other}"))),
        }
    }
}

/// Fee for a bag of `weight` kilograms.
pub fn extra_charge(weight: f64) -> f64 {
    (weight - FREE_WEIGHT_KG).max(0.0) * EXTRA_FEE_PER_KG
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Baggage {
    pub id: Uuid,
    #[serde(rename = "reservation")]
    pub reservation_id: Uuid,
    pub weight: f64,
    pub status: BaggageStatus,
    pub boarding_pass: String,
    pub extra_charge: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Baggage {
    pub fn check_in(reservation_id: Uuid, weight: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            reservation_id,
            weight,
            status: BaggageStatus::Checked,
            boarding_pass: random_code("PASS"),
            extra_charge: extra_charge(weight),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Bag with the reservation, flight and customer it belongs to; what ground
/// staff see when searching.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BaggageTrace {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub baggage: Baggage,
    pub ticket_number: String,
    pub seat_number: String,
    pub flight_number: Option<String>,
    pub customer_email: Option<String>,
}

/// Ground-staff search filters; all optional and combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaggageSearch {
    pub reservation: Option<Uuid>,
    pub boarding_pass: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
impl BaggageSearch {
    /// Same matching rules the SQL search applies.
    pub fn matches(&self, trace: &BaggageTrace) -> bool {
        fn contains_ci(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        self.reservation
            .map_or(true, |r| trace.baggage.reservation_id == r)
            && self
                .boarding_pass
                .as_deref()
                .map_or(true, |p| contains_ci(&trace.baggage.boarding_pass, p))
            && self.email.as_deref().map_or(true, |e| {
                trace
                    .customer_email
                    .as_deref()
                    .is_some_and(|have| contains_ci(have, e))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowance_is_free_and_excess_is_charged_per_kilo() {
        assert_eq!(extra_charge(25.0), 50.0);
        assert_eq!(extra_charge(20.0), 0.0);
        assert_eq!(extra_charge(7.5), 0.0);
        assert_eq!(extra_charge(20.5), 5.0);
    }

    #[test]
    fn check_in_assigns_boarding_pass_and_fee() {
        let bag = Baggage::check_in(Uuid::new_v4(), 23.0);
        assert!(bag.boarding_pass.starts_with("PASS-"));
        assert_eq!(bag.boarding_pass.len(), "PASS-".len() + 9);
        assert_eq!(bag.extra_charge, 30.0);
        assert_eq!(bag.status, BaggageStatus::Checked);
    }

    #[test]
    fn status_parsing_rejects_unknown_values() {
        assert_eq!("loaded".parse::<BaggageStatus>().unwrap(), BaggageStatus::Loaded);
        assert!(matches!(
            "lost".parse::<BaggageStatus>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn search_filters_are_case_insensitive_substrings() {
        let bag = Baggage::check_in(Uuid::new_v4(), 10.0);
        let pass = bag.boarding_pass.to_lowercase();
        let trace = BaggageTrace {
            baggage: bag,
            ticket_number: "TICKET-AAAAAAAAA".into(),
            seat_number: "1A".into(),
            flight_number: Some("SK1".into()),
            customer_email: Some("Ana@Example.com".into()),
        };
        let by_pass = BaggageSearch {
            boarding_pass: Some(pass[2..8].to_string()),
            ..Default::default()
        };
        assert!(by_pass.matches(&trace));
        let by_email = BaggageSearch {
            email: Some("ana@example".into()),
            ..Default::default()
        };
        assert!(by_email.matches(&trace));
        let other = BaggageSearch {
            reservation: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!other.matches(&trace));
    }
}
