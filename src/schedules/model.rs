use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{OffsetDateTime, UtcOffset, Weekday};
use uuid::Uuid;

use crate::flights::model::Flight;

/// One crew member's shift on one flight.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: Uuid,
    #[serde(rename = "employee")]
    pub employee_id: Uuid,
    #[serde(rename = "flight")]
    pub flight_id: Uuid,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

impl Schedule {
    pub fn new(employee_id: Uuid, flight_id: Uuid, timing: &ShiftTiming) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            flight_id,
            day: timing.day.clone(),
            start_time: timing.start_time.clone(),
            end_time: timing.end_time.clone(),
        }
    }
}

/// Day and clock times shared by every schedule row of a flight.
///
/// Derived in UTC; weekday names use the `es-MX` locale the crew rosters are
/// published in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTiming {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

impl ShiftTiming {
    pub fn between(departure: OffsetDateTime, arrival: OffsetDateTime) -> Self {
        let departure = departure.to_offset(UtcOffset::UTC);
        let arrival = arrival.to_offset(UtcOffset::UTC);
        Self {
            day: weekday_name(departure.weekday()).to_string(),
            start_time: clock(departure),
            end_time: clock(arrival),
        }
    }

    pub fn for_flight(flight: &Flight) -> Self {
        Self::between(flight.departure_time, flight.arrival_time)
    }
}

fn clock(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}", at.hour(), at.minute())
}

pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "lunes",
        Weekday::Tuesday => "martes",
        Weekday::Wednesday => "miércoles",
        Weekday::Thursday => "jueves",
        Weekday::Friday => "viernes",
        Weekday::Saturday => "sábado",
        Weekday::Sunday => "domingo",
    }
}

/// Schedule row joined with its flight, as an employee sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDetail {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub flight_detail: Option<Flight>,
}

/// A worked flight for payroll: who flew and when.
#[derive(Debug, Clone, FromRow)]
pub struct CrewShift {
    pub employee_id: Uuid,
    pub departure_time: OffsetDateTime,
    pub arrival_time: OffsetDateTime,
}

impl CrewShift {
    pub fn hours(&self) -> f64 {
        (self.arrival_time - self.departure_time).as_seconds_f64() / 3600.0
    }
}
