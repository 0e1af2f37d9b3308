use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::loyalty::{FrequentFlyer, Tier};

/// Role carried by every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    Customer,
}

/// Job of an employee; drives payroll rate and ground-staff privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Pilot,
    Crew,
    Ground,
}

/// User account in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2, never exposed
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn new(email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub seat_preference: String,
    #[serde(default)]
    pub meal_preference: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            seat_preference: "any".into(),
            meal_preference: "standard".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub passport: String,
    pub contact_info: ContactInfo,
    pub frequent_flyer: FrequentFlyer,
    pub preferences: Preferences,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Customer {
    pub fn new(
        user_id: Uuid,
        passport: String,
        contact_info: ContactInfo,
        preferences: Preferences,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            passport,
            contact_info,
            frequent_flyer: FrequentFlyer::default(),
            preferences,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Flat `customers` row as stored in the database.
#[derive(Debug, FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub passport: String,
    pub phone: String,
    pub address: String,
    pub ff_status: Tier,
    pub ff_points: i32,
    pub seat_preference: String,
    pub meal_preference: String,
    pub created_at: OffsetDateTime,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            passport: r.passport,
            contact_info: ContactInfo {
                phone: r.phone,
                address: r.address,
            },
            frequent_flyer: FrequentFlyer {
                status: r.ff_status,
                points: r.ff_points,
            },
            preferences: Preferences {
                seat_preference: r.seat_preference,
                meal_preference: r.meal_preference,
            },
            created_at: r.created_at,
        }
    }
}

/// Customer profile joined with the owning account's email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccount {
    #[serde(flatten)]
    pub customer: Customer,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub role: EmployeeRole,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Employee {
    pub fn new(user_id: Uuid, role: EmployeeRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            role,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Employee profile joined with the owning account's email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAccount {
    #[serde(flatten)]
    pub employee: Employee,
    pub email: String,
}
