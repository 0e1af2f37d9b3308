use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::loyalty::FrequentFlyer;
use super::model::{ContactInfo, Employee, EmployeeRole, Preferences, Role};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub role: Role,
}

/// Customer creating their own profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub passport: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub preferences: Preferences,
}

/// Admin creating a profile for an existing customer account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateCustomerRequest {
    pub user: Uuid,
    pub passport: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub seat_preference: String,
    #[serde(default)]
    pub meal_preference: String,
}

/// Only the point balance is accepted; the tier is derived from it.
#[derive(Debug, Deserialize)]
pub struct LedgerPatch {
    pub points: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub passport: Option<String>,
    pub contact_info: Option<ContactInfo>,
    pub preferences: Option<Preferences>,
    pub frequent_flyer: Option<LedgerPatch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerView {
    pub frequent_flyer: FrequentFlyer,
}

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub user: Uuid,
    pub role: EmployeeRole,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub role: EmployeeRole,
}

#[derive(Debug, Serialize)]
pub struct EmployeeUpdated {
    pub message: &'static str,
    pub employee: Employee,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}
