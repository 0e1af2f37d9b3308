//! In-process store. Mirrors the Postgres schema closely enough for the
//! workflows and handlers to be exercised without a database: unique columns
//! answer `Conflict`, and deleting a user or employee cascades the way the
//! foreign keys do.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::baggage::model::{Baggage, BaggageSearch, BaggageStatus, BaggageTrace};
use crate::baggage::repo::BaggageStore;
use crate::dashboard::repo::{Bucket, DashboardStore};
use crate::directory::loyalty::FrequentFlyer;
use crate::directory::model::{
    Customer, CustomerAccount, Employee, EmployeeAccount, EmployeeRole, Role, User,
};
use crate::directory::repo::DirectoryStore;
use crate::error::{AppError, AppResult};
use crate::flights::model::{Aircraft, Flight, FlightStatus};
use crate::flights::repo::FlightCatalog;
use crate::payroll::model::Payroll;
use crate::payroll::repo::PayrollStore;
use crate::reservations::model::{Payment, PaymentStatus, Reservation, ReservationStatus};
use crate::reservations::repo::BookingStore;
use crate::schedules::model::{CrewShift, Schedule, ShiftTiming};
use crate::schedules::repo::ScheduleStore;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    customers: Vec<Customer>,
    employees: Vec<Employee>,
    aircraft: Vec<Aircraft>,
    flights: Vec<Flight>,
    reservations: Vec<Reservation>,
    payments: Vec<Payment>,
    schedules: Vec<Schedule>,
    baggage: Vec<Baggage>,
    payrolls: Vec<Payroll>,
}

impl Tables {
    fn email_of(&self, user_id: Uuid) -> Option<&str> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.email.as_str())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // a panicking test must not wedge the rest
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Aircraft have no write endpoint; this seeds the fleet.
    pub fn add_aircraft(&self, aircraft: Aircraft) {
        self.tables().aircraft.push(aircraft);
    }

    pub fn payrolls(&self) -> Vec<Payroll> {
        self.tables().payrolls.clone()
    }

    pub fn schedules_for_flight(&self, flight_id: Uuid) -> Vec<Schedule> {
        self.tables()
            .schedules
            .iter()
            .filter(|s| s.flight_id == flight_id)
            .cloned()
            .collect()
    }
}

fn conflict(what: &str) -> AppError {
    AppError::Conflict(format!("{what} already exists"))
}

fn count_by<T, K: ToString>(rows: &[T], key: impl Fn(&T) -> K) -> Vec<Bucket> {
    let mut counts: HashMap<String, i64> = HashMap::new();
    for row in rows {
        *counts.entry(key(row).to_string()).or_default() += 1;
    }
    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(label, total)| Bucket { label, total })
        .collect();
    buckets.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.label.cmp(&b.label)));
    buckets
}

fn wire_name<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.tables().users.clone())
    }

    async fn list_users_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        Ok(self
            .tables()
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn unprofiled_customer_users(&self) -> AppResult<Vec<User>> {
        let t = self.tables();
        Ok(t.users
            .iter()
            .filter(|u| u.role == Role::Customer)
            .filter(|u| !t.customers.iter().any(|c| c.user_id == u.id))
            .cloned()
            .collect())
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(conflict("Email"));
        }
        t.users.push(user.clone());
        Ok(())
    }

    async fn update_user(&self, id: Uuid, email: &str, role: Role) -> AppResult<Option<User>> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.email == email && u.id != id) {
            return Err(conflict("Email"));
        }
        Ok(t.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.email = email.to_string();
            u.role = role;
            u.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        let mut t = self.tables();
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Ok(false);
        }
        t.customers.retain(|c| c.user_id != id);
        let gone: Vec<Uuid> = t
            .employees
            .iter()
            .filter(|e| e.user_id == id)
            .map(|e| e.id)
            .collect();
        t.employees.retain(|e| e.user_id != id);
        t.schedules.retain(|s| !gone.contains(&s.employee_id));
        Ok(true)
    }

    async fn find_customer(&self, id: Uuid) -> AppResult<Option<Customer>> {
        Ok(self
            .tables()
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_customer_by_user(&self, user_id: Uuid) -> AppResult<Option<Customer>> {
        Ok(self
            .tables()
            .customers
            .iter()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn list_customers(&self) -> AppResult<Vec<CustomerAccount>> {
        let t = self.tables();
        Ok(t.customers
            .iter()
            .filter_map(|c| {
                t.email_of(c.user_id).map(|email| CustomerAccount {
                    customer: c.clone(),
                    email: email.to_string(),
                })
            })
            .collect())
    }

    async fn insert_customer(&self, customer: &Customer) -> AppResult<()> {
        let mut t = self.tables();
        if t.customers.iter().any(|c| c.user_id == customer.user_id) {
            return Err(conflict("Customer profile"));
        }
        t.customers.push(customer.clone());
        Ok(())
    }

    async fn save_customer(&self, customer: &Customer) -> AppResult<()> {
        if let Some(c) = self
            .tables()
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id)
        {
            *c = customer.clone();
        }
        Ok(())
    }

    async fn save_frequent_flyer(
        &self,
        customer_id: Uuid,
        ledger: &FrequentFlyer,
    ) -> AppResult<()> {
        if let Some(c) = self
            .tables()
            .customers
            .iter_mut()
            .find(|c| c.id == customer_id)
        {
            c.frequent_flyer = *ledger;
        }
        Ok(())
    }

    async fn delete_customer(&self, id: Uuid) -> AppResult<bool> {
        let mut t = self.tables();
        let before = t.customers.len();
        t.customers.retain(|c| c.id != id);
        Ok(t.customers.len() != before)
    }

    async fn find_employee(&self, id: Uuid) -> AppResult<Option<Employee>> {
        Ok(self
            .tables()
            .employees
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_employee_by_user(&self, user_id: Uuid) -> AppResult<Option<Employee>> {
        Ok(self
            .tables()
            .employees
            .iter()
            .find(|e| e.user_id == user_id)
            .cloned())
    }

    async fn list_employees(&self) -> AppResult<Vec<EmployeeAccount>> {
        let t = self.tables();
        Ok(t.employees
            .iter()
            .filter_map(|e| {
                t.email_of(e.user_id).map(|email| EmployeeAccount {
                    employee: e.clone(),
                    email: email.to_string(),
                })
            })
            .collect())
    }

    async fn insert_employee(&self, employee: &Employee) -> AppResult<()> {
        let mut t = self.tables();
        if t.employees.iter().any(|e| e.user_id == employee.user_id) {
            return Err(conflict("Employee"));
        }
        t.employees.push(employee.clone());
        Ok(())
    }

    async fn update_employee_role(
        &self,
        id: Uuid,
        role: EmployeeRole,
    ) -> AppResult<Option<Employee>> {
        Ok(self
            .tables()
            .employees
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| {
                e.role = role;
                e.clone()
            }))
    }

    async fn delete_employee(&self, id: Uuid) -> AppResult<bool> {
        let mut t = self.tables();
        let before = t.employees.len();
        t.employees.retain(|e| e.id != id);
        t.schedules.retain(|s| s.employee_id != id);
        Ok(t.employees.len() != before)
    }
}

#[async_trait]
impl FlightCatalog for MemoryStore {
    async fn find_flight(&self, id: Uuid) -> AppResult<Option<Flight>> {
        Ok(self.tables().flights.iter().find(|f| f.id == id).cloned())
    }

    async fn list_flights(&self) -> AppResult<Vec<Flight>> {
        let mut flights = self.tables().flights.clone();
        flights.sort_by_key(|f| f.departure_time);
        Ok(flights)
    }

    async fn insert_flight(&self, flight: &Flight) -> AppResult<()> {
        let mut t = self.tables();
        if t.flights
            .iter()
            .any(|f| f.flight_number == flight.flight_number)
        {
            return Err(conflict("Flight number"));
        }
        t.flights.push(flight.clone());
        Ok(())
    }

    async fn save_flight(&self, flight: &Flight) -> AppResult<()> {
        let mut t = self.tables();
        if t.flights
            .iter()
            .any(|f| f.flight_number == flight.flight_number && f.id != flight.id)
        {
            return Err(conflict("Flight number"));
        }
        if let Some(f) = t.flights.iter_mut().find(|f| f.id == flight.id) {
            *f = flight.clone();
        }
        Ok(())
    }

    async fn delete_flight(&self, id: Uuid) -> AppResult<bool> {
        let mut t = self.tables();
        let before = t.flights.len();
        t.flights.retain(|f| f.id != id);
        Ok(t.flights.len() != before)
    }

    async fn find_aircraft(&self, id: Uuid) -> AppResult<Option<Aircraft>> {
        Ok(self
            .tables()
            .aircraft
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list_aircraft(&self) -> AppResult<Vec<Aircraft>> {
        Ok(self.tables().aircraft.clone())
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn insert_schedule(&self, schedule: &Schedule) -> AppResult<()> {
        self.tables().schedules.push(schedule.clone());
        Ok(())
    }

    async fn delete_schedules(&self, flight_id: Uuid, employees: &[Uuid]) -> AppResult<u64> {
        let mut t = self.tables();
        let before = t.schedules.len();
        t.schedules
            .retain(|s| !(s.flight_id == flight_id && employees.contains(&s.employee_id)));
        Ok((before - t.schedules.len()) as u64)
    }

    async fn retime_schedules(
        &self,
        flight_id: Uuid,
        employees: &[Uuid],
        timing: &ShiftTiming,
    ) -> AppResult<u64> {
        let mut changed = 0;
        for s in self
            .tables()
            .schedules
            .iter_mut()
            .filter(|s| s.flight_id == flight_id && employees.contains(&s.employee_id))
        {
            s.day = timing.day.clone();
            s.start_time = timing.start_time.clone();
            s.end_time = timing.end_time.clone();
            changed += 1;
        }
        Ok(changed)
    }

    async fn schedules_for_employee(&self, employee_id: Uuid) -> AppResult<Vec<Schedule>> {
        Ok(self
            .tables()
            .schedules
            .iter()
            .filter(|s| s.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn shifts_departing_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> AppResult<Vec<CrewShift>> {
        let t = self.tables();
        let mut shifts: Vec<CrewShift> = t
            .schedules
            .iter()
            .filter_map(|s| {
                let f = t.flights.iter().find(|f| f.id == s.flight_id)?;
                (f.departure_time >= start && f.departure_time <= end).then(|| CrewShift {
                    employee_id: s.employee_id,
                    departure_time: f.departure_time,
                    arrival_time: f.arrival_time,
                })
            })
            .collect();
        shifts.sort_by_key(|s| s.departure_time);
        Ok(shifts)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_reservation(&self, reservation: &Reservation) -> AppResult<()> {
        let mut t = self.tables();
        if t.reservations
            .iter()
            .any(|r| r.ticket_number == reservation.ticket_number)
        {
            return Err(conflict("Ticket number"));
        }
        t.reservations.push(reservation.clone());
        Ok(())
    }

    async fn find_reservation(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        Ok(self
            .tables()
            .reservations
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn set_reservation_status(&self, id: Uuid, status: ReservationStatus) -> AppResult<()> {
        if let Some(r) = self
            .tables()
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
        {
            r.status = status;
        }
        Ok(())
    }

    async fn reservations_for_customer(&self, customer_id: Uuid) -> AppResult<Vec<Reservation>> {
        Ok(self
            .tables()
            .reservations
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn occupied_seats(&self, flight_id: Uuid) -> AppResult<Vec<String>> {
        Ok(self
            .tables()
            .reservations
            .iter()
            .filter(|r| r.flight_id == flight_id && r.status == ReservationStatus::Confirmed)
            .map(|r| r.seat_number.clone())
            .collect())
    }

    async fn insert_payment(&self, payment: &Payment) -> AppResult<()> {
        self.tables().payments.push(payment.clone());
        Ok(())
    }

    async fn find_payment(&self, id: Uuid) -> AppResult<Option<Payment>> {
        Ok(self
            .tables()
            .payments
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn first_payment_for(&self, reservation_id: Uuid) -> AppResult<Option<Payment>> {
        Ok(self
            .tables()
            .payments
            .iter()
            .filter(|p| p.reservation_id == reservation_id)
            .min_by_key(|p| p.created_at)
            .cloned())
    }

    async fn set_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> AppResult<Option<Payment>> {
        Ok(self
            .tables()
            .payments
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| {
                p.status = status;
                p.clone()
            }))
    }
}

#[async_trait]
impl BaggageStore for MemoryStore {
    async fn insert_baggage(&self, baggage: &Baggage) -> AppResult<()> {
        let mut t = self.tables();
        if t.baggage
            .iter()
            .any(|b| b.boarding_pass == baggage.boarding_pass)
        {
            return Err(conflict("Boarding pass"));
        }
        t.baggage.push(baggage.clone());
        Ok(())
    }

    async fn set_baggage_status(
        &self,
        id: Uuid,
        status: BaggageStatus,
    ) -> AppResult<Option<Baggage>> {
        Ok(self
            .tables()
            .baggage
            .iter_mut()
            .find(|b| b.id == id)
            .map(|b| {
                b.status = status;
                b.clone()
            }))
    }

    async fn baggage_for_reservation(&self, reservation_id: Uuid) -> AppResult<Vec<Baggage>> {
        Ok(self
            .tables()
            .baggage
            .iter()
            .filter(|b| b.reservation_id == reservation_id)
            .cloned()
            .collect())
    }

    async fn search_baggage(&self, filter: &BaggageSearch) -> AppResult<Vec<BaggageTrace>> {
        let t = self.tables();
        let mut found: Vec<BaggageTrace> = t
            .baggage
            .iter()
            .filter_map(|b| {
                let r = t.reservations.iter().find(|r| r.id == b.reservation_id)?;
                let flight_number = t
                    .flights
                    .iter()
                    .find(|f| f.id == r.flight_id)
                    .map(|f| f.flight_number.clone());
                let customer_email = t
                    .customers
                    .iter()
                    .find(|c| c.id == r.customer_id)
                    .and_then(|c| t.email_of(c.user_id))
                    .map(str::to_owned);
                Some(BaggageTrace {
                    baggage: b.clone(),
                    ticket_number: r.ticket_number.clone(),
                    seat_number: r.seat_number.clone(),
                    flight_number,
                    customer_email,
                })
            })
            .filter(|trace| filter.matches(trace))
            .collect();
        found.sort_by(|a, b| b.baggage.created_at.cmp(&a.baggage.created_at));
        Ok(found)
    }
}

#[async_trait]
impl PayrollStore for MemoryStore {
    async fn insert_payroll(&self, payroll: &Payroll) -> AppResult<()> {
        self.tables().payrolls.push(payroll.clone());
        Ok(())
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn count_flights_with_status(&self, status: FlightStatus) -> AppResult<i64> {
        Ok(self
            .tables()
            .flights
            .iter()
            .filter(|f| f.status == status)
            .count() as i64)
    }

    async fn count_customers(&self) -> AppResult<i64> {
        Ok(self.tables().customers.len() as i64)
    }

    async fn flights_by_status(&self) -> AppResult<Vec<Bucket>> {
        Ok(count_by(&self.tables().flights, |f| wire_name(&f.status)))
    }

    async fn completed_sales_since(&self, since: OffsetDateTime) -> AppResult<f64> {
        Ok(self
            .tables()
            .payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed && p.created_at >= since)
            .map(|p| p.amount)
            .sum())
    }

    async fn top_destination(&self) -> AppResult<Option<Bucket>> {
        let t = self.tables();
        let destinations: Vec<&str> = t
            .reservations
            .iter()
            .filter_map(|r| t.flights.iter().find(|f| f.id == r.flight_id))
            .map(|f| f.destination.as_str())
            .collect();
        Ok(count_by(&destinations, |d| *d).into_iter().next())
    }

    async fn flights_by_aircraft_model(&self) -> AppResult<Vec<Bucket>> {
        let t = self.tables();
        let models: Vec<&str> = t
            .flights
            .iter()
            .filter_map(|f| t.aircraft.iter().find(|a| a.id == f.aircraft_id))
            .map(|a| a.model.as_str())
            .collect();
        Ok(count_by(&models, |m| *m))
    }

    async fn reservations_by_status(&self) -> AppResult<Vec<Bucket>> {
        Ok(count_by(&self.tables().reservations, |r| wire_name(&r.status)))
    }

    async fn average_baggage_weight(&self) -> AppResult<f64> {
        let t = self.tables();
        if t.baggage.is_empty() {
            return Ok(0.0);
        }
        Ok(t.baggage.iter().map(|b| b.weight).sum::<f64>() / t.baggage.len() as f64)
    }

    async fn payments_by_method(&self) -> AppResult<Vec<Bucket>> {
        Ok(count_by(&self.tables().payments, |p| wire_name(&p.method)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::model::{ContactInfo, Preferences};

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        store
            .insert_user(&User::new("a@b.co".into(), "h".into(), Role::Customer))
            .await
            .unwrap();
        let err = store
            .insert_user(&User::new("a@b.co".into(), "h".into(), Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_a_user_drops_their_profile() {
        let store = MemoryStore::new();
        let user = User::new("c@b.co".into(), "h".into(), Role::Customer);
        store.insert_user(&user).await.unwrap();
        let customer = Customer::new(
            user.id,
            "P123".into(),
            ContactInfo::default(),
            Preferences::default(),
        );
        store.insert_customer(&customer).await.unwrap();

        assert!(store.delete_user(user.id).await.unwrap());
        assert!(store.find_customer(customer.id).await.unwrap().is_none());
        assert!(!store.delete_user(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn unprofiled_lists_only_customers_without_profile() {
        let store = MemoryStore::new();
        let with = User::new("with@b.co".into(), "h".into(), Role::Customer);
        let without = User::new("without@b.co".into(), "h".into(), Role::Customer);
        let staff = User::new("staff@b.co".into(), "h".into(), Role::Employee);
        for u in [&with, &without, &staff] {
            store.insert_user(u).await.unwrap();
        }
        store
            .insert_customer(&Customer::new(
                with.id,
                "P1".into(),
                ContactInfo::default(),
                Preferences::default(),
            ))
            .await
            .unwrap();

        let ids: Vec<Uuid> = store
            .unprofiled_customer_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![without.id]);
    }

    #[test]
    fn buckets_sort_by_count_then_label() {
        let rows = ["b", "a", "b", "c", "a", "b"];
        let buckets = count_by(&rows, |r| *r);
        assert_eq!(buckets[0], Bucket { label: "b".into(), total: 3 });
        assert_eq!(buckets[1], Bucket { label: "a".into(), total: 2 });
        assert_eq!(buckets[2], Bucket { label: "c".into(), total: 1 });
    }
}
