//! Keeps schedule rows in step with each flight's crew list and timing.
//!
//! None of these steps run inside a transaction: if a later write fails the
//! earlier ones stay applied.

use futures::future::try_join_all;
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{Schedule, ShiftTiming};
use crate::error::AppResult;
use crate::flights::model::Flight;
use crate::state::AppState;

/// Crew-set difference between a stored flight and its replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrewDiff {
    pub removed: Vec<Uuid>,
    pub added: Vec<Uuid>,
    pub stayed: Vec<Uuid>,
}

impl CrewDiff {
    pub fn between(old: &[Uuid], new: &[Uuid]) -> Self {
        Self {
            removed: old.iter().filter(|id| !new.contains(id)).copied().collect(),
            added: new.iter().filter(|id| !old.contains(id)).copied().collect(),
            stayed: new.iter().filter(|id| old.contains(id)).copied().collect(),
        }
    }
}

/// Creates one schedule row per listed crew member of `flight`.
///
/// Unknown employee ids are skipped. Inserts run concurrently and the batch
/// fails on the first error. Returns how many rows were created.
pub async fn assign_crew(state: &AppState, flight: &Flight, crew: &[Uuid]) -> AppResult<usize> {
    let timing = ShiftTiming::for_flight(flight);
    let inserts = crew
        .iter()
        .map(|&employee_id| schedule_if_employed(state, employee_id, flight.id, &timing));
    let created = try_join_all(inserts).await?.into_iter().filter(|c| *c).count();
    debug!(flight_id = %flight.id, created, "crew schedules created");
    Ok(created)
}

async fn schedule_if_employed(
    state: &AppState,
    employee_id: Uuid,
    flight_id: Uuid,
    timing: &ShiftTiming,
) -> AppResult<bool> {
    if state.directory.find_employee(employee_id).await?.is_none() {
        debug!(%employee_id, %flight_id, "crew member not found; no schedule");
        return Ok(false);
    }
    state
        .schedules
        .insert_schedule(&Schedule::new(employee_id, flight_id, timing))
        .await?;
    Ok(true)
}

/// Reconciles schedules after `stored` was replaced by `updated`.
pub async fn reconcile_crew(
    state: &AppState,
    stored: &Flight,
    updated: &Flight,
) -> AppResult<CrewDiff> {
    let diff = CrewDiff::between(&stored.crew, &updated.crew);

    let deleted = state
        .schedules
        .delete_schedules(updated.id, &diff.removed)
        .await?;
    let created = assign_crew(state, updated, &diff.added).await?;
    let retimed = state
        .schedules
        .retime_schedules(updated.id, &diff.stayed, &ShiftTiming::for_flight(updated))
        .await?;

    info!(flight_id = %updated.id, deleted, created, retimed, "crew schedules reconciled");
    Ok(diff)
}

/// Drops every schedule row of `flight`'s crew; call before deleting the flight.
pub async fn release_crew(state: &AppState, flight: &Flight) -> AppResult<u64> {
    let deleted = state
        .schedules
        .delete_schedules(flight.id, &flight.crew)
        .await?;
    debug!(flight_id = %flight.id, deleted, "crew schedules released");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::model::{Employee, EmployeeRole, Role, User};
    use crate::error::AppError;
    use crate::flights::model::FlightStatus;
    use crate::notify::ConsoleNotifier;
    use crate::schedules::model::CrewShift;
    use crate::schedules::repo::ScheduleStore;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Arc;
    use time::macros::datetime;
    use time::OffsetDateTime;

    fn fake() -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::fake_with(store.clone(), Arc::new(ConsoleNotifier));
        (state, store)
    }

    async fn seed_employee(state: &AppState, role: EmployeeRole) -> Uuid {
        let user = User::new(
            format!("{}@crew.test", Uuid::new_v4()),
            "x".into(),
            Role::Employee,
        );
        state.directory.insert_user(&user).await.unwrap();
        let employee = Employee::new(user.id, role);
        state.directory.insert_employee(&employee).await.unwrap();
        employee.id
    }

    fn flight(crew: Vec<Uuid>) -> Flight {
        Flight {
            id: Uuid::new_v4(),
            flight_number: "SK100".into(),
            origin: "MEX".into(),
            destination: "CUN".into(),
            departure_time: datetime!(2024-05-06 08:00 UTC),
            arrival_time: datetime!(2024-05-06 10:15 UTC),
            aircraft_id: Uuid::new_v4(),
            crew,
            status: FlightStatus::Scheduled,
            price: Some(1000.0),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn crew_diff_splits_removed_added_stayed() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let diff = CrewDiff::between(&[a, b], &[b, c]);
        assert_eq!(diff.removed, vec![a]);
        assert_eq!(diff.added, vec![c]);
        assert_eq!(diff.stayed, vec![b]);
    }

    #[tokio::test]
    async fn assign_creates_rows_for_known_crew_only() {
        let (state, store) = fake();
        let a = seed_employee(&state, EmployeeRole::Pilot).await;
        let ghost = Uuid::new_v4();
        let f = flight(vec![a, ghost]);

        let created = assign_crew(&state, &f, &f.crew).await.unwrap();
        assert_eq!(created, 1);

        let rows = store.schedules_for_flight(f.id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_id, a);
        assert_eq!(rows[0].day, "lunes");
        assert_eq!(rows[0].start_time, "08:00");
        assert_eq!(rows[0].end_time, "10:15");
    }

    #[tokio::test]
    async fn crew_edit_moves_schedules_and_retimes_the_rest() {
        let (state, store) = fake();
        let a = seed_employee(&state, EmployeeRole::Pilot).await;
        let b = seed_employee(&state, EmployeeRole::Crew).await;
        let c = seed_employee(&state, EmployeeRole::Crew).await;

        let stored = flight(vec![a, b]);
        assign_crew(&state, &stored, &stored.crew).await.unwrap();

        let mut updated = stored.clone();
        updated.crew = vec![b, c];
        updated.departure_time = datetime!(2024-05-07 13:00 UTC);
        updated.arrival_time = datetime!(2024-05-07 15:30 UTC);

        let diff = reconcile_crew(&state, &stored, &updated).await.unwrap();
        assert_eq!(diff.removed, vec![a]);

        let rows = store.schedules_for_flight(stored.id);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.employee_id != a));
        for row in &rows {
            assert_eq!(row.day, "martes");
            assert_eq!(row.start_time, "13:00");
            assert_eq!(row.end_time, "15:30");
        }
        assert!(rows.iter().any(|r| r.employee_id == c));
    }

    #[tokio::test]
    async fn release_removes_every_row_of_the_flight() {
        let (state, store) = fake();
        let a = seed_employee(&state, EmployeeRole::Pilot).await;
        let b = seed_employee(&state, EmployeeRole::Ground).await;
        let f = flight(vec![a, b]);
        let other = flight(vec![a]);
        assign_crew(&state, &f, &f.crew).await.unwrap();
        assign_crew(&state, &other, &other.crew).await.unwrap();

        assert_eq!(release_crew(&state, &f).await.unwrap(), 2);
        assert!(store.schedules_for_flight(f.id).is_empty());
        assert_eq!(store.schedules_for_flight(other.id).len(), 1);
    }

    /// Schedule table that refuses every insert.
    struct FullSchedules;

    #[async_trait]
    impl ScheduleStore for FullSchedules {
        async fn insert_schedule(&self, _: &Schedule) -> AppResult<()> {
            Err(AppError::Internal(anyhow::anyhow!("schedules table is full")))
        }
        async fn delete_schedules(&self, _: Uuid, _: &[Uuid]) -> AppResult<u64> {
            Ok(0)
        }
        async fn retime_schedules(&self, _: Uuid, _: &[Uuid], _: &ShiftTiming) -> AppResult<u64> {
            Ok(0)
        }
        async fn schedules_for_employee(&self, _: Uuid) -> AppResult<Vec<Schedule>> {
            Ok(vec![])
        }
        async fn shifts_departing_between(
            &self,
            _: OffsetDateTime,
            _: OffsetDateTime,
        ) -> AppResult<Vec<CrewShift>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn assign_fails_when_any_insert_fails() {
        let (mut state, _) = fake();
        let a = seed_employee(&state, EmployeeRole::Pilot).await;
        let b = seed_employee(&state, EmployeeRole::Crew).await;
        state.schedules = Arc::new(FullSchedules);

        let f = flight(vec![a, b]);
        let err = assign_crew(&state, &f, &f.crew).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn assign_skips_inserts_for_unknown_crew() {
        let (mut state, _) = fake();
        state.schedules = Arc::new(FullSchedules);

        let f = flight(vec![Uuid::new_v4()]);
        assert_eq!(assign_crew(&state, &f, &f.crew).await.unwrap(), 0);
    }
}
