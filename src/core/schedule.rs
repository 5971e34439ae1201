//! Fixed time slots and the per-day schedule grid.
//!
//! A day has 18 bookable half-hour slots: the morning block 08:00-12:00 and the
//! afternoon block 13:30-17:30. The grid pairs every slot with the appointment
//! booked in it, if any.

use crate::{
    core::appointment::get_appointments_by_date_and_professional,
    entities::{Insurance, Patient, appointment, insurance, patient},
    errors::Result,
};
use sea_orm::{DatabaseConnection, prelude::*};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Every bookable slot of a day, in chronological order.
pub const TIME_SLOTS: [&str; 18] = [
    "08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "13:30",
    "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00", "17:30",
];

/// Whether `time` is one of the bookable slots.
#[must_use]
pub fn is_valid_time_slot(time: &str) -> bool {
    TIME_SLOTS.contains(&time)
}

/// What a booked slot shows.
#[derive(Debug, Clone, PartialEq)]
pub struct BookedSlot {
    /// Appointment occupying the slot
    pub appointment_id: i64,
    /// Patient display name (falls back to `#id` if the patient row is gone)
    pub patient_name: String,
    /// Insurance name, `None` for private appointments
    pub insurance_name: Option<String>,
    /// Stored status string
    pub status: String,
    /// Whether the appointment is paid
    pub paid: bool,
    /// Amount charged
    pub amount: Option<f64>,
}

/// State of one slot in the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    /// Nothing booked
    Available,
    /// An appointment occupies the slot
    Booked(BookedSlot),
}

/// One row of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    /// Slot time
    pub time: &'static str,
    /// Slot contents
    pub slot: SlotState,
}

/// Builds the 18-row grid from one day's appointments.
///
/// Name maps are keyed by id. Appointments outside the fixed slots are not shown;
/// if two appointments share a slot the earliest booked one is displayed.
#[must_use]
pub fn build_schedule_grid(
    appointments: &[appointment::Model],
    patient_names: &HashMap<i64, String>,
    insurance_names: &HashMap<i64, String>,
) -> Vec<ScheduleRow> {
    let mut by_time: HashMap<&str, &appointment::Model> = HashMap::new();
    for appointment in appointments {
        if !is_valid_time_slot(&appointment.time) {
            warn!(id = appointment.id, time = %appointment.time, "Appointment outside the slot grid");
            continue;
        }
        by_time
            .entry(appointment.time.as_str())
            .and_modify(|current| {
                if appointment.id < current.id {
                    *current = appointment;
                }
            })
            .or_insert(appointment);
    }

    TIME_SLOTS
        .iter()
        .map(|&time| {
            let slot = by_time.get(time).map_or(SlotState::Available, |a| {
                SlotState::Booked(BookedSlot {
                    appointment_id: a.id,
                    patient_name: patient_names
                        .get(&a.patient_id)
                        .cloned()
                        .unwrap_or_else(|| format!("#{}", a.patient_id)),
                    insurance_name: a
                        .insurance_id
                        .map(|id| insurance_names.get(&id).cloned().unwrap_or_else(|| format!("#{id}"))),
                    status: a.status.clone(),
                    paid: a.paid,
                    amount: a.amount,
                })
            });
            ScheduleRow { time, slot }
        })
        .collect()
}

/// Loads a professional's day and lays it out on the slot grid.
pub async fn load_schedule(
    db: &DatabaseConnection,
    date: Date,
    professional_name: &str,
) -> Result<Vec<ScheduleRow>> {
    let appointments = get_appointments_by_date_and_professional(db, date, professional_name).await?;
    debug!(%date, professional_name, booked = appointments.len(), "Building schedule grid");

    let patient_ids: HashSet<i64> = appointments.iter().map(|a| a.patient_id).collect();
    let insurance_ids: HashSet<i64> = appointments.iter().filter_map(|a| a.insurance_id).collect();

    let patient_names: HashMap<i64, String> = if patient_ids.is_empty() {
        HashMap::new()
    } else {
        Patient::find()
            .filter(patient::Column::Id.is_in(patient_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect()
    };

    let insurance_names: HashMap<i64, String> = if insurance_ids.is_empty() {
        HashMap::new()
    } else {
        Insurance::find()
            .filter(insurance::Column::Id.is_in(insurance_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|i| (i.id, i.name))
            .collect()
    };

    Ok(build_schedule_grid(&appointments, &patient_names, &insurance_names))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_time_slots_shape() {
        assert_eq!(TIME_SLOTS.len(), 18);
        assert_eq!(TIME_SLOTS.first(), Some(&"08:00"));
        assert_eq!(TIME_SLOTS.last(), Some(&"17:30"));
        assert!(!is_valid_time_slot("12:30"));
        assert!(!is_valid_time_slot("13:00"));
        assert!(is_valid_time_slot("13:30"));
        assert!(!is_valid_time_slot("9:00"));

        let mut sorted = TIME_SLOTS;
        sorted.sort_unstable();
        assert_eq!(sorted, TIME_SLOTS);
    }

    #[test]
    fn test_empty_grid_is_all_available() {
        let grid = build_schedule_grid(&[], &HashMap::new(), &HashMap::new());
        assert_eq!(grid.len(), 18);
        assert!(grid.iter().all(|row| row.slot == SlotState::Available));
    }

    #[tokio::test]
    async fn test_load_schedule_places_bookings() -> Result<()> {
        let (db, professional, patient) = setup_with_parties().await?;
        let insurance = create_test_insurance(&db, "Unimed").await?;
        let private = book_private(&db, professional.id, patient.id, "09:00", Some(150.0)).await?;
        book_insured(&db, professional.id, patient.id, insurance.id, "14:30", None).await?;

        let grid = load_schedule(&db, ymd(2024, 6, 1), &professional.name).await?;
        assert_eq!(grid.len(), 18);

        let nine = grid.iter().find(|row| row.time == "09:00").unwrap();
        let SlotState::Booked(booked) = &nine.slot else {
            panic!("09:00 should be booked");
        };
        assert_eq!(booked.appointment_id, private.id);
        assert_eq!(booked.patient_name, "Carlos Pereira");
        assert_eq!(booked.insurance_name, None);
        assert_eq!(booked.status, "agendado");

        let afternoon = grid.iter().find(|row| row.time == "14:30").unwrap();
        let SlotState::Booked(insured) = &afternoon.slot else {
            panic!("14:30 should be booked");
        };
        assert_eq!(insured.insurance_name.as_deref(), Some("Unimed"));

        let available = grid
            .iter()
            .filter(|row| row.slot == SlotState::Available)
            .count();
        assert_eq!(available, 16);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_schedule_for_unknown_professional() -> Result<()> {
        let (db, professional, patient) = setup_with_parties().await?;
        book_private(&db, professional.id, patient.id, "09:00", None).await?;

        let grid = load_schedule(&db, ymd(2024, 6, 1), "Dr. Nobody").await?;
        assert!(grid.iter().all(|row| row.slot == SlotState::Available));
        Ok(())
    }
}
