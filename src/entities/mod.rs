//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the clinic tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod appointment;
pub mod cash_flow;
pub mod insurance;
pub mod patient;
pub mod professional;

// Re-export specific types to avoid conflicts
pub use appointment::{
    Column as AppointmentColumn, Entity as Appointment, Model as AppointmentModel,
};
pub use cash_flow::{Column as CashFlowColumn, Entity as CashFlow, Model as CashFlowModel};
pub use insurance::{Column as InsuranceColumn, Entity as Insurance, Model as InsuranceModel};
pub use patient::{Column as PatientColumn, Entity as Patient, Model as PatientModel};
pub use professional::{
    Column as ProfessionalColumn, Entity as Professional, Model as ProfessionalModel,
};
