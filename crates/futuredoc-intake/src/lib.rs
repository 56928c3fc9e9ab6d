//! Intake flow: file selection → analysis → history, with the view state the front end renders.

mod session;
pub use session::{IntakeSession, PendingAnalysis, Status};
