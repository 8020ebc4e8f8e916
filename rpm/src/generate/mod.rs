//! Generation client: lesson form in, structured lesson plan out

mod generator;
mod schema;

pub use generator::{GENERATION_FAILED_MESSAGE, GenerationFailed, PlanGenerator};
pub use schema::{PLAN_GROUPS, plan_schema};
