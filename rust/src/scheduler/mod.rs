//! Shift-calendar scheduling: validated shift tables, forward simulation of
//! shift capacity, and projection of a machine's job queue.

mod forward;
mod projection;
mod shift_table;

pub use forward::{calculate_completion_time, find_next_shift_start, ForwardScheduler};
pub use projection::{project_schedule, project_schedule_ordered};
pub use shift_table::{ShiftTable, ShiftWindow};
