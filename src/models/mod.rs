//! Scheduling domain models.
//!
//! Plain value records exchanged with the host. The engine copies them
//! and returns new values; it never mutates caller-owned inputs.
//!
//! | Model | Role |
//! |-------|------|
//! | Task | Work to place: deadline, priority, duration, dependencies |
//! | Event | Fixed busy interval on the calendar |
//! | Project | Window bounding a task's start and deadline |
//! | TimeSlot | Transient free or busy interval |
//! | Violation | Invariant broken by a task list |

mod calendar;
mod event;
mod project;
mod task;
mod violation;

pub use calendar::TimeSlot;
pub use event::Event;
pub use project::Project;
pub use task::{Priority, Task};
pub use violation::{Violation, ViolationType};
