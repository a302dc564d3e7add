pub mod events;
pub mod graph_runner;
mod handlers;
mod routes;
pub mod runner;
pub mod scheduler;
pub mod sse;
pub mod state;

pub use events::{ExecutionStateTracker, StateSnapshot, TraceEventV2};
pub use graph_runner::{
    GraphInterruptHandler, InterruptData, InterruptedSessionState, InterruptedSessionStore,
    INTERRUPTED_SESSIONS,
};
pub use routes::api_routes;
pub use runner::{ActionError, ActionNodeEvent, ActionResult, WorkflowExecutor};
pub use scheduler::{start_scheduler, stop_scheduler, get_project_schedules, ScheduledJobInfo};
pub use state::AppState;
