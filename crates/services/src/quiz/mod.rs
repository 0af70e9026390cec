mod auto_advance;
mod progress;
mod session;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use auto_advance::{DEFAULT_AUTO_ADVANCE_DELAY_MS, PendingAdvance, default_auto_advance_delay};
pub use progress::QuizProgress;
pub use session::QuizSession;
pub use workflow::{QuizCompletion, QuizLoopService};
