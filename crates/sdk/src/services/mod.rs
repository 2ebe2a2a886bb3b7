//! SDK service implementations
//!
//! One thin service per resource family. Each maps URL templates onto the
//! client's transport and pagination.

mod categories;
mod games;
mod leaderboards;
mod levels;
mod runs;
mod users;
mod v2;

pub use categories::CategoryService;
pub use games::GameService;
pub use leaderboards::{build_leaderboard_name, LeaderboardService};
pub use levels::LevelService;
pub use runs::{filter_runs, DeletedRun, RunService};
pub use users::UserService;
pub use v2::V2Service;
