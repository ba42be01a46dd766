mod info;
mod plan;
mod upgrade;

pub use info::cmd_info;
pub use plan::{PlanOptions, cmd_plan};
pub use upgrade::cmd_upgrade;
