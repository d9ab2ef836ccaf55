pub mod check;
pub mod error;
pub mod registry;
pub mod report;
pub mod sweep;

pub use check::{check_destroyed, check_exists, precheck, PreCheck};
pub use error::{CheckError, RegistryError, SweepError};
pub use registry::{init, CognitoUserPoolSweeper, RegisteredSweeper, Sweeper, SweeperRegistry, USER_POOL_SWEEPER};
pub use report::{SweepOptions, SweepReport};
pub use sweep::sweep_user_pools;
