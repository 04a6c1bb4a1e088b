mod launch;
mod sync;

pub use launch::{merge_and_launch, MergeAndLaunchArgs};
pub use sync::{sync_dev_mod, SyncDevModArgs};
