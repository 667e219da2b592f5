pub mod claim;
pub use claim::{ClaimGuard, ExclusiveClaim};
