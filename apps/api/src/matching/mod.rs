// Skill matching and fit prediction.
// `scorer` is pure set arithmetic; `classifier` wraps the persisted forest from `forest`.

pub mod classifier;
pub mod forest;
pub mod scorer;
