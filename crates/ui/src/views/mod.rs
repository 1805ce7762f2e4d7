mod exercise;
mod header;
mod selector;
mod state;
mod summary;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use exercise::ExerciseView;
pub use header::Header;
pub use selector::DifficultySelectionView;
pub use state::ViewError;
pub use summary::SessionSummaryView;

#[cfg(test)]
pub(crate) use exercise::ExerciseTestHandle;
