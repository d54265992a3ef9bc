pub mod constants;
pub mod estimator;
pub mod event;
pub mod histograms;
pub mod multest_errors;
pub mod output;
pub mod primary;
pub mod species;
pub mod task;
