pub mod age_profile;
pub mod run_log;
pub mod trajectory_csv;
