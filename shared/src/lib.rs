pub mod constants;
pub mod countdown;
pub mod run;
pub mod save_record;
pub mod scheduler;
pub mod track;

pub use countdown::{format_countdown, format_run_time};
pub use save_record::SaveRecord;
