mod apply;
mod clamp;
mod config;
mod namer;
mod planner;
mod probe;

pub use apply::{apply_plan, format_entry_line, is_affirmative, ApplyResult, RenameFailure};
pub use clamp::clamp_date_time;
pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use namer::build_file_name;
pub use planner::{
    generate_plan, parse_date_arg, PlanOptions, RenameEntry, RenamePlan, RenameStats,
};
pub use probe::{read_video_metadata, ProbeError, VideoMetadata};
