use chrono::{DateTime, Local};

pub fn get_current_time() -> String {
    format_time(&Local::now())
}

pub fn format_time(now: &DateTime<Local>) -> String {
    format!("Current time: {}", now.format("%Y-%m-%d %H:%M:%S"))
}
