//! Console messages around session start and shutdown.

const COLOR_INFO: &str = "\x1b[1;36m";
const COLOR_SUCCESS: &str = "\x1b[1;32m";
const COLOR_RESET: &str = "\x1b[0m";

pub fn print_session_starting(mode: &str, user: Option<&str>) {
    println!(
        "{}[INFO]{} Starting {} mode for: {}",
        COLOR_INFO,
        COLOR_RESET,
        mode,
        user.unwrap_or("not signed in")
    );
}

pub fn print_session_shutdown() {
    println!("{}[INFO]{} Shutting down...", COLOR_INFO, COLOR_RESET);
}

pub fn print_session_exit_success() {
    println!(
        "{}[SUCCESS]{} proxydash exited successfully",
        COLOR_SUCCESS, COLOR_RESET
    );
}
