//! Binary entry point for the arcade platform.

fn main() {
    if let Err(e) = lib_arcade::init() {
        eprintln!("❌ Fatal error: {e}");
        std::process::exit(1);
    }
}
