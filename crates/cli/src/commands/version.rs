const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() {
    println!("hotelier-cli v{}", CURRENT_VERSION);
}
