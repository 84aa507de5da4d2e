pub fn run() {
    println!("Available commands:");
    println!();
    println!("  -version          Show version information");
    println!("  -help             Show this help message");
    println!("  -search           Search a page: -search <PAGE> <TERM> [--next N] [--previous N] [--markup]");
    println!("  -edit-config      Open config file in editor");
    println!("  -show-config      Display current configuration");
    println!("  -validate-config  Validate configuration file");
}
