/// Execute version command
pub fn execute() {
    println!("insightforge {}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
}
