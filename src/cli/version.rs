/// Display version information
pub fn execute() {
    println!("concord {}", env!("CARGO_PKG_VERSION"));
    println!("Operator CLI for the Concord governance ledger");
}
