fn main() {
    if let Err(e) = yinian::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
