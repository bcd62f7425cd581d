fn main() {
    if let Err(e) = zkbench::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
