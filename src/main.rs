fn main() {
    if let Err(err) = physioassist_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
