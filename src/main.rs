fn main() {
    if let Err(err) = sheet_tally::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
