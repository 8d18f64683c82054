fn main() {
    if let Err(err) = vellum::cli::run() {
        vellum::ui::output::error(format!("{err:#}"));
        std::process::exit(1);
    }
}
