use colored::Colorize;
use std::process;

fn main() {
    if let Err(e) = plandoc::run() {
        eprintln!("{} {}", "Error:".bright_red().bold(), e);
        process::exit(e.exit_code());
    }
}
