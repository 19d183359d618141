use colored::Colorize;

pub fn run() {
    println!(
        "{} {}",
        "slidenav".bold().cyan(),
        env!("CARGO_PKG_VERSION").bold()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION").dimmed());
}
