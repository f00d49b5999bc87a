// ontarget host runner: executes a built-in suite and exits with its result
// Usage: cargo run --bin ontarget-host -- run --suite showcase

fn main() -> miette::Result<()> {
    ontarget::cli::run()
}
