fn main() -> Result<(), Box<dyn std::error::Error>> {
    twigscope_cli::run()
}
