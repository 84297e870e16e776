fn main() -> Result<(), Box<dyn std::error::Error>> {
    alokahub::cli::main()
}
