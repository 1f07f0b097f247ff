use twigscope_core::corpus::CorpusSnapshot;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let schema = CorpusSnapshot::json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
