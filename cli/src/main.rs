use anyhow::Result;

fn main() -> Result<()> {
    rdfobject_cli::run()
}
