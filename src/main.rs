use anyhow::Result;

fn main() -> Result<()> {
    quill::run()
}
