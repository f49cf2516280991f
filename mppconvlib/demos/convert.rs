use mppconvlib::{
    formats::mspdi::Mspdi,
    traits::{ReadFormat, WriteFormat},
};
use std::io::{Cursor, Read};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: нормализуем MSPDI (stdin -> stdout)
    let mut input = Vec::new();
    std::io::stdin().read_to_end(&mut input)?;
    let project = Mspdi::read(Cursor::new(input))?;
    Mspdi::write(std::io::stdout(), &project)?;
    Ok(())
}
