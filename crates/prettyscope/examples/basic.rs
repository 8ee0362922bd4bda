use std::io::{Result, Write};

use prettyscope::effect::{BRIGHT_BLUE, BRIGHT_GREEN, BRIGHT_RED, UNDERLINED};
use prettyscope::{Registry, Stream};

fn main() -> Result<()> {
    env_logger::init();
    let registry = Registry::standard();

    registry.write_str(Stream::Stdout, "this text is normal\n")?;
    // The temporary guard restores the style at the end of the statement.
    write!(
        registry.apply(Stream::Stdout, BRIGHT_BLUE)?,
        "this text is blue\n"
    )?;
    registry.write_str(Stream::Stdout, "this text is normal\n")?;

    {
        let mut blue = registry.apply(Stream::Stdout, BRIGHT_BLUE)?;
        writeln!(blue, "  this text is blue")?;
        writeln!(blue, "  this text is still blue")?;

        {
            let mut red = registry.apply(Stream::Stdout, BRIGHT_RED | UNDERLINED)?;
            writeln!(red, "    this text is red and underlined")?;

            {
                let mut green = registry.apply(Stream::Stdout, BRIGHT_GREEN)?;
                writeln!(green, "      this text is green and still underlined")?;
            }
            writeln!(red, "    this text is red and underlined again")?;
        }
        writeln!(blue, "  this text is blue again")?;
    }
    registry.write_str(Stream::Stdout, "this text is normal again\n")?;

    Ok(())
}
