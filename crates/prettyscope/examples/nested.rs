use std::io::{Result, Write};

use prettyscope::effect::{BOLD, BRIGHT_BLUE, BRIGHT_GREEN, BRIGHT_RED, NORMAL_WEIGHT};
use prettyscope::{imbue, EffectString, Registry, Stream};

fn main() -> Result<()> {
    env_logger::init();
    let registry = Registry::standard();

    registry.write_str(Stream::Stdout, "this text is normal\n")?;
    write!(
        registry.apply(Stream::Stdout, BRIGHT_GREEN)?,
        "this text is green\n"
    )?;
    registry.write_str(Stream::Stdout, "this text is normal\n")?;

    {
        let mut green = registry.apply(Stream::Stdout, BRIGHT_GREEN | BOLD)?;
        writeln!(green, "  this text is green and bold")?;

        {
            // Guards need not nest. Each one owns an entry on a pseudostack.
            let mut red = registry.apply(Stream::Stdout, NORMAL_WEIGHT | BRIGHT_RED)?;
            writeln!(red, "      this text is red")?;

            {
                let mut copy = green.clone();
                writeln!(copy, "          this text is green and bold")?;

                {
                    let mut late = registry.persist(Stream::Stdout)?;
                    late.clone_from(&red);
                    writeln!(late, "              this text is red")?;
                }

                copy.print(
                    &(EffectString::plain("          this text is green and bold ")
                        + imbue(BRIGHT_BLUE, "(now it's blue)")
                        + " and now it's green and bold again\n"),
                )?;
            }
            writeln!(red, "      this text is red")?;
        }

        writeln!(green, "  this text is green and bold")?;
    }
    registry.write_str(Stream::Stdout, "this text is normal\n")?;

    // Standard error shares the terminal with standard output.
    {
        let mut warning = registry.apply(Stream::Stderr, BRIGHT_RED)?;
        writeln!(warning, "this warning is red on standard error")?;
        log::info!("linked standard streams: {}", registry.is_linked());
    }

    Ok(())
}
