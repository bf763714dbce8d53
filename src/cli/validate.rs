//! Map validation command implementation.

use super::{read_map, CliError};
use anthill::game::{MapSymbol, MapText};
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the map cannot be read or does not parse.
pub(crate) fn execute(map: &Path) -> Result<(), CliError> {
    let text = read_map(map)?;

    println!("Validating: {}", map.display());
    println!();

    let parsed = match MapText::parse(&text) {
        Ok(parsed) => {
            print_check("Map parses", true);
            parsed
        }
        Err(e) => {
            print_check("Map parses", false);
            return Err(e.into());
        }
    };

    let colonies = parsed.colonies();
    let mut hills = vec![0usize; colonies];
    let mut ants = vec![0usize; colonies];
    let (mut food, mut water) = (0usize, 0usize);
    for (_, symbol) in parsed.symbols().iter() {
        match *symbol {
            MapSymbol::Hill(c) => hills[c.index()] += 1,
            MapSymbol::Ant(c) => ants[c.index()] += 1,
            MapSymbol::AntOnHill(c) => {
                hills[c.index()] += 1;
                ants[c.index()] += 1;
            }
            MapSymbol::Food => food += 1,
            MapSymbol::Water => water += 1,
            MapSymbol::Land | MapSymbol::Dead => {}
        }
    }

    let every_colony_starts = hills.iter().zip(&ants).all(|(&h, &a)| h + a > 0);
    print_check("Every colony has a hill or an ant", every_colony_starts);

    let torus = parsed.torus();
    println!();
    println!("Summary:");
    println!("  Size:     {} cols x {} rows", torus.width(), torus.height());
    println!("  Colonies: {colonies}");
    for (index, (h, a)) in hills.iter().zip(&ants).enumerate() {
        println!("    {index}: {h} hills, {a} ants");
    }
    println!("  Food:     {food}");
    println!("  Water:    {water} of {} cells", torus.area());

    if !every_colony_starts {
        return Err(CliError::new("A colony has neither a hill nor an ant"));
    }

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
