use geocell::prelude::*;
use geocell::{ancestor_codes, encode};

fn main() -> Result<()> {
    env_logger::init();

    println!("Geocell index - getting started\n");

    let code = encode(47.3667, 8.55, 12)?;
    println!("Zurich encodes to {}", code);
    println!("Its enclosing cells: {:?}\n", ancestor_codes(&code));

    let mut index = GeoIndexBuilder::new().max_resolution(12).build()?;

    index.insert_point("grossmunster", Coordinate::new(47.3701, 8.5441), "Grossmünster")?;
    index.insert_point("hauptbahnhof", Coordinate::new(47.3779, 8.5403), "Zürich HB")?;
    index.insert_point("uetliberg", Coordinate::new(47.3495, 8.4915), "Uetliberg")?;
    let generated = index.insert_point_auto(Coordinate::new(47.3667, 8.55), "Bellevue")?;
    println!("Inserted {} waypoints (one as {})\n", index.len()?, generated);

    let center = Coordinate::new(47.3686, 8.5392);
    println!("Within 1.5km of {}:", center);
    for hit in index.nearest(&center, 1500.0, Some(10))? {
        println!(
            "  {:<14} {:>7.1}m  {}",
            hit.key(),
            hit.distance,
            String::from_utf8_lossy(hit.point.data())
        );
    }

    let sw = Coordinate::new(47.36, 8.53);
    let ne = Coordinate::new(47.38, 8.55);
    println!("\nIn box {} .. {}:", sw, ne);
    for hit in index.query_box_exact(&sw, &ne, None)? {
        println!("  {}", hit.key());
    }

    index.relocate("uetliberg", Coordinate::new(47.3520, 8.4890))?;
    index.delete("hauptbahnhof")?;
    println!("\nAfter edits: {:?}", index.stats()?);

    Ok(())
}
