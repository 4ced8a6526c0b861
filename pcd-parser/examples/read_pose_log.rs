use std::path::PathBuf;

use pcd_parser::{parse_file, Format};

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("slam_data.txt"));

    let (format, collected) = match parse_file(&path, Some(Format::Windowed)) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!("Format: {}", format.name());
    println!(
        "Accepted: {accepted}, skipped: {skipped}",
        accepted = collected.accepted,
        skipped = collected.skipped()
    );

    match collected.points.first() {
        Some(point) => println!("First point: {:?}", point),
        None => println!("No points found"),
    }
}
