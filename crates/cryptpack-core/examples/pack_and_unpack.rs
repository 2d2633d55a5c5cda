//! Example: packing and unpacking with cryptpack-core
//!
//! Run with: `cargo run --example pack_and_unpack`

use cryptpack_core::PackConfig;
use cryptpack_core::UnpackConfig;
use cryptpack_core::pack;
use cryptpack_core::unpack;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = std::env::temp_dir().join("cryptpack-example");
    std::fs::create_dir_all(&workdir)?;

    let notes = workdir.join("notes.txt");
    let data = workdir.join("data.bin");
    std::fs::write(&notes, "Hello, cryptpack!")?;
    std::fs::write(&data, vec![0u8; 60_000])?;

    println!("Example 1: pack with the default gzip container");
    let report = pack(&[&notes, &data], "hunter2", "example.cpk", &workdir, &PackConfig::default())?;
    println!(
        "  Packed {} files, {} bytes -> {} bytes",
        report.files_added, report.bytes_read, report.archive_size
    );

    println!("\nExample 2: unpack");
    let output = workdir.join("decrypted");
    let report = unpack(workdir.join("example.cpk"), "hunter2", &output, &UnpackConfig::default())?;
    for name in &report.entries {
        println!("  {name}");
    }

    println!("\nExample 3: wrong password");
    match unpack(workdir.join("example.cpk"), "Password123", &output, &UnpackConfig::default()) {
        Ok(_) => println!("  unexpectedly succeeded"),
        Err(e) if e.is_decode_failure() => println!("  rejected: {e}"),
        Err(e) => return Err(e.into()),
    }

    std::fs::remove_dir_all(&workdir)?;
    println!("\nExamples completed successfully!");
    Ok(())
}
