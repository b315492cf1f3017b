/// Demonstrates how to create a png file from a [`Bitmap`]
/// using the [`image`] crate
///
use image::{codecs::png::PngEncoder, ImageEncoder};
use libgbitmap::{Bitmap, Magic};
use std::fs::File;

fn main() -> anyhow::Result<()> {
    // an 8x4 frame, bottom row first
    let rle = b"R4\n8 4\n\x00\x08\x00\x01\x06\x01\x00\x01\x06\x01\x00\x08";
    let bitmap = Bitmap::from_reader(&rle[..], 0)?;

    let mut pbm = Vec::new();
    bitmap.save(&mut pbm, Magic::P1)?;
    print!("{}", String::from_utf8_lossy(&pbm));

    let raster = bitmap.read();
    let luma: Vec<u8> = raster
        .rows_from_top()
        .flatten()
        .map(|p| if *p == 0 { 255 } else { 0 })
        .collect();

    let output = File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open("decode_to_png_example.png")?;

    let encoder = PngEncoder::new(output);
    encoder.write_image(
        &luma,
        u32::from(raster.cols()),
        u32::from(raster.rows()),
        image::ExtendedColorType::L8,
    )?;
    Ok(())
}
